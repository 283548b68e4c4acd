//! Keyboard shortcut registry.

use crate::input::KeyEvent;
use crate::mutation::ReorderDirection;
use crate::node::GroupKind;

/// Editor command a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    Group(GroupKind),
    Ungroup,
    Duplicate,
    Delete,
    Reorder(ReorderDirection),
    /// Abandon the active gesture.
    Cancel,
    /// Move selected blocks by `step` in the direction of `dx`/`dy`.
    Nudge { dx: i8, dy: i8, step: NudgeStep },
    ZOrder(ZOrderChange),
    /// Toggle the preview device between portrait and landscape.
    RotateDevice,
}

/// Distance one nudge covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeStep {
    /// One pixel.
    Pixel,
    /// Ten pixels.
    Large,
    /// One grid column.
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrderChange {
    Forward,
    Backward,
    Front,
    Back,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            alt,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.key.eq_ignore_ascii_case(self.key)
            && event.modifiers.command() == self.ctrl
            && event.modifiers.shift == self.shift
            && event.modifiers.alt == self.alt
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts = vec![
            Shortcut::new("Z", true, false, false, Command::Undo, "Undo"),
            Shortcut::new("Y", true, false, false, Command::Redo, "Redo"),
            Shortcut::new("Z", true, true, false, Command::Redo, "Redo"),
            Shortcut::new(
                "G",
                true,
                false,
                false,
                Command::Group(GroupKind::Section),
                "Group selection into a section",
            ),
            Shortcut::new("G", true, true, false, Command::Ungroup, "Ungroup selected container"),
            Shortcut::new("D", true, false, false, Command::Duplicate, "Duplicate selected block"),
            Shortcut::new("Delete", false, false, false, Command::Delete, "Delete selected blocks"),
            Shortcut::new("Backspace", false, false, false, Command::Delete, "Delete selected blocks"),
            Shortcut::new(
                "ArrowUp",
                false,
                true,
                true,
                Command::Reorder(ReorderDirection::Up),
                "Move selected block up",
            ),
            Shortcut::new(
                "ArrowDown",
                false,
                true,
                true,
                Command::Reorder(ReorderDirection::Down),
                "Move selected block down",
            ),
            Shortcut::new("Escape", false, false, false, Command::Cancel, "Cancel current drag"),
            Shortcut::new("]", true, false, false, Command::ZOrder(ZOrderChange::Forward), "Bring forward"),
            Shortcut::new("[", true, false, false, Command::ZOrder(ZOrderChange::Backward), "Send backward"),
            Shortcut::new("]", true, true, false, Command::ZOrder(ZOrderChange::Front), "Bring to front"),
            Shortcut::new("[", true, true, false, Command::ZOrder(ZOrderChange::Back), "Send to back"),
            // Taken when nothing is selected.
            Shortcut::new("]", true, true, false, Command::RotateDevice, "Rotate device"),
            Shortcut::new("[", true, true, false, Command::RotateDevice, "Rotate device"),
        ];
        for (key, dx, dy) in [("ArrowLeft", -1, 0), ("ArrowRight", 1, 0), ("ArrowUp", 0, -1), ("ArrowDown", 0, 1)] {
            shortcuts.push(Shortcut::new(
                key,
                false,
                false,
                false,
                Command::Nudge { dx, dy, step: NudgeStep::Pixel },
                "Nudge selected blocks",
            ));
            shortcuts.push(Shortcut::new(
                key,
                false,
                true,
                false,
                Command::Nudge { dx, dy, step: NudgeStep::Large },
                "Nudge selected blocks by 10px",
            ));
            shortcuts.push(Shortcut::new(
                key,
                false,
                false,
                true,
                Command::Nudge { dx, dy, step: NudgeStep::Column },
                "Nudge selected blocks by one column",
            ));
        }
        shortcuts
    }

    /// Command bound to `event`, if any.
    pub fn lookup(event: &KeyEvent) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(event))
            .map(|s| s.command)
    }

    /// Every command bound to `event`, in registry order.
    pub fn matching(event: &KeyEvent) -> Vec<Command> {
        Self::all()
            .into_iter()
            .filter(|s| s.matches(event))
            .map(|s| s.command)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(ShortcutRegistry::lookup(&KeyEvent::new("z", Modifiers::ctrl())), Some(Command::Undo));

        let meta_shift = Modifiers {
            meta: true,
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutRegistry::lookup(&KeyEvent::new("Z", meta_shift)), Some(Command::Redo));
        assert_eq!(ShortcutRegistry::lookup(&KeyEvent::new("y", Modifiers::ctrl())), Some(Command::Redo));
        assert_eq!(ShortcutRegistry::lookup(&KeyEvent::plain("z")), None);
    }

    #[test]
    fn test_reorder_needs_alt_shift() {
        let alt_shift = Modifiers {
            alt: true,
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            ShortcutRegistry::lookup(&KeyEvent::new("ArrowUp", alt_shift)),
            Some(Command::Reorder(ReorderDirection::Up))
        );
        assert_eq!(ShortcutRegistry::lookup(&KeyEvent::new("ArrowUp", Modifiers::shift())), None);
    }

    #[test]
    fn test_format() {
        let formatted: Vec<String> = ShortcutRegistry::all().iter().map(Shortcut::format).collect();
        assert!(formatted.contains(&"Ctrl+Shift+G".to_string()));
        assert!(formatted.contains(&"Alt+Shift+ArrowDown".to_string()));
    }

    #[test]
    fn test_nudge_steps() {
        assert_eq!(
            ShortcutRegistry::lookup(&KeyEvent::plain("ArrowLeft")),
            Some(Command::Nudge {
                dx: -1,
                dy: 0,
                step: NudgeStep::Pixel
            })
        );
        assert_eq!(
            ShortcutRegistry::lookup(&KeyEvent::new("ArrowDown", Modifiers::shift())),
            Some(Command::Nudge {
                dx: 0,
                dy: 1,
                step: NudgeStep::Large
            })
        );
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            ShortcutRegistry::lookup(&KeyEvent::new("ArrowRight", alt)),
            Some(Command::Nudge {
                dx: 1,
                dy: 0,
                step: NudgeStep::Column
            })
        );
    }

    #[test]
    fn test_z_order_falls_back_to_rotate() {
        assert_eq!(
            ShortcutRegistry::lookup(&KeyEvent::new("]", Modifiers::ctrl())),
            Some(Command::ZOrder(ZOrderChange::Forward))
        );
        let ctrl_shift = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            ShortcutRegistry::matching(&KeyEvent::new("[", ctrl_shift)),
            vec![Command::ZOrder(ZOrderChange::Back), Command::RotateDevice]
        );
    }
}
