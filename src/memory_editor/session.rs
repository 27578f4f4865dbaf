// WHY: Drives the in-memory editor the way a user would and forwards each resulting event to the plugin

use anyhow::Result;

use super::MemoryEditor;
use crate::autolink::{AutoLink, AutoLinkOutcome};
use crate::config::AutolinkConfig;
use crate::host::{BatchKind, EditorEvent, Position, ENTER_COMMAND, SHIFT_ENTER_COMMAND};

/// Editor plus attached auto-link plugin
#[derive(Debug)]
pub struct Session {
    editor: MemoryEditor,
    autolink: AutoLink,
}

impl Session {
    pub fn new(config: AutolinkConfig) -> Result<Self> {
        let editor = MemoryEditor::new(config.clone());
        let autolink = AutoLink::attach(&editor, &config)?;
        Ok(Self { editor, autolink })
    }

    /// Couple an existing editor and plugin
    pub fn from_parts(editor: MemoryEditor, autolink: AutoLink) -> Self {
        Self { editor, autolink }
    }

    pub fn editor(&self) -> &MemoryEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut MemoryEditor {
        &mut self.editor
    }

    pub fn autolink(&self) -> &AutoLink {
        &self.autolink
    }

    /// Forward a host event to the plugin as the editor would
    pub fn dispatch(&mut self, event: EditorEvent) -> AutoLinkOutcome {
        self.autolink.handle_event(&mut self.editor, &event)
    }

    /// One keystroke
    pub fn type_char(&mut self, ch: char) -> AutoLinkOutcome {
        let mut buf = [0u8; 4];
        let change = self.editor.insert_text(ch.encode_utf8(&mut buf), BatchKind::Typing);
        self.dispatch(EditorEvent::TextChanged(change))
    }

    /// Keystrokes for every character of `text`
    pub fn type_text(&mut self, text: &str) -> Vec<AutoLinkOutcome> {
        text.chars().map(|ch| self.type_char(ch)).collect()
    }

    /// Insert `text` in one paste batch
    pub fn paste(&mut self, text: &str) -> AutoLinkOutcome {
        let change = self.editor.insert_text(text, BatchKind::Paste);
        self.dispatch(EditorEvent::TextChanged(change))
    }

    /// Execute a command by name and notify the plugin; `Ignored` when the command is not registered
    pub fn run_command(&mut self, name: &str) -> AutoLinkOutcome {
        match self.editor.execute(name) {
            Some(id) => self.dispatch(EditorEvent::CommandExecuted(id)),
            None => AutoLinkOutcome::Ignored,
        }
    }

    pub fn press_enter(&mut self) -> AutoLinkOutcome {
        self.run_command(ENTER_COMMAND)
    }

    pub fn press_shift_enter(&mut self) -> AutoLinkOutcome {
        self.run_command(SHIFT_ENTER_COMMAND)
    }

    /// Move the caret and let the plugin re-evaluate its enablement
    pub fn move_caret(&mut self, pos: Position) -> AutoLinkOutcome {
        self.editor.set_caret(pos);
        self.dispatch(EditorEvent::SelectionChanged)
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Replay raw text: newlines press Enter, a backslash right before a newline presses Shift+Enter
    pub fn replay(&mut self, text: &str) -> Vec<AutoLinkOutcome> {
        let mut outcomes = Vec::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            let outcome = match ch {
                '\\' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    self.press_shift_enter()
                }
                '\r' if chars.peek() == Some(&'\n') => continue,
                '\n' => self.press_enter(),
                _ => self.type_char(ch),
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_link_then_more_text() {
        let mut session = Session::new(AutolinkConfig::default().with_default_protocol("https")).unwrap();

        let outcomes = session.type_text("go x.io now ");
        assert_eq!(outcomes.iter().filter(|o| o.is_applied()).count(), 1);

        let links = session.editor().links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "x.io");
        assert_eq!(links[0].href, "https://x.io");
    }

    #[test]
    fn test_replay_handles_breaks() {
        let mut session = Session::new(AutolinkConfig::default()).unwrap();
        session.replay("a x.io\\\nb y.io\r\nc");

        assert_eq!(session.editor().text(), vec!["a x.io\nb y.io", "c"]);
        let linked: Vec<_> = session.editor().links().into_iter().map(|l| l.text).collect();
        assert_eq!(linked, vec!["x.io", "y.io"]);
    }

    #[test]
    fn test_missing_command_is_ignored() {
        let mut session = Session::new(AutolinkConfig::default().with_commands(&[])).unwrap();
        session.type_text("x.io");

        assert_eq!(session.press_enter(), AutoLinkOutcome::Ignored);
        assert_eq!(session.editor().text(), vec!["x.io"]);
        assert!(session.editor().links().is_empty());
    }
}
