// WHY: The only contract between auto-linking and the editor that embeds it
// Document model, schema, history and selection all live behind these traits

/// Attribute key carrying the link target
pub const LINK_ATTRIBUTE: &str = "linkHref";

/// Host configuration key for the default protocol
pub const DEFAULT_PROTOCOL_KEY: &str = "link.defaultProtocol";

/// Command names looked up at attach time
pub const ENTER_COMMAND: &str = "enter";
pub const SHIFT_ENTER_COMMAND: &str = "shiftEnter";

/// Position inside a text block.
///
/// `offset` counts Unicode scalar values from the start of the block.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    /// Move towards the block start; `None` when that would cross it
    pub fn shifted_back(&self, count: usize) -> Option<Self> {
        self.offset.checked_sub(count).map(|offset| Self { block: self.block, offset })
    }

    pub fn shifted_forward(&self, count: usize) -> Self {
        Self { block: self.block, offset: self.offset + count }
    }
}

/// Half-open span `[start, end)` within one block
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range of `len` characters finishing at `end`
    pub fn ending_at(end: Position, len: usize) -> Option<Self> {
        end.shifted_back(len).map(|start| Self { start, end })
    }

    pub fn is_flat(&self) -> bool {
        self.start.block == self.end.block
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Longest run of plain text ending at the end of a queried range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub range: TextRange,
}

/// Origin of a batch of document changes
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BatchKind {
    Typing,
    Paste,
    Programmatic,
}

impl BatchKind {
    pub fn is_typing(&self) -> bool {
        matches!(self, BatchKind::Typing)
    }
}

/// Text change notification delivered after the document has changed
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TextChange {
    pub batch: BatchKind,
}

/// Handle of a registered command
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct CommandId(pub u32);

/// Notifications the host forwards to the plugin
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EditorEvent {
    TextChanged(TextChange),
    CommandExecuted(CommandId),
    SelectionChanged,
}

/// Command lookup by name, tolerating absent commands
pub trait CommandRegistry {
    fn command(&self, name: &str) -> Option<CommandId>;
}

/// Editor capabilities consumed by auto-linking
pub trait EditorHost: CommandRegistry {
    /// Collapsed caret position, `None` for a non-collapsed or missing selection
    fn caret(&self) -> Option<Position>;

    /// Start of the block containing `pos`
    fn block_start(&self, pos: Position) -> Position;

    /// Whole content of the block immediately before the one containing `pos`
    fn previous_block_range(&self, pos: Position) -> Option<TextRange>;

    /// Longest contiguous plain-text run that ends at `range.end` and stays inside `range`
    fn last_text_line(&self, range: TextRange) -> TextLine;

    /// Schema check: may `key` be set on every position of `range`
    fn is_attribute_allowed(&self, range: TextRange, key: &str) -> bool;

    /// True when every position of `range` already carries `key = value`
    fn attribute_covers(&self, range: TextRange, key: &str, value: &str) -> bool;

    /// Set `key = value` over `range` as its own undo step
    fn set_attribute_in_new_step(&mut self, range: TextRange, key: &str, value: &str);

    /// Element names enclosing the caret, innermost first
    fn selection_ancestors(&self) -> Vec<String>;

    /// Single string configuration option
    fn config_value(&self, key: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_ending_at() {
        let end = Position::new(2, 10);
        let range = TextRange::ending_at(end, 4).unwrap();
        assert_eq!(range.start, Position::new(2, 6));
        assert_eq!(range.len(), 4);
        assert!(range.is_flat());
    }

    #[test]
    fn test_range_cannot_cross_block_start() {
        assert_eq!(TextRange::ending_at(Position::new(0, 3), 4), None);
        assert!(TextRange::ending_at(Position::new(0, 4), 4).is_some());
    }

    #[test]
    fn test_position_shifts() {
        let pos = Position::new(1, 5);
        assert_eq!(pos.shifted_back(1), Some(Position::new(1, 4)));
        assert_eq!(pos.shifted_forward(2), Position::new(1, 7));
        assert_eq!(Position::new(1, 0).shifted_back(1), None);
    }
}
