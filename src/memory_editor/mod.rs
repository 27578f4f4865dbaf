// WHY: Minimal in-memory host so auto-linking can run end to end without a real editor
// Flat list of named blocks; a soft break is a '\n' character inside a block

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

pub mod history;
pub mod session;

pub use history::{History, HistoryStep};
pub use session::Session;

use crate::config::AutolinkConfig;
use crate::host::{
    BatchKind, CommandId, CommandRegistry, EditorHost, Position, TextChange, TextLine, TextRange,
    DEFAULT_PROTOCOL_KEY, ENTER_COMMAND, LINK_ATTRIBUTE, SHIFT_ENTER_COMMAND,
};

/// Character stored for a soft break
pub const SOFT_BREAK: char = '\n';

/// Name given to blocks created without an explicit one
pub const DEFAULT_BLOCK: &str = "paragraph";

/// Element name reported above every block
pub const ROOT_ELEMENT: &str = "$root";

#[derive(Debug, Clone)]
struct StyledChar {
    ch: char,
    attributes: BTreeMap<String, String>,
}

impl StyledChar {
    fn plain(ch: char) -> Self {
        Self { ch, attributes: BTreeMap::new() }
    }
}

#[derive(Debug, Clone)]
struct Block {
    name: String,
    chars: Vec<StyledChar>,
}

impl Block {
    fn new(name: &str, text: &str) -> Self {
        Self { name: name.to_string(), chars: text.chars().map(StyledChar::plain).collect() }
    }

    fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }
}

/// Contiguous run of characters sharing one link target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSpan {
    pub block: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub href: String,
}

/// In-memory editor implementing [`EditorHost`]
#[derive(Debug)]
pub struct MemoryEditor {
    blocks: Vec<Block>,
    caret: Position,
    history: History,
    commands: Vec<String>,
    no_link_blocks: Vec<String>,
    default_protocol: Option<String>,
}

impl MemoryEditor {
    /// Editor holding one empty paragraph
    pub fn new(config: AutolinkConfig) -> Self {
        Self {
            blocks: vec![Block::new(DEFAULT_BLOCK, "")],
            caret: Position::new(0, 0),
            history: History::default(),
            commands: config.commands,
            no_link_blocks: config.no_link_blocks,
            default_protocol: config.default_protocol,
        }
    }

    /// Replace the content with `(block name, text)` pairs; history is cleared and the caret goes to the end
    pub fn load_blocks(&mut self, blocks: &[(&str, &str)]) {
        self.blocks = blocks.iter().map(|(name, text)| Block::new(name, text)).collect();
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(DEFAULT_BLOCK, ""));
        }
        self.history.clear();

        let last = self.blocks.len() - 1;
        self.caret = Position::new(last, self.blocks[last].chars.len());
    }

    /// Move the caret, clamped to existing content
    pub fn set_caret(&mut self, pos: Position) {
        let block = pos.block.min(self.blocks.len() - 1);
        let offset = pos.offset.min(self.blocks[block].chars.len());
        self.caret = Position::new(block, offset);
    }

    pub fn caret_position(&self) -> Position {
        self.caret
    }

    /// Plain text of every block
    pub fn text(&self) -> Vec<String> {
        self.blocks.iter().map(Block::text).collect()
    }

    /// Link target on the character starting at `pos`
    pub fn link_at(&self, pos: Position) -> Option<String> {
        self.blocks
            .get(pos.block)?
            .chars
            .get(pos.offset)?
            .attributes
            .get(LINK_ATTRIBUTE)
            .cloned()
    }

    /// All linked runs in document order
    pub fn links(&self) -> Vec<LinkSpan> {
        let mut spans = Vec::new();

        for (block_index, block) in self.blocks.iter().enumerate() {
            let mut current: Option<LinkSpan> = None;

            for (offset, styled) in block.chars.iter().enumerate() {
                let href = styled.attributes.get(LINK_ATTRIBUTE);
                let continues = matches!(
                    (&current, href),
                    (Some(span), Some(href)) if span.href == *href && span.end == offset
                );

                if continues {
                    if let Some(span) = current.as_mut() {
                        span.end += 1;
                        span.text.push(styled.ch);
                    }
                } else {
                    spans.extend(current.take());
                    current = href.map(|href| LinkSpan {
                        block: block_index,
                        start: offset,
                        end: offset + 1,
                        text: styled.ch.to_string(),
                        href: href.clone(),
                    });
                }
            }
            spans.extend(current);
        }

        spans
    }

    pub fn undo_depth(&self) -> usize {
        self.history.depth()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Insert `text` at the caret as one batch and move the caret after it
    pub fn insert_text(&mut self, text: &str, batch: BatchKind) -> TextChange {
        let start = self.caret;
        let inserted: Vec<StyledChar> = text.chars().map(StyledChar::plain).collect();
        let len = inserted.len();

        let block = &mut self.blocks[start.block];
        let tail = block.chars.split_off(start.offset);
        block.chars.extend(inserted);
        block.chars.extend(tail);

        self.caret = start.shifted_forward(len);
        self.history.record_insert(batch, start, len);

        TextChange { batch }
    }

    /// Run a registered command; `None` when the command does not exist
    pub fn execute(&mut self, name: &str) -> Option<CommandId> {
        let id = self.command(name)?;
        match name {
            ENTER_COMMAND => self.split_block(),
            SHIFT_ENTER_COMMAND => {
                let start = self.caret;
                self.blocks[start.block].chars.insert(start.offset, StyledChar::plain(SOFT_BREAK));
                self.caret = start.shifted_forward(1);
                self.history.record_insert(BatchKind::Programmatic, start, 1);
            }
            other => debug!(command = other, "command has no effect in the memory editor"),
        }
        Some(id)
    }

    fn split_block(&mut self) {
        let at = self.caret;
        let block = &mut self.blocks[at.block];
        let tail = block.chars.split_off(at.offset);
        let new_block = Block { name: block.name.clone(), chars: tail };

        self.blocks.insert(at.block + 1, new_block);
        self.caret = Position::new(at.block + 1, 0);
        self.history.record_split(at);
    }

    /// Revert the most recent step; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(step) = self.history.pop() else {
            return false;
        };

        match step {
            HistoryStep::Insert { start, len, .. } => {
                self.blocks[start.block].chars.drain(start.offset..start.offset + len);
                self.caret = start;
            }
            HistoryStep::SplitBlock { at } => {
                let tail = self.blocks.remove(at.block + 1);
                self.blocks[at.block].chars.extend(tail.chars);
                self.caret = at;
            }
            HistoryStep::Attribute { range, key, previous } => {
                let chars = &mut self.blocks[range.start.block].chars[range.start.offset..range.end.offset];
                history::restore_attribute(chars.iter_mut().map(|c| &mut c.attributes), &key, &previous);
            }
        }
        true
    }

    /// Characters of a flat, in-bounds, non-empty range
    fn chars_in(&self, range: TextRange) -> Option<&[StyledChar]> {
        if !range.is_flat() || range.is_empty() {
            return None;
        }
        let block = self.blocks.get(range.start.block)?;
        block.chars.get(range.start.offset..range.end.offset)
    }
}

impl CommandRegistry for MemoryEditor {
    fn command(&self, name: &str) -> Option<CommandId> {
        self.commands
            .iter()
            .position(|c| c == name)
            .map(|index| CommandId(index as u32))
    }
}

impl EditorHost for MemoryEditor {
    fn caret(&self) -> Option<Position> {
        Some(self.caret)
    }

    fn block_start(&self, pos: Position) -> Position {
        Position::new(pos.block, 0)
    }

    fn previous_block_range(&self, pos: Position) -> Option<TextRange> {
        let previous = pos.block.checked_sub(1)?;
        let block = self.blocks.get(previous)?;
        Some(TextRange::new(Position::new(previous, 0), Position::new(previous, block.chars.len())))
    }

    fn last_text_line(&self, range: TextRange) -> TextLine {
        let empty = TextLine { text: String::new(), range: TextRange::new(range.end, range.end) };
        if !range.is_flat() {
            return empty;
        }
        let Some(block) = self.blocks.get(range.end.block) else {
            return empty;
        };

        let end = range.end.offset.min(block.chars.len());
        let floor = range.start.offset.min(end);
        let mut start = end;
        while start > floor && block.chars[start - 1].ch != SOFT_BREAK {
            start -= 1;
        }

        TextLine {
            text: block.chars[start..end].iter().map(|c| c.ch).collect(),
            range: TextRange::new(Position::new(range.end.block, start), Position::new(range.end.block, end)),
        }
    }

    fn is_attribute_allowed(&self, range: TextRange, key: &str) -> bool {
        let Some(chars) = self.chars_in(range) else {
            return false;
        };
        if key == LINK_ATTRIBUTE && self.no_link_blocks.contains(&self.blocks[range.start.block].name) {
            return false;
        }
        chars.iter().all(|c| c.ch != SOFT_BREAK)
    }

    fn attribute_covers(&self, range: TextRange, key: &str, value: &str) -> bool {
        self.chars_in(range)
            .is_some_and(|chars| chars.iter().all(|c| c.attributes.get(key).is_some_and(|v| v == value)))
    }

    fn set_attribute_in_new_step(&mut self, range: TextRange, key: &str, value: &str) {
        if self.chars_in(range).is_none() {
            debug!(?range, key, "attribute range outside the document, ignored");
            return;
        }

        let chars = &mut self.blocks[range.start.block].chars[range.start.offset..range.end.offset];
        let previous = chars
            .iter_mut()
            .map(|c| c.attributes.insert(key.to_string(), value.to_string()))
            .collect();

        self.history.record_attribute(range, key, previous);
    }

    fn selection_ancestors(&self) -> Vec<String> {
        let block = &self.blocks[self.caret.block];
        vec![block.name.clone(), ROOT_ELEMENT.to_string()]
    }

    fn config_value(&self, key: &str) -> Option<String> {
        match key {
            DEFAULT_PROTOCOL_KEY => self.default_protocol.clone(),
            _ => None,
        }
    }
}
