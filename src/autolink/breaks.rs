// WHY: Enter and Shift+Enter close off a line without a trailing space, so the line end itself is the trigger point
// No minimum-length gate here: breaks are rare compared to keystrokes

use tracing::debug;

use super::annotator::Annotator;
use super::{AutoLinkOutcome, SkipReason};
use crate::host::{CommandId, CommandRegistry, EditorHost, TextRange, ENTER_COMMAND, SHIFT_ENTER_COMMAND};
use crate::url_detector::{char_len, UrlDetector};

/// Which structural break a command performs
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BreakKind {
    Paragraph,
    Soft,
}

/// Break commands found in the host registry at attach time
#[derive(Copy, Clone, Debug, Default)]
pub struct BreakCommands {
    pub enter: Option<CommandId>,
    pub shift_enter: Option<CommandId>,
}

impl BreakCommands {
    pub fn lookup<R: CommandRegistry + ?Sized>(registry: &R) -> Self {
        Self {
            enter: registry.command(ENTER_COMMAND),
            shift_enter: registry.command(SHIFT_ENTER_COMMAND),
        }
    }

    /// Break kind for an executed command, `None` for unrelated or unwired commands
    pub fn kind_of(&self, id: CommandId) -> Option<BreakKind> {
        if self.enter == Some(id) {
            Some(BreakKind::Paragraph)
        } else if self.shift_enter == Some(id) {
            Some(BreakKind::Soft)
        } else {
            None
        }
    }
}

/// Handle a command execution reported by the host
pub(super) fn on_command_executed<H: EditorHost + ?Sized>(
    detector: &UrlDetector,
    annotator: &Annotator,
    commands: &BreakCommands,
    host: &mut H,
    id: CommandId,
) -> AutoLinkOutcome {
    let Some(kind) = commands.kind_of(id) else {
        return AutoLinkOutcome::Ignored;
    };

    if !annotator.enablement().is_enabled() {
        return AutoLinkOutcome::Skipped(SkipReason::Disabled);
    }

    let Some(caret) = host.caret() else {
        return AutoLinkOutcome::Skipped(SkipReason::NoCaret);
    };

    let range_to_check = match kind {
        BreakKind::Paragraph => match host.previous_block_range(caret) {
            Some(range) => range,
            None => {
                debug!(?caret, "no block before the new paragraph");
                return AutoLinkOutcome::Skipped(SkipReason::NoPreviousBlock);
            }
        },
        // The soft break itself sits right before the caret
        BreakKind::Soft => match caret.shifted_back(1) {
            Some(before_break) => TextRange::new(host.block_start(caret), before_break),
            None => return AutoLinkOutcome::Skipped(SkipReason::StaleRange),
        },
    };

    check_and_apply(detector, annotator, host, range_to_check)
}

/// Detect a URL at the end of the last text line inside `range_to_check` and link it
fn check_and_apply<H: EditorHost + ?Sized>(
    detector: &UrlDetector,
    annotator: &Annotator,
    host: &mut H,
    range_to_check: TextRange,
) -> AutoLinkOutcome {
    let line = host.last_text_line(range_to_check);
    let Some(url) = detector.url_at_text_end(&line.text) else {
        return AutoLinkOutcome::NoMatch;
    };

    match TextRange::ending_at(line.range.end, char_len(url)) {
        Some(range) => annotator.apply(host, url, range),
        None => AutoLinkOutcome::Skipped(SkipReason::StaleRange),
    }
}
