// WHY: Plugin entry point; the host forwards its notifications here and the triggers decide what to link
// Nothing in here reports errors: every refusal is an expected, silent outcome

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub mod annotator;
pub mod breaks;
pub mod selection;
pub mod typing;

pub use annotator::Annotator;
pub use breaks::{BreakCommands, BreakKind};
pub use selection::SelectionTracker;
pub use typing::{passes_typing_gate, MIN_LINK_LENGTH_WITH_SPACE_AT_END};

use crate::config::AutolinkConfig;
use crate::host::{EditorEvent, EditorHost, TextRange};
use crate::url_detector::{LinkNormalizer, UrlDetector};

/// Feature name used by host plugin loaders
pub const PLUGIN_NAME: &str = "AutoLink";

/// Shared on/off switch read by every trigger
#[derive(Debug, Clone)]
pub struct Enablement(Arc<AtomicBool>);

impl Enablement {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

impl Default for Enablement {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Why a detected or candidate link was not applied
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NotTyping,
    NoCaret,
    NoPreviousBlock,
    DisallowedBySchema,
    AlreadyLinked,
    StaleRange,
}

/// Result of handling one host event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoLinkOutcome {
    /// Link attribute written over `range`
    Applied { range: TextRange, href: String },
    /// Trigger ran but no URL ends at the trigger point
    NoMatch,
    Skipped(SkipReason),
    /// Selection tracker recomputed the flag
    EnablementUpdated(bool),
    /// Event not relevant to auto-linking
    Ignored,
}

impl AutoLinkOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, AutoLinkOutcome::Applied { .. })
    }
}

/// Auto-link plugin bound to one editor host
#[derive(Debug)]
pub struct AutoLink {
    detector: UrlDetector,
    annotator: Annotator,
    commands: BreakCommands,
    selection: SelectionTracker,
}

impl AutoLink {
    /// Build the plugin and wire the break triggers the host actually provides
    pub fn attach<H: EditorHost + ?Sized>(host: &H, config: &AutolinkConfig) -> Result<Self> {
        let detector = UrlDetector::new()?;
        let annotator = Annotator::new(LinkNormalizer::new()?, Enablement::default());
        let commands = BreakCommands::lookup(host);
        let selection = SelectionTracker::new(config.no_link_blocks.clone());

        info!(
            plugin = PLUGIN_NAME,
            paragraph_trigger = commands.enter.is_some(),
            soft_break_trigger = commands.shift_enter.is_some(),
            "auto-link attached"
        );

        Ok(Self { detector, annotator, commands, selection })
    }

    pub fn plugin_name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Handle to the shared flag, for hosts that toggle it themselves
    pub fn enablement(&self) -> Enablement {
        self.annotator.enablement().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.annotator.enablement().is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.annotator.enablement().set(enabled);
    }

    pub fn has_trigger(&self, kind: BreakKind) -> bool {
        match kind {
            BreakKind::Paragraph => self.commands.enter.is_some(),
            BreakKind::Soft => self.commands.shift_enter.is_some(),
        }
    }


    /// React to one host notification; runs to completion before returning
    pub fn handle_event<H: EditorHost + ?Sized>(&self, host: &mut H, event: &EditorEvent) -> AutoLinkOutcome {
        match event {
            EditorEvent::TextChanged(change) => typing::on_text_change(&self.detector, &self.annotator, host, change),
            EditorEvent::CommandExecuted(id) => {
                breaks::on_command_executed(&self.detector, &self.annotator, &self.commands, host, *id)
            }
            EditorEvent::SelectionChanged => {
                let enabled = self.selection.on_selection_change(host, self.annotator.enablement());
                AutoLinkOutcome::EnablementUpdated(enabled)
            }
        }
    }
}
