// WHY: Auto-linking is switched off while the caret sits in a no-link element such as a code block

use tracing::debug;

use super::Enablement;
use crate::host::EditorHost;

/// Writes the enablement flag from the caret's ancestry
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    no_link_blocks: Vec<String>,
}

impl SelectionTracker {
    pub fn new(no_link_blocks: Vec<String>) -> Self {
        Self { no_link_blocks }
    }

    pub fn is_no_link_element(&self, name: &str) -> bool {
        self.no_link_blocks.iter().any(|b| b == name)
    }

    /// Recompute the flag after a selection change; returns the new state
    pub fn on_selection_change<H: EditorHost + ?Sized>(&self, host: &H, enablement: &Enablement) -> bool {
        let inside_no_link = host
            .selection_ancestors()
            .iter()
            .any(|name| self.is_no_link_element(name));

        let enabled = !inside_no_link;
        if enablement.is_enabled() != enabled {
            debug!(enabled, "auto-link enablement changed by selection");
        }
        enablement.set(enabled);
        enabled
    }
}
