// WHY: Single place where the document is mutated; every trigger funnels through here

use tracing::debug;

use super::{AutoLinkOutcome, Enablement, SkipReason};
use crate::host::{EditorHost, TextRange, DEFAULT_PROTOCOL_KEY, LINK_ATTRIBUTE};
use crate::url_detector::LinkNormalizer;

/// Applies the link attribute over a detected URL
#[derive(Debug)]
pub struct Annotator {
    normalizer: LinkNormalizer,
    enablement: Enablement,
}

impl Annotator {
    pub fn new(normalizer: LinkNormalizer, enablement: Enablement) -> Self {
        Self { normalizer, enablement }
    }

    pub fn enablement(&self) -> &Enablement {
        &self.enablement
    }

    /// Set the normalized link over `range`, or skip without touching the document.
    ///
    /// Re-applying the value already present on the whole range is a no-op and
    /// records no undo step.
    pub fn apply<H: EditorHost + ?Sized>(&self, host: &mut H, url: &str, range: TextRange) -> AutoLinkOutcome {
        if !self.enablement.is_enabled() {
            debug!(url, "auto-link disabled, skipping");
            return AutoLinkOutcome::Skipped(SkipReason::Disabled);
        }

        if !host.is_attribute_allowed(range, LINK_ATTRIBUTE) {
            debug!(url, ?range, "link attribute not allowed on range");
            return AutoLinkOutcome::Skipped(SkipReason::DisallowedBySchema);
        }

        let default_protocol = host.config_value(DEFAULT_PROTOCOL_KEY);
        let href = self.normalizer.add_protocol_if_applicable(url, default_protocol.as_deref());

        if host.attribute_covers(range, LINK_ATTRIBUTE, &href) {
            debug!(href = %href, ?range, "range already linked to the same target");
            return AutoLinkOutcome::Skipped(SkipReason::AlreadyLinked);
        }

        host.set_attribute_in_new_step(range, LINK_ATTRIBUTE, &href);
        debug!(href = %href, ?range, "auto-link applied");

        AutoLinkOutcome::Applied { range, href }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutolinkConfig;
    use crate::host::Position;
    use crate::memory_editor::MemoryEditor;

    fn annotator() -> Annotator {
        Annotator::new(LinkNormalizer::new().unwrap(), Enablement::default())
    }

    fn editor_with(text: &str, config: AutolinkConfig) -> MemoryEditor {
        let mut editor = MemoryEditor::new(config);
        editor.load_blocks(&[("paragraph", text)]);
        editor
    }

    #[test]
    fn test_applies_normalized_link() {
        let mut editor = editor_with("go www.example.com", AutolinkConfig::default().with_default_protocol("https"));
        let range = TextRange::new(Position::new(0, 3), Position::new(0, 18));

        let outcome = annotator().apply(&mut editor, "www.example.com", range);

        assert_eq!(
            outcome,
            AutoLinkOutcome::Applied { range, href: "https://www.example.com".to_string() }
        );
        assert_eq!(editor.link_at(Position::new(0, 3)).as_deref(), Some("https://www.example.com"));
        assert_eq!(editor.link_at(Position::new(0, 2)), None);
        assert_eq!(editor.text(), vec!["go www.example.com"]);
    }

    #[test]
    fn test_disabled_never_mutates() {
        let mut editor = editor_with("www.example.com", AutolinkConfig::default());
        let annotator = annotator();
        annotator.enablement().set(false);
        let range = TextRange::new(Position::new(0, 0), Position::new(0, 15));

        let outcome = annotator.apply(&mut editor, "www.example.com", range);

        assert_eq!(outcome, AutoLinkOutcome::Skipped(SkipReason::Disabled));
        assert_eq!(editor.undo_depth(), 0);
    }

    #[test]
    fn test_schema_refusal_is_silent() {
        let mut editor = MemoryEditor::new(AutolinkConfig::default());
        editor.load_blocks(&[("codeBlock", "www.example.com")]);
        let range = TextRange::new(Position::new(0, 0), Position::new(0, 15));

        let outcome = annotator().apply(&mut editor, "www.example.com", range);

        assert_eq!(outcome, AutoLinkOutcome::Skipped(SkipReason::DisallowedBySchema));
        assert_eq!(editor.undo_depth(), 0);
    }

    #[test]
    fn test_stale_range_is_rejected() {
        let mut editor = editor_with("x.io", AutolinkConfig::default());
        let range = TextRange::new(Position::new(0, 10), Position::new(0, 14));

        let outcome = annotator().apply(&mut editor, "x.io", range);
        assert_eq!(outcome, AutoLinkOutcome::Skipped(SkipReason::DisallowedBySchema));
    }

    #[test]
    fn test_identical_reapply_is_noop() {
        let mut editor = editor_with("x.io", AutolinkConfig::default());
        let range = TextRange::new(Position::new(0, 0), Position::new(0, 4));
        let annotator = annotator();

        assert!(matches!(annotator.apply(&mut editor, "x.io", range), AutoLinkOutcome::Applied { .. }));
        assert_eq!(editor.undo_depth(), 1);

        let second = annotator.apply(&mut editor, "x.io", range);
        assert_eq!(second, AutoLinkOutcome::Skipped(SkipReason::AlreadyLinked));
        assert_eq!(editor.undo_depth(), 1);
    }
}
