// WHY: Text-only side of auto-linking, independent of any editor host
// Detection returns raw slices; normalization is a separate step applied at annotation time

pub mod pattern;
pub mod protocol;

pub use pattern::UrlDetector;
pub use protocol::{LinkNormalizer, MAILTO_PREFIX};

/// Length of a text slice in the host's addressing unit (Unicode scalar values)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
