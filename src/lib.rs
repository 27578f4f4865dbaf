pub mod autolink;
pub mod config;
pub mod host;
pub mod memory_editor;
pub mod url_detector;

// Re-export main types for convenient access
pub use autolink::{AutoLink, AutoLinkOutcome, Enablement, SkipReason, PLUGIN_NAME};
pub use config::{load_config, load_config_async, AutolinkConfig};

// Re-export the host contract
pub use host::{
    BatchKind, CommandId, CommandRegistry, EditorEvent, EditorHost, Position, TextChange, TextLine,
    TextRange, LINK_ATTRIBUTE,
};

pub use memory_editor::{LinkSpan, MemoryEditor, Session};
pub use url_detector::{LinkNormalizer, UrlDetector};
