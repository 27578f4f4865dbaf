// Integration test utilities shared across auto-link tests
// WHY: Centralized session setup avoids repeating configuration in every test

#![allow(dead_code)]

use autolinker::{AutoLinkOutcome, AutolinkConfig, Position, Session};

/// Session with `https` as the default protocol
pub fn https_session() -> Session {
    Session::new(AutolinkConfig::default().with_default_protocol("https")).expect("Failed to create session")
}

/// Session without a default protocol
pub fn plain_session() -> Session {
    Session::new(AutolinkConfig::default()).expect("Failed to create session")
}

/// Session whose document is preloaded with `(block name, text)` pairs
pub fn session_with_blocks(config: AutolinkConfig, blocks: &[(&str, &str)]) -> Session {
    let mut session = Session::new(config).expect("Failed to create session");
    session.editor_mut().load_blocks(blocks);
    session
}

/// Number of outcomes that wrote a link
pub fn applied_count(outcomes: &[AutoLinkOutcome]) -> usize {
    outcomes.iter().filter(|o| o.is_applied()).count()
}

/// Link target at `(block, offset)`
pub fn link_at(session: &Session, block: usize, offset: usize) -> Option<String> {
    session.editor().link_at(Position::new(block, offset))
}

/// Assert that exactly `[start, end)` of `block` carries `href`, and its neighbours do not
pub fn assert_linked_exactly(session: &Session, block: usize, start: usize, end: usize, href: &str) {
    for offset in start..end {
        assert_eq!(
            link_at(session, block, offset).as_deref(),
            Some(href),
            "offset {offset} in block {block} should link to {href}"
        );
    }
    if start > 0 {
        assert_eq!(link_at(session, block, start - 1), None, "character before the link is linked");
    }
    assert_eq!(link_at(session, block, end), None, "character after the link is linked");
}
