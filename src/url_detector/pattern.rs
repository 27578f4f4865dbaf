// WHY: End-anchored URL/e-mail recognition used by every auto-link trigger
// The match must sit flush against the end of the text so callers can derive the range from its length alone

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use tracing::{debug, info};

// Label classes exclude whitespace so U+3000 and friends still separate words

/// First and last character of a domain label
const LABEL_EDGE: &str = r"[[0-9a-z\x{a1}-\x{ffff}]&&\S]";
/// Interior characters of a domain label
const LABEL_INNER: &str = r"[[-_0-9a-z\x{a1}-\x{ffff}]&&\S]";
/// Top-level domain: letters only, at least two of them
const TLD: &str = r"[[a-z\x{a1}-\x{ffff}]&&\S]{2,}";

/// Dotted IPv4 host in public unicast ranges
const IPV4: &str = concat!(
    r"(?:[1-9]\d?|1\d\d|2[01]\d|22[0-3])",
    r"(?:\.(?:1?\d{1,2}|2[0-4]\d|25[0-5])){2}",
    r"(?:\.(?:[1-9]\d?|1\d\d|2[0-4]\d|25[0-4]))",
);

const SCHEME: &str = r"(?:(?:https?|ftp):)?//";
const USERINFO: &str = r"(?:\S+(?::\S*)?@)?";
const PORT: &str = r"(?::\d{2,5})?";
const RESOURCE_PATH: &str = r"(?:[/?#]\S*)?";

/// Name of the capture group holding the URL itself
const URL_GROUP: &str = "url";

/// Domain labels followed by a TLD, e.g. `mail.example.com`
pub(crate) fn domain_pattern() -> String {
    format!(r"(?:{LABEL_EDGE}(?:{LABEL_INNER}*{LABEL_EDGE})?\.)+{TLD}")
}

/// Full pattern: line start or whitespace, then the URL, then end of text
fn url_at_end_pattern() -> String {
    let domain = domain_pattern();

    // a. http://user@foo.bar.baz:8080/foo/bar.html#baz?foo=bar
    let full_form = format!("{SCHEME}{USERINFO}(?:{IPV4}|{domain}){PORT}{RESOURCE_PATH}");
    // b. www.example.com or someone@example.com
    let short_form = format!(r"(?:www\.|\S+@){domain}");
    // c. example.com/path without any scheme
    let bare_host = format!("{USERINFO}{domain}{PORT}{RESOURCE_PATH}");

    format!(r"(?i)(?:^|\s)(?P<{URL_GROUP}>{full_form}|{short_form}|{bare_host})$")
}

/// Detects a URL or e-mail address at the very end of a text window
#[derive(Debug)]
pub struct UrlDetector {
    regex: Regex,
}

impl UrlDetector {
    /// Compile the end-anchored URL pattern
    pub fn new() -> Result<Self> {
        info!("Compiling end-anchored URL pattern");

        let pattern = url_at_end_pattern();
        let regex = Regex::new(&pattern).context("URL pattern failed to compile")?;

        debug!("URL pattern compiled ({} bytes of source)", pattern.len());
        Ok(Self { regex })
    }

    /// Return the URL that ends exactly at the end of `text`, if any.
    ///
    /// The returned slice never includes the whitespace that precedes it.
    pub fn url_at_text_end<'t>(&self, text: &'t str) -> Option<&'t str> {
        let mut caps = self.regex.create_captures();
        self.regex.captures(text, &mut caps);

        let span = caps.get_group_by_name(URL_GROUP)?;
        let url = &text[span.range()];
        debug!(url, "URL found at text end");
        Some(url)
    }
}
