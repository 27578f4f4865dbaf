// WHY: Turns a raw match into the value stored on the link attribute
// Kept apart from detection so the matcher stays free of configuration

use anyhow::{Context, Result};
use regex_automata::meta::Regex;

use super::pattern::domain_pattern;

/// Scheme used for e-mail addresses
pub const MAILTO_PREFIX: &str = "mailto:";

/// Protocol normalization for detected links
#[derive(Debug)]
pub struct LinkNormalizer {
    /// `word:` optionally followed by slashes, or any leading non-word character (`//host`)
    protocol: Regex,
    /// Whole-string e-mail address
    email: Regex,
}

impl LinkNormalizer {
    pub fn new() -> Result<Self> {
        let protocol = Regex::new(r"(?i)^(?:\w+:(?:/{2,})?|\W)")
            .context("protocol pattern failed to compile")?;
        let email = Regex::new(&format!(r"(?i)^\S+@{}$", domain_pattern()))
            .context("e-mail pattern failed to compile")?;

        Ok(Self { protocol, email })
    }

    /// Check if the link already starts with a protocol or is protocol-relative
    pub fn has_protocol(&self, link: &str) -> bool {
        self.protocol.is_match(link)
    }

    /// Check if the whole link is an e-mail address
    pub fn is_email(&self, link: &str) -> bool {
        self.email.is_match(link)
    }

    /// Prepend the default protocol when the link lacks one.
    ///
    /// Nothing changes without a default protocol. `"https"`, `"https:"` and
    /// `"https://"` are equivalent. E-mail addresses receive `mailto:` instead.
    pub fn add_protocol_if_applicable(&self, link: &str, default_protocol: Option<&str>) -> String {
        let Some(scheme) = default_protocol.and_then(scheme_name) else {
            return link.to_string();
        };

        if link.is_empty() || self.has_protocol(link) {
            return link.to_string();
        }

        if self.is_email(link) {
            format!("{MAILTO_PREFIX}{link}")
        } else {
            format!("{scheme}://{link}")
        }
    }
}

/// Bare scheme name from a configured protocol such as `https://`
fn scheme_name(configured: &str) -> Option<&str> {
    let scheme = configured.trim().trim_end_matches('/').trim_end_matches(':');
    if scheme.is_empty() {
        None
    } else {
        Some(scheme)
    }
}
