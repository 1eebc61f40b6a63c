//! Placeholder protection for already-valid markup spans.
//!
//! Replaces matches with reserved tokens so later rewriting passes cannot
//! touch them, then restores the originals in one final pass. Tokens use a
//! NUL-led prefix; literal NUL bytes are stripped from input before the
//! first protection pass so a token can never collide with real text.

use std::borrow::Cow;

use regex::{Captures, Regex};

/// Token prefix used by the sanitizer.
pub(crate) const SANITIZE_PREFIX: &str = "\u{0}MD";

/// Token prefix used by the converter.
pub(crate) const CONVERT_PREFIX: &str = "\u{0}PH";

/// Protects substrings behind placeholder tokens of the form
/// `PREFIX + index + PREFIX`.
///
/// Multiple protection passes share the one growing table; restoration
/// walks it in reverse insertion order, so a restored substring may itself
/// contain still-pending tokens.
pub(crate) struct EntityProtector {
    prefix: &'static str,
    saved: Vec<String>,
}

impl EntityProtector {
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            saved: Vec::new(),
        }
    }

    fn token(&self, idx: usize) -> String {
        format!("{0}{1}{0}", self.prefix, idx)
    }

    /// Replace every non-overlapping match of `pattern` with a token,
    /// saving the matched substring verbatim.
    pub(crate) fn protect(&mut self, text: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let idx = self.saved.len();
                self.saved.push(caps[0].to_string());
                self.token(idx)
            })
            .into_owned()
    }

    /// Like [`Self::protect`], but saves `render(captures)` instead of the
    /// raw match. Used by the converter to stash pre-rendered HTML.
    pub(crate) fn protect_as(
        &mut self,
        text: &str,
        pattern: &Regex,
        mut render: impl FnMut(&Captures) -> String,
    ) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let idx = self.saved.len();
                self.saved.push(render(caps));
                self.token(idx)
            })
            .into_owned()
    }

    /// Replace tokens with their saved substrings, in reverse index order.
    pub(crate) fn restore(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (idx, original) in self.saved.iter().enumerate().rev() {
            out = out.replace(&self.token(idx), original);
        }
        out
    }
}

/// Strip literal NUL bytes so input can never alias a placeholder token.
pub(crate) fn strip_sentinel(text: &str) -> Cow<'_, str> {
    if text.contains('\u{0}') {
        Cow::Owned(text.replace('\u{0}', ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Count occurrences of `marker` outside placeholder token spans.
pub(crate) fn count_outside_tokens(text: &str, prefix: &str, marker: char) -> usize {
    let mut count = 0;
    let mut rest = text;
    while !rest.is_empty() {
        if rest.starts_with(prefix) {
            // Skip the whole token: prefix, index digits, closing prefix.
            if let Some(rel) = rest[prefix.len()..].find(prefix) {
                rest = &rest[prefix.len() + rel + prefix.len()..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == marker {
                count += 1;
            }
        }
        rest = chars.as_str();
    }
    count
}
