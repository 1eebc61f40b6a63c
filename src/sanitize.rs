//! Markdown sanitizer for Telegram's legacy Markdown parser.
//!
//! The parser treats `*`, `_` and `` ` `` as toggle markers and rejects the
//! whole message when any entity is unbalanced. This module repairs
//! unclosed entities with minimal intrusion on well-formed spans.
//! Balancing is parity-based, appending at end-of-text; it does not try to
//! find the correct reopening point. That trade keeps the repair
//! terminating and idempotent.

use tracing::debug;

use crate::patterns;
use crate::protect::{EntityProtector, SANITIZE_PREFIX, count_outside_tokens, strip_sentinel};

/// Repair unbalanced markdown so a strict toggle-delimiter parser accepts it.
///
/// Ordered passes:
/// 1. protect fenced code blocks, closing an unterminated fence first;
/// 2. protect inline code, closing an odd trailing backtick;
/// 3. protect well-formed `[text](url)` links;
/// 4. strip orphaned `[` and `]`;
/// 5. balance `*` and `_` by occurrence parity;
/// 6. restore protected spans.
///
/// Running the sanitizer on its own output is a no-op.
pub fn sanitize_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = strip_sentinel(text);
    let mut protector = EntityProtector::new(SANITIZE_PREFIX);

    // Fenced code blocks. An odd fence left over means an unterminated
    // block: close it at end-of-text and protect the now-closed block too.
    let mut text = protector.protect(&text, &patterns::CODE_BLOCK);
    if text.contains("```") {
        debug!("closing unterminated code fence");
        text.push_str("\n```");
        text = protector.protect(&text, &patterns::CODE_BLOCK);
    }

    // Inline code. Odd backtick count means one span never closed.
    text = protector.protect(&text, &patterns::INLINE_CODE);
    if count_outside_tokens(&text, SANITIZE_PREFIX, '`') % 2 != 0 {
        debug!("closing unterminated inline code span");
        text.push('`');
        text = protector.protect(&text, &patterns::INLINE_CODE);
    }

    // Well-formed links survive verbatim; leftovers are orphans.
    text = protector.protect(&text, &patterns::LINK);
    text = fix_orphaned_brackets(&text);

    // Toggle markers: odd count = unclosed entity, close at end-of-text.
    for marker in ['*', '_'] {
        if count_outside_tokens(&text, SANITIZE_PREFIX, marker) % 2 != 0 {
            text.push(marker);
        }
    }

    protector.restore(&text)
}

/// Drop `[` and `]` that are not part of a valid `[text](url)` pattern.
///
/// Left-to-right scan: at each `[`, a matching `]` immediately followed by
/// a closed paren group keeps the whole span verbatim and skips past it.
/// Every other `[` or `]` is dropped.
fn fix_orphaned_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(after_open) = rest.strip_prefix('[') {
            if let Some(cb) = after_open.find(']') {
                if let Some(after_paren) = after_open[cb + 1..].strip_prefix('(') {
                    if let Some(cp) = after_paren.find(')') {
                        // "[" + text + "]" + "(" + url + ")"
                        let span_len = 1 + cb + 1 + 1 + cp + 1;
                        out.push_str(&rest[..span_len]);
                        rest = &rest[span_len..];
                        continue;
                    }
                }
            }
            rest = after_open;
            continue;
        }
        if let Some(after_close) = rest.strip_prefix(']') {
            rest = after_close;
            continue;
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}
