//! Property-based tests for the markdown safety pipeline.
//!
//! The pipeline's contract is exception-free handling of *all* inputs, so
//! these properties run against arbitrary and adversarial strings, not
//! just well-formed markup.

use proptest::prelude::*;

use safemark::{md_to_html, prepare_html_parts, sanitize_markdown, split_message_safe, truncate_safe};

/// Text with a high density of markup delimiters.
fn markupish_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z0-9 ]{0,12}",
        prop::sample::select(vec![
            "*",
            "**",
            "_",
            "`",
            "```",
            "[",
            "]",
            "(",
            ")",
            "\n",
            "\n\n",
            "[link](http://x)",
        ])
        .prop_map(str::to_string),
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

/// Strip protected spans (code blocks, inline code, valid links) so marker
/// parity can be checked outside them.
fn strip_protected_spans(text: &str) -> String {
    let no_blocks = regex::Regex::new(r"(?s)```.*?```")
        .unwrap()
        .replace_all(text, "");
    let no_inline = regex::Regex::new(r"`[^`]+`")
        .unwrap()
        .replace_all(&no_blocks, "");
    regex::Regex::new(r"\[[^\]]+\]\([^)]+\)")
        .unwrap()
        .replace_all(&no_inline, "")
        .into_owned()
}

proptest! {
    // ── Never panics, on anything ───────────────────────────────────

    #[test]
    fn sanitize_never_panics(text in any::<String>()) {
        let _ = sanitize_markdown(&text);
    }

    #[test]
    fn convert_never_panics(text in any::<String>()) {
        let _ = md_to_html(&text);
    }

    #[test]
    fn split_never_panics(text in any::<String>(), max_len in 1usize..64) {
        let _ = split_message_safe(&text, max_len);
    }

    #[test]
    fn truncate_never_panics(text in any::<String>(), max_len in 1usize..64) {
        let _ = truncate_safe(&text, max_len, "...");
    }

    #[test]
    fn prepare_never_panics(text in markupish_strategy(), max_len in 8usize..64) {
        let _ = prepare_html_parts(&text, max_len);
    }

    // ── Sanitizer invariants ────────────────────────────────────────

    #[test]
    fn sanitize_is_idempotent(text in markupish_strategy()) {
        let once = sanitize_markdown(&text);
        prop_assert_eq!(sanitize_markdown(&once), once);
    }

    #[test]
    fn sanitize_balances_toggle_markers(text in markupish_strategy()) {
        let clean = sanitize_markdown(&text);
        let outside = strip_protected_spans(&clean);
        prop_assert_eq!(outside.matches('*').count() % 2, 0, "odd '*' in {:?}", clean);
        prop_assert_eq!(outside.matches('_').count() % 2, 0, "odd '_' in {:?}", clean);
    }

    #[test]
    fn sanitize_closes_all_fences(text in markupish_strategy()) {
        let clean = sanitize_markdown(&text);
        prop_assert_eq!(clean.matches("```").count() % 2, 0, "odd fences in {:?}", clean);
    }

    // ── Converter invariants ────────────────────────────────────────

    #[test]
    fn convert_escapes_everything_outside_tags(text in markupish_strategy()) {
        let html = md_to_html(&text);
        let stripped = html
            .replace("<b>", "").replace("</b>", "")
            .replace("<i>", "").replace("</i>", "")
            .replace("<code>", "").replace("</code>", "")
            .replace("<pre>", "").replace("</pre>", "");
        let stripped = regex::Regex::new(r#"<a href="[^"]*">|</a>"#)
            .unwrap()
            .replace_all(&stripped, "");
        prop_assert!(!stripped.contains('<'), "unescaped '<' in {:?}", html);
        prop_assert!(!stripped.contains('>'), "unescaped '>' in {:?}", html);
    }

    #[test]
    fn convert_is_escaped_identity_on_plain_prose(text in "[a-zA-Z0-9 .,!?\n]{0,200}") {
        prop_assert_eq!(md_to_html(&text), text);
    }

    // ── Splitter invariants ─────────────────────────────────────────

    #[test]
    fn chunks_fit_unless_atomic(text in markupish_strategy(), max_len in 8usize..64) {
        for chunk in split_message_safe(&text, max_len) {
            let atomic = chunk.contains("```") || chunk.contains("<pre>");
            prop_assert!(
                chunk.len() <= max_len || atomic,
                "oversized non-atomic chunk {:?} (max {})",
                chunk,
                max_len
            );
        }
    }

    #[test]
    fn split_preserves_content(text in "[a-zA-Z0-9]{1,8}( [a-zA-Z0-9]{1,8}){0,20}", max_len in 8usize..64) {
        // Word-shaped input, words no longer than max_len: rejoining the
        // chunks with spaces must preserve every word in order.
        let chunks = split_message_safe(&text, max_len);
        let rejoined = chunks.join(" ");
        let words: Vec<&str> = text.split_whitespace().collect();
        let rewords: Vec<&str> = rejoined.split_whitespace().collect();
        prop_assert_eq!(words, rewords);
    }

    #[test]
    fn truncate_fits_and_ends_with_suffix(text in any::<String>(), max_len in 16usize..128) {
        let out = truncate_safe(&text, max_len, "...");
        if text.len() > max_len {
            prop_assert!(out.len() <= max_len);
            prop_assert!(out.ends_with("..."));
        } else {
            prop_assert_eq!(out, text);
        }
    }
}
