//! Link annotation passes over styled message bodies.
//!
//! Two independent passes run in order: one recognizing internal
//! permalink-style references, one recognizing generic web URLs. Both only
//! attach metadata ranges — the text itself is never rewritten. The generic
//! pass keeps spans the permalink pass already attached and skips any match
//! they cover.

use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::item::LinkKind;
use crate::item::LinkSpan;
use crate::item::StyledText;

lazy_static! {
    static ref PERMALINK_REGEX: Regex = Regex::new(r"https://matrix\.to/#/[^\s<>]+")
        .unwrap_or_else(|_| std::process::abort());
    static ref URL_REGEX: Regex = Regex::new(r#"https?://[^\s<>"')\]]+"#)
        .unwrap_or_else(|_| std::process::abort());
}

/// Runs both annotation passes over `body`.
pub fn linkify(body: &mut StyledText) {
    add_permalink_spans(body);
    add_web_spans(body);
}

/// Attaches [`LinkKind::Permalink`] spans for internal references.
pub fn add_permalink_spans(body: &mut StyledText) {
    for found in PERMALINK_REGEX.find_iter(&body.text) {
        body.links.push(LinkSpan {
            range: found.range(),
            kind: LinkKind::Permalink,
        });
    }
}

/// Attaches [`LinkKind::Web`] spans for generic URLs, keeping any range an
/// earlier pass already covers.
pub fn add_web_spans(body: &mut StyledText) {
    let mut spans = Vec::new();
    for found in URL_REGEX.find_iter(&body.text) {
        let range = found.range();
        let taken = body
            .links
            .iter()
            .any(|span| span.range.start < range.end && range.start < span.range.end);
        if !taken {
            spans.push(LinkSpan {
                range,
                kind: LinkKind::Web,
            });
        }
    }
    body.links.extend(spans);
}
