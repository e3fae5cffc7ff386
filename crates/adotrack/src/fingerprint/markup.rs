//! Rich-text markup removal for metadata fields.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// Unity rich-text style tags: <b>, </color>, <size=40>, <#ff00ff>
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[/#A-Za-z][^<>]*>").expect("tag pattern is a valid regex"));

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);")
        .expect("entity pattern is a valid regex")
});

/// Remove markup tags (keeping their text) and decode character entities.
///
/// Applied until the text stops changing, so the result is a fixed point and
/// stripping it again returns it unchanged.
pub fn strip_markup(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let without_tags = TAG_PATTERN.replace_all(&current, "");
        let next = decode_entities(&without_tags).into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Decode named and numeric character entities. Unknown entities are kept.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    ENTITY_PATTERN.replace_all(input, |caps: &Captures<'_>| {
        decode_entity(&caps[1]).map_or_else(|| caps[0].to_string(), |c| c.to_string())
    })
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
