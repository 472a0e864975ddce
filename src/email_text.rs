//! Body cleaning for model prompts
//!
//! Reduces an email body to the text a model needs: markup, quoted history,
//! signatures and long tracking links are removed before the length cap.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Hard cap on cleaned body length, in characters
pub const MAX_PROMPT_CHARS: usize = 3000;

fn re_style_script() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(?:style|script)\b[^>]*>.*?</\s*(?:style|script)\s*>").unwrap()
    })
}

fn re_block_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<\s*(?:br|/p|/div|/li|/tr|/h[1-6])\b[^>]*>").unwrap())
}

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A tag opens with a name (or `!` for doctype and comments), so "a < b" stays text
    RE.get_or_init(|| Regex::new(r"</?[a-zA-Z!][^<>]*>").unwrap())
}

fn re_numeric_entity() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#(?:x([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap())
}

fn re_reply_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^on\s.+\bwrote:$").unwrap())
}

fn re_header_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:from|sent|date|to|cc|subject):\s").unwrap())
}

fn re_sign_off() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)^(?:best|regards|best regards|kind regards|warm regards|thanks|thank you",
            r"|many thanks|cheers|sincerely|yours truly|all the best)[,!.]?$",
        ))
        .unwrap()
    })
}

fn re_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(https?)://([^/\s<>"')]+)(/[^\s<>"')]*)?"#).unwrap())
}

/// Full cleaning pipeline applied to a body before it goes into a prompt
pub fn clean_body(raw: &str) -> String {
    let text = if looks_like_html(raw) {
        strip_html(raw)
    } else {
        raw.replace("\r\n", "\n")
    };
    let text = strip_quoted_reply(&text);
    let text = strip_signature(&text);
    let text = truncate_urls(&text);
    let text = collapse_whitespace(&text);
    truncate_chars(&text, MAX_PROMPT_CHARS).to_string()
}

fn looks_like_html(raw: &str) -> bool {
    re_tag().is_match(raw) || raw.contains("&nbsp;") || raw.contains("&amp;")
}

/// Drop style/script blocks and tags, keep block boundaries as newlines,
/// decode the common entities.
pub fn strip_html(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = re_style_script().replace_all(&text, "");
    let text = re_block_break().replace_all(&text, "\n");
    let text = re_tag().replace_all(&text, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    let decoded = re_numeric_entity().replace_all(text, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    // &amp; goes last so "&amp;lt;" decodes to "&lt;" and not "<"
    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Remove quoted history: `>` lines, everything from an "On ... wrote:" or
/// "Original Message" marker on, and the header block of a forwarded message.
pub fn strip_quoted_reply(text: &str) -> String {
    let mut kept = Vec::new();
    let mut in_forward_header = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if re_reply_header().is_match(trimmed) || is_original_message_marker(trimmed) {
            break;
        }
        if is_forward_marker(trimmed) {
            in_forward_header = true;
            continue;
        }
        if in_forward_header {
            if trimmed.is_empty() || re_header_line().is_match(trimmed) {
                continue;
            }
            in_forward_header = false;
        }
        if trimmed.starts_with('>') {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}

fn is_original_message_marker(line: &str) -> bool {
    line.to_ascii_lowercase().contains("original message") && line.starts_with('-')
}

fn is_forward_marker(line: &str) -> bool {
    line.to_ascii_lowercase().contains("forwarded message") && line.starts_with('-')
}

/// Cut at the `-- ` delimiter or a "Sent from my" line, then drop a trailing
/// sign-off when it sits in the last few lines.
pub fn strip_signature(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let mut end = lines
        .iter()
        .position(|line| {
            let trimmed = line.trim_end();
            trimmed == "--" || line.trim_start().to_ascii_lowercase().starts_with("sent from my ")
        })
        .unwrap_or(lines.len());

    let content_end = lines[..end]
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |pos| pos + 1);
    let window_start = content_end.saturating_sub(6);
    if let Some(pos) = lines[window_start..content_end]
        .iter()
        .position(|line| re_sign_off().is_match(line.trim()))
    {
        let cut = window_start + pos;
        if lines[..cut].iter().any(|line| !line.trim().is_empty()) {
            end = cut;
        }
    }

    lines[..end].join("\n")
}

/// Shorten every link to scheme and host so tracking parameters don't flood the prompt
pub fn truncate_urls(text: &str) -> String {
    re_url()
        .replace_all(text, |caps: &Captures| match caps.get(3) {
            Some(path) if path.as_str().len() > 1 => format!("{}://{}/…", &caps[1], &caps[2]),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Collapse runs of horizontal whitespace and drop blank lines
pub fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// At most `max_chars` characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
