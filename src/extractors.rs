//! Lightweight entity extractors
//!
//! Each extractor is independent and best-effort: a miss simply leaves the
//! entity out of the map.

use crate::types::{Email, EntityMap, EntityValue};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

// Compile-once regex patterns via OnceLock.
fn re_ups() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(1Z[0-9A-Z]{16})\b").unwrap())
}

fn re_usps() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(9[2-5]\d{20,24})\b").unwrap())
}

fn re_fedex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{12}|\d{15})\b").unwrap())
}

fn re_tracking_labelled() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)tracking\s*(?:number|#|no\.?|id)?\s*(?:is)?\s*:?\s*([A-Z0-9]{10,30})\b").unwrap()
    })
}

fn re_carrier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Case-sensitive on purpose: "ups" in running text is not a carrier.
    RE.get_or_init(|| {
        Regex::new(r"\b(UPS|USPS|DHL|FedEx|FEDEX|Fedex|OnTrac|LaserShip|Amazon Logistics|Canada Post|Royal Mail)\b")
            .unwrap()
    })
}

fn re_amount_labelled() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:total|amount|balance|due|pay(?:ment)?(?:\s+of)?|charged|costs?|fee)[^$\d\n]{0,20}\$\s?(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)",
        )
        .unwrap()
    })
}

fn re_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:\$|USD\s?)\s?(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)").unwrap()
    })
}

fn re_iso_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap())
}

fn re_us_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap())
}

fn re_long_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
        )
        .unwrap()
    })
}

fn re_order_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\border\s*(?:#|number|no\.?|id)\s*:?\s*#?([A-Z0-9][A-Z0-9-]{3,24})\b").unwrap()
    })
}

fn re_invoice_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\binvoice\s*(?:#|number|no\.?|id)?\s*:?\s*#?([A-Z0-9][A-Z0-9-]{2,24})\b").unwrap()
    })
}

fn re_flight_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?i:flight)\s*(?:#|(?i:number|no\.?))?\s*:?\s*([A-Z]{2}|[A-Z]\d|\d[A-Z])\s?(\d{1,4})\b")
            .unwrap()
    })
}

fn re_confirmation_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?i:confirmation|booking|record locator|reservation)\s*(?:(?i:code|number|no\.?)|#)?\s*:?\s*([A-Z0-9]{5,10})\b",
        )
        .unwrap()
    })
}

fn re_one_time_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bcode\s*(?:is)?\s*:?\s*(\d{4,8})\b").unwrap())
}

fn re_meeting_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"https?://[^\s<>"')]*(?:zoom\.us|meet\.google\.com|teams\.microsoft\.com|webex\.com)[^\s<>"')]*"#,
        )
        .unwrap()
    })
}

fn re_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"')]+"#).unwrap())
}

fn re_promo_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?i:promo|coupon|discount|use)\s+(?i:code)\s*:?\s*([A-Z0-9]{4,15})\b").unwrap()
    })
}

fn re_sender_domain() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9.-]+\.[A-Za-z]{2,})").unwrap())
}

/// Run every extractor over an email
pub fn extract_entities(email: &Email) -> EntityMap {
    let text = format!("{}\n{}", email.subject, email.content());
    let mut entities = EntityMap::new();

    extract_tracking(&text, &mut entities);
    extract_amount(&text, &mut entities);
    extract_dates(&text, &mut entities);
    extract_identifiers(&text, &mut entities);
    extract_links(&text, &mut entities);

    if let Some(domain) = sender_domain(&email.from) {
        entities.insert("senderDomain".to_string(), EntityValue::Text(domain));
    }

    entities
}

fn extract_tracking(text: &str, entities: &mut EntityMap) {
    let (tracking, inferred_carrier) = if let Some(c) = re_ups().captures(text) {
        (Some(c[1].to_string()), Some("UPS"))
    } else if let Some(c) = re_usps().captures(text) {
        (Some(c[1].to_string()), Some("USPS"))
    } else if let Some(c) = re_tracking_labelled()
        .captures_iter(text)
        .find(|c| c[1].chars().any(|ch| ch.is_ascii_digit()))
    {
        (Some(c[1].to_uppercase()), None)
    } else if text.to_lowercase().contains("fedex") {
        (re_fedex().captures(text).map(|c| c[1].to_string()), Some("FedEx"))
    } else {
        (None, None)
    };

    let mentioned_carrier = re_carrier().captures(text).map(|c| normalize_carrier(&c[1]));

    if let Some(number) = tracking {
        entities.insert("trackingNumber".to_string(), EntityValue::Text(number));
        if let Some(carrier) = mentioned_carrier.or_else(|| inferred_carrier.map(String::from)) {
            entities.insert("carrier".to_string(), EntityValue::Text(carrier));
        }
    } else if let Some(carrier) = mentioned_carrier {
        entities.insert("carrier".to_string(), EntityValue::Text(carrier));
    }
}

fn normalize_carrier(raw: &str) -> String {
    match raw {
        "FEDEX" | "Fedex" => "FedEx".to_string(),
        other => other.to_string(),
    }
}

fn extract_amount(text: &str, entities: &mut EntityMap) {
    let captured = re_amount_labelled()
        .captures(text)
        .or_else(|| re_amount().captures(text));

    if let Some(value) = captured.and_then(|c| parse_amount(&c[1])) {
        entities.insert("amount".to_string(), EntityValue::Number(value));
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Dates are typed by the words just before them: "due"/"by" makes a due date,
/// "deliver"/"arriv" a delivery date, anything else an event date.
fn extract_dates(text: &str, entities: &mut EntityMap) {
    let mut found: Vec<(usize, NaiveDate)> = Vec::new();

    for c in re_iso_date().captures_iter(text) {
        if let Some(d) = ymd(&c[1], &c[2], &c[3]) {
            found.push((c.get(0).map(|m| m.start()).unwrap_or(0), d));
        }
    }
    for c in re_us_date().captures_iter(text) {
        if let Some(d) = ymd(&c[3], &c[1], &c[2]) {
            found.push((c.get(0).map(|m| m.start()).unwrap_or(0), d));
        }
    }
    for c in re_long_date().captures_iter(text) {
        if let Some(month) = month_number(&c[1]) {
            if let Some(d) = ymd(&c[3], &month.to_string(), &c[2]) {
                found.push((c.get(0).map(|m| m.start()).unwrap_or(0), d));
            }
        }
    }

    found.sort_by_key(|(pos, _)| *pos);

    for (pos, date) in found {
        let before = preceding(text, pos, 30).to_lowercase();
        let words: Vec<&str> = before
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let key = if words
            .iter()
            .any(|w| matches!(*w, "due" | "by" | "deadline" | "before"))
            || before.contains("no later than")
        {
            "dueDate"
        } else if words.iter().any(|w| {
            ["deliver", "arriv", "expected", "estimated"]
                .iter()
                .any(|prefix| w.starts_with(prefix))
        }) {
            "deliveryDate"
        } else {
            "eventDate"
        };
        entities
            .entry(key.to_string())
            .or_insert(EntityValue::Date(date));
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Up to `max_chars` characters immediately before byte offset `pos`
fn preceding(text: &str, pos: usize, max_chars: usize) -> &str {
    let head = &text[..pos];
    let start = head
        .char_indices()
        .rev()
        .nth(max_chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[start..]
}

fn extract_identifiers(text: &str, entities: &mut EntityMap) {
    if let Some(c) = re_order_number()
        .captures_iter(text)
        .find(|c| c[1].chars().any(|ch| ch.is_ascii_digit()))
    {
        entities.insert("orderNumber".to_string(), EntityValue::Text(c[1].to_uppercase()));
    }

    if let Some(c) = re_invoice_number()
        .captures_iter(text)
        .find(|c| c[1].chars().any(|ch| ch.is_ascii_digit()))
    {
        entities.insert("invoiceNumber".to_string(), EntityValue::Text(c[1].to_uppercase()));
    }

    if let Some(c) = re_flight_number().captures(text) {
        entities.insert(
            "flightNumber".to_string(),
            EntityValue::Text(format!("{}{}", &c[1], &c[2])),
        );
    }

    let confirmation = re_confirmation_code()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .find(|code| code.len() == 6 || code.chars().any(|ch| ch.is_ascii_digit()))
        .or_else(|| re_one_time_code().captures(text).map(|c| c[1].to_string()));
    if let Some(code) = confirmation {
        entities.insert("confirmationCode".to_string(), EntityValue::Text(code));
    }

    if let Some(c) = re_promo_code().captures(text) {
        entities.insert("promoCode".to_string(), EntityValue::Text(c[1].to_string()));
    }
}

fn extract_links(text: &str, entities: &mut EntityMap) {
    let meeting = re_meeting_url()
        .find(text)
        .map(|m| trim_url(m.as_str()).to_string());

    if let Some(url) = re_url()
        .find_iter(text)
        .map(|m| trim_url(m.as_str()))
        .find(|u| meeting.as_deref() != Some(*u))
    {
        entities.insert("url".to_string(), EntityValue::Text(url.to_string()));
    }
    if let Some(url) = meeting {
        entities.insert("meetingUrl".to_string(), EntityValue::Text(url));
    }
}

/// Drop sentence punctuation that the URL pattern swallows
fn trim_url(url: &str) -> &str {
    url.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
}

fn sender_domain(from: &str) -> Option<String> {
    re_sender_domain()
        .captures(from)
        .map(|c| c[1].to_lowercase())
}
