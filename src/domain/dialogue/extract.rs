//! Utterance field recognizers.
//!
//! Pure pattern-based extraction over one utterance. Recognized values are
//! merged into the caller-supplied field set with first-value-wins
//! semantics; `priority` is the single exception and may only escalate.

use once_cell::sync::Lazy;
use regex::Regex;

use super::intent::{CallDomain, Priority};
use super::rules::priority_for;
use super::session::{FieldSet, FIELD_PRIORITY};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?1[\s-]?)?\(?(\d{3})\)?[\s-]?(\d{3})[\s-]?(\d{4})").unwrap()
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?\b",
    )
    .unwrap()
});

static RELATIVE_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(today|tonight|tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});

static TIME_AMPM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::([0-5]\d))?\s*([ap])\.?m\.?\b").unwrap());

static TIME_24H_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());

static PARTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:party of|table for|for)\s+(\d{1,2}|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\b",
    )
    .unwrap()
});

static PARTY_PEOPLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s+(?:people|guests|persons)\b",
    )
    .unwrap()
});

const NAME_CUES: &[&str] = &["my name is", "i am", "this is"];

/// Extracts a North American phone number, normalized to `+1` + 10 digits.
pub fn extract_phone(text: &str) -> Option<String> {
    let caps = PHONE_RE.captures(text)?;
    Some(format!("+1{}{}{}", &caps[2], &caps[3], &caps[4]))
}

/// Extracts an email address verbatim.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Extracts a caller name following an introduction cue.
///
/// Best-effort: takes the one or two alphabetic tokens after the cue word
/// and title-cases them. Not validated against a name dictionary; false
/// positives are an accepted trade-off.
pub fn extract_name(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if !NAME_CUES.iter().any(|cue| lower.contains(cue)) {
        return None;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let cue_pos = words.iter().position(|w| {
        let w = w
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        w == "is" || w == "am"
    })?;

    let tokens: Vec<String> = words
        .iter()
        .skip(cue_pos + 1)
        .take(2)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .take_while(|w| !w.is_empty() && w.chars().all(|c| c.is_alphabetic()))
        .map(title_case)
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Extracts a reservation date: month + day, or a relative/weekday word.
pub fn extract_date(text: &str) -> Option<String> {
    if let Some(caps) = MONTH_DAY_RE.captures(text) {
        return Some(format!("{} {}", title_case(&caps[1]), &caps[2]));
    }
    RELATIVE_DAY_RE
        .captures(text)
        .map(|caps| title_case(&caps[1]))
}

/// Extracts a reservation time, canonicalized to `H:MM AM/PM` (or `H:MM`
/// for a bare 24-hour clock form).
pub fn extract_time(text: &str) -> Option<String> {
    if let Some(caps) = TIME_AMPM_RE.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let meridiem = if caps[3].eq_ignore_ascii_case("a") { "AM" } else { "PM" };
        return Some(format!("{}:{:02} {}", hour, minute, meridiem));
    }
    TIME_24H_RE
        .captures(text)
        .map(|caps| format!("{}:{}", caps[1].trim_start_matches('0'), &caps[2]))
}

/// Extracts a party size as a decimal string ("for four" -> "4").
pub fn extract_party_size(text: &str) -> Option<String> {
    let caps = PARTY_RE
        .captures(text)
        .or_else(|| PARTY_PEOPLE_RE.captures(text))?;
    let raw = caps[1].to_lowercase();
    let n: u32 = match raw.as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    if n == 0 {
        return None;
    }
    Some(n.to_string())
}

/// Runs every recognizer for the domain over one utterance and returns the
/// updated field set (`known` plus anything newly recognized).
///
/// Invariants: a non-empty field in `known` is never overwritten; `priority`
/// (financial only) is recomputed every turn and merged escalate-only; the
/// financial `reason` captures the whole utterance the first time no
/// contact recognizer consumed it.
pub fn extract_fields(text: &str, known: &FieldSet, domain: CallDomain) -> FieldSet {
    let mut fields = known.clone();
    let mut contact_captured = false;

    if is_unset(&fields, "name") {
        if let Some(name) = extract_name(text) {
            fields.insert("name".to_string(), name);
            contact_captured = true;
        }
    }
    if is_unset(&fields, "phone") {
        if let Some(phone) = extract_phone(text) {
            fields.insert("phone".to_string(), phone);
            contact_captured = true;
        }
    }
    if is_unset(&fields, "email") {
        if let Some(email) = extract_email(text) {
            fields.insert("email".to_string(), email);
            contact_captured = true;
        }
    }

    match domain {
        CallDomain::Restaurant => {
            if is_unset(&fields, "date") {
                if let Some(date) = extract_date(text) {
                    fields.insert("date".to_string(), date);
                }
            }
            if is_unset(&fields, "time") {
                if let Some(time) = extract_time(text) {
                    fields.insert("time".to_string(), time);
                }
            }
            if is_unset(&fields, "party_size") {
                if let Some(size) = extract_party_size(text) {
                    fields.insert("party_size".to_string(), size);
                }
            }
        }
        CallDomain::Financial => {
            if is_unset(&fields, "reason") && !contact_captured && !text.trim().is_empty() {
                fields.insert("reason".to_string(), text.trim().to_string());
            }

            let turn_priority = priority_for(text);
            let next = match fields.get(FIELD_PRIORITY) {
                Some(current) => Priority::from_label(current).escalate(turn_priority),
                None => turn_priority,
            };
            fields.insert(FIELD_PRIORITY.to_string(), next.as_str().to_string());
        }
    }

    fields
}

fn is_unset(fields: &FieldSet, name: &str) -> bool {
    fields.get(name).map_or(true, |v| v.trim().is_empty())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> FieldSet {
        FieldSet::new()
    }

    #[test]
    fn phone_normalizes_common_separator_shapes() {
        for text in [
            "call me at (555) 123-4567",
            "it's 555-123-4567",
            "5551234567",
            "+1 555 123 4567",
            "1-555-123-4567",
        ] {
            assert_eq!(
                extract_phone(text).as_deref(),
                Some("+15551234567"),
                "failed on {:?}",
                text
            );
        }
    }

    #[test]
    fn phone_ignores_short_digit_runs() {
        assert_eq!(extract_phone("table for 4 at 7pm"), None);
        assert_eq!(extract_phone("my pin is 1234"), None);
    }

    #[test]
    fn email_extracts_standard_addresses() {
        assert_eq!(
            extract_email("reach me at jane.doe+work@example.co.uk thanks").as_deref(),
            Some("jane.doe+work@example.co.uk")
        );
        assert_eq!(extract_email("no address here"), None);
    }

    #[test]
    fn name_requires_an_introduction_cue() {
        assert_eq!(extract_name("John Smith calling"), None);
        assert_eq!(
            extract_name("my name is john smith").as_deref(),
            Some("John Smith")
        );
        assert_eq!(extract_name("i am MARIA").as_deref(), Some("Maria"));
        assert_eq!(extract_name("this is bob jones here").as_deref(), Some("Bob Jones"));
    }

    #[test]
    fn name_stops_at_non_alphabetic_tokens() {
        assert_eq!(
            extract_name("my name is jane, 555-123-4567").as_deref(),
            Some("Jane")
        );
        assert_eq!(extract_name("this is 555-123-4567"), None);
    }

    #[test]
    fn date_matches_month_day_and_relative_words() {
        assert_eq!(extract_date("march 5th at 7pm").as_deref(), Some("March 5"));
        assert_eq!(extract_date("December 24 please").as_deref(), Some("December 24"));
        assert_eq!(extract_date("how about tomorrow").as_deref(), Some("Tomorrow"));
        assert_eq!(extract_date("this friday works").as_deref(), Some("Friday"));
        assert_eq!(extract_date("sometime soon"), None);
    }

    #[test]
    fn date_month_word_alone_is_not_a_date() {
        // "may" without a day number is a verb more often than a month.
        assert_eq!(extract_date("you may want to know"), None);
    }

    #[test]
    fn time_canonicalizes_clock_forms() {
        assert_eq!(extract_time("at 7pm").as_deref(), Some("7:00 PM"));
        assert_eq!(extract_time("7:30 PM please").as_deref(), Some("7:30 PM"));
        assert_eq!(extract_time("around 11 a.m.").as_deref(), Some("11:00 AM"));
        assert_eq!(extract_time("say 19:30").as_deref(), Some("19:30"));
        assert_eq!(extract_time("no time here"), None);
    }

    #[test]
    fn party_size_accepts_digits_and_number_words() {
        assert_eq!(extract_party_size("for four").as_deref(), Some("4"));
        assert_eq!(extract_party_size("party of 6").as_deref(), Some("6"));
        assert_eq!(extract_party_size("table for 2").as_deref(), Some("2"));
        assert_eq!(extract_party_size("12 people").as_deref(), Some("12"));
        assert_eq!(extract_party_size("for dinner"), None);
    }

    #[test]
    fn party_size_does_not_eat_clock_digits() {
        // "for 7pm" is a time, not a party of seven.
        assert_eq!(extract_party_size("for 7pm"), None);
    }

    #[test]
    fn extract_fields_supplies_scenario_b_fields() {
        let mut known = empty();
        known.insert("name".to_string(), "John Smith".to_string());
        known.insert("phone".to_string(), "+15551234567".to_string());

        let fields = extract_fields("March 5th at 7pm for four", &known, CallDomain::Restaurant);

        assert_eq!(fields.get("date").map(String::as_str), Some("March 5"));
        assert_eq!(fields.get("time").map(String::as_str), Some("7:00 PM"));
        assert_eq!(fields.get("party_size").map(String::as_str), Some("4"));
        // Existing values untouched.
        assert_eq!(fields.get("name").map(String::as_str), Some("John Smith"));
    }

    #[test]
    fn extract_fields_never_overwrites_existing_values() {
        let mut known = empty();
        known.insert("name".to_string(), "Jane Doe".to_string());

        let fields = extract_fields("my name is bob jones", &known, CallDomain::Financial);

        assert_eq!(fields.get("name").map(String::as_str), Some("Jane Doe"));
    }

    #[test]
    fn financial_reason_captures_first_unconsumed_utterance() {
        let fields = extract_fields(
            "my card was stolen, please help",
            &empty(),
            CallDomain::Financial,
        );
        assert_eq!(
            fields.get("reason").map(String::as_str),
            Some("my card was stolen, please help")
        );
        assert_eq!(fields.get("priority").map(String::as_str), Some("urgent"));
    }

    #[test]
    fn financial_reason_skips_turns_consumed_by_contact_fields() {
        let fields = extract_fields("my name is john smith", &empty(), CallDomain::Financial);
        assert_eq!(fields.get("reason"), None);

        // The next unconsumed utterance becomes the reason.
        let fields = extract_fields("I can't access my account", &fields, CallDomain::Financial);
        assert_eq!(
            fields.get("reason").map(String::as_str),
            Some("I can't access my account")
        );
    }

    #[test]
    fn financial_priority_escalates_but_never_downgrades() {
        let fields = extract_fields("a general question", &empty(), CallDomain::Financial);
        assert_eq!(fields.get("priority").map(String::as_str), Some("medium"));

        let fields = extract_fields("there was fraud on my card", &fields, CallDomain::Financial);
        assert_eq!(fields.get("priority").map(String::as_str), Some("urgent"));

        let fields = extract_fields("anyway, a general question", &fields, CallDomain::Financial);
        assert_eq!(fields.get("priority").map(String::as_str), Some("urgent"));
    }

    #[test]
    fn restaurant_turns_do_not_record_priority_or_reason() {
        let fields = extract_fields("there was fraud", &empty(), CallDomain::Restaurant);
        assert_eq!(fields.get("priority"), None);
        assert_eq!(fields.get("reason"), None);
    }
}
