//! Entity extraction from candidate utterances.
//!
//! Extraction is pattern based and intentionally narrow: an interview
//! date/time, a notice period and compensation figures. It never fails;
//! text that matches nothing yields an empty [`Entities`].

use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::datetime;
use super::entities::Entities;

// Counts must be whole numbers; "2.5 months" must not read as 5 months.
static NOTICE_MONTHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.])(\d+)\s*months?").expect("valid months pattern")
});
static NOTICE_WEEKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.])(\d+)\s*weeks?").expect("valid weeks pattern")
});
static NOTICE_DAYS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.])(\d+)\s*days?").expect("valid days pattern")
});

static CURRENT_COMPENSATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)current(?:\s+ctc|\s+salary)?\s+(?:is|of)?\s*(?:inr|rs\.?|₹)?\s*(\d+(?:\.\d+)?)\s*(?:lakhs|lakh|l|lpa)?",
    )
    .expect("valid current compensation pattern")
});
static EXPECTED_COMPENSATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)expect(?:ed|ing)(?:\s+ctc|\s+salary)?\s+(?:is|of)?\s*(?:inr|rs\.?|₹)?\s*(\d+(?:\.\d+)?)\s*(?:lakhs|lakh|l|lpa)?",
    )
    .expect("valid expected compensation pattern")
});

/// Capability for turning an utterance into structured facts.
///
/// The dialogue engine only depends on the [`Entities`] shape, so a more
/// capable parser can replace [`PatternExtractor`] behind this trait.
pub trait EntityExtractor: Send + Sync {
    /// Extracts whatever facts the utterance mentions.
    fn extract(&self, utterance: &str) -> Entities;
}

/// Regex-based extractor.
///
/// Relative dates ("tomorrow", "next friday") resolve against a reference
/// instant: the fixed one given at construction, or the local clock read
/// once per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor {
    reference: Option<NaiveDateTime>,
}

impl PatternExtractor {
    /// Creates an extractor that resolves relative dates against the local clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor pinned to a fixed reference instant.
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self {
            reference: Some(reference),
        }
    }
}

impl EntityExtractor for PatternExtractor {
    fn extract(&self, utterance: &str) -> Entities {
        let reference = self
            .reference
            .unwrap_or_else(|| Local::now().naive_local());
        extract_entities(utterance, reference)
    }
}

/// Current and expected compensation found in one utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensationFigures {
    pub current: Option<f64>,
    pub expected: Option<f64>,
}

/// Runs every extraction rule over `utterance`.
pub fn extract_entities(utterance: &str, reference: NaiveDateTime) -> Entities {
    let compensation = extract_compensation(utterance);
    Entities {
        date_time: extract_date_time(utterance, reference),
        notice_period_days: extract_notice_period(utterance),
        current_compensation: compensation.current,
        expected_compensation: compensation.expected,
    }
}

/// Returns the left-most date/time expression, if any.
pub fn extract_date_time(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    datetime::parse_first(text, reference)
}

/// Returns the notice period in days.
///
/// Months (x30), weeks (x7) and days are tried in that order and the first
/// unit found anywhere in the text wins; later units are ignored. A number
/// too large to represent counts as absent.
pub fn extract_notice_period(text: &str) -> Option<u32> {
    let rules: [(&Regex, u32); 3] = [(&NOTICE_MONTHS, 30), (&NOTICE_WEEKS, 7), (&NOTICE_DAYS, 1)];

    let (caps, days_per_unit) = rules
        .into_iter()
        .find_map(|(regex, factor)| regex.captures(text).map(|caps| (caps, factor)))?;

    caps[1]
        .parse::<u32>()
        .ok()
        .and_then(|count| count.checked_mul(days_per_unit))
}

/// Returns compensation figures anchored on "current" and "expected"/"expecting".
///
/// The two patterns are evaluated independently. Unit words ("lakh", "lpa")
/// are tolerated but not converted; the raw number is returned.
pub fn extract_compensation(text: &str) -> CompensationFigures {
    CompensationFigures {
        current: first_amount(&CURRENT_COMPENSATION, text),
        expected: first_amount(&EXPECTED_COMPENSATION, text),
    }
}

fn first_amount(regex: &Regex, text: &str) -> Option<f64> {
    regex
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}
