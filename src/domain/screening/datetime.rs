//! Casual date/time recognition in free text.
//!
//! Finds calendar dates ("March 15", "2024-03-15", "next friday",
//! "tomorrow") and clock times ("3pm", "14:30", "morning") inside an
//! utterance and resolves the left-most expression against a reference
//! instant. Results are naive wall-clock values in the caller's local time;
//! no timezone conversion happens here.
//!
//! Resolution rules:
//! - a date directly followed or preceded by a time (only whitespace,
//!   commas or connector words like "at", "on", "in the" between them)
//!   becomes one expression
//! - a date without a time resolves to 12:00
//! - a time without a date resolves to the reference date
//! - month/day without a year that already passed rolls into next year
//! - a bare weekday is the nearest one on or after the reference date,
//!   "next <weekday>" the nearest one strictly after it

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
// Month leading a day. "may" only counts capitalized so "I may 5 minutes late" stays a verb.
const LEADING_MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|(?-i:May)|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const ORDINAL: &str = r"(?:st|nd|rd|th)?";

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid ISO date pattern"));

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}}){ORDINAL}\s+(?:of\s+)?{MONTH}\b\.?(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("valid day-month pattern")
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{LEADING_MONTH}\.?\s+(\d{{1,2}}){ORDINAL}\b(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("valid month-day pattern")
});

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b").expect("valid numeric date pattern")
});

static RELATIVE_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(day\s+after\s+tomorrow|tomorrow|today)\b").expect("valid relative pattern")
});

static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(next|this|coming)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)s?\b",
    )
    .expect("valid weekday pattern")
});

static MERIDIEM_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(1[0-2]|0?[1-9])(?::([0-5]\d))?\s*([ap])\.?m\b\.?")
        .expect("valid 12h time pattern")
});

static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("valid 24h time pattern")
});

static TIME_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(noon|midday|midnight|morning|afternoon|evening|tonight)s?\b")
        .expect("valid time word pattern")
});

static CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s,]*(?:(?:at|around|about|by|on|in\s+the|@)[\s,]+)*$")
        .expect("valid connector pattern")
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum Piece {
    Date(NaiveDate),
    Time(NaiveTime),
}

#[derive(Debug, Clone, Copy)]
struct Mention {
    start: usize,
    end: usize,
    piece: Piece,
}

impl Mention {
    fn overlaps(&self, other: &Mention) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Returns the left-most date/time expression in `text`, resolved against
/// `reference`, or `None` if the text mentions no date or time.
pub fn parse_first(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let mentions = scan(text, reference.date());
    let first = mentions.first()?;

    let partner = mentions[1..]
        .iter()
        .find(|candidate| is_complement(&first.piece, &candidate.piece))
        .filter(|candidate| CONNECTOR.is_match(&text[first.end..candidate.start]));

    let (date, time) = match (first.piece, partner.map(|m| m.piece)) {
        (Piece::Date(date), Some(Piece::Time(time))) => (date, time),
        (Piece::Time(time), Some(Piece::Date(date))) => (date, time),
        (Piece::Date(date), _) => (date, default_time()),
        (Piece::Time(time), _) => (reference.date(), time),
    };
    Some(date.and_time(time))
}

fn is_complement(a: &Piece, b: &Piece) -> bool {
    matches!(
        (a, b),
        (Piece::Date(_), Piece::Time(_)) | (Piece::Time(_), Piece::Date(_))
    )
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// Collects every non-overlapping mention, earlier patterns taking
/// precedence over later ones, sorted by position.
fn scan(text: &str, today: NaiveDate) -> Vec<Mention> {
    let mut mentions: Vec<Mention> = Vec::new();
    collect(&mut mentions, text, &ISO_DATE, |caps| {
        let year = number::<i32>(caps, 1)?;
        NaiveDate::from_ymd_opt(year, number(caps, 2)?, number(caps, 3)?).map(Piece::Date)
    });
    collect(&mut mentions, text, &DAY_MONTH, |caps| {
        let month = month_number(caps.get(2)?.as_str())?;
        calendar_date(today, month, number(caps, 1)?, number(caps, 3)).map(Piece::Date)
    });
    collect(&mut mentions, text, &MONTH_DAY, |caps| {
        let month = month_number(caps.get(1)?.as_str())?;
        calendar_date(today, month, number(caps, 2)?, number(caps, 3)).map(Piece::Date)
    });
    collect(&mut mentions, text, &NUMERIC_DATE, |caps| {
        let year = number::<i32>(caps, 3).map(|y| if y < 100 { 2000 + y } else { y });
        calendar_date(today, number(caps, 1)?, number(caps, 2)?, year).map(Piece::Date)
    });
    collect(&mut mentions, text, &RELATIVE_DAY, |caps| {
        let word = caps.get(1)?.as_str().to_lowercase();
        let offset = match word.as_str() {
            "today" => 0,
            "tomorrow" => 1,
            _ => 2,
        };
        today.checked_add_days(Days::new(offset)).map(Piece::Date)
    });
    collect(&mut mentions, text, &WEEKDAY, |caps| {
        let strictly_after = caps
            .get(1)
            .map(|m| m.as_str().eq_ignore_ascii_case("next"))
            .unwrap_or(false);
        let weekday: Weekday = caps.get(2)?.as_str().parse().ok()?;
        upcoming_weekday(today, weekday, strictly_after).map(Piece::Date)
    });

    collect(&mut mentions, text, &MERIDIEM_TIME, |caps| {
        let hour: u32 = number(caps, 1)?;
        let minute: u32 = number(caps, 2).unwrap_or(0);
        let pm = caps.get(3)?.as_str().eq_ignore_ascii_case("p");
        let hour = hour % 12 + if pm { 12 } else { 0 };
        NaiveTime::from_hms_opt(hour, minute, 0).map(Piece::Time)
    });
    collect(&mut mentions, text, &CLOCK_TIME, |caps| {
        NaiveTime::from_hms_opt(number(caps, 1)?, number(caps, 2)?, 0).map(Piece::Time)
    });
    collect(&mut mentions, text, &TIME_WORD, |caps| {
        let hour = match caps.get(1)?.as_str().to_lowercase().as_str() {
            "midnight" => 0,
            "morning" => 9,
            "noon" | "midday" => 12,
            "afternoon" => 14,
            "evening" => 18,
            _ => 20,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).map(Piece::Time)
    });

    mentions.sort_by_key(|m| m.start);
    mentions
}

fn collect<F>(mentions: &mut Vec<Mention>, text: &str, regex: &Regex, resolve: F)
where
    F: Fn(&Captures) -> Option<Piece>,
{
    for caps in regex.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(piece) = resolve(&caps) else { continue };
        let mention = Mention {
            start: whole.start(),
            end: whole.end(),
            piece,
        };
        if !mentions.iter().any(|existing| existing.overlaps(&mention)) {
            mentions.push(mention);
        }
    }
}

fn number<T: std::str::FromStr>(caps: &Captures, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
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

/// Builds a calendar date, rolling a yearless date that already passed
/// into the following year.
fn calendar_date(today: NaiveDate, month: u32, day: u32, year: Option<i32>) -> Option<NaiveDate> {
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day),
        None => {
            let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
            match this_year {
                Some(date) if date >= today => Some(date),
                _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
            }
        }
    }
}

fn upcoming_weekday(today: NaiveDate, target: Weekday, strictly_after: bool) -> Option<NaiveDate> {
    let current = today.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let mut offset = (wanted + 7 - current) % 7;
    if offset == 0 && strictly_after {
        offset = 7;
    }
    today.checked_add_days(Days::new(u64::from(offset)))
}
