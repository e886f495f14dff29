//! Agent lines for each stage of the screening script.
//!
//! Several prompts double as markers for [`super::ConversationContext`]'s
//! transcript heuristic, so the quoted phrases in the stage prompts must
//! survive any rewording.

use chrono::NaiveDateTime;

/// Opening used when the calling organization is unknown.
pub const GENERIC_GREETING: &str =
    "Hello, this is an automated call about a job opportunity. Are you interested in hearing more?";

pub const ASK_NOTICE_PERIOD: &str = "Great! What is your current notice period?";
pub const DECLINE_ACKNOWLEDGED: &str = "I understand. Thank you for your time. Have a great day!";
pub const REASK_INTEREST: &str =
    "I'm sorry, I didn't catch that. Are you interested in this job opportunity?";

pub const ASK_COMPENSATION: &str =
    "Thank you. Can you share your current and expected CTC (Cost to Company)?";
pub const REASK_NOTICE_PERIOD: &str =
    "I didn't catch your notice period. Could you please specify it in months?";

pub const ASK_AVAILABILITY: &str = "Thank you for sharing that information. When are you available for an interview next week?";
pub const REASK_COMPENSATION: &str =
    "I didn't catch your CTC details. Could you please share your current and expected salary?";

/// Stand-in for the slot when no concrete date/time was extracted.
pub const UNSPECIFIED_SLOT: &str = "the time you suggested";
pub const REASK_AVAILABILITY: &str =
    "I didn't catch your availability. Could you please specify a day and time next week?";

pub const CONFIRMED: &str = "Excellent! You will receive a calendar invitation shortly. Is there anything else you'd like to know about the role?";
pub const ASK_ALTERNATIVE_SLOT: &str =
    "I apologize for the misunderstanding. Could you please suggest an alternative date and time?";
pub const REASK_CONFIRMATION: &str =
    "I'm sorry, I didn't catch that. Is the scheduled interview time correct?";

pub const CLOSING: &str = "Thank you for your time. We look forward to speaking with you soon!";

/// Reply for a stage label the engine does not recognize.
pub const NOT_UNDERSTOOD: &str = "I'm sorry, I didn't understand that. Could you please repeat?";

/// Opening line of a call.
pub fn opening_greeting(company: Option<&str>) -> String {
    match company.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!(
            "Hello, this is {} calling regarding a job opportunity. Are you interested in hearing more about this role?",
            name
        ),
        None => GENERIC_GREETING.to_string(),
    }
}

/// Read-back of the proposed interview slot.
pub fn confirm_slot(slot: Option<NaiveDateTime>) -> String {
    let when = slot
        .map(format_slot)
        .unwrap_or_else(|| UNSPECIFIED_SLOT.to_string());
    format!("We've scheduled your interview on {}. Is that correct?", when)
}

/// Spoken form of a slot, e.g. "Friday, March 15 at 3:00 PM".
pub fn format_slot(slot: NaiveDateTime) -> String {
    slot.format("%A, %B %-d at %-I:%M %p").to_string()
}
