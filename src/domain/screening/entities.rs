//! Structured facts pulled out of candidate utterances.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Facts gathered during a screening call.
///
/// The same type serves both as a single turn's extraction result and as
/// the cumulative record for a conversation. Every field is independently
/// optional: `None` means "not mentioned", never "cleared".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    /// Proposed interview slot, as caller-local wall-clock time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<NaiveDateTime>,

    /// Notice period normalized to days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_period_days: Option<u32>,

    /// Current compensation in whatever unit the candidate used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_compensation: Option<f64>,

    /// Expected compensation in whatever unit the candidate used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_compensation: Option<f64>,
}

impl Entities {
    /// Creates an empty entity set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_time(mut self, date_time: NaiveDateTime) -> Self {
        self.date_time = Some(date_time);
        self
    }

    pub fn with_notice_period_days(mut self, days: u32) -> Self {
        self.notice_period_days = Some(days);
        self
    }

    pub fn with_current_compensation(mut self, amount: f64) -> Self {
        self.current_compensation = Some(amount);
        self
    }

    pub fn with_expected_compensation(mut self, amount: f64) -> Self {
        self.expected_compensation = Some(amount);
        self
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.date_time.is_none()
            && self.notice_period_days.is_none()
            && self.current_compensation.is_none()
            && self.expected_compensation.is_none()
    }

    /// Returns true if either compensation figure is present.
    pub fn has_compensation(&self) -> bool {
        self.current_compensation.is_some() || self.expected_compensation.is_some()
    }

    /// Overlays `newer` onto `self`.
    ///
    /// Present fields in `newer` overwrite; absent fields leave the
    /// existing value untouched.
    pub fn merge(&mut self, newer: &Entities) {
        if newer.date_time.is_some() {
            self.date_time = newer.date_time;
        }
        if newer.notice_period_days.is_some() {
            self.notice_period_days = newer.notice_period_days;
        }
        if newer.current_compensation.is_some() {
            self.current_compensation = newer.current_compensation;
        }
        if newer.expected_compensation.is_some() {
            self.expected_compensation = newer.expected_compensation;
        }
    }

    /// By-value form of [`Entities::merge`].
    pub fn merged(mut self, newer: &Entities) -> Self {
        self.merge(newer);
        self
    }
}
