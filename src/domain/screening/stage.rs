//! Stages of a screening call.
//!
//! A stage is the scripted question the agent is currently waiting on an
//! answer for. Exactly one stage is current per conversation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, ValidationError};

/// The current stage of a screening conversation.
///
/// Stages flow forward with two exceptions:
/// - every non-terminal stage may repeat itself when the answer is unclear
/// - `Confirmation` loops back to `Availability` when the proposed time is rejected
///
/// `Greeting` may also jump straight to `Closing` when the candidate declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Opening line delivered, waiting to hear whether the candidate is interested.
    #[default]
    Greeting,

    /// Waiting for the candidate's notice period.
    NoticePeriod,

    /// Waiting for current and expected compensation.
    Ctc,

    /// Waiting for an interview slot.
    Availability,

    /// Proposed interview slot read back, waiting for a yes or no.
    Confirmation,

    /// Call wrapped up. Terminal.
    Closing,
}

impl Stage {
    /// All stages in script order.
    pub const ALL: [Stage; 6] = [
        Stage::Greeting,
        Stage::NoticePeriod,
        Stage::Ctc,
        Stage::Availability,
        Stage::Confirmation,
        Stage::Closing,
    ];

    /// Stable snake_case label used when a stage is stored as text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::NoticePeriod => "notice_period",
            Self::Ctc => "ctc",
            Self::Availability => "availability",
            Self::Confirmation => "confirmation",
            Self::Closing => "closing",
        }
    }

    /// Returns true if the candidate's answer at this stage is expected
    /// to carry an extractable entity.
    pub fn collects_entity(&self) -> bool {
        matches!(self, Self::NoticePeriod | Self::Ctc | Self::Availability)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                ValidationError::invalid_format("stage", format!("unknown stage label '{}'", s))
            })
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Stage::*;
        match self {
            Greeting => vec![Greeting, NoticePeriod, Closing],
            NoticePeriod => vec![NoticePeriod, Ctc],
            Ctc => vec![Ctc, Availability],
            Availability => vec![Availability, Confirmation],
            Confirmation => vec![Confirmation, Closing, Availability],
            Closing => vec![Closing],
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Closing)
    }
}
