//! Stage transition engine.
//!
//! Given the current stage, the candidate's utterance and the entities
//! known so far, decides what the agent says next and which stage the
//! call moves to. The engine holds no per-conversation state.

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities::Entities;
use super::stage::Stage;
use super::templates;

static NOTICE_EVIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*(?:months?|weeks?|days?)").expect("valid notice evidence pattern")
});

static COMPENSATION_EVIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s*(?:k|lakhs?|thousand|lpa)\b")
        .expect("valid compensation evidence pattern")
});

static WEEKDAY_EVIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)s?\b")
        .expect("valid weekday evidence pattern")
});

static CLOCK_EVIDENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+:\d+").expect("valid clock evidence pattern"));

// am/pm only counts right after a digit so that "I am" is not a time.
static TIME_OF_DAY_EVIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d\s*[ap]\.?m\b|\b(?:morning|afternoon|evening|noon|tonight)s?\b")
        .expect("valid time-of-day evidence pattern")
});

/// How a candidate answered a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Unclear,
}

/// Keywords for one yes/no question.
///
/// Refusals are checked first so "not interested" is a no even though it
/// contains "interested". Bare negatives are checked last. Matching is
/// whole-word and case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKeywords {
    pub refusals: Vec<String>,
    pub affirmatives: Vec<String>,
    pub negatives: Vec<String>,
}

impl AnswerKeywords {
    pub fn new(refusals: &[&str], affirmatives: &[&str], negatives: &[&str]) -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            refusals: owned(refusals),
            affirmatives: owned(affirmatives),
            negatives: owned(negatives),
        }
    }

    /// Classifies an utterance against these keywords.
    pub fn classify(&self, utterance: &str) -> Answer {
        let text = normalize(utterance);
        let any = |phrases: &[String]| phrases.iter().any(|p| contains_phrase(&text, p));

        if any(&self.refusals) {
            Answer::No
        } else if any(&self.affirmatives) {
            Answer::Yes
        } else if any(&self.negatives) {
            Answer::No
        } else {
            Answer::Unclear
        }
    }
}

/// Configuration for the dialogue engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueConfig {
    /// Organization named in the opening line.
    pub company_name: Option<String>,
    /// Answers to "are you interested?".
    pub interest: AnswerKeywords,
    /// Answers to "is that time correct?".
    pub confirmation: AnswerKeywords,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            company_name: None,
            interest: AnswerKeywords::new(
                &["not interested", "not really"],
                &["yes", "interested", "sure"],
                &["no", "nope", "nah"],
            ),
            confirmation: AnswerKeywords::new(
                &[
                    "not correct",
                    "incorrect",
                    "wrong",
                    "nope",
                    "doesn't work",
                    "does not work",
                ],
                &["yes", "correct", "that works"],
                &["no"],
            ),
        }
    }
}

impl DialogueConfig {
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }
}

/// What the agent says and where the call goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub response: String,
    pub next_stage: Stage,
}

impl TurnOutcome {
    fn new(response: impl Into<String>, next_stage: Stage) -> Self {
        Self {
            response: response.into(),
            next_stage,
        }
    }
}

/// Engine for stage transitions.
#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    config: DialogueConfig,
}

impl DialogueEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: DialogueConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Opening line for a new call. Not tied to any stage.
    pub fn greeting(&self) -> String {
        templates::opening_greeting(self.config.company_name.as_deref())
    }

    /// Computes the agent's response and the next stage for one turn.
    pub fn advance(&self, utterance: &str, entities: &Entities, current: Stage) -> TurnOutcome {
        match current {
            Stage::Greeting => self.from_greeting(utterance),
            Stage::NoticePeriod => self.from_notice_period(utterance, entities),
            Stage::Ctc => self.from_ctc(utterance, entities),
            Stage::Availability => self.from_availability(utterance, entities),
            Stage::Confirmation => self.from_confirmation(utterance),
            Stage::Closing => TurnOutcome::new(templates::CLOSING, Stage::Closing),
        }
    }

    /// Like [`DialogueEngine::advance`] for callers holding a raw stored
    /// stage label.
    ///
    /// Returns `(response, next_label)`. A label that names no known stage
    /// gets the generic "didn't understand" reply and is handed back unchanged.
    pub fn advance_label(
        &self,
        utterance: &str,
        entities: &Entities,
        label: &str,
    ) -> (String, String) {
        match label.parse::<Stage>() {
            Ok(stage) => {
                let outcome = self.advance(utterance, entities, stage);
                (outcome.response, outcome.next_stage.label().to_string())
            }
            Err(_) => {
                tracing::warn!(label, "unrecognized stage label, stage left unchanged");
                (templates::NOT_UNDERSTOOD.to_string(), label.to_string())
            }
        }
    }

    fn from_greeting(&self, utterance: &str) -> TurnOutcome {
        match self.config.interest.classify(utterance) {
            Answer::Yes => TurnOutcome::new(templates::ASK_NOTICE_PERIOD, Stage::NoticePeriod),
            Answer::No => TurnOutcome::new(templates::DECLINE_ACKNOWLEDGED, Stage::Closing),
            Answer::Unclear => TurnOutcome::new(templates::REASK_INTEREST, Stage::Greeting),
        }
    }

    fn from_notice_period(&self, utterance: &str, entities: &Entities) -> TurnOutcome {
        if entities.notice_period_days.is_some() || NOTICE_EVIDENCE.is_match(utterance) {
            TurnOutcome::new(templates::ASK_COMPENSATION, Stage::Ctc)
        } else {
            TurnOutcome::new(templates::REASK_NOTICE_PERIOD, Stage::NoticePeriod)
        }
    }

    fn from_ctc(&self, utterance: &str, entities: &Entities) -> TurnOutcome {
        if entities.has_compensation() || COMPENSATION_EVIDENCE.is_match(utterance) {
            TurnOutcome::new(templates::ASK_AVAILABILITY, Stage::Availability)
        } else {
            TurnOutcome::new(templates::REASK_COMPENSATION, Stage::Ctc)
        }
    }

    fn from_availability(&self, utterance: &str, entities: &Entities) -> TurnOutcome {
        let mentions_time = WEEKDAY_EVIDENCE.is_match(utterance)
            || CLOCK_EVIDENCE.is_match(utterance)
            || TIME_OF_DAY_EVIDENCE.is_match(utterance);

        if entities.date_time.is_some() || mentions_time {
            TurnOutcome::new(templates::confirm_slot(entities.date_time), Stage::Confirmation)
        } else {
            TurnOutcome::new(templates::REASK_AVAILABILITY, Stage::Availability)
        }
    }

    fn from_confirmation(&self, utterance: &str) -> TurnOutcome {
        match self.config.confirmation.classify(utterance) {
            Answer::Yes => TurnOutcome::new(templates::CONFIRMED, Stage::Closing),
            Answer::No => TurnOutcome::new(templates::ASK_ALTERNATIVE_SLOT, Stage::Availability),
            Answer::Unclear => TurnOutcome::new(templates::REASK_CONFIRMATION, Stage::Confirmation),
        }
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

/// True if `phrase` occurs in `text` with no letter or digit directly
/// before or after it. Both arguments are expected lowercase.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase = phrase.to_lowercase();
    if phrase.is_empty() {
        return false;
    }
    text.match_indices(phrase.as_str()).any(|(start, found)| {
        let before = text[..start].chars().next_back();
        let after = text[start + found.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StateMachine;
    use chrono::NaiveDate;

    fn engine() -> DialogueEngine {
        DialogueEngine::default()
    }

    fn next(utterance: &str, stage: Stage) -> Stage {
        engine().advance(utterance, &Entities::new(), stage).next_stage
    }

    mod keywords {
        use super::*;

        #[test]
        fn phrases_match_whole_words_only() {
            assert!(contains_phrase("no thanks", "no"));
            assert!(!contains_phrase("i don't know", "no"));
            assert!(!contains_phrase("nothing yet", "no"));
            assert!(contains_phrase("well, that works.", "that works"));
        }

        #[test]
        fn refusal_beats_affirmative() {
            let config = DialogueConfig::default();
            assert_eq!(config.interest.classify("I'm not interested"), Answer::No);
            assert_eq!(config.confirmation.classify("that's not correct"), Answer::No);
        }

        #[test]
        fn affirmative_beats_bare_negative() {
            let config = DialogueConfig::default();
            assert_eq!(config.interest.classify("No wait, yes please"), Answer::Yes);
        }

        #[test]
        fn curly_apostrophes_are_normalized() {
            let config = DialogueConfig::default();
            assert_eq!(config.confirmation.classify("That doesn\u{2019}t work"), Answer::No);
        }

        #[test]
        fn empty_phrase_never_matches() {
            assert!(!contains_phrase("anything", ""));
        }
    }

    mod greeting {
        use super::*;

        #[test]
        fn interested_moves_to_notice_period() {
            let outcome = engine().advance("yes, interested", &Entities::new(), Stage::Greeting);
            assert_eq!(outcome.next_stage, Stage::NoticePeriod);
            assert_eq!(outcome.response, templates::ASK_NOTICE_PERIOD);
        }

        #[test]
        fn decline_moves_to_closing() {
            let outcome = engine().advance("no thanks", &Entities::new(), Stage::Greeting);
            assert_eq!(outcome.next_stage, Stage::Closing);
            assert_eq!(outcome.response, templates::DECLINE_ACKNOWLEDGED);
        }

        #[test]
        fn not_interested_is_a_decline() {
            assert_eq!(next("Not interested, sorry", Stage::Greeting), Stage::Closing);
        }

        #[test]
        fn informal_declines_close_the_call() {
            assert_eq!(next("nope", Stage::Greeting), Stage::Closing);
            assert_eq!(next("nah, I'm good", Stage::Greeting), Stage::Closing);
            assert_eq!(next("not really", Stage::Greeting), Stage::Closing);
            assert_eq!(next("not really interested", Stage::Greeting), Stage::Closing);
        }

        #[test]
        fn unclear_answer_reasks() {
            let outcome = engine().advance("who is this?", &Entities::new(), Stage::Greeting);
            assert_eq!(outcome.next_stage, Stage::Greeting);
            assert_eq!(outcome.response, templates::REASK_INTEREST);
        }

        #[test]
        fn greeting_uses_company_name() {
            let engine = DialogueEngine::new(DialogueConfig::default().with_company_name("Vepio"));
            assert!(engine.greeting().contains("this is Vepio calling"));
            assert_eq!(DialogueEngine::default().greeting(), templates::GENERIC_GREETING);
        }
    }

    mod notice_period {
        use super::*;

        #[test]
        fn entity_advances_to_ctc() {
            let entities = Entities::new().with_notice_period_days(30);
            let outcome = engine().advance("about that", &entities, Stage::NoticePeriod);
            assert_eq!(outcome.next_stage, Stage::Ctc);
            assert_eq!(outcome.response, templates::ASK_COMPENSATION);
        }

        #[test]
        fn text_evidence_advances_to_ctc() {
            assert_eq!(next("maybe 6 weeks", Stage::NoticePeriod), Stage::Ctc);
        }

        #[test]
        fn no_evidence_reasks() {
            let outcome = engine().advance("not sure yet", &Entities::new(), Stage::NoticePeriod);
            assert_eq!(outcome.next_stage, Stage::NoticePeriod);
            assert_eq!(outcome.response, templates::REASK_NOTICE_PERIOD);
        }
    }

    mod ctc {
        use super::*;

        #[test]
        fn entity_advances_to_availability() {
            let entities = Entities::new().with_expected_compensation(15.0);
            let outcome = engine().advance("that's it", &entities, Stage::Ctc);
            assert_eq!(outcome.next_stage, Stage::Availability);
            assert_eq!(outcome.response, templates::ASK_AVAILABILITY);
        }

        #[test]
        fn unit_evidence_advances_to_availability() {
            assert_eq!(next("around 800k", Stage::Ctc), Stage::Availability);
            assert_eq!(next("12.5 lakhs", Stage::Ctc), Stage::Availability);
            assert_eq!(next("50 thousand a month", Stage::Ctc), Stage::Availability);
        }

        #[test]
        fn no_evidence_reasks() {
            let outcome = engine().advance("I'd rather not say", &Entities::new(), Stage::Ctc);
            assert_eq!(outcome.next_stage, Stage::Ctc);
            assert_eq!(outcome.response, templates::REASK_COMPENSATION);
        }
    }

    mod availability {
        use super::*;

        #[test]
        fn extracted_slot_is_read_back() {
            let slot = NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap();
            let entities = Entities::new().with_date_time(slot);
            let outcome = engine().advance("friday 3pm", &entities, Stage::Availability);
            assert_eq!(outcome.next_stage, Stage::Confirmation);
            assert!(outcome.response.contains("Friday, March 15 at 3:00 PM"));
        }

        #[test]
        fn text_evidence_uses_generic_slot() {
            let outcome = engine().advance("thursday works", &Entities::new(), Stage::Availability);
            assert_eq!(outcome.next_stage, Stage::Confirmation);
            assert!(outcome.response.contains(templates::UNSPECIFIED_SLOT));
        }

        #[test]
        fn plural_days_and_times_count_as_evidence() {
            assert_eq!(next("mondays work for me", Stage::Availability), Stage::Confirmation);
            assert_eq!(next("I'm free afternoons", Stage::Availability), Stage::Confirmation);
            assert_eq!(next("mornings are best", Stage::Availability), Stage::Confirmation);
        }

        #[test]
        fn clock_and_time_of_day_count_as_evidence() {
            assert_eq!(next("14:30", Stage::Availability), Stage::Confirmation);
            assert_eq!(next("any morning", Stage::Availability), Stage::Confirmation);
            assert_eq!(next("after 4 pm", Stage::Availability), Stage::Confirmation);
        }

        #[test]
        fn i_am_is_not_a_time() {
            let outcome = engine().advance("I am not sure", &Entities::new(), Stage::Availability);
            assert_eq!(outcome.next_stage, Stage::Availability);
            assert_eq!(outcome.response, templates::REASK_AVAILABILITY);
        }
    }

    mod confirmation {
        use super::*;

        #[test]
        fn yes_moves_to_closing() {
            let outcome = engine().advance("yes that works", &Entities::new(), Stage::Confirmation);
            assert_eq!(outcome.next_stage, Stage::Closing);
            assert_eq!(outcome.response, templates::CONFIRMED);
        }

        #[test]
        fn not_correct_loops_back_to_availability() {
            let outcome =
                engine().advance("that's not correct", &Entities::new(), Stage::Confirmation);
            assert_eq!(outcome.next_stage, Stage::Availability);
            assert_eq!(outcome.response, templates::ASK_ALTERNATIVE_SLOT);
        }

        #[test]
        fn incorrect_or_wrong_loops_back_to_availability() {
            assert_eq!(next("that's incorrect", Stage::Confirmation), Stage::Availability);
            assert_eq!(next("nope, wrong day", Stage::Confirmation), Stage::Availability);
        }

        #[test]
        fn doesnt_work_loops_back_to_availability() {
            assert_eq!(next("sorry, that doesn't work", Stage::Confirmation), Stage::Availability);
        }

        #[test]
        fn unclear_answer_reasks() {
            let outcome = engine().advance("hmm", &Entities::new(), Stage::Confirmation);
            assert_eq!(outcome.next_stage, Stage::Confirmation);
            assert_eq!(outcome.response, templates::REASK_CONFIRMATION);
        }
    }

    mod closing {
        use super::*;

        #[test]
        fn closing_is_idempotent() {
            let entities = Entities::new().with_notice_period_days(30);
            for utterance in ["yes", "no", "what?", ""] {
                let outcome = engine().advance(utterance, &entities, Stage::Closing);
                assert_eq!(outcome, TurnOutcome::new(templates::CLOSING, Stage::Closing));
            }
        }
    }

    mod labels {
        use super::*;

        #[test]
        fn known_label_advances() {
            let (response, next) = engine().advance_label("yes", &Entities::new(), "greeting");
            assert_eq!(response, templates::ASK_NOTICE_PERIOD);
            assert_eq!(next, "notice_period");
        }

        #[test]
        fn unknown_label_apologizes_and_stays() {
            let (response, next) = engine().advance_label("yes", &Entities::new(), "interest");
            assert_eq!(response, templates::NOT_UNDERSTOOD);
            assert_eq!(next, "interest");
        }
    }

    #[test]
    fn every_outcome_is_a_legal_edge() {
        let utterances = [
            "yes", "no", "hmm", "2 months", "12 lakhs", "monday", "not correct", "",
        ];
        let entity_sets = [
            Entities::new(),
            Entities::new()
                .with_notice_period_days(30)
                .with_current_compensation(10.0),
        ];
        for stage in Stage::ALL {
            for utterance in utterances {
                for entities in &entity_sets {
                    let outcome = engine().advance(utterance, entities, stage);
                    assert!(
                        stage.can_transition_to(&outcome.next_stage),
                        "{:?} -> {:?} on {:?}",
                        stage,
                        outcome.next_stage,
                        utterance
                    );
                }
            }
        }
    }
}
