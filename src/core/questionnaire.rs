//! # Questionnaire Wizard
//!
//! Ten single-choice questions answered one at a time.
//!
//! ```text
//!   ┌───┐ next  ┌───┐ next       ┌────┐ submit ┌────────────┐ complete ┌───────────┐
//!   │ 1 │ ────▶ │ 2 │ ────▶ ... │ 10 │ ─────▶ │ Submitting │ ───────▶ │ Submitted │
//!   └───┘ ◀──── └───┘ ◀──── ... └────┘ ◀───── └────────────┘   fail   └───────────┘
//!        previous
//! ```
//!
//! `next` requires an answer on the current question. `submit` requires all
//! ten and otherwise jumps to the first gap.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::validation::ValidationError;

pub const TOTAL_QUESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOption {
    pub code: char,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// 1-based question number, also the wire key suffix (`q{id}`).
    pub id: usize,
    pub prompt: &'static str,
    pub options: &'static [QuestionOption],
}

impl Question {
    pub fn has_option(&self, code: char) -> bool {
        self.options.iter().any(|o| o.code == code)
    }
}

const fn opt(code: char, text: &'static str) -> QuestionOption {
    QuestionOption { code, text }
}

pub const QUESTIONS: [Question; TOTAL_QUESTIONS] = [
    Question {
        id: 1,
        prompt: "How are you feeling right now?",
        options: &[
            opt('A', "Calm"),
            opt('B', "Neutral"),
            opt('C', "Sad"),
            opt('D', "Stressed"),
            opt('E', "Overwhelmed"),
            opt('F', "Happy"),
        ],
    },
    Question {
        id: 2,
        prompt: "Which emotion describes you best today?",
        options: &[
            opt('A', "Anxious"),
            opt('B', "Tired"),
            opt('C', "Low mood"),
            opt('D', "Confident"),
            opt('E', "Irritable"),
            opt('F', "Content"),
        ],
    },
    Question {
        id: 3,
        prompt: "How stressed do you feel today?",
        options: &[
            opt('A', "Very low"),
            opt('B', "Low"),
            opt('C', "Moderate"),
            opt('D', "High"),
            opt('E', "Very high"),
        ],
    },
    Question {
        id: 4,
        prompt: "Are you experiencing physical symptoms of stress?",
        options: &[
            opt('A', "No symptoms"),
            opt('B', "Mild fatigue/headache"),
            opt('C', "Restlessness or tension"),
            opt('D', "Trouble focusing"),
            opt('E', "Unable to relax / very tense"),
        ],
    },
    Question {
        id: 5,
        prompt: "How motivated do you feel today?",
        options: &[
            opt('A', "Very motivated"),
            opt('B', "Somewhat motivated"),
            opt('C', "Neutral"),
            opt('D', "Low motivation"),
            opt('E', "No motivation at all"),
        ],
    },
    Question {
        id: 6,
        prompt: "Have you enjoyed your usual activities lately?",
        options: &[
            opt('A', "Yes, completely"),
            opt('B', "Mostly"),
            opt('C', "Sometimes"),
            opt('D', "Rarely"),
            opt('E', "Not at all"),
        ],
    },
    Question {
        id: 7,
        prompt: "How would you describe your mental energy?",
        options: &[
            opt('A', "Energized"),
            opt('B', "Okay"),
            opt('C', "A bit drained"),
            opt('D', "Exhausted"),
            opt('E', "Burned out"),
        ],
    },
    Question {
        id: 8,
        prompt: "How clear is your thinking today?",
        options: &[
            opt('A', "Very clear"),
            opt('B', "Mostly clear"),
            opt('C', "A bit foggy"),
            opt('D', "Confused"),
            opt('E', "Overwhelmed"),
        ],
    },
    Question {
        id: 9,
        prompt: "How connected do you feel to people around you?",
        options: &[
            opt('A', "Very connected"),
            opt('B', "Somewhat connected"),
            opt('C', "Neutral"),
            opt('D', "A bit isolated"),
            opt('E', "Very isolated"),
        ],
    },
    Question {
        id: 10,
        prompt: "How out of control do your emotions feel today?",
        options: &[
            opt('A', "Very stable"),
            opt('B', "Mostly stable"),
            opt('C', "Somewhat unstable"),
            opt('D', "Unstable"),
            opt('E', "Very unstable"),
        ],
    },
];

/// Returns question `number` (1-based).
pub fn question(number: usize) -> Option<&'static Question> {
    number.checked_sub(1).and_then(|i| QUESTIONS.get(i))
}

// ============================================================================
// Answer Set
// ============================================================================

/// Selected option code per question number.
///
/// Serializes as `{"q1": "A", ..., "q10": "E"}`, the shape the mood
/// detection endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet(BTreeMap<usize, char>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question: usize) -> Option<char> {
        self.0.get(&question).copied()
    }

    pub fn insert(&mut self, question: usize, code: char) {
        self.0.insert(question, code);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_unanswered(&self) -> Option<usize> {
        (1..=TOTAL_QUESTIONS).find(|q| !self.0.contains_key(q))
    }

    pub fn is_complete(&self) -> bool {
        self.first_unanswered().is_none()
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (question, code) in &self.0 {
            map.serialize_entry(&format!("q{question}"), &code.to_string())?;
        }
        map.end()
    }
}

// ============================================================================
// Wizard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStatus {
    #[default]
    Answering,
    /// Answers are with the mood detection endpoint.
    Submitting,
    /// Terminal: the verdict arrived and the answers were discarded.
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    /// 1-based index of the question on screen.
    pub current: usize,
    pub answers: AnswerSet,
    pub status: WizardStatus,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    pub fn new() -> Self {
        Self {
            current: 1,
            answers: AnswerSet::new(),
            status: WizardStatus::Answering,
        }
    }

    pub fn current_question(&self) -> &'static Question {
        question(self.current).unwrap_or(&QUESTIONS[0])
    }

    pub fn selected(&self) -> Option<char> {
        self.answers.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current == TOTAL_QUESTIONS
    }

    /// `round(current / 10 * 100)`.
    pub fn progress_percent(&self) -> u16 {
        let current = self.current.clamp(1, TOTAL_QUESTIONS) as f64;
        (current / TOTAL_QUESTIONS as f64 * 100.0).round() as u16
    }

    fn ensure_answering(&self) -> Result<(), ValidationError> {
        match self.status {
            WizardStatus::Submitting => Err(ValidationError::SubmissionInFlight),
            _ => Ok(()),
        }
    }

    /// Records `code` for the current question. Lowercase codes are accepted.
    pub fn select(&mut self, code: char) -> Result<(), ValidationError> {
        self.ensure_answering()?;
        let code = code.to_ascii_uppercase();
        let q = self.current_question();
        if !q.has_option(code) {
            return Err(ValidationError::UnknownOption {
                question: q.id,
                code,
            });
        }
        self.answers.insert(q.id, code);
        Ok(())
    }

    /// Advances one question. Blocked when the current question has no answer.
    pub fn next(&mut self) -> Result<(), ValidationError> {
        self.ensure_answering()?;
        if self.selected().is_none() {
            return Err(ValidationError::Unanswered {
                question: self.current,
            });
        }
        if self.current < TOTAL_QUESTIONS {
            self.current += 1;
        }
        Ok(())
    }

    pub fn previous(&mut self) -> Result<(), ValidationError> {
        self.ensure_answering()?;
        if self.current > 1 {
            self.current -= 1;
        }
        Ok(())
    }

    /// Validates and hands out the answers for submission.
    ///
    /// On a gap, `current` moves to the first unanswered question.
    pub fn submit(&mut self) -> Result<AnswerSet, ValidationError> {
        self.ensure_answering()?;
        if !self.is_last() {
            return Err(ValidationError::NotOnLastQuestion);
        }
        if let Some(missing) = self.answers.first_unanswered() {
            self.current = missing;
            return Err(ValidationError::Incomplete { question: missing });
        }
        self.status = WizardStatus::Submitting;
        Ok(self.answers.clone())
    }

    /// The verdict arrived: discard the answers.
    pub fn complete(&mut self) {
        self.answers = AnswerSet::new();
        self.status = WizardStatus::Submitted;
    }

    /// Detection failed: stay on the last question with answers intact.
    pub fn fail(&mut self) {
        self.status = WizardStatus::Answering;
        self.current = TOTAL_QUESTIONS;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
