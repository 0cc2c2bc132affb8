use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{GameInput, GameVariant, VariantContext, VariantState};
use crate::scheduler::VariantTimer;

/// How long feedback stays up before the next question.
pub const FEEDBACK_MS: u64 = 2_000;
/// Answer options per question.
pub const OPTION_COUNT: usize = 3;
/// Feedback for a correct answer.
pub const CORRECT_FEEDBACK: &str = "Correct! Great emotional awareness!";

/// Emotional valence of a stimulus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    /// Pleasant.
    Positive,
    /// Unpleasant.
    Negative,
    /// Neither.
    #[default]
    Neutral,
}

/// A labelled stimulus in the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stimulus {
    /// What the player sees.
    pub emoji: &'static str,
    /// The correct answer.
    pub label: &'static str,
    /// Valence category.
    pub valence: Valence,
}

/// The built-in emotion bank. Labels are distinct.
pub const EMOTIONS: [Stimulus; 6] = [
    Stimulus {
        emoji: "😊",
        label: "Happy",
        valence: Valence::Positive,
    },
    Stimulus {
        emoji: "😢",
        label: "Sad",
        valence: Valence::Negative,
    },
    Stimulus {
        emoji: "😠",
        label: "Angry",
        valence: Valence::Negative,
    },
    Stimulus {
        emoji: "😰",
        label: "Anxious",
        valence: Valence::Negative,
    },
    Stimulus {
        emoji: "😌",
        label: "Calm",
        valence: Valence::Positive,
    },
    Stimulus {
        emoji: "🤔",
        label: "Thoughtful",
        valence: Valence::Neutral,
    },
];

/// Quiz state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    /// The emoji on screen.
    pub stimulus: String,
    /// Label of the stimulus.
    pub correct_label: String,
    /// Valence category of the stimulus.
    pub valence: Valence,
    /// Exactly three distinct labels, one of them correct, in display order.
    pub option_labels: Vec<String>,
    /// Feedback for the last answer; input is closed while set.
    pub feedback: Option<String>,
}

impl QuizState {
    /// Whether the options satisfy the three-distinct-one-correct rule.
    pub fn is_well_formed(&self) -> bool {
        let correct = self
            .option_labels
            .iter()
            .filter(|l| **l == self.correct_label)
            .count();
        let mut unique = self.option_labels.clone();
        unique.sort();
        unique.dedup();
        self.option_labels.len() == OPTION_COUNT && unique.len() == OPTION_COUNT && correct == 1
    }
}

/// Draw a question: one uniform correct stimulus plus two distinct
/// distractors, shuffled.
///
/// `bank` must hold at least [`OPTION_COUNT`] stimuli with distinct labels.
pub fn generate_question(bank: &[Stimulus], rng: &mut StdRng) -> QuizState {
    let correct_index = rng.random_range(0..bank.len());
    let correct = bank[correct_index];
    let others: Vec<&Stimulus> = bank
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != correct_index)
        .map(|(_, s)| s)
        .collect();

    let mut option_labels = vec![correct.label.to_string()];
    option_labels.extend(
        rand::seq::index::sample(rng, others.len(), OPTION_COUNT - 1)
            .iter()
            .map(|i| others[i].label.to_string()),
    );
    option_labels.shuffle(rng);

    QuizState {
        stimulus: correct.emoji.to_string(),
        correct_label: correct.label.to_string(),
        valence: correct.valence,
        option_labels,
        feedback: None,
    }
}

/// Emotion-naming quiz.
#[derive(Debug)]
pub struct QuizGame {
    bank: &'static [Stimulus],
    state: QuizState,
    award: u32,
}

impl QuizGame {
    /// Create a quiz over the built-in bank awarding `award` per correct answer.
    pub fn new(award: u32) -> Self {
        Self {
            bank: &EMOTIONS,
            state: QuizState::default(),
            award,
        }
    }

    fn answer(&mut self, chosen: &str, ctx: &mut VariantContext<'_>) -> bool {
        if self.state.feedback.is_some() {
            return false;
        }
        if !self
            .state
            .option_labels
            .iter()
            .any(|l| l.eq_ignore_ascii_case(chosen))
        {
            return false;
        }

        if self.state.correct_label.eq_ignore_ascii_case(chosen) {
            ctx.award(self.award);
            self.state.feedback = Some(CORRECT_FEEDBACK.to_string());
        } else {
            self.state.feedback = Some(format!(
                "Not quite. This emotion is: {}",
                self.state.correct_label
            ));
        }
        ctx.schedule_once(FEEDBACK_MS, VariantTimer::NextQuestion);
        true
    }
}

impl GameVariant for QuizGame {
    fn name(&self) -> &str {
        "quiz"
    }

    fn initialize(&mut self, ctx: &mut VariantContext<'_>) {
        self.state = generate_question(self.bank, ctx.rng);
    }

    fn on_timer(&mut self, timer: VariantTimer, ctx: &mut VariantContext<'_>) {
        if timer == VariantTimer::NextQuestion && self.state.feedback.is_some() {
            self.state = generate_question(self.bank, ctx.rng);
        }
    }

    fn on_input(&mut self, input: &GameInput, ctx: &mut VariantContext<'_>) -> bool {
        match input {
            GameInput::Choice(label) => self.answer(label, ctx),
            _ => false,
        }
    }

    fn state(&self) -> VariantState {
        VariantState::Quiz(self.state.clone())
    }
}
