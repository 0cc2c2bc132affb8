//! A perfect player for `play --autoplay`.

use mg_engine::variant::Position;
use mg_engine::{GameInput, SessionController, VariantState};

/// Reads the variant snapshot and answers the way a flawless player would.
#[derive(Debug, Default)]
pub struct Autopilot {
    last_target: Option<Position>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit whatever inputs the current state calls for. Returns how many
    /// were accepted.
    pub fn act(&mut self, controller: &mut SessionController) -> usize {
        let inputs = match controller.variant_state() {
            Some(state) => self.decide(&state),
            None => Vec::new(),
        };
        inputs
            .iter()
            .filter(|input| controller.submit_input(input))
            .count()
    }

    fn decide(&mut self, state: &VariantState) -> Vec<GameInput> {
        match state {
            VariantState::Breathing(_) => Vec::new(),
            VariantState::Memory(s) if s.is_playing_back || s.awaiting_replay => Vec::new(),
            VariantState::Memory(s) => s
                .target_sequence
                .iter()
                .skip(s.user_input.len())
                .map(|symbol| GameInput::Symbol(*symbol))
                .collect(),
            // One hit per position.
            VariantState::Target(s) => {
                if self.last_target == Some(s.position) {
                    Vec::new()
                } else {
                    self.last_target = Some(s.position);
                    vec![GameInput::Hit]
                }
            }
            VariantState::Quiz(s) if s.feedback.is_none() => {
                vec![GameInput::Choice(s.correct_label.clone())]
            }
            VariantState::Quiz(_) => Vec::new(),
        }
    }
}
