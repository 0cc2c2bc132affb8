use std::ops::RangeInclusive;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{GameInput, GameVariant, VariantContext, VariantState};
use crate::scheduler::VariantTimer;

/// Relocation interval.
pub const RELOCATE_MS: u64 = 2_000;
/// Horizontal bounds as a fraction of playfield width.
pub const X_BOUNDS: RangeInclusive<f64> = 0.10..=0.90;
/// Vertical bounds as a fraction of playfield height.
pub const Y_BOUNDS: RangeInclusive<f64> = 0.20..=0.80;

/// Target centre in fractional playfield coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Fraction of the width, from the left edge.
    pub x: f64,
    /// Fraction of the height, from the top edge.
    pub y: f64,
}

impl Position {
    /// Playfield centre.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Uniformly random position within the inset bounds.
    pub fn random(rng: &mut StdRng) -> Self {
        Self {
            x: rng.random_range(X_BOUNDS),
            y: rng.random_range(Y_BOUNDS),
        }
    }

    /// Whether the position lies within the inset bounds.
    pub fn in_bounds(&self) -> bool {
        X_BOUNDS.contains(&self.x) && Y_BOUNDS.contains(&self.y)
    }
}

/// Target tracker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    /// Where the target is.
    pub position: Position,
    /// Hits this session.
    pub hit_count: u32,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            position: Position::CENTER,
            hit_count: 0,
        }
    }
}

/// Moving-target attention game.
///
/// The target relocates on a fixed cadence whether or not it was hit, and
/// every hit scores. There is no per-position cap.
#[derive(Debug)]
pub struct TargetGame {
    state: TargetState,
    award: u32,
}

impl TargetGame {
    /// Create a game that awards `award` points per hit.
    pub fn new(award: u32) -> Self {
        Self {
            state: TargetState::default(),
            award,
        }
    }
}

impl GameVariant for TargetGame {
    fn name(&self) -> &str {
        "target"
    }

    fn initialize(&mut self, ctx: &mut VariantContext<'_>) {
        self.state = TargetState::default();
        ctx.schedule_periodic(RELOCATE_MS, VariantTimer::Relocate);
    }

    fn on_timer(&mut self, timer: VariantTimer, ctx: &mut VariantContext<'_>) {
        if timer == VariantTimer::Relocate {
            self.state.position = Position::random(ctx.rng);
        }
    }

    fn on_input(&mut self, input: &GameInput, ctx: &mut VariantContext<'_>) -> bool {
        if *input != GameInput::Hit {
            return false;
        }
        self.state.hit_count += 1;
        ctx.award(self.award);
        true
    }

    fn state(&self) -> VariantState {
        VariantState::Target(self.state.clone())
    }
}
