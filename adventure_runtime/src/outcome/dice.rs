//! Dice - the single source of randomness in the runtime.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Something that can roll dice.
pub trait DiceRoller {
    /// Roll one die with `sides` faces, returning 1..=sides (0 for a zero-sided die).
    fn roll(&mut self, sides: u32) -> u32;

    fn d6(&mut self) -> u32 {
        self.roll(6)
    }

    /// Even odds.
    fn coin_flip(&mut self) -> bool {
        self.roll(2) == 1
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for &mut R {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

/// Pseudo-random dice. Replayable when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Dice that return a fixed script of faces, cycling when exhausted.
///
/// Faces larger than the die are clamped to its size.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        let Some(face) = self.faces.pop_front() else {
            return sides.min(1);
        };
        self.faces.push_back(face);
        face.clamp(sides.min(1), sides)
    }
}
