//! Formations and the enemy's single-target policy

use crate::core::HeroInstance;
use crate::game::rng::RandomSource;
use serde::{Deserialize, Serialize};

pub const PLAYFIELD_SLOTS: usize = 3;

/// Playfield of three optional heroes; slots 0 and 1 are the front line
pub type Playfield = [Option<HeroInstance>; PLAYFIELD_SLOTS];

/// Slot layout and targeting rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Formation {
    /// Two front slots, one back slot
    #[default]
    Standard,
    /// Slot 0 stands alone; slots 1 and 2 are stacked behind it
    LeftStack,
    /// Front to back; slot 2 is out of reach of area attacks
    Line,
}

impl Formation {
    pub fn number(self) -> u8 {
        match self {
            Formation::Standard => 1,
            Formation::LeftStack => 2,
            Formation::Line => 3,
        }
    }

    /// Whether area attacks reach this slot
    pub fn aoe_reaches(self, slot: usize) -> bool {
        !(self == Formation::Line && slot == 2)
    }
}

impl From<u8> for Formation {
    fn from(n: u8) -> Self {
        match n {
            2 => Formation::LeftStack,
            3 => Formation::Line,
            _ => Formation::Standard,
        }
    }
}

impl From<Formation> for u8 {
    fn from(f: Formation) -> Self {
        f.number()
    }
}

fn occupied(field: &Playfield, slot: usize) -> bool {
    field.get(slot).is_some_and(Option::is_some)
}

/// Pick the slot a single-target enemy attack lands on
///
/// Consumes one `draw_int` only when a random choice between slots is made.
pub fn select_single_target<R: RandomSource + ?Sized>(
    field: &Playfield,
    formation: Formation,
    rng: &mut R,
) -> Option<usize> {
    match formation {
        Formation::Line => {
            if let Some(slot) = (0..PLAYFIELD_SLOTS).find(|&s| occupied(field, s)) {
                return Some(slot);
            }
        }
        Formation::LeftStack => {
            if occupied(field, 0) {
                return Some(0);
            }
            let stack: Vec<usize> = [1, 2].into_iter().filter(|&s| occupied(field, s)).collect();
            if !stack.is_empty() {
                return Some(stack[rng.draw_int(stack.len())]);
            }
        }
        Formation::Standard => {}
    }

    if let Some(slot) = field
        .iter()
        .position(|h| h.as_ref().is_some_and(|h| h.helped))
    {
        return Some(slot);
    }

    let front: Vec<usize> = [0, 1].into_iter().filter(|&s| occupied(field, s)).collect();
    if !front.is_empty() {
        return Some(front[rng.draw_int(front.len())]);
    }

    if occupied(field, 2) {
        return Some(2);
    }
    None
}
