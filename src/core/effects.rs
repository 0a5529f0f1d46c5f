//! Support and summon effect tables
//!
//! Named support heroes and summons each carry one bespoke effect. The set is
//! closed: an id maps to an effect descriptor through a lookup table and the
//! encounter dispatches on the descriptor, never on the id itself.

use crate::core::{CardId, SummonId};

/// Effect of a support hero's action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportEffect {
    /// Clear the used flag and cooldown of a summon for this encounter
    RefreshSummon { summon: &'static str },
    /// Mark the caster as the enemy's preferred single target
    MarkHelped,
    /// Damage the enemy after the next enemy turn
    DelayedDamage { dmg: i32 },
    /// Rally (+AP) or Assist (+hit chance), chosen by ability name
    Tactics {
        ap_granted: u32,
        rally_cooldown: u32,
        assist_bonus_pct: u32,
    },
    /// Chosen ally takes no damage for a number of enemy turns
    Protect { turns: u32 },
    /// Immediate damage, and the enemy's next attack is halved
    Weaken { dmg: i32 },
    /// Immediate damage plus the same again after each of the next `times` enemy turns
    Barrage { dmg: i32, times: u32 },
    /// One-in-`one_in` chance to stun the enemy
    StunChance { one_in: usize, turns: u32 },
}

impl SupportEffect {
    /// Whether the effect is gated by the once-per-round usage flag
    pub fn uses_round_gate(&self) -> bool {
        !matches!(self, SupportEffect::Tactics { .. })
    }
}

const SUPPORT_TABLE: &[(&str, SupportEffect)] = &[
    ("shalendra", SupportEffect::RefreshSummon { summon: "volo" }),
    ("piter", SupportEffect::MarkHelped),
    ("lumalia", SupportEffect::DelayedDamage { dmg: 6 }),
    (
        "scout",
        SupportEffect::Tactics {
            ap_granted: 1,
            rally_cooldown: 3,
            assist_bonus_pct: 20,
        },
    ),
    ("willis", SupportEffect::Protect { turns: 1 }),
    ("brer", SupportEffect::Weaken { dmg: 5 }),
    ("bjurganmyr", SupportEffect::Barrage { dmg: 8, times: 2 }),
    ("miley", SupportEffect::Barrage { dmg: 8, times: 2 }),
    ("kiefer", SupportEffect::StunChance { one_in: 4, turns: 3 }),
];

/// Heroes that always act as supports, whatever their ability data says
const FORCED_SUPPORT: &[&str] = &["bjurganmyr", "miley"];

/// Support effect for a hero id
pub fn support_effect(id: &CardId) -> Option<SupportEffect> {
    SUPPORT_TABLE
        .iter()
        .find(|(name, _)| id == *name)
        .map(|(_, effect)| *effect)
}

pub fn is_forced_support(id: &CardId) -> bool {
    FORCED_SUPPORT.iter().any(|name| id == *name)
}

/// Effect of a summon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummonEffect {
    /// Heal every placed hero
    PartyHeal { amount: i32 },
    /// Multiply the next hero attack
    EmpowerNextAttack { multiplier: i32 },
    /// Temp HP to the chosen hero, or the one with the lowest HP
    TempHp { amount: i32 },
    /// Stun the enemy for at least this many turns
    StunEnemy { turns: u32 },
    /// Remove a share of the enemy's maximum HP
    MaxHpStrike { percent: i32 },
}

const SUMMON_TABLE: &[(&str, SummonEffect)] = &[
    ("garon", SummonEffect::PartyHeal { amount: 1 }),
    ("volo", SummonEffect::EmpowerNextAttack { multiplier: 2 }),
    ("blackrazor", SummonEffect::TempHp { amount: 30 }),
    ("whelm", SummonEffect::StunEnemy { turns: 2 }),
    ("wave", SummonEffect::MaxHpStrike { percent: 50 }),
];

/// Summon effect for an id; `None` means the text-driven party heal applies
pub fn summon_effect(id: &SummonId) -> Option<SummonEffect> {
    SUMMON_TABLE
        .iter()
        .find(|(name, _)| id == *name)
        .map(|(_, effect)| *effect)
}
