//! Heroes placed on the playfield

use crate::core::{CardDefinition, CardId, HeroInstanceId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Damage immunity granted by a support
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    pub turns: u32,
    pub source: CardId,
}

/// A status badge shown on a hero
///
/// Badges are a projection of the hero's status fields, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", rename_all = "camelCase")]
pub enum StatusIcon {
    Defend,
    Help,
    Assist { amount: f64 },
    Protected { turns: u32 },
    Stunned { turns: u32 },
    Enfeebled { turns: u32 },
    Blind { turns: u32 },
    /// Delayed damage scheduled from this hero's slot
    PendingDamage { source: CardId, dmg: i32 },
    /// Badge attached by the presentation layer that never expires
    Persistent { label: String },
}

/// Damage taken by one hero from one strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageTaken {
    pub temp_taken: i32,
    pub hp_taken: i32,
}

impl DamageTaken {
    pub fn landed(&self) -> bool {
        self.temp_taken > 0 || self.hp_taken > 0
    }
}

/// A hero card in play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroInstance {
    pub card_id: CardId,
    pub instance_id: HeroInstanceId,
    pub base: CardDefinition,
    pub hp: i32,
    pub temp_hp: i32,

    /// Dodge stance until the end of the enemy turn
    pub defending: bool,
    /// Preferred target of enemy single-target attacks
    pub helped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected: Option<Protection>,
    pub stunned_turns: u32,
    pub enfeebled_turns: u32,
    pub blinded_turns: u32,
    /// Additive accuracy bonus for the current round
    pub hit_bonus: f64,

    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub persistent_badges: SmallVec<[String; 2]>,
}

impl HeroInstance {
    pub fn new(instance_id: HeroInstanceId, card: CardDefinition) -> Self {
        HeroInstance {
            card_id: card.id.clone(),
            instance_id,
            hp: card.hp.min(card.max_hp()),
            base: card,
            temp_hp: 0,
            defending: false,
            helped: false,
            protected: None,
            stunned_turns: 0,
            enfeebled_turns: 0,
            blinded_turns: 0,
            hit_bonus: 0.0,
            persistent_badges: SmallVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.base.display_name()
    }

    pub fn max_hp(&self) -> i32 {
        self.base.max_hp()
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned_turns > 0
    }

    pub fn is_protected(&self) -> bool {
        self.protected.as_ref().is_some_and(|p| p.turns > 0)
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Heal up to maximum HP, returning the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.max_hp().min(self.hp.saturating_add(amount)).max(self.hp);
        self.hp - before
    }

    /// Subtract damage from temp HP first, then HP
    pub fn take_damage(&mut self, amount: i32) -> DamageTaken {
        let mut remaining = amount.max(0);
        let mut taken = DamageTaken::default();
        if self.temp_hp > 0 {
            let absorbed = self.temp_hp.min(remaining);
            self.temp_hp -= absorbed;
            taken.temp_taken = absorbed;
            remaining -= absorbed;
        }
        if remaining > 0 {
            self.hp = self.hp.saturating_sub(remaining);
            taken.hp_taken = remaining;
        }
        taken
    }

    /// Count down a protection, dropping it once expired
    pub fn tick_protection(&mut self) {
        if let Some(p) = &mut self.protected {
            p.turns = p.turns.saturating_sub(1);
            if p.turns == 0 {
                self.protected = None;
            }
        }
    }

    /// Clear the flags that last only until the end of the enemy turn
    pub fn clear_round_flags(&mut self) {
        self.defending = false;
        self.helped = false;
        self.hit_bonus = 0.0;
    }

    /// Count down stun, enfeeble and blind at the start of an enemy turn
    pub fn tick_conditions(&mut self) {
        self.stunned_turns = self.stunned_turns.saturating_sub(1);
        self.enfeebled_turns = self.enfeebled_turns.saturating_sub(1);
        self.blinded_turns = self.blinded_turns.saturating_sub(1);
    }

    /// Badges derived from this hero's own status fields, in display order
    pub fn status_icons(&self) -> SmallVec<[StatusIcon; 4]> {
        self.status_icons_with(std::iter::empty())
    }

    /// Badges with encounter-level entries (pending effects tied to this
    /// hero's slot) placed after the conditions and before persistent badges
    pub fn status_icons_with(
        &self,
        pending: impl IntoIterator<Item = StatusIcon>,
    ) -> SmallVec<[StatusIcon; 4]> {
        let mut icons = SmallVec::new();
        if self.defending {
            icons.push(StatusIcon::Defend);
        }
        if self.helped {
            icons.push(StatusIcon::Help);
        }
        if self.hit_bonus > 0.0 {
            icons.push(StatusIcon::Assist {
                amount: self.hit_bonus,
            });
        }
        if let Some(p) = &self.protected {
            icons.push(StatusIcon::Protected { turns: p.turns });
        }
        if self.stunned_turns > 0 {
            icons.push(StatusIcon::Stunned {
                turns: self.stunned_turns,
            });
        }
        if self.enfeebled_turns > 0 {
            icons.push(StatusIcon::Enfeebled {
                turns: self.enfeebled_turns,
            });
        }
        if self.blinded_turns > 0 {
            icons.push(StatusIcon::Blind {
                turns: self.blinded_turns,
            });
        }
        icons.extend(pending);
        for label in &self.persistent_badges {
            icons.push(StatusIcon::Persistent {
                label: label.clone(),
            });
        }
        icons
    }
}
