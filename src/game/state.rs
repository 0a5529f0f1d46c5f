//! Encounter state
//!
//! The [`Encounter`] aggregate owns everything that changes during one combat:
//! the enemy, the playfield, the hand, the AP pool and every bookkeeping table.
//! Operations live in the sibling modules as `impl` blocks on this type.

use crate::core::effects::support_effect;
use crate::core::{
    AbilityKey, CardDefinition, CardId, Enemy, EnemyDefinition, HeroInstance, HeroInstanceId,
    StatusIcon, SummonId, SupportEffect,
};
use crate::error::{ActionError, ActionResult};
use crate::game::events::{HealTarget, Winner};
use crate::game::logger::GameLogger;
use crate::game::rng::{ChaChaSource, RandomSource};
use crate::game::targeting::{Formation, Playfield, PLAYFIELD_SLOTS};
use crate::hand::Hand;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

pub const DEFAULT_AP_PER_TURN: u32 = 3;

/// Per-encounter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncounterOptions {
    /// AP restored at every enemy turn; 0 means the default of 3
    pub ap_per_turn: u32,
    pub formation: Formation,
}

impl Default for EncounterOptions {
    fn default() -> Self {
        EncounterOptions {
            ap_per_turn: DEFAULT_AP_PER_TURN,
            formation: Formation::Standard,
        }
    }
}

/// When a pending effect fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    AfterEnemy,
}

/// Scheduled damage to the enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEffect {
    /// Support hero that scheduled it
    pub id: CardId,
    pub slot: usize,
    pub dmg: i32,
    pub trigger: Trigger,
    /// Remaining firings; `None` fires once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
}

/// Maps with structured keys serialize as ordered `[key, value]` pairs
mod ordered_pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

/// One active combat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter<R = ChaChaSource> {
    pub enemy: Enemy,
    pub playfield: Playfield,
    pub hand: Hand,

    pub ap: u32,
    pub ap_per_turn: u32,

    /// Number of enemy turns taken so far
    pub turn: u32,
    pub formation: Formation,

    /// One-shot multiplier for the next hero attack
    pub next_attack_multiplier: i32,

    pub summon_used: FxHashMap<SummonId, bool>,
    pub summon_cooldowns: BTreeMap<SummonId, u32>,
    #[serde(with = "ordered_pairs")]
    pub ability_cooldowns: BTreeMap<AbilityKey, u32>,
    /// Supports that already acted this round
    pub support_used: FxHashSet<CardId>,

    pub pending_effects: Vec<PendingEffect>,

    /// Heroes that died this encounter
    pub exhausted: Vec<CardDefinition>,

    next_instance_id: u32,

    pub rng: R,

    #[serde(default)]
    pub logger: GameLogger,
}

impl<R: RandomSource> Encounter<R> {
    /// Start an encounter against `enemy` with a fully built hand
    ///
    /// Nothing is drawn here; the enemy record is copied into a runtime enemy.
    pub fn start(enemy: &EnemyDefinition, hand: Hand, rng: R, options: EncounterOptions) -> Self {
        let ap_per_turn = if options.ap_per_turn == 0 {
            DEFAULT_AP_PER_TURN
        } else {
            options.ap_per_turn
        };
        Encounter {
            enemy: Enemy::from_definition(enemy),
            playfield: Default::default(),
            hand,
            ap: ap_per_turn,
            ap_per_turn,
            turn: 0,
            formation: options.formation,
            next_attack_multiplier: 1,
            summon_used: FxHashMap::default(),
            summon_cooldowns: BTreeMap::new(),
            ability_cooldowns: BTreeMap::new(),
            support_used: FxHashSet::default(),
            pending_effects: Vec::new(),
            exhausted: Vec::new(),
            next_instance_id: 1,
            rng,
            logger: GameLogger::new(),
        }
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Outcome so far, if any
    ///
    /// An empty playfield only loses once the enemy has acted, so the
    /// encounter is not lost before the first placement.
    pub fn is_finished(&self) -> Option<Winner> {
        if self.enemy.is_defeated() {
            Some(Winner::Player)
        } else if self.turn > 0 && self.playfield.iter().all(Option::is_none) {
            Some(Winner::Enemy)
        } else {
            None
        }
    }

    pub fn hero(&self, slot: usize) -> Option<&HeroInstance> {
        self.playfield.get(slot).and_then(Option::as_ref)
    }

    pub fn hero_mut(&mut self, slot: usize) -> Option<&mut HeroInstance> {
        self.playfield.get_mut(slot).and_then(Option::as_mut)
    }

    /// Occupied slot indices in slot order
    pub fn occupied_slots(&self) -> SmallVec<[usize; PLAYFIELD_SLOTS]> {
        (0..PLAYFIELD_SLOTS)
            .filter(|&s| self.playfield[s].is_some())
            .collect()
    }

    /// Badges for the hero in `slot`, in canonical display order
    pub fn status_icons(&self, slot: usize) -> SmallVec<[StatusIcon; 4]> {
        let Some(hero) = self.hero(slot) else {
            return SmallVec::new();
        };
        let pending = self
            .pending_effects
            .iter()
            .filter(|e| {
                e.slot == slot
                    && matches!(support_effect(&e.id), Some(SupportEffect::DelayedDamage { .. }))
            })
            .map(|e| StatusIcon::PendingDamage {
                source: e.id.clone(),
                dmg: e.dmg,
            });
        hero.status_icons_with(pending)
    }

    /// Attach a badge that stays until the hero leaves play
    pub fn add_persistent_badge(&mut self, slot: usize, label: impl Into<String>) -> ActionResult<()> {
        let hero = self.hero_mut(slot).ok_or(ActionError::NoHero)?;
        hero.persistent_badges.push(label.into());
        Ok(())
    }

    pub(crate) fn require_ap(&self) -> ActionResult<()> {
        if self.ap == 0 {
            Err(ActionError::NoAp)
        } else {
            Ok(())
        }
    }

    pub(crate) fn spend_ap(&mut self) {
        self.ap = self.ap.saturating_sub(1);
    }

    /// A hero that exists and can act
    pub(crate) fn ready_hero(&self, slot: usize) -> ActionResult<&HeroInstance> {
        let hero = self.hero(slot).ok_or(ActionError::NoHero)?;
        if hero.is_stunned() {
            return Err(ActionError::Stunned);
        }
        Ok(hero)
    }

    /// Put a fresh instance of `card` into `slot`
    pub(crate) fn install(&mut self, slot: usize, card: CardDefinition) -> HeroInstanceId {
        let id = HeroInstanceId::new(self.next_instance_id);
        self.next_instance_id += 1;
        log_if_verbose!(self.logger, "{} enters slot {} as {}", card.display_name(), slot, id);
        self.playfield[slot] = Some(HeroInstance::new(id, card));
        id
    }

    /// Remove a dead hero from play, recording it as exhausted
    pub(crate) fn remove_if_dead(&mut self, slot: usize) -> bool {
        let dead = self.hero(slot).is_some_and(HeroInstance::is_dead);
        if dead {
            if let Some(hero) = self.playfield[slot].take() {
                log_if_verbose!(self.logger, "{} is exhausted", hero.name());
                self.forget_cooldowns(hero.instance_id);
                self.exhausted.push(hero.base);
            }
        }
        dead
    }

    /// Drop ability cooldowns of a hero instance that left play
    pub(crate) fn forget_cooldowns(&mut self, hero: HeroInstanceId) {
        self.ability_cooldowns.retain(|key, _| key.hero != hero);
    }

    /// Heal every placed hero, reporting slots that gained HP
    pub(crate) fn heal_party(&mut self, amount: i32) -> Vec<HealTarget> {
        let mut healed = Vec::new();
        for (slot, hero) in self.playfield.iter_mut().enumerate() {
            if let Some(hero) = hero {
                let gained = hero.heal(amount);
                if gained > 0 {
                    healed.push(HealTarget {
                        slot,
                        healed: gained,
                        hp: hero.hp,
                    });
                }
            }
        }
        healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::ScriptedSource;

    fn encounter(options: EncounterOptions) -> Encounter<ScriptedSource> {
        let enemy = EnemyDefinition::new("goblin", "Goblin", 20);
        let hand = Hand::from_cards([CardDefinition::new("aria", "Aria", 10)]);
        Encounter::start(&enemy, hand, ScriptedSource::new([]), options)
    }

    #[test]
    fn test_start_defaults() {
        let enc = encounter(EncounterOptions::default());
        assert_eq!(enc.ap, 3);
        assert_eq!(enc.ap_per_turn, 3);
        assert_eq!(enc.turn, 0);
        assert_eq!(enc.enemy.max_hp, 20);
        assert_eq!(enc.next_attack_multiplier, 1);
        assert!(enc.playfield.iter().all(Option::is_none));
    }

    #[test]
    fn test_zero_ap_option_falls_back() {
        let enc = encounter(EncounterOptions {
            ap_per_turn: 0,
            formation: Formation::Line,
        });
        assert_eq!(enc.ap_per_turn, 3);
        assert_eq!(enc.formation, Formation::Line);

        let enc = encounter(EncounterOptions {
            ap_per_turn: 5,
            ..Default::default()
        });
        assert_eq!(enc.ap, 5);
    }

    #[test]
    fn test_no_loss_before_first_enemy_turn() {
        let mut enc = encounter(EncounterOptions::default());
        assert_eq!(enc.is_finished(), None);
        enc.turn = 1;
        assert_eq!(enc.is_finished(), Some(Winner::Enemy));
        enc.enemy.hp = 0;
        assert_eq!(enc.is_finished(), Some(Winner::Player));
    }

    #[test]
    fn test_instance_ids_increase() {
        let mut enc = encounter(EncounterOptions::default());
        let a = enc.install(0, CardDefinition::new("aria", "Aria", 10));
        let b = enc.install(1, CardDefinition::new("aria", "Aria", 10));
        assert_eq!(a.as_u32(), 1);
        assert_eq!(b.as_u32(), 2);
    }

    #[test]
    fn test_pending_badge_sits_before_persistent() {
        let mut enc = encounter(EncounterOptions::default());
        enc.install(1, CardDefinition::new("lumalia", "Lumalia", 8));
        enc.add_persistent_badge(1, "blessed").unwrap();
        enc.pending_effects.push(PendingEffect {
            id: CardId::new("lumalia"),
            slot: 1,
            dmg: 6,
            trigger: Trigger::AfterEnemy,
            times: None,
        });
        let icons = enc.status_icons(1);
        assert_eq!(
            icons.as_slice(),
            &[
                StatusIcon::PendingDamage {
                    source: CardId::new("lumalia"),
                    dmg: 6
                },
                StatusIcon::Persistent {
                    label: "blessed".to_string()
                },
            ]
        );
        assert!(enc.status_icons(0).is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut enc = encounter(EncounterOptions::default());
        enc.install(0, CardDefinition::new("aria", "Aria", 10));
        enc.ability_cooldowns
            .insert(AbilityKey::new(HeroInstanceId::new(1), Some(0)), 2);
        let json = serde_json::to_string(&enc).unwrap();
        let back: Encounter<ScriptedSource> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ability_cooldowns, enc.ability_cooldowns);
        assert_eq!(back.playfield, enc.playfield);
        assert_eq!(back.next_instance_id, 2);
    }
}
