//! Result records returned by encounter operations
//!
//! Field names serialize in camelCase; these shapes are what presentation
//! layers render and narrate.

use crate::core::{AbilityKey, AttackType, CardId, SummonId};
use serde::{Deserialize, Serialize};

/// Successful placement or replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOutcome {
    pub slot: usize,
    /// Card sent back to hand when an occupied slot was replaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<CardId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefendOutcome {
    pub slot: usize,
}

/// Result of a hero attack; AP is spent even on a miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub dmg: i32,
    pub enemy_hp: i32,
    pub crit: bool,
    pub base_dmg: i32,
    pub missed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealTarget {
    pub slot: usize,
    pub healed: i32,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, rename_all = "camelCase")]
pub enum HealOutcome {
    /// `healed` is the nominal amount; `targets` lists slots that actually gained HP
    Party { healed: i32, targets: Vec<HealTarget> },
    Single { healed: i32, slot: usize, hp: i32 },
}

impl HealOutcome {
    pub fn healed(&self) -> i32 {
        match self {
            HealOutcome::Party { healed, .. } | HealOutcome::Single { healed, .. } => *healed,
        }
    }
}

/// What a support hero's action did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SupportApplied {
    SummonRefreshed { summon: SummonId },
    Helped { slot: usize },
    DamageScheduled { dmg: i32 },
    Rally {
        ap_granted: u32,
        cooldown: u32,
        ability_key: AbilityKey,
    },
    Assist {
        target: usize,
        bonus: f64,
        ability_key: AbilityKey,
    },
    Protected { target: usize, turns: u32 },
    Weakened { dmg: i32, enemy_hp: i32 },
    Barrage { dmg: i32, enemy_hp: i32, times: u32 },
    StunRoll { roll: usize, stunned: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportOutcome {
    /// Slot of the acting support
    pub slot: usize,
    pub id: CardId,
    #[serde(flatten)]
    pub applied: SupportApplied,
}

/// Result of the generic hero action dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HeroActionOutcome {
    Attack(AttackOutcome),
    Heal(HealOutcome),
    Support(SupportOutcome),
}

/// What a summon did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SummonApplied {
    PartyHealed { amount: i32, targets: Vec<HealTarget> },
    NextAttackEmpowered { multiplier: i32 },
    TempHpGranted { slot: usize, amount: i32 },
    EnemyStunned { turns: u32 },
    EnemyDamaged { dmg: i32, enemy_hp: i32 },
    /// Unknown summon whose text carries no heal amount
    NoEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonOutcome {
    pub id: SummonId,
    #[serde(flatten)]
    pub applied: SummonApplied,
}

/// One hero struck by one enemy attack (or sub-attack)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitEvent {
    pub slot: usize,
    pub dmg: i32,
    pub temp_taken: i32,
    pub hp_taken: i32,
    pub remaining_hp: i32,
    pub died: bool,
    pub hero_name: String,
    pub attack_type: AttackType,
    /// 1-based index into the enemy's attack list
    pub attack: usize,
    pub attack_name: String,
    pub missed: bool,
    pub crit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dmg: Option<i32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub protected: bool,
}

impl HitEvent {
    pub fn total_taken(&self) -> i32 {
        self.temp_taken + self.hp_taken
    }
}

/// Ordered record of what happened during an enemy turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EncounterEvent {
    Hit(HitEvent),
    /// Delayed support damage landing after the enemy acted
    EnemyDamage {
        id: CardId,
        slot: usize,
        dmg: i32,
        enemy_hp: i32,
        source_name: String,
    },
    HeroStunned {
        slot: usize,
        turns: u32,
        hero_name: String,
    },
    HeroEnfeebled {
        slot: usize,
        turns: u32,
        hero_name: String,
    },
    HeroBlinded {
        slot: usize,
        turns: u32,
        hero_name: String,
    },
    /// The enemy was stunned and skipped its action
    Stunned { msg: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTurnKind {
    #[serde(rename = "enemyAct")]
    Acted,
    #[serde(rename = "enemyStunned")]
    Stunned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTurn {
    pub did: EnemyTurnKind,
    pub events: Vec<EncounterEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Enemy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_event_shape() {
        let ev = EncounterEvent::Hit(HitEvent {
            slot: 1,
            dmg: 6,
            temp_taken: 0,
            hp_taken: 6,
            remaining_hp: 4,
            died: false,
            hero_name: "Aria".to_string(),
            attack_type: AttackType::Single,
            attack: 1,
            attack_name: "Claw".to_string(),
            missed: false,
            crit: false,
            base_dmg: Some(6),
            protected: false,
        });
        let value = serde_json::to_value(&ev).unwrap();
        similar_asserts::assert_eq!(
            value,
            json!({
                "type": "hit",
                "slot": 1,
                "dmg": 6,
                "tempTaken": 0,
                "hpTaken": 6,
                "remainingHp": 4,
                "died": false,
                "heroName": "Aria",
                "attackType": "single",
                "attack": 1,
                "attackName": "Claw",
                "missed": false,
                "crit": false,
                "baseDmg": 6
            })
        );
    }

    #[test]
    fn test_enemy_damage_shape() {
        let ev = EncounterEvent::EnemyDamage {
            id: CardId::new("lumalia"),
            slot: 2,
            dmg: 6,
            enemy_hp: 14,
            source_name: "Lumalia".to_string(),
        };
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(value["type"], "enemyDamage");
        assert_eq!(value["enemyHp"], 14);
        assert_eq!(value["sourceName"], "Lumalia");
    }

    #[test]
    fn test_turn_kind_names() {
        let turn = EnemyTurn {
            did: EnemyTurnKind::Stunned,
            events: vec![EncounterEvent::Stunned {
                msg: "Enemy stunned and skipped its turn".to_string(),
            }],
        };
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["did"], "enemyStunned");
        assert_eq!(value["events"][0]["type"], "stunned");
    }

    #[test]
    fn test_hero_action_tagging() {
        let out = HeroActionOutcome::Heal(HealOutcome::Single {
            healed: 3,
            slot: 0,
            hp: 9,
        });
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value, json!({"type": "heal", "healed": 3, "slot": 0, "hp": 9}));
    }
}
