//! Enemy definitions and the runtime enemy of an encounter

use crate::core::EnemyId;
use serde::{Deserialize, Serialize};

/// Shape of an enemy attack
///
/// Parsed case-insensitively; anything unrecognised is a single-target attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttackType {
    /// One target chosen by the targeting policy
    #[default]
    Single,
    /// Two independent single-target strikes
    Multi,
    /// Every occupied slot, no hit roll
    Aoe,
}

impl From<String> for AttackType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "aoe" => AttackType::Aoe,
            "multi" => AttackType::Multi,
            _ => AttackType::Single,
        }
    }
}

impl From<AttackType> for String {
    fn from(t: AttackType) -> Self {
        match t {
            AttackType::Single => "single",
            AttackType::Multi => "multi",
            AttackType::Aoe => "aoe",
        }
        .to_string()
    }
}

/// Status imposed on every hero an attack actually damages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttackEffect {
    Stun,
    Enfeeble,
    Blind,
    /// Effects this engine does not model; ignored on resolution
    Other(String),
}

impl From<String> for AttackEffect {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "stun" => AttackEffect::Stun,
            "enfeeble" => AttackEffect::Enfeeble,
            "blind" => AttackEffect::Blind,
            other => AttackEffect::Other(other.to_string()),
        }
    }
}

impl From<AttackEffect> for String {
    fn from(e: AttackEffect) -> Self {
        match e {
            AttackEffect::Stun => "stun".to_string(),
            AttackEffect::Enfeeble => "enfeeble".to_string(),
            AttackEffect::Blind => "blind".to_string(),
            AttackEffect::Other(s) => s,
        }
    }
}

/// One entry of an enemy's attack pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyAttack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "type")]
    pub attack_type: AttackType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmg: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_chance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_chance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<AttackEffect>,
}

impl EnemyAttack {
    pub fn new(name: impl Into<String>, attack_type: AttackType, dmg: i32) -> Self {
        EnemyAttack {
            name: Some(name.into()),
            attack_type,
            dmg: Some(dmg),
            ..Default::default()
        }
    }

    pub fn with_effect(mut self, effect: AttackEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn hit_chance(&self) -> f64 {
        self.hit_chance.unwrap_or(1.0)
    }

    pub fn crit_chance(&self) -> f64 {
        self.crit_chance.unwrap_or(0.0)
    }
}

/// Static enemy record from the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDefinition {
    pub id: EnemyId,

    #[serde(default)]
    pub name: String,

    pub hp: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,

    /// Damage used by attacks that carry no `dmg` of their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,

    #[serde(default)]
    pub attacks: Vec<EnemyAttack>,

    #[serde(default)]
    pub stunned_turns: u32,
}

impl EnemyDefinition {
    pub fn new(id: impl Into<EnemyId>, name: impl Into<String>, hp: i32) -> Self {
        EnemyDefinition {
            id: id.into(),
            name: name.into(),
            hp,
            ..Default::default()
        }
    }

    pub fn with_attack(mut self, attack: EnemyAttack) -> Self {
        self.attacks.push(attack);
        self
    }
}

/// The enemy as it exists inside one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub def: EnemyDefinition,

    /// Current hit points; hero attacks may drive this below zero
    pub hp: i32,

    pub max_hp: i32,

    pub stunned_turns: u32,

    /// Halve the damage of the next attack (set by Brer)
    pub next_attack_halved: bool,
}

impl Enemy {
    /// Runtime copy of a definition, defaulting `max_hp` from `hp`
    pub fn from_definition(def: &EnemyDefinition) -> Self {
        Enemy {
            def: def.clone(),
            hp: def.hp,
            max_hp: def.max_hp.unwrap_or(def.hp),
            stunned_turns: def.stunned_turns,
            next_attack_halved: false,
        }
    }

    pub fn name(&self) -> &str {
        if self.def.name.is_empty() {
            self.def.id.as_str()
        } else {
            &self.def.name
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned_turns > 0
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Apply damage, allowing hit points below zero
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Apply damage, stopping at zero
    pub fn take_damage_clamped(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount).max(0);
    }

    /// Base damage of an attack before halving and crits
    pub fn base_damage(&self, attack: &EnemyAttack) -> i32 {
        attack.dmg.or(self.def.attack).unwrap_or(1)
    }
}
