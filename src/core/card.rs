//! Hero card definitions and their abilities

use crate::core::magnitude::last_integer;
use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// How an ability resolves
///
/// Catalog data spells these loosely ("dps"/"attack", "healer"/"heal"); the
/// aliases are kept as distinct variants so a record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Dps,
    Attack,
    Healer,
    Heal,
    Support,
    Other(String),
}

impl ActionType {
    pub fn is_damage(&self) -> bool {
        matches!(self, ActionType::Dps | ActionType::Attack)
    }

    pub fn is_heal(&self) -> bool {
        matches!(self, ActionType::Healer | ActionType::Heal)
    }
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "dps" => ActionType::Dps,
            "attack" => ActionType::Attack,
            "healer" => ActionType::Healer,
            "heal" => ActionType::Heal,
            "support" => ActionType::Support,
            other => ActionType::Other(other.to_string()),
        }
    }
}

impl From<ActionType> for String {
    fn from(t: ActionType) -> Self {
        match t {
            ActionType::Dps => "dps".to_string(),
            ActionType::Attack => "attack".to_string(),
            ActionType::Healer => "healer".to_string(),
            ActionType::Heal => "heal".to_string(),
            ActionType::Support => "support".to_string(),
            ActionType::Other(s) => s,
        }
    }
}

/// Explicit target scope of an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionTarget {
    /// Affects every occupied slot
    Party,
    Single,
    #[serde(other)]
    Unspecified,
}

/// One ability on a hero card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    /// Short name ("Rally", "Assist")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Descriptive text; its last integer literal is the legacy magnitude
    #[serde(default, rename = "ability")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_chance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_chance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_target: Option<ActionTarget>,

    /// Default ability when a card has several
    #[serde(default)]
    pub primary: bool,

    /// Structured magnitude, preferred over the number in `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<i32>,

    /// Whether the presentation layer must collect a target before resolving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_target: Option<bool>,
}

impl Ability {
    pub fn new(text: impl Into<String>) -> Self {
        Ability {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_action_type(mut self, action_type: ActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Damage or heal magnitude
    pub fn magnitude(&self) -> i32 {
        self.magnitude.unwrap_or_else(|| last_integer(&self.text))
    }

    /// Accuracy, defaulting to a sure hit
    pub fn hit_chance(&self) -> f64 {
        self.hit_chance.unwrap_or(1.0)
    }

    pub fn crit_chance(&self) -> f64 {
        self.crit_chance.unwrap_or(0.0)
    }

    /// Lowercased name, or text when the ability is unnamed
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.to_lowercase(),
            None => self.text.to_lowercase(),
        }
    }

    /// Action type from the explicit field, else inferred from the text
    pub fn resolved_action_type(&self) -> ActionType {
        if let Some(t) = &self.action_type {
            return t.clone();
        }
        let text = self.text.to_lowercase();
        if ["heal", "cure", "restore", "regen"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            ActionType::Healer
        } else {
            ActionType::Dps
        }
    }
}

/// A hero card definition
///
/// Cards with an `abilities` list use it; older records describe their single
/// ability through top-level fields, which deserialize into `legacy`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    pub id: CardId,

    #[serde(default)]
    pub name: String,

    /// Hit points the hero enters play with
    pub hp: i32,

    /// Maximum hit points when `hp` is a damaged snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,

    #[serde(flatten)]
    pub legacy: Ability,
}

impl CardDefinition {
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, hp: i32) -> Self {
        CardDefinition {
            id: id.into(),
            name: name.into(),
            hp,
            ..Default::default()
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Upper bound for this hero's hit points
    pub fn max_hp(&self) -> i32 {
        self.max_hp.unwrap_or(self.hp)
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }

    /// The default ability and its index in `abilities`
    pub fn primary_ability(&self) -> (Option<usize>, &Ability) {
        if self.abilities.is_empty() {
            return (None, &self.legacy);
        }
        let idx = self
            .abilities
            .iter()
            .position(|a| a.primary)
            .unwrap_or(0);
        (Some(idx), &self.abilities[idx])
    }

    /// The ability at `index` if it exists, else the primary
    pub fn select_ability(&self, index: Option<usize>) -> (Option<usize>, &Ability) {
        match index.and_then(|i| self.abilities.get(i).map(|a| (i, a))) {
            Some((i, ability)) => (Some(i), ability),
            None => self.primary_ability(),
        }
    }

    /// Whether heals from this card reach the whole party by declaration
    pub fn targets_party(&self) -> bool {
        self.legacy.action_target == Some(ActionTarget::Party)
    }

    /// Copy of this card to return to hand, keeping damage taken
    pub fn snapshot_with_hp(&self, hp: i32) -> Self {
        CardDefinition {
            hp,
            max_hp: Some(self.max_hp()),
            ..self.clone()
        }
    }
}
