//! Two-step input protocol
//!
//! Some choices need a second click before anything can be resolved: a heal
//! aimed at one ally, Willis' protection, a summon that picks a hero, or a
//! card waiting for the slot it goes into. The awaited step is held here, out
//! of the encounter, so the encounter only ever sees fully resolved calls.

use crate::core::effects::is_forced_support;
use crate::core::{ActionType, CardDefinition, SummonDefinition, SummonId};
use serde::{Deserialize, Serialize};

/// What a pending target will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    Heal,
    /// Support abilities aimed at an ally (e.g. Scout's Assist)
    Support,
    /// Willis' protection
    Protect,
}

/// Whether a hand card goes into an empty slot or swaps out a placed hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotMode {
    Place,
    Replace,
}

/// The step the session is waiting for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "awaiting", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AwaitingInput {
    #[default]
    None,
    AwaitingTarget {
        source_slot: usize,
        ability_index: Option<usize>,
        kind: TargetKind,
    },
    AwaitingSlot {
        hand_index: usize,
        mode: SlotMode,
    },
    AwaitingSummonTarget {
        summon: SummonId,
    },
}

impl AwaitingInput {
    pub fn is_pending(&self) -> bool {
        !matches!(self, AwaitingInput::None)
    }
}

const SUPPORT_TARGET_WORDS: [&str; 5] = ["target", "select", "ally", "assist", "click a space"];
const HEAL_TARGET_WORDS: [&str; 4] = ["one creature", "target", "other", "ally"];
const HEAL_WORDS: [&str; 4] = ["heal", "cure", "restore", "regen"];

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Whether using the chosen ability of `card` must wait for a target
pub fn action_target_kind(card: &CardDefinition, ability_index: Option<usize>) -> Option<TargetKind> {
    let (_, ability) = card.select_ability(ability_index);
    let action_type = if is_forced_support(&card.id) {
        ActionType::Support
    } else {
        ability.resolved_action_type()
    };
    let text = if ability.text.is_empty() {
        ability.name.as_deref().unwrap_or_default().to_lowercase()
    } else {
        ability.text.to_lowercase()
    };

    if action_type == ActionType::Support {
        if card.id == *"willis" {
            return Some(TargetKind::Protect);
        }
        let needs = match ability.requires_target {
            Some(flag) => flag,
            None => mentions(&text, &SUPPORT_TARGET_WORDS),
        };
        return needs.then_some(TargetKind::Support);
    }

    let is_heal = action_type.is_heal() || mentions(&text, &HEAL_WORDS);
    (is_heal && mentions(&text, &HEAL_TARGET_WORDS)).then_some(TargetKind::Heal)
}

/// Whether a summon must wait for a hero to be picked
pub fn summon_needs_target(def: &SummonDefinition) -> bool {
    def.requires_target == Some(true)
        || def.ability.to_lowercase().contains("target")
        || def.id == *"blackrazor"
}
