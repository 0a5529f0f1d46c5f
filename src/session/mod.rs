//! Presentation adapter around one encounter
//!
//! A [`Session`] turns clicks into encounter calls: it holds the two-step
//! input state, narrates every result, keeps a short message history and
//! updates the [`RunLedger`] when an encounter ends.

pub mod input;
pub mod ledger;
pub mod narration;

pub use input::{action_target_kind, summon_needs_target, AwaitingInput, SlotMode, TargetKind};
pub use ledger::RunLedger;

use crate::core::{EnemyDefinition, EnemyId, SummonDefinition, SummonId};
use crate::error::ActionError;
use crate::game::{
    ChaChaSource, Encounter, EncounterOptions, OutputFormat, RandomSource, Target,
    VerbosityLevel, Winner,
};
use crate::hand::Hand;
use serde::Serialize;
use std::collections::VecDeque;

/// Messages kept in the history
pub const HISTORY_LIMIT: usize = 50;

/// Answer to one player input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Resolved; the narration produced
    Done(Vec<String>),
    /// Waiting for a slot to be picked
    Prompt(String),
    /// Nothing changed
    Rejected(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeRecord<'a> {
    winner: Winner,
    enemy: &'a EnemyId,
    turns: u32,
}

pub struct Session<R: RandomSource = ChaChaSource> {
    pub encounter: Encounter<R>,
    /// Summons available in this run
    pub summons: Vec<SummonDefinition>,
    pub ledger: RunLedger,
    options: EncounterOptions,
    awaiting: AwaitingInput,
    history: VecDeque<String>,
    /// Outcome already written to the ledger
    settled: Option<Winner>,
}

impl<R: RandomSource> Session<R> {
    pub fn new(
        encounter: Encounter<R>,
        summons: Vec<SummonDefinition>,
        ledger: RunLedger,
    ) -> Self {
        let options = EncounterOptions {
            ap_per_turn: encounter.ap_per_turn,
            formation: encounter.formation,
        };
        Session {
            encounter,
            summons,
            ledger,
            options,
            awaiting: AwaitingInput::None,
            history: VecDeque::new(),
            settled: None,
        }
    }

    pub fn awaiting(&self) -> &AwaitingInput {
        &self.awaiting
    }

    /// Most recent message first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn last_message(&self) -> Option<&str> {
        self.history.front().map(String::as_str)
    }

    pub fn outcome(&self) -> Option<Winner> {
        self.settled
    }

    /// One status line per placed hero, in slot order
    pub fn party_status(&self) -> Vec<String> {
        self.encounter
            .occupied_slots()
            .iter()
            .filter_map(|&slot| {
                let hero = self.encounter.hero(slot)?;
                let icons = self.encounter.status_icons(slot);
                Some(narration::status_line(hero.name(), hero.hp, &icons))
            })
            .collect()
    }

    /// Pin a label to the hero in `slot` until it leaves play
    pub fn attach_badge(&mut self, slot: usize, label: &str) -> Response {
        match self.encounter.add_persistent_badge(slot, label) {
            Ok(()) => Response::Done(Vec::new()),
            Err(err) => self.reject(narration::rejection(err)),
        }
    }

    fn hero_name(&self, slot: usize) -> String {
        match self.encounter.hero(slot) {
            Some(h) => h.name().to_string(),
            None => format!("Hero {}", slot + 1),
        }
    }

    fn remember(&mut self, line: String) {
        self.history.push_front(line);
        self.history.truncate(HISTORY_LIMIT);
    }

    /// Narrate `lines`; JSON output gets `record` instead
    fn publish<T: Serialize>(&mut self, record: &T, lines: Vec<String>) -> Response {
        let logger = &self.encounter.logger;
        if logger.output_format() == OutputFormat::Json {
            logger.event(VerbosityLevel::Normal, record, &lines.join("\n"));
        } else {
            for line in &lines {
                logger.narration(line);
            }
        }
        for line in &lines {
            self.remember(line.clone());
        }
        Response::Done(lines)
    }

    fn reject(&mut self, message: String) -> Response {
        self.encounter.logger.narration(&message);
        self.remember(message.clone());
        Response::Rejected(message)
    }

    fn prompt(&mut self, awaiting: AwaitingInput, message: String) -> Response {
        self.awaiting = awaiting;
        self.remember(message.clone());
        Response::Prompt(message)
    }

    /// Write the outcome to the ledger the first time one appears
    fn settle(&mut self, mut response: Response) -> Response {
        if self.settled.is_some() {
            return response;
        }
        let Some(winner) = self.encounter.is_finished() else {
            return response;
        };
        self.settled = Some(winner);
        let enemy = self.encounter.enemy.def.id.clone();
        match winner {
            Winner::Player => self.ledger.record_victory(&enemy),
            Winner::Enemy => self.ledger.record_defeat(&enemy),
        }
        let line = narration::outcome(winner, self.encounter.enemy.name());
        let record = OutcomeRecord {
            winner,
            enemy: &enemy,
            turns: self.encounter.turn,
        };
        self.encounter
            .logger
            .event(VerbosityLevel::Minimal, &record, &line);
        self.remember(line.clone());
        if let Response::Done(lines) = &mut response {
            lines.push(line);
        }
        response
    }

    fn busy(&mut self) -> Option<Response> {
        if self.awaiting.is_pending() {
            Some(self.reject("Finish pending action first".to_string()))
        } else if self.settled.is_some() {
            Some(self.reject("The encounter is over".to_string()))
        } else {
            None
        }
    }

    /// Pick a hand card to place or to swap in; the slot comes next
    pub fn select_hand_card(&mut self, hand_index: usize, mode: SlotMode) -> Response {
        if let Some(r) = self.busy() {
            return r;
        }
        let Some(card) = self.encounter.hand.get(hand_index) else {
            return self.reject("Card not available".to_string());
        };
        let prompt = match mode {
            SlotMode::Place => format!("Click a space to place {}", card.display_name()),
            SlotMode::Replace => format!("Click a space to replace with {}", card.display_name()),
        };
        self.prompt(AwaitingInput::AwaitingSlot { hand_index, mode }, prompt)
    }

    /// Use an ability of the hero in `slot`, or start waiting for its target
    pub fn choose_action(&mut self, slot: usize, ability_index: Option<usize>) -> Response {
        if let Some(r) = self.busy() {
            return r;
        }
        if self.encounter.ap < 1 {
            return self.reject(narration::rejection(ActionError::NoAp));
        }
        let Some(hero) = self.encounter.hero(slot) else {
            return self.reject(narration::rejection(ActionError::NoHero));
        };
        if let Some(kind) = action_target_kind(&hero.base, ability_index) {
            let prompt = match kind {
                TargetKind::Heal => "Click a space to heal",
                TargetKind::Protect => "Click a space to select a target to protect",
                TargetKind::Support => "Click a space to select a target",
            };
            return self.prompt(
                AwaitingInput::AwaitingTarget {
                    source_slot: slot,
                    ability_index,
                    kind,
                },
                prompt.to_string(),
            );
        }
        self.resolve_action(slot, None, ability_index)
    }

    fn resolve_action(
        &mut self,
        slot: usize,
        target: Option<Target>,
        ability_index: Option<usize>,
    ) -> Response {
        let hero = self.hero_name(slot);
        match self.encounter.play_hero_action(slot, target, ability_index) {
            Ok(out) => {
                let line = narration::hero_action(&hero, self.encounter.enemy.name(), &out, |s| {
                    self.hero_name(s)
                });
                let response = self.publish(&out, vec![line]);
                self.settle(response)
            }
            Err(err) => self.reject(narration::rejection(err)),
        }
    }

    pub fn defend(&mut self, slot: usize) -> Response {
        if let Some(r) = self.busy() {
            return r;
        }
        match self.encounter.defend_hero(slot) {
            Ok(out) => {
                let line = narration::dodging(&self.hero_name(slot));
                self.publish(&out, vec![line])
            }
            Err(err) => self.reject(narration::rejection(err)),
        }
    }

    /// Use a summon, or start waiting for the hero it should pick
    pub fn choose_summon(&mut self, id: &SummonId) -> Response {
        if let Some(r) = self.busy() {
            return r;
        }
        let Some(def) = self.summons.iter().find(|s| &s.id == id).cloned() else {
            return self.reject(narration::rejection(ActionError::Invalid));
        };
        if self.ledger.is_spent_for_run(&def) {
            return self.reject(narration::summon_spent_for_run(def.display_name()));
        }
        if summon_needs_target(&def) {
            let prompt = narration::summon_target_prompt(def.display_name());
            return self.prompt(AwaitingInput::AwaitingSummonTarget { summon: def.id }, prompt);
        }
        self.resolve_summon(&def, None)
    }

    fn resolve_summon(&mut self, def: &SummonDefinition, target: Option<usize>) -> Response {
        match self.encounter.use_summon(def, target) {
            Ok(out) => {
                self.ledger.record_summon(&def.id);
                let line = narration::summon_used(def.display_name());
                let response = self.publish(&out, vec![line]);
                self.settle(response)
            }
            Err(err) => self.reject(narration::rejection(err)),
        }
    }

    /// Complete whatever is awaiting a slot
    pub fn select_slot(&mut self, slot: usize) -> Response {
        match self.awaiting.clone() {
            AwaitingInput::None => Response::Done(Vec::new()),
            AwaitingInput::AwaitingTarget {
                source_slot,
                ability_index,
                ..
            } => {
                self.awaiting = AwaitingInput::None;
                self.resolve_action(source_slot, Some(Target::Slot(slot)), ability_index)
            }
            AwaitingInput::AwaitingSummonTarget { summon } => {
                self.awaiting = AwaitingInput::None;
                match self.summons.iter().find(|s| s.id == summon).cloned() {
                    Some(def) => self.resolve_summon(&def, Some(slot)),
                    None => self.reject(narration::rejection(ActionError::Invalid)),
                }
            }
            AwaitingInput::AwaitingSlot {
                hand_index,
                mode: SlotMode::Place,
            } => {
                if self.encounter.hero(slot).is_some() {
                    return self.reject(
                        "Slot is occupied. Choose an empty slot or use Replace.".to_string(),
                    );
                }
                self.awaiting = AwaitingInput::None;
                let card = self.encounter.hand.get(hand_index).cloned();
                let name = card
                    .as_ref()
                    .map(|c| c.display_name().to_string())
                    .unwrap_or_default();
                match self.encounter.place_hero(slot, card) {
                    Ok(out) => {
                        let line = narration::placed(&name, out.slot);
                        self.publish(&out, vec![line])
                    }
                    Err(err) => self.reject(narration::rejection(err)),
                }
            }
            AwaitingInput::AwaitingSlot {
                hand_index,
                mode: SlotMode::Replace,
            } => {
                if self.encounter.hero(slot).is_none() {
                    return self.reject(
                        "Slot is empty. Choose an occupied slot to replace.".to_string(),
                    );
                }
                self.awaiting = AwaitingInput::None;
                if self.encounter.ap < 1 {
                    return self.reject("Not enough AP to replace".to_string());
                }
                let Some(card) = self.encounter.hand.pop_at(hand_index) else {
                    return self.reject("Card not available".to_string());
                };
                let name = card.display_name().to_string();
                match self.encounter.replace_hero(slot, card.clone()) {
                    Ok(out) => {
                        let line = narration::replaced(&name, out.slot);
                        self.publish(&out, vec![line])
                    }
                    Err(err) => {
                        self.encounter.hand.push(card);
                        self.reject(narration::rejection(err))
                    }
                }
            }
        }
    }

    pub fn cancel(&mut self) -> Response {
        if !self.awaiting.is_pending() {
            return Response::Done(Vec::new());
        }
        self.awaiting = AwaitingInput::None;
        let line = "Pending action canceled".to_string();
        self.remember(line.clone());
        Response::Done(vec![line])
    }

    /// Let the enemy act and narrate its turn
    pub fn end_turn(&mut self) -> Response {
        if let Some(r) = self.busy() {
            return r;
        }
        let turn = self.encounter.enemy_act();
        let lines = narration::enemy_turn(self.encounter.enemy.name(), &turn);
        let response = self.publish(&turn, lines);
        self.settle(response)
    }

    /// Move on to the next enemy after a victory, keeping run state
    pub fn next_encounter(&mut self, enemy: &EnemyDefinition, hand: Hand, rng: R) -> Response {
        if self.settled != Some(Winner::Player) {
            return self.reject("Finish pending action first".to_string());
        }
        let logger = std::mem::take(&mut self.encounter.logger);
        self.encounter = Encounter::start(enemy, hand, rng, self.options).with_logger(logger);
        self.awaiting = AwaitingInput::None;
        self.settled = None;
        let line = format!("Next enemy: {}", self.encounter.enemy.name());
        self.encounter.logger.narration(&line);
        self.remember(line.clone());
        Response::Done(vec![line])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ability, ActionType, AttackType, CardDefinition, EnemyAttack};
    use crate::game::ScriptedSource;

    fn session(draws: &[f64]) -> Session<ScriptedSource> {
        let enemy = EnemyDefinition::new("goblin", "Goblin", 20)
            .with_attack(EnemyAttack::new("Stab", AttackType::Single, 3));
        let hand = Hand::from_cards([
            CardDefinition::new("aria", "Aria", 12)
                .with_ability(Ability::new("Deal 5 damage").with_action_type(ActionType::Dps)),
            CardDefinition::new("cleric", "Cleric", 10).with_ability(
                Ability::new("Restore 3 HP to one target").with_action_type(ActionType::Heal),
            ),
        ]);
        let enc = Encounter::start(
            &enemy,
            hand,
            ScriptedSource::new(draws.iter().copied()),
            EncounterOptions::default(),
        );
        let summons = vec![
            SummonDefinition::new("blackrazor", "Blackrazor"),
            SummonDefinition::new("wave", "Wave").with_restriction("once per run"),
        ];
        Session::new(enc, summons, RunLedger::new())
    }

    fn place_both(s: &mut Session<ScriptedSource>) {
        s.select_hand_card(0, SlotMode::Place);
        s.select_slot(0);
        s.select_hand_card(0, SlotMode::Place);
        s.select_slot(1);
    }

    #[test]
    fn test_place_flow() {
        let mut s = session(&[]);
        assert_eq!(
            s.select_hand_card(0, SlotMode::Place),
            Response::Prompt("Click a space to place Aria".to_string())
        );
        assert_eq!(
            s.select_slot(0),
            Response::Done(vec!["Placed Aria in space 1".to_string()])
        );
        assert_eq!(s.encounter.hand.len(), 1);
        assert!(!s.awaiting().is_pending());
    }

    #[test]
    fn test_party_status_shows_badges() {
        let mut s = session(&[]);
        place_both(&mut s);
        s.defend(1);
        assert_eq!(s.attach_badge(0, "veteran"), Response::Done(Vec::new()));
        assert!(matches!(s.attach_badge(2, "veteran"), Response::Rejected(_)));
        assert_eq!(
            s.party_status(),
            vec![
                "Aria 12 HP [veteran]".to_string(),
                "Cleric 10 HP [defending]".to_string(),
            ]
        );
    }

    #[test]
    fn test_occupied_slot_keeps_waiting() {
        let mut s = session(&[]);
        place_both(&mut s);
        s.encounter.hand.push(CardDefinition::new("brer", "Brer", 12));
        s.select_hand_card(0, SlotMode::Place);
        assert!(matches!(s.select_slot(0), Response::Rejected(_)));
        assert!(s.awaiting().is_pending());
        s.cancel();
        assert_eq!(s.last_message(), Some("Pending action canceled"));
    }

    #[test]
    fn test_heal_waits_for_target_without_mutating() {
        let mut s = session(&[]);
        place_both(&mut s);
        s.encounter.hero_mut(0).unwrap().hp = 5;
        let ap = s.encounter.ap;

        assert_eq!(
            s.choose_action(1, None),
            Response::Prompt("Click a space to heal".to_string())
        );
        assert_eq!(s.encounter.ap, ap);
        assert!(matches!(s.end_turn(), Response::Rejected(_)));

        assert_eq!(
            s.select_slot(0),
            Response::Done(vec!["Hero healed 3 HP (now 8)".to_string()])
        );
        assert_eq!(s.encounter.ap, ap - 1);
    }

    #[test]
    fn test_attack_narration_and_victory() {
        let mut s = session(&[0.0, 0.9]);
        place_both(&mut s);
        s.encounter.enemy.hp = 5;
        let response = s.choose_action(0, None);
        assert_eq!(
            response,
            Response::Done(vec![
                "Aria dealt 5 damage. Goblin HP: 0".to_string(),
                "Goblin was defeated".to_string(),
            ])
        );
        assert_eq!(s.outcome(), Some(Winner::Player));
        assert_eq!(s.ledger.defeated, vec![EnemyId::new("goblin")]);
        assert!(matches!(s.choose_action(0, None), Response::Rejected(_)));
    }

    #[test]
    fn test_summon_target_flow() {
        let mut s = session(&[]);
        place_both(&mut s);
        assert_eq!(
            s.choose_summon(&SummonId::new("blackrazor")),
            Response::Prompt("Click a space to target Blackrazor".to_string())
        );
        s.select_slot(1);
        assert_eq!(s.encounter.hero(1).unwrap().temp_hp, 30);
        assert_eq!(s.ledger.summon_usage.get(&SummonId::new("blackrazor")), Some(&1));
    }

    #[test]
    fn test_once_per_run_rejected_from_ledger() {
        let mut s = session(&[]);
        s.ledger.record_summon(&SummonId::new("wave"));
        assert_eq!(
            s.choose_summon(&SummonId::new("wave")),
            Response::Rejected("Summon 'Wave' is only usable once per run".to_string())
        );
        assert_eq!(s.encounter.enemy.hp, 20);
    }

    #[test]
    fn test_replace_returns_old_hero() {
        let mut s = session(&[]);
        s.select_hand_card(0, SlotMode::Place);
        s.select_slot(0);
        s.select_hand_card(0, SlotMode::Replace);
        assert_eq!(
            s.select_slot(0),
            Response::Done(vec!["Replaced space 1 with Cleric".to_string()])
        );
        assert_eq!(s.encounter.hand.len(), 1);
        assert_eq!(s.encounter.hand.get(0).map(|c| c.id.as_str()), Some("aria"));
        assert_eq!(s.encounter.ap, 2);
    }

    #[test]
    fn test_enemy_turn_narration() {
        // attack pick, target, hit, crit
        let mut s = session(&[0.0, 0.0, 0.0, 0.9]);
        place_both(&mut s);
        let Response::Done(lines) = s.end_turn() else {
            panic!("enemy turn rejected");
        };
        assert_eq!(
            lines,
            vec!["Goblin used Stab and hit Aria for 3, remaining HP: 9".to_string()]
        );
        assert_eq!(s.encounter.ap, 3);
    }
}
