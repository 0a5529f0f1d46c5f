//! Random autopilot for simulations and baseline play
//!
//! Picks uniformly among the player actions that look legal, retrying with
//! another choice whenever the encounter rejects one, and ends the turn once
//! nothing is left to do.

use crate::core::effects::{is_forced_support, support_effect};
use crate::core::{AbilityKey, ActionType, Restriction, SummonDefinition, SupportEffect};
use crate::error::{ActionError, ActionResult};
use crate::game::actions::Target;
use crate::game::events::{
    DefendOutcome, EnemyTurn, HeroActionOutcome, PlaceOutcome, SummonOutcome, Winner,
};
use crate::game::logger::VerbosityLevel;
use crate::game::rng::RandomSource;
use crate::game::state::Encounter;
use crate::game::targeting::PLAYFIELD_SLOTS;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One move available to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerAction {
    /// Place the card at `hand_index` into an empty slot
    Place { hand_index: usize, slot: usize },
    /// Use an ability of the hero in `slot`
    Act {
        slot: usize,
        ability: Option<usize>,
        target: Option<Target>,
    },
    Defend { slot: usize },
    /// Use the summon at `index` of the available summons
    Summon { index: usize, target: Option<usize> },
    /// Hand over to the enemy
    EndTurn,
}

/// What a successfully performed action produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", content = "result", rename_all = "camelCase")]
pub enum StepReport {
    Placed(PlaceOutcome),
    Acted(HeroActionOutcome),
    Defended(DefendOutcome),
    Summoned(SummonOutcome),
    EnemyTurn(EnemyTurn),
}

/// Outcome of a complete autopilot encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterResult {
    /// `None` when the turn limit was reached first
    pub winner: Option<Winner>,
    /// Enemy turns taken
    pub turns: u32,
    pub enemy_hp: i32,
    pub heroes_lost: usize,
}

impl<R: RandomSource> Encounter<R> {
    /// Carry out one player action
    pub fn perform(
        &mut self,
        action: &PlayerAction,
        summons: &[SummonDefinition],
    ) -> ActionResult<StepReport> {
        match *action {
            PlayerAction::Place { hand_index, slot } => {
                let card = self.hand.get(hand_index).cloned();
                self.place_hero(slot, card).map(StepReport::Placed)
            }
            PlayerAction::Act {
                slot,
                ability,
                target,
            } => self
                .play_hero_action(slot, target, ability)
                .map(StepReport::Acted),
            PlayerAction::Defend { slot } => self.defend_hero(slot).map(StepReport::Defended),
            PlayerAction::Summon { index, target } => {
                let def = summons.get(index).ok_or(ActionError::Invalid)?;
                self.use_summon(def, target).map(StepReport::Summoned)
            }
            PlayerAction::EndTurn => Ok(StepReport::EnemyTurn(self.enemy_act())),
        }
    }

    /// Player actions worth trying in the current state, excluding `EndTurn`
    ///
    /// This is a cheap pre-filter; [`Encounter::perform`] still has the final
    /// word on legality.
    pub fn candidate_actions(&self, summons: &[SummonDefinition]) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        let occupied = self.occupied_slots();

        for slot in (0..PLAYFIELD_SLOTS).filter(|s| !occupied.contains(s)) {
            for hand_index in 0..self.hand.len() {
                actions.push(PlayerAction::Place { hand_index, slot });
            }
        }

        if self.ap > 0 {
            for &slot in &occupied {
                let Some(hero) = self.hero(slot).filter(|h| !h.is_stunned()) else {
                    continue;
                };
                actions.push(PlayerAction::Defend { slot });

                let indices: SmallVec<[Option<usize>; 4]> = if hero.base.abilities.is_empty() {
                    SmallVec::from_elem(None, 1)
                } else {
                    (0..hero.base.abilities.len()).map(Some).collect()
                };
                for ability in indices {
                    let (_, def) = hero.base.select_ability(ability);
                    let action_type = if is_forced_support(&hero.card_id) {
                        ActionType::Support
                    } else {
                        def.resolved_action_type()
                    };

                    let wants_target = match &action_type {
                        t if t.is_damage() => false,
                        t if t.is_heal() => true,
                        ActionType::Support => {
                            let Some(effect) = support_effect(&hero.card_id) else {
                                continue;
                            };
                            if effect.uses_round_gate() && self.support_used.contains(&hero.card_id)
                            {
                                continue;
                            }
                            let key = AbilityKey::new(hero.instance_id, ability);
                            if self.ability_cooldowns.get(&key).is_some_and(|&cd| cd > 0) {
                                continue;
                            }
                            matches!(effect, SupportEffect::Protect { .. })
                                || def.requires_target == Some(true)
                                || def.label().contains("assist")
                        }
                        _ => continue,
                    };

                    if wants_target {
                        for &t in &occupied {
                            actions.push(PlayerAction::Act {
                                slot,
                                ability,
                                target: Some(Target::Slot(t)),
                            });
                        }
                    } else {
                        actions.push(PlayerAction::Act {
                            slot,
                            ability,
                            target: None,
                        });
                    }
                }
            }
        }

        for (index, def) in summons.iter().enumerate() {
            let used = def.restriction() == Restriction::OncePerEncounter
                && self.summon_used.get(&def.id).copied().unwrap_or(false);
            let cooling = self.summon_cooldowns.get(&def.id).is_some_and(|&cd| cd > 0);
            if !used && !cooling {
                actions.push(PlayerAction::Summon {
                    index,
                    target: None,
                });
            }
        }
        actions
    }
}

/// Seeded random player
pub struct Autopilot {
    rng: Box<dyn rand::RngCore>,
    /// Summon indices already used this turn; summons cost no AP
    summoned_this_turn: SmallVec<[usize; 4]>,
}

impl Autopilot {
    /// Autopilot driven by the thread RNG
    pub fn new() -> Self {
        Autopilot {
            rng: Box::new(rand::thread_rng()),
            summoned_this_turn: SmallVec::new(),
        }
    }

    /// Autopilot with a seeded RNG (for deterministic runs)
    pub fn with_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Autopilot {
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
            summoned_this_turn: SmallVec::new(),
        }
    }

    /// Pick one of `available`, or `None` when there is nothing to pick
    pub fn choose_action(&mut self, available: &[PlayerAction]) -> Option<PlayerAction> {
        if available.is_empty() {
            None
        } else {
            let index = self.rng.gen_range(0..available.len());
            Some(available[index].clone())
        }
    }

    /// Play `enc` until someone wins or `max_turns` enemy turns have passed
    ///
    /// `observe` sees every successful step right after it happened.
    pub fn run_encounter<R, F>(
        &mut self,
        enc: &mut Encounter<R>,
        summons: &[SummonDefinition],
        max_turns: u32,
        mut observe: F,
    ) -> EncounterResult
    where
        R: RandomSource,
        F: FnMut(&Encounter<R>, &PlayerAction, &StepReport),
    {
        loop {
            if let Some(winner) = enc.is_finished() {
                return self.finish(enc, Some(winner));
            }
            if enc.turn >= max_turns {
                return self.finish(enc, None);
            }

            self.play_turn(enc, summons, &mut observe);
            if enc.is_finished().is_some() {
                continue;
            }

            let end = PlayerAction::EndTurn;
            if let Ok(report) = enc.perform(&end, summons) {
                observe(enc, &end, &report);
            }
            self.summoned_this_turn.clear();
        }
    }

    fn play_turn<R, F>(&mut self, enc: &mut Encounter<R>, summons: &[SummonDefinition], observe: &mut F)
    where
        R: RandomSource,
        F: FnMut(&Encounter<R>, &PlayerAction, &StepReport),
    {
        let mut rejected: Vec<PlayerAction> = Vec::new();
        while enc.is_finished().is_none() {
            let mut actions = enc.candidate_actions(summons);
            actions.retain(|a| {
                !rejected.contains(a)
                    && !matches!(a, PlayerAction::Summon { index, .. } if self.summoned_this_turn.contains(index))
            });
            let Some(action) = self.choose_action(&actions) else {
                break;
            };

            match enc.perform(&action, summons) {
                Ok(report) => {
                    if let PlayerAction::Summon { index, .. } = action {
                        self.summoned_this_turn.push(index);
                    }
                    if enc.logger.enabled(VerbosityLevel::Verbose) {
                        let text = format!("autopilot: {:?}", action);
                        enc.logger.event(VerbosityLevel::Verbose, &action, &text);
                    }
                    observe(enc, &action, &report);
                    rejected.clear();
                }
                Err(err) => {
                    log_if_verbose!(enc.logger, "autopilot: {:?} rejected ({})", action, err.reason());
                    rejected.push(action);
                }
            }
        }
    }

    fn finish<R: RandomSource>(&self, enc: &Encounter<R>, winner: Option<Winner>) -> EncounterResult {
        let result = EncounterResult {
            winner,
            turns: enc.turn,
            enemy_hp: enc.enemy.hp,
            heroes_lost: enc.exhausted.len(),
        };
        let text = match winner {
            Some(Winner::Player) => format!("{} defeated in {} turns", enc.enemy.name(), enc.turn),
            Some(Winner::Enemy) => format!("Party defeated by {} on turn {}", enc.enemy.name(), enc.turn),
            None => format!("Turn limit reached; {} at {} HP", enc.enemy.name(), enc.enemy.hp),
        };
        enc.logger.event(VerbosityLevel::Minimal, &result, &text);
        result
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}
