//! Player actions: placement, defending, attacks, heals and the action dispatcher
//!
//! Every operation validates before it mutates; an `Err` leaves the encounter
//! exactly as it was.

use crate::core::effects::is_forced_support;
use crate::core::{Ability, ActionTarget, ActionType, CardDefinition};
use crate::error::{ActionError, ActionResult};
use crate::game::events::{
    AttackOutcome, DefendOutcome, HealOutcome, HeroActionOutcome, PlaceOutcome,
};
use crate::game::rng::RandomSource;
use crate::game::state::Encounter;
use crate::game::targeting::PLAYFIELD_SLOTS;
use serde::{Deserialize, Serialize};

/// Target of a hero action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Slot(usize),
    /// Every occupied slot (heals only)
    All,
}

impl Target {
    pub fn slot(self) -> Option<usize> {
        match self {
            Target::Slot(s) => Some(s),
            Target::All => None,
        }
    }
}

impl From<usize> for Target {
    fn from(slot: usize) -> Self {
        Target::Slot(slot)
    }
}

const PARTY_WORDS: [&str; 4] = ["all", "party", "everyone", "entire"];

/// Whether a heal from `card` using `ability` reaches the whole party
fn is_party_heal(card: &CardDefinition, ability: &Ability, target: Option<Target>) -> bool {
    if target == Some(Target::All) {
        return true;
    }
    let text = ability.text.to_lowercase();
    PARTY_WORDS.iter().any(|w| text.contains(w))
        || ability.action_target == Some(ActionTarget::Party)
        || card.targets_party()
}

impl<R: RandomSource> Encounter<R> {
    /// Place `card` into an empty slot at no AP cost
    ///
    /// One matching card is removed from the hand if the hand holds it.
    pub fn place_hero(
        &mut self,
        slot: usize,
        card: Option<CardDefinition>,
    ) -> ActionResult<PlaceOutcome> {
        let card = card.ok_or(ActionError::NoCard)?;
        if slot >= PLAYFIELD_SLOTS {
            return Err(ActionError::InvalidSlot);
        }
        if self.playfield[slot].is_some() {
            return Err(ActionError::SlotOccupied);
        }

        self.hand.remove_first(&card.id);
        self.install(slot, card);
        Ok(PlaceOutcome {
            slot,
            returned: None,
        })
    }

    /// Swap the hero in `slot` for `card`
    ///
    /// Replacing into an empty slot is free and leaves the hand alone (the
    /// caller already took the card out). Replacing an occupied slot costs 1 AP
    /// and returns the outgoing hero to the hand with its current HP.
    pub fn replace_hero(&mut self, slot: usize, card: CardDefinition) -> ActionResult<PlaceOutcome> {
        if slot >= PLAYFIELD_SLOTS {
            return Err(ActionError::InvalidSlot);
        }
        let Some(old) = self.playfield[slot].take() else {
            self.install(slot, card);
            return Ok(PlaceOutcome {
                slot,
                returned: None,
            });
        };
        if self.ap == 0 {
            self.playfield[slot] = Some(old);
            return Err(ActionError::NoAp);
        }

        log_if_verbose!(
            self.logger,
            "{} returns to hand with {} HP",
            old.name(),
            old.hp
        );
        let returned = old.card_id.clone();
        self.forget_cooldowns(old.instance_id);
        self.hand.push(old.base.snapshot_with_hp(old.hp));
        self.install(slot, card);
        self.spend_ap();
        Ok(PlaceOutcome {
            slot,
            returned: Some(returned),
        })
    }

    /// Put the hero in `slot` into its dodge stance until the enemy acts
    pub fn defend_hero(&mut self, slot: usize) -> ActionResult<DefendOutcome> {
        self.require_ap()?;
        self.ready_hero(slot)?;

        if let Some(hero) = self.hero_mut(slot) {
            hero.defending = true;
        }
        self.spend_ap();
        log_if_verbose!(self.logger, "slot {} defends", slot);
        Ok(DefendOutcome { slot })
    }

    /// Attack the enemy with the hero in `slot`
    ///
    /// AP is spent and the attack multiplier consumed whether or not it hits.
    pub fn play_hero_attack(
        &mut self,
        slot: usize,
        ability_index: Option<usize>,
    ) -> ActionResult<AttackOutcome> {
        self.require_ap()?;
        let hero = self.ready_hero(slot)?;

        let (_, ability) = hero.base.select_ability(ability_index);
        let base_dmg = ability.magnitude();
        let mut hit_chance = ability.hit_chance();
        if hero.hit_bonus > 0.0 {
            hit_chance = (hit_chance + hero.hit_bonus).min(1.0);
        }
        if hero.blinded_turns > 0 {
            hit_chance *= 0.5;
        }
        let crit_chance = ability.crit_chance();
        let enfeebled = hero.enfeebled_turns > 0;
        let multiplier = self.next_attack_multiplier;

        self.spend_ap();
        self.next_attack_multiplier = 1;

        if self.rng.draw() >= hit_chance {
            log_if_verbose!(self.logger, "slot {} misses (chance {:.2})", slot, hit_chance);
            return Ok(AttackOutcome {
                dmg: 0,
                enemy_hp: self.enemy.hp,
                crit: false,
                base_dmg,
                missed: true,
            });
        }

        let crit = self.rng.draw() < crit_chance;
        let mut dmg = base_dmg
            .saturating_mul(multiplier)
            .saturating_mul(if crit { 2 } else { 1 });
        if enfeebled {
            dmg /= 2;
        }
        self.enemy.take_damage(dmg);
        log_if_verbose!(
            self.logger,
            "slot {} hits for {} (base {}, x{}{}), enemy at {}",
            slot,
            dmg,
            base_dmg,
            multiplier,
            if crit { ", crit" } else { "" },
            self.enemy.hp
        );

        Ok(AttackOutcome {
            dmg,
            enemy_hp: self.enemy.hp,
            crit,
            base_dmg,
            missed: false,
        })
    }

    /// Resolve whatever the chosen ability of the hero in `slot` does
    ///
    /// The action type comes from the ability's `actionType`, else from its
    /// text (heal words make it a heal), else it is an attack. A few heroes
    /// always act as supports.
    pub fn play_hero_action(
        &mut self,
        slot: usize,
        target: Option<Target>,
        ability_index: Option<usize>,
    ) -> ActionResult<HeroActionOutcome> {
        self.require_ap()?;
        let hero = self.ready_hero(slot)?;

        let (_, ability) = hero.base.select_ability(ability_index);
        let mut action_type = ability.resolved_action_type();
        if is_forced_support(&hero.card_id) {
            action_type = ActionType::Support;
        }
        let amount = ability.magnitude();

        match action_type {
            t if t.is_damage() => self
                .play_hero_attack(slot, ability_index)
                .map(HeroActionOutcome::Attack),
            t if t.is_heal() => self
                .heal_with_ability(slot, ability_index, amount, target)
                .map(HeroActionOutcome::Heal),
            ActionType::Support => self
                .play_support(slot, target.and_then(Target::slot), ability_index)
                .map(HeroActionOutcome::Support),
            _ => Err(ActionError::UnsupportedActionType),
        }
    }

    /// Heal using the primary ability of the hero in `slot`
    pub fn resolve_heal(
        &mut self,
        slot: usize,
        amount: i32,
        target: Option<Target>,
    ) -> ActionResult<HealOutcome> {
        self.heal_with_ability(slot, None, amount, target)
    }

    pub(crate) fn heal_with_ability(
        &mut self,
        slot: usize,
        ability_index: Option<usize>,
        amount: i32,
        target: Option<Target>,
    ) -> ActionResult<HealOutcome> {
        let hero = self.hero(slot).ok_or(ActionError::NoHero)?;
        self.require_ap()?;

        let (_, ability) = hero.base.select_ability(ability_index);
        let party = is_party_heal(&hero.base, ability, target);
        let amount = if amount <= 0 { 1 } else { amount };

        if party {
            let targets = self.heal_party(amount);
            self.spend_ap();
            log_if_verbose!(
                self.logger,
                "slot {} heals the party for {} ({} gained HP)",
                slot,
                amount,
                targets.len()
            );
            return Ok(HealOutcome::Party {
                healed: amount,
                targets,
            });
        }

        let target_slot = match target.and_then(Target::slot) {
            Some(t) if self.hero(t).is_some() => t,
            _ => slot,
        };
        let (healed, hp) = match self.hero_mut(target_slot) {
            Some(h) => (h.heal(amount), h.hp),
            None => return Err(ActionError::NoHero),
        };
        self.spend_ap();
        log_if_verbose!(
            self.logger,
            "slot {} heals slot {} for {} (now {})",
            slot,
            target_slot,
            healed,
            hp
        );
        Ok(HealOutcome::Single {
            healed,
            slot: target_slot,
            hp,
        })
    }
}
