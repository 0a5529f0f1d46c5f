//! Summons: free, encounter-wide effects gated by restrictions and cooldowns

use crate::core::effects::summon_effect;
use crate::core::magnitude::first_integer;
use crate::core::{Restriction, SummonDefinition, SummonEffect};
use crate::error::{ActionError, ActionResult};
use crate::game::events::{SummonApplied, SummonOutcome};
use crate::game::rng::RandomSource;
use crate::game::state::Encounter;

/// Cooldown that keeps a once-only summon locked for the rest of the encounter
pub const LOCKED_COOLDOWN: u32 = 9999;

impl<R: RandomSource> Encounter<R> {
    /// Use a summon; costs no AP
    ///
    /// `target` only matters for summons that pick a hero (Blackrazor).
    pub fn use_summon(
        &mut self,
        def: &SummonDefinition,
        target: Option<usize>,
    ) -> ActionResult<SummonOutcome> {
        if def.id.is_empty() {
            return Err(ActionError::Invalid);
        }
        let restriction = def.restriction();
        if restriction == Restriction::OncePerEncounter
            && self.summon_used.get(&def.id).copied().unwrap_or(false)
        {
            return Err(ActionError::Used);
        }
        if self.summon_cooldowns.get(&def.id).is_some_and(|&cd| cd > 0) {
            return Err(ActionError::Cooldown);
        }

        let applied = match summon_effect(&def.id) {
            Some(effect) => self.apply_summon_effect(effect, target)?,
            None => match first_integer(&def.ability).filter(|&v| v > 0) {
                Some(amount) => SummonApplied::PartyHealed {
                    amount,
                    targets: self.heal_party(amount),
                },
                None => SummonApplied::NoEffect,
            },
        };
        log_if_verbose!(self.logger, "Summon {} resolved: {:?}", def.display_name(), applied);

        match restriction {
            Restriction::OncePerEncounter | Restriction::OncePerRun => {
                self.summon_used.insert(def.id.clone(), true);
                self.summon_cooldowns.insert(def.id.clone(), LOCKED_COOLDOWN);
            }
            Restriction::None => {
                if let Some(cd) = def.cooldown.filter(|&cd| cd > 0) {
                    self.summon_cooldowns.insert(def.id.clone(), cd);
                }
            }
        }

        Ok(SummonOutcome {
            id: def.id.clone(),
            applied,
        })
    }

    fn apply_summon_effect(
        &mut self,
        effect: SummonEffect,
        target: Option<usize>,
    ) -> ActionResult<SummonApplied> {
        Ok(match effect {
            SummonEffect::PartyHeal { amount } => SummonApplied::PartyHealed {
                amount,
                targets: self.heal_party(amount),
            },
            SummonEffect::EmpowerNextAttack { multiplier } => {
                self.next_attack_multiplier = multiplier;
                SummonApplied::NextAttackEmpowered { multiplier }
            }
            SummonEffect::TempHp { amount } => {
                let slot = target
                    .filter(|&s| self.hero(s).is_some())
                    .or_else(|| self.weakest_hero())
                    .ok_or(ActionError::NoTarget)?;
                let hero = self.hero_mut(slot).ok_or(ActionError::NoTarget)?;
                hero.temp_hp = hero.temp_hp.saturating_add(amount);
                SummonApplied::TempHpGranted { slot, amount }
            }
            SummonEffect::StunEnemy { turns } => {
                self.enemy.stunned_turns = self.enemy.stunned_turns.max(turns);
                SummonApplied::EnemyStunned { turns }
            }
            SummonEffect::MaxHpStrike { percent } => {
                let dmg = self.enemy.max_hp.saturating_mul(percent) / 100;
                self.enemy.take_damage_clamped(dmg);
                SummonApplied::EnemyDamaged {
                    dmg,
                    enemy_hp: self.enemy.hp,
                }
            }
        })
    }

    /// Slot of the hero with the least HP; ties go to the later slot
    fn weakest_hero(&self) -> Option<usize> {
        self.playfield
            .iter()
            .enumerate()
            .filter_map(|(slot, h)| h.as_ref().map(|h| (slot, h.hp)))
            .reduce(|a, b| if a.1 < b.1 { a } else { b })
            .map(|(slot, _)| slot)
    }
}
