//! Support hero effects
//!
//! Each support is looked up in the effect table by hero id and resolved by
//! its [`SupportEffect`] variant. Every support costs 1 AP except Rally, which
//! grants one instead.

use crate::core::effects::support_effect;
use crate::core::{AbilityKey, Protection, SummonId, SupportEffect};
use crate::error::{ActionError, ActionResult};
use crate::game::events::{SupportApplied, SupportOutcome};
use crate::game::rng::RandomSource;
use crate::game::state::{Encounter, PendingEffect, Trigger};

/// Which of the two tactics a Tactics support ability performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tactic {
    Rally,
    Assist,
}

fn tactic_for(label: &str) -> Option<Tactic> {
    if label.contains("rally") {
        Some(Tactic::Rally)
    } else if label.contains("assist") {
        Some(Tactic::Assist)
    } else if label.is_empty() {
        Some(Tactic::Rally)
    } else {
        None
    }
}

impl<R: RandomSource> Encounter<R> {
    /// Resolve the support ability of the hero in `slot`
    ///
    /// Callers go through [`Encounter::play_hero_action`], which has already
    /// checked AP and the stun state.
    pub(crate) fn play_support(
        &mut self,
        slot: usize,
        target: Option<usize>,
        ability_index: Option<usize>,
    ) -> ActionResult<SupportOutcome> {
        let hero = self.ready_hero(slot)?;
        let id = hero.card_id.clone();
        let effect = support_effect(&id).ok_or(ActionError::NoSupportAction)?;

        if effect.uses_round_gate() && self.support_used.contains(&id) {
            return Err(ActionError::UsedThisRound);
        }

        let applied = match effect {
            SupportEffect::RefreshSummon { summon } => {
                let summon = SummonId::new(summon);
                self.summon_used.insert(summon.clone(), false);
                self.summon_cooldowns.insert(summon.clone(), 0);
                SupportApplied::SummonRefreshed { summon }
            }
            SupportEffect::MarkHelped => {
                if let Some(h) = self.hero_mut(slot) {
                    h.helped = true;
                }
                SupportApplied::Helped { slot }
            }
            SupportEffect::DelayedDamage { dmg } => {
                self.pending_effects.push(PendingEffect {
                    id: id.clone(),
                    slot,
                    dmg,
                    trigger: Trigger::AfterEnemy,
                    times: None,
                });
                SupportApplied::DamageScheduled { dmg }
            }
            SupportEffect::Tactics {
                ap_granted,
                rally_cooldown,
                assist_bonus_pct,
            } => {
                // Tactics pay their own AP and are not round-gated
                return self.play_tactic(
                    slot,
                    target,
                    ability_index,
                    ap_granted,
                    rally_cooldown,
                    f64::from(assist_bonus_pct) / 100.0,
                );
            }
            SupportEffect::Protect { turns } => {
                let t = self.occupied_target(target)?;
                if let Some(h) = self.hero_mut(t) {
                    h.protected = Some(Protection {
                        turns,
                        source: id.clone(),
                    });
                }
                SupportApplied::Protected { target: t, turns }
            }
            SupportEffect::Weaken { dmg } => {
                self.enemy.take_damage_clamped(dmg);
                self.enemy.next_attack_halved = true;
                SupportApplied::Weakened {
                    dmg,
                    enemy_hp: self.enemy.hp,
                }
            }
            SupportEffect::Barrage { dmg, times } => {
                self.enemy.take_damage_clamped(dmg);
                self.pending_effects.push(PendingEffect {
                    id: id.clone(),
                    slot,
                    dmg,
                    trigger: Trigger::AfterEnemy,
                    times: Some(times),
                });
                SupportApplied::Barrage {
                    dmg,
                    enemy_hp: self.enemy.hp,
                    times,
                }
            }
            SupportEffect::StunChance { one_in, turns } => {
                let roll = self.rng.draw_int(one_in) + 1;
                let stunned = roll == 1;
                if stunned {
                    self.enemy.stunned_turns = turns;
                }
                SupportApplied::StunRoll { roll, stunned }
            }
        };

        self.spend_ap();
        self.support_used.insert(id.clone());
        log_if_verbose!(self.logger, "support {} from slot {}: {:?}", id, slot, applied);
        Ok(SupportOutcome { slot, id, applied })
    }

    fn occupied_target(&self, target: Option<usize>) -> ActionResult<usize> {
        match target {
            Some(t) if self.hero(t).is_some() => Ok(t),
            _ => Err(ActionError::TargetRequired),
        }
    }

    /// Rally (+AP, cooldown) or Assist (+hit chance to an ally)
    fn play_tactic(
        &mut self,
        slot: usize,
        target: Option<usize>,
        ability_index: Option<usize>,
        ap_granted: u32,
        rally_cooldown: u32,
        assist_bonus: f64,
    ) -> ActionResult<SupportOutcome> {
        let hero = self.ready_hero(slot)?;
        let id = hero.card_id.clone();
        let (index, ability) = hero.base.select_ability(ability_index);
        let tactic = tactic_for(&ability.label()).ok_or(ActionError::NoSupportAction)?;
        let data_cooldown = if ability.label().is_empty() {
            None
        } else {
            ability.cooldown
        };
        let key = AbilityKey::new(hero.instance_id, index);

        if self.ability_cooldowns.get(&key).is_some_and(|&cd| cd > 0) {
            return Err(ActionError::Cooldown);
        }

        let applied = match tactic {
            Tactic::Rally => {
                let cooldown = data_cooldown.unwrap_or(rally_cooldown);
                self.ap += ap_granted;
                self.ability_cooldowns.insert(key, cooldown);
                SupportApplied::Rally {
                    ap_granted,
                    cooldown,
                    ability_key: key,
                }
            }
            Tactic::Assist => {
                let t = self.occupied_target(target)?;
                if let Some(h) = self.hero_mut(t) {
                    h.hit_bonus += assist_bonus;
                }
                self.spend_ap();
                if let Some(cd) = data_cooldown.filter(|&cd| cd > 0) {
                    self.ability_cooldowns.insert(key, cd);
                }
                SupportApplied::Assist {
                    target: t,
                    bonus: assist_bonus,
                    ability_key: key,
                }
            }
        };

        self.support_used.insert(id.clone());
        log_if_verbose!(self.logger, "tactic {:?} by {} ({})", tactic, id, key);
        Ok(SupportOutcome { slot, id, applied })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ability, ActionType, CardDefinition, EnemyDefinition};
    use crate::game::actions::Target;
    use crate::game::events::HeroActionOutcome;
    use crate::game::rng::ScriptedSource;
    use crate::game::state::EncounterOptions;
    use crate::hand::Hand;

    fn support(id: &str) -> CardDefinition {
        CardDefinition::new(id, id, 10)
            .with_ability(Ability::new("Support").with_action_type(ActionType::Support))
    }

    fn scout() -> CardDefinition {
        CardDefinition::new("scout", "Scout", 8)
            .with_ability(
                Ability::new("Gain 1 AP")
                    .with_name("Rally")
                    .with_action_type(ActionType::Support),
            )
            .with_ability(
                Ability::new("Help an ally land a blow")
                    .with_name("Assist")
                    .with_action_type(ActionType::Support),
            )
    }

    fn encounter(draws: &[f64]) -> Encounter<ScriptedSource> {
        Encounter::start(
            &EnemyDefinition::new("ogre", "Ogre", 30),
            Hand::new(),
            ScriptedSource::new(draws.iter().copied()),
            EncounterOptions::default(),
        )
    }

    fn applied(out: HeroActionOutcome) -> SupportApplied {
        match out {
            HeroActionOutcome::Support(s) => s.applied,
            other => panic!("expected support, got {:?}", other),
        }
    }

    #[test]
    fn test_brer_weakens() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(support("brer"))).unwrap();
        let out = applied(enc.play_hero_action(0, None, None).unwrap());
        assert_eq!(out, SupportApplied::Weakened { dmg: 5, enemy_hp: 25 });
        assert!(enc.enemy.next_attack_halved);
        assert_eq!(enc.ap, 2);
        assert_eq!(
            enc.play_hero_action(0, None, None),
            Err(ActionError::UsedThisRound)
        );
        assert_eq!(enc.ap, 2);
    }

    #[test]
    fn test_support_damage_clamps_at_zero() {
        let mut enc = encounter(&[]);
        enc.enemy.hp = 3;
        enc.place_hero(0, Some(support("bjurganmyr"))).unwrap();
        let out = applied(enc.play_hero_action(0, None, None).unwrap());
        assert_eq!(
            out,
            SupportApplied::Barrage {
                dmg: 8,
                enemy_hp: 0,
                times: 2
            }
        );
        assert_eq!(enc.pending_effects[0].times, Some(2));
    }

    #[test]
    fn test_forced_support_ignores_ability_type() {
        let miley = CardDefinition::new("miley", "Miley", 10)
            .with_ability(Ability::new("Blast for 3").with_action_type(ActionType::Dps));
        let mut enc = encounter(&[]);
        enc.place_hero(1, Some(miley)).unwrap();
        let out = applied(enc.play_hero_action(1, None, None).unwrap());
        assert!(matches!(out, SupportApplied::Barrage { dmg: 8, .. }));
    }

    #[test]
    fn test_willis_needs_target() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(support("willis"))).unwrap();
        assert_eq!(
            enc.play_hero_action(0, None, None),
            Err(ActionError::TargetRequired)
        );
        assert_eq!(
            enc.play_hero_action(0, Some(Target::Slot(2)), None),
            Err(ActionError::TargetRequired)
        );
        assert_eq!(enc.ap, 3);

        let out = applied(enc.play_hero_action(0, Some(Target::Slot(0)), None).unwrap());
        assert_eq!(out, SupportApplied::Protected { target: 0, turns: 1 });
        assert!(enc.hero(0).is_some_and(|h| h.is_protected()));
    }

    #[test]
    fn test_shalendra_refreshes_volo() {
        let mut enc = encounter(&[]);
        let volo = SummonId::new("volo");
        enc.summon_used.insert(volo.clone(), true);
        enc.summon_cooldowns.insert(volo.clone(), 9999);
        enc.place_hero(0, Some(support("shalendra"))).unwrap();
        enc.play_hero_action(0, None, None).unwrap();
        assert_eq!(enc.summon_used.get(&volo), Some(&false));
        assert_eq!(enc.summon_cooldowns.get(&volo), Some(&0));
    }

    #[test]
    fn test_piter_and_lumalia() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(support("piter"))).unwrap();
        enc.place_hero(2, Some(support("lumalia"))).unwrap();
        enc.play_hero_action(0, None, None).unwrap();
        assert!(enc.hero(0).is_some_and(|h| h.helped));

        let out = applied(enc.play_hero_action(2, None, None).unwrap());
        assert_eq!(out, SupportApplied::DamageScheduled { dmg: 6 });
        assert_eq!(enc.pending_effects.len(), 1);
        assert_eq!(enc.pending_effects[0].slot, 2);
        assert_eq!(enc.ap, 1);
    }

    #[test]
    fn test_kiefer_roll() {
        // draw_int(4) of 0.1 is 0, so the roll is 1
        let mut enc = encounter(&[0.1]);
        enc.place_hero(0, Some(support("kiefer"))).unwrap();
        let out = applied(enc.play_hero_action(0, None, None).unwrap());
        assert_eq!(out, SupportApplied::StunRoll { roll: 1, stunned: true });
        assert_eq!(enc.enemy.stunned_turns, 3);

        let mut enc = encounter(&[0.9]);
        enc.place_hero(0, Some(support("kiefer"))).unwrap();
        let out = applied(enc.play_hero_action(0, None, None).unwrap());
        assert_eq!(out, SupportApplied::StunRoll { roll: 4, stunned: false });
        assert_eq!(enc.enemy.stunned_turns, 0);
        assert_eq!(enc.ap, 2);
    }

    #[test]
    fn test_unknown_support() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(support("nobody"))).unwrap();
        assert_eq!(
            enc.play_hero_action(0, None, None),
            Err(ActionError::NoSupportAction)
        );
    }

    #[test]
    fn test_rally_grants_ap_and_cools_down() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(scout())).unwrap();
        let out = applied(enc.play_hero_action(0, None, Some(0)).unwrap());
        match out {
            SupportApplied::Rally {
                ap_granted,
                cooldown,
                ability_key,
            } => {
                assert_eq!(ap_granted, 1);
                assert_eq!(cooldown, 3);
                assert_eq!(ability_key.to_string(), "h1:ability0");
            }
            other => panic!("expected rally, got {:?}", other),
        }
        assert_eq!(enc.ap, 4);
        assert_eq!(
            enc.play_hero_action(0, None, Some(0)),
            Err(ActionError::Cooldown)
        );
    }

    #[test]
    fn test_cooldowns_leave_with_the_hero() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(scout())).unwrap();
        enc.place_hero(1, Some(scout())).unwrap();
        enc.play_hero_action(0, None, Some(0)).unwrap();
        enc.play_hero_action(1, None, Some(0)).unwrap();
        assert_eq!(enc.ability_cooldowns.len(), 2);

        enc.replace_hero(0, support("piter")).unwrap();
        assert_eq!(enc.ability_cooldowns.len(), 1);

        if let Some(h) = enc.hero_mut(1) {
            h.take_damage(8);
        }
        assert!(enc.remove_if_dead(1));
        assert!(enc.ability_cooldowns.is_empty());

        // A fresh copy of the hero starts with its tactics ready
        enc.replace_hero(1, scout()).unwrap();
        assert!(enc.play_hero_action(1, None, Some(0)).is_ok());
    }

    #[test]
    fn test_assist_buffs_target() {
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(scout())).unwrap();
        enc.place_hero(1, Some(support("brer"))).unwrap();
        assert_eq!(
            enc.play_hero_action(0, None, Some(1)),
            Err(ActionError::TargetRequired)
        );
        let out = applied(enc.play_hero_action(0, Some(Target::Slot(1)), Some(1)).unwrap());
        assert!(matches!(out, SupportApplied::Assist { target: 1, .. }));
        assert!(enc.hero(1).is_some_and(|h| (h.hit_bonus - 0.2).abs() < 1e-9));
        assert_eq!(enc.ap, 2);

        // Scout is not round-gated: Rally still works after Assist
        enc.play_hero_action(0, None, Some(0)).unwrap();
        assert_eq!(enc.ap, 3);
    }

    #[test]
    fn test_rally_data_cooldown() {
        let scout = CardDefinition::new("scout", "Scout", 8).with_ability(Ability {
            cooldown: Some(5),
            ..Ability::new("Gain AP")
                .with_name("Rally")
                .with_action_type(ActionType::Support)
        });
        let mut enc = encounter(&[]);
        enc.place_hero(0, Some(scout)).unwrap();
        enc.play_hero_action(0, None, None).unwrap();
        let key = AbilityKey::new(enc.hero(0).unwrap().instance_id, Some(0));
        assert_eq!(enc.ability_cooldowns.get(&key), Some(&5));
    }
}
