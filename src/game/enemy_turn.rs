//! The enemy's turn
//!
//! Order: hero conditions tick down, the enemy either skips (stunned) or picks
//! one attack uniformly at random and resolves it, attack effects land on the
//! heroes that were actually hurt, then end-of-round housekeeping runs.

use crate::core::{AttackEffect, AttackType, EnemyAttack};
use crate::game::events::{EncounterEvent, EnemyTurn, EnemyTurnKind, HitEvent};
use crate::game::rng::RandomSource;
use crate::game::state::{Encounter, Trigger};
use crate::game::targeting::{select_single_target, PLAYFIELD_SLOTS};

/// Identifies the attack being resolved, for event records
struct AttackLabel<'a> {
    attack_type: AttackType,
    /// 1-based position in the enemy's attack list
    number: usize,
    name: &'a str,
}

impl<R: RandomSource> Encounter<R> {
    /// Run one enemy turn and the end-of-round housekeeping
    pub fn enemy_act(&mut self) -> EnemyTurn {
        self.turn += 1;
        for hero in self.playfield.iter_mut().flatten() {
            hero.tick_conditions();
        }

        if self.enemy.is_stunned() {
            self.enemy.stunned_turns -= 1;
            log_if_verbose!(
                self.logger,
                "{} is stunned ({} turns left)",
                self.enemy.name(),
                self.enemy.stunned_turns
            );
            let mut events = vec![EncounterEvent::Stunned {
                msg: "Enemy stunned and skipped its turn".to_string(),
            }];
            self.end_of_round(&mut events);
            return EnemyTurn {
                did: EnemyTurnKind::Stunned,
                events,
            };
        }

        let mut events = Vec::new();
        if !self.enemy.def.attacks.is_empty() {
            let index = self.rng.draw_int(self.enemy.def.attacks.len());
            let attack = self.enemy.def.attacks[index].clone();
            self.resolve_enemy_attack(index, &attack, &mut events);
        }
        self.end_of_round(&mut events);
        EnemyTurn {
            did: EnemyTurnKind::Acted,
            events,
        }
    }

    fn resolve_enemy_attack(
        &mut self,
        index: usize,
        attack: &EnemyAttack,
        events: &mut Vec<EncounterEvent>,
    ) {
        let fallback_name = format!("Attack {}", index + 1);
        let label = AttackLabel {
            attack_type: attack.attack_type,
            number: index + 1,
            name: attack.name.as_deref().unwrap_or(&fallback_name),
        };

        let mut base = self.enemy.base_damage(attack);
        if self.enemy.next_attack_halved {
            base = base.saturating_add(1).div_euclid(2);
            self.enemy.next_attack_halved = false;
        }
        log_if_verbose!(
            self.logger,
            "{} uses {} ({:?}, {} damage)",
            self.enemy.name(),
            label.name,
            label.attack_type,
            base
        );

        let first_new = events.len();
        match attack.attack_type {
            AttackType::Aoe => {
                for slot in 0..PLAYFIELD_SLOTS {
                    if !self.formation.aoe_reaches(slot) || self.playfield[slot].is_none() {
                        continue;
                    }
                    if let Some(ev) = self.strike(slot, base, true, &label) {
                        events.push(EncounterEvent::Hit(ev));
                    }
                }
            }
            AttackType::Multi => {
                for _ in 0..2 {
                    if self.rng.draw() >= attack.hit_chance() {
                        if let Some(slot) = self.pick_target() {
                            events.push(EncounterEvent::Hit(self.miss_event(slot, &label)));
                        }
                        continue;
                    }
                    let crit = self.rng.draw() < attack.crit_chance();
                    let dmg = if crit { base.saturating_mul(2) } else { base };
                    if let Some(slot) = self.pick_target() {
                        if let Some(mut ev) = self.strike(slot, dmg, false, &label) {
                            ev.crit = crit;
                            ev.base_dmg = Some(base);
                            events.push(EncounterEvent::Hit(ev));
                        }
                    }
                }
            }
            AttackType::Single => {
                let Some(slot) = self.pick_target() else {
                    return;
                };
                let defending = self.hero(slot).is_some_and(|h| h.defending);
                let hit = if defending {
                    self.rng.draw() >= 0.5
                } else {
                    self.rng.draw() < attack.hit_chance()
                };
                if !hit {
                    events.push(EncounterEvent::Hit(self.miss_event(slot, &label)));
                } else {
                    let crit = self.rng.draw() < attack.crit_chance();
                    let dmg = if crit { base.saturating_mul(2) } else { base };
                    if let Some(mut ev) = self.strike(slot, dmg, false, &label) {
                        ev.crit = crit;
                        ev.base_dmg = Some(base);
                        events.push(EncounterEvent::Hit(ev));
                    }
                }
            }
        }

        if let Some(effect) = &attack.effect {
            self.apply_attack_effect(effect, first_new, events);
        }
    }

    fn pick_target(&mut self) -> Option<usize> {
        select_single_target(&self.playfield, self.formation, &mut self.rng)
    }

    fn miss_event(&self, slot: usize, label: &AttackLabel<'_>) -> HitEvent {
        let (hp, name) = self
            .hero(slot)
            .map(|h| (h.hp, h.name().to_string()))
            .unwrap_or_default();
        HitEvent {
            slot,
            dmg: 0,
            temp_taken: 0,
            hp_taken: 0,
            remaining_hp: hp,
            died: false,
            hero_name: name,
            attack_type: label.attack_type,
            attack: label.number,
            attack_name: label.name.to_string(),
            missed: true,
            crit: false,
            base_dmg: None,
            protected: false,
        }
    }

    /// Apply `dmg` to the hero in `slot`: protection blocks it, area damage is
    /// halved (rounded up) against defenders, temp HP absorbs first
    fn strike(
        &mut self,
        slot: usize,
        dmg: i32,
        area: bool,
        label: &AttackLabel<'_>,
    ) -> Option<HitEvent> {
        let hero = self.hero_mut(slot)?;
        let name = hero.name().to_string();
        let mut ev = HitEvent {
            slot,
            dmg,
            temp_taken: 0,
            hp_taken: 0,
            remaining_hp: hero.hp,
            died: false,
            hero_name: name,
            attack_type: label.attack_type,
            attack: label.number,
            attack_name: label.name.to_string(),
            missed: false,
            crit: false,
            base_dmg: None,
            protected: false,
        };

        if hero.is_protected() {
            ev.dmg = 0;
            ev.protected = true;
            return Some(ev);
        }

        let incoming = if area && hero.defending {
            dmg.saturating_add(1).div_euclid(2)
        } else {
            dmg
        };
        let taken = hero.take_damage(incoming);
        ev.temp_taken = taken.temp_taken;
        ev.hp_taken = taken.hp_taken;
        ev.remaining_hp = hero.hp;

        if self.remove_if_dead(slot) {
            ev.died = true;
            ev.remaining_hp = 0;
        }
        Some(ev)
    }

    /// Impose the attack's status on every surviving hero it actually hurt
    fn apply_attack_effect(
        &mut self,
        effect: &AttackEffect,
        first_new: usize,
        events: &mut Vec<EncounterEvent>,
    ) {
        let hurt: Vec<usize> = events[first_new..]
            .iter()
            .filter_map(|ev| match ev {
                EncounterEvent::Hit(hit) if !hit.missed && hit.total_taken() > 0 => Some(hit.slot),
                _ => None,
            })
            .collect();

        for slot in hurt {
            let Some(hero) = self.hero_mut(slot) else {
                continue;
            };
            let hero_name = hero.name().to_string();
            let ev = match effect {
                AttackEffect::Stun => {
                    hero.stunned_turns = hero.stunned_turns.max(1);
                    EncounterEvent::HeroStunned {
                        slot,
                        turns: 1,
                        hero_name,
                    }
                }
                AttackEffect::Enfeeble => {
                    hero.enfeebled_turns = hero.enfeebled_turns.max(1);
                    EncounterEvent::HeroEnfeebled {
                        slot,
                        turns: 1,
                        hero_name,
                    }
                }
                AttackEffect::Blind => {
                    hero.blinded_turns = hero.blinded_turns.max(1);
                    EncounterEvent::HeroBlinded {
                        slot,
                        turns: 1,
                        hero_name,
                    }
                }
                AttackEffect::Other(_) => continue,
            };
            events.push(ev);
        }
    }

    /// Housekeeping shared by both branches of the enemy turn
    fn end_of_round(&mut self, events: &mut Vec<EncounterEvent>) {
        self.ap = self.ap_per_turn;
        for cd in self.summon_cooldowns.values_mut() {
            *cd = cd.saturating_sub(1);
        }
        for cd in self.ability_cooldowns.values_mut() {
            *cd = cd.saturating_sub(1);
        }
        for hero in self.playfield.iter_mut().flatten() {
            hero.clear_round_flags();
        }

        let pending = std::mem::take(&mut self.pending_effects);
        for mut effect in pending {
            if effect.trigger != Trigger::AfterEnemy {
                self.pending_effects.push(effect);
                continue;
            }
            self.enemy.take_damage_clamped(effect.dmg);
            let source_name = self
                .hero(effect.slot)
                .filter(|h| h.card_id == effect.id)
                .map(|h| h.name().to_string())
                .unwrap_or_else(|| effect.id.to_string());
            events.push(EncounterEvent::EnemyDamage {
                id: effect.id.clone(),
                slot: effect.slot,
                dmg: effect.dmg,
                enemy_hp: self.enemy.hp,
                source_name,
            });
            if let Some(times) = effect.times.filter(|&t| t > 1) {
                effect.times = Some(times - 1);
                self.pending_effects.push(effect);
            }
        }

        for hero in self.playfield.iter_mut().flatten() {
            hero.tick_protection();
        }
        self.support_used.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, CardId, EnemyDefinition, Protection, SummonId};
    use crate::game::rng::ScriptedSource;
    use crate::game::state::{EncounterOptions, PendingEffect};
    use crate::game::targeting::Formation;
    use crate::hand::Hand;

    fn enemy_with(attack: EnemyAttack) -> EnemyDefinition {
        EnemyDefinition::new("troll", "Troll", 40).with_attack(attack)
    }

    fn encounter(enemy: EnemyDefinition, draws: &[f64]) -> Encounter<ScriptedSource> {
        Encounter::start(
            &enemy,
            Hand::new(),
            ScriptedSource::new(draws.iter().copied()),
            EncounterOptions::default(),
        )
    }

    fn hero(id: &str, hp: i32) -> Option<CardDefinition> {
        Some(CardDefinition::new(id, id, hp))
    }

    fn hits(turn: &EnemyTurn) -> Vec<&HitEvent> {
        turn.events
            .iter()
            .filter_map(|e| match e {
                EncounterEvent::Hit(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_hit_scenario() {
        // attack pick, target pick among front line, hit roll, crit roll
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Club", AttackType::Single, 6)),
            &[0.0, 0.0, 0.0, 0.9],
        );
        enc.place_hero(0, hero("aria", 20)).unwrap();
        enc.hero_mut(0).unwrap().hp = 10;

        let turn = enc.enemy_act();
        assert_eq!(turn.did, EnemyTurnKind::Acted);
        let h = hits(&turn);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].hp_taken, 6);
        assert_eq!(h[0].remaining_hp, 4);
        assert!(!h[0].died);
        assert_eq!(h[0].attack, 1);
        assert_eq!(h[0].attack_name, "Club");
    }

    #[test]
    fn test_huge_crit_saturates() {
        let attack = EnemyAttack {
            crit_chance: Some(1.0),
            ..EnemyAttack::new("Meteor", AttackType::Single, i32::MAX)
        };
        let mut enc = encounter(enemy_with(attack), &[0.0, 0.0, 0.0, 0.0]);
        enc.place_hero(0, hero("aria", 20)).unwrap();

        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert!(h[0].crit);
        assert_eq!(h[0].dmg, i32::MAX);
        assert!(h[0].died);
        assert!(enc.hero(0).is_none());
    }

    #[test]
    fn test_huge_halved_area_against_defender() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Quake", AttackType::Aoe, i32::MAX)),
            &[0.0],
        );
        enc.place_hero(0, hero("aria", 20)).unwrap();
        enc.hero_mut(0).unwrap().defending = true;
        enc.enemy.next_attack_halved = true;

        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert_eq!(h[0].hp_taken, i32::MAX / 2 / 2 + 1);
        assert!(h[0].died);
    }

    #[test]
    fn test_temp_hp_absorbs_before_hp() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Club", AttackType::Single, 15)),
            &[0.0, 0.0, 0.0, 0.9],
        );
        enc.place_hero(0, hero("aria", 20)).unwrap();
        enc.hero_mut(0).unwrap().temp_hp = 10;
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert_eq!(h[0].temp_taken, 10);
        assert_eq!(h[0].hp_taken, 5);
        let aria = enc.hero(0).unwrap();
        assert_eq!((aria.temp_hp, aria.hp), (0, 15));
    }

    #[test]
    fn test_death_removes_hero_once() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Crush", AttackType::Aoe, 12)),
            &[0.0],
        );
        enc.place_hero(0, hero("aria", 10)).unwrap();
        enc.place_hero(2, hero("brer", 20)).unwrap();
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert_eq!(h.len(), 2);
        assert!(h[0].died);
        assert_eq!(h[0].remaining_hp, 0);
        assert!(enc.hero(0).is_none());
        assert_eq!(enc.exhausted.len(), 1);
        assert_eq!(enc.exhausted[0].id, CardId::new("aria"));
        assert_eq!(enc.hero(2).map(|h| h.hp), Some(8));
    }

    #[test]
    fn test_aoe_skips_back_slot_in_line_formation() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Quake", AttackType::Aoe, 3)),
            &[0.0],
        );
        enc.formation = Formation::Line;
        enc.place_hero(0, hero("aria", 10)).unwrap();
        enc.place_hero(2, hero("brer", 10)).unwrap();
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert_eq!(h.len(), 1);
        assert!(h.iter().all(|ev| ev.slot != 2));
        assert_eq!(enc.hero(2).map(|h| h.hp), Some(10));
    }

    #[test]
    fn test_aoe_halves_for_defenders() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Quake", AttackType::Aoe, 5)),
            &[0.0],
        );
        enc.place_hero(1, hero("aria", 10)).unwrap();
        enc.defend_hero(1).unwrap();
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert_eq!(h[0].dmg, 5);
        assert_eq!(h[0].hp_taken, 3);
        assert!(!enc.hero(1).unwrap().defending);
    }

    #[test]
    fn test_protected_hero_takes_nothing() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Quake", AttackType::Aoe, 5)),
            &[0.0],
        );
        enc.place_hero(1, hero("aria", 10)).unwrap();
        enc.hero_mut(1).unwrap().protected = Some(Protection {
            turns: 1,
            source: CardId::new("willis"),
        });
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert!(h[0].protected);
        assert_eq!(h[0].dmg, 0);
        assert_eq!(enc.hero(1).unwrap().hp, 10);
        assert!(enc.hero(1).unwrap().protected.is_none());
    }

    #[test]
    fn test_defending_target_dodges_on_low_roll() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Club", AttackType::Single, 6)),
            &[0.0, 0.0, 0.3],
        );
        enc.place_hero(0, hero("aria", 10)).unwrap();
        enc.defend_hero(0).unwrap();
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert!(h[0].missed);
        assert_eq!(enc.hero(0).unwrap().hp, 10);
    }

    #[test]
    fn test_halved_attack_rounds_up() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Club", AttackType::Single, 7)),
            &[0.0, 0.0, 0.0, 0.9],
        );
        enc.place_hero(0, hero("aria", 10)).unwrap();
        enc.enemy.next_attack_halved = true;
        let turn = enc.enemy_act();
        assert_eq!(hits(&turn)[0].hp_taken, 4);
        assert!(!enc.enemy.next_attack_halved);
    }

    #[test]
    fn test_multi_crit_and_miss() {
        let atk = EnemyAttack {
            hit_chance: Some(0.5),
            crit_chance: Some(0.5),
            ..EnemyAttack::new("Flurry", AttackType::Multi, 3)
        };
        // pick attack; strike 1: hit, crit, target; strike 2: miss, target
        let mut enc = encounter(enemy_with(atk), &[0.0, 0.1, 0.1, 0.0, 0.9, 0.0]);
        enc.place_hero(0, hero("aria", 20)).unwrap();
        let turn = enc.enemy_act();
        let h = hits(&turn);
        assert_eq!(h.len(), 2);
        assert!(h[0].crit);
        assert_eq!(h[0].hp_taken, 6);
        assert_eq!(h[0].base_dmg, Some(3));
        assert_eq!(h[0].attack_type, AttackType::Multi);
        assert!(h[1].missed);
        assert_eq!(h[1].remaining_hp, 14);
    }

    #[test]
    fn test_effect_lands_only_on_hurt_heroes() {
        let atk = EnemyAttack::new("Spores", AttackType::Aoe, 2).with_effect(AttackEffect::Blind);
        let mut enc = encounter(enemy_with(atk), &[0.0]);
        enc.place_hero(0, hero("aria", 10)).unwrap();
        enc.place_hero(1, hero("brer", 10)).unwrap();
        enc.hero_mut(1).unwrap().protected = Some(Protection {
            turns: 1,
            source: CardId::new("willis"),
        });
        let turn = enc.enemy_act();
        let blinded: Vec<usize> = turn
            .events
            .iter()
            .filter_map(|e| match e {
                EncounterEvent::HeroBlinded { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(blinded, vec![0]);
        assert_eq!(enc.hero(0).unwrap().blinded_turns, 1);
        assert_eq!(enc.hero(1).unwrap().blinded_turns, 0);
    }

    #[test]
    fn test_stunned_enemy_skips_and_resets() {
        let mut enc = encounter(
            enemy_with(EnemyAttack::new("Club", AttackType::Single, 6)),
            &[],
        );
        enc.enemy.stunned_turns = 1;
        enc.ap = 0;
        let turn = enc.enemy_act();
        assert_eq!(turn.did, EnemyTurnKind::Stunned);
        assert!(matches!(turn.events[0], EncounterEvent::Stunned { .. }));
        assert_eq!(enc.enemy.stunned_turns, 0);
        assert_eq!(enc.ap, 3);
        assert_eq!(enc.turn, 1);
    }

    #[test]
    fn test_pending_damage_fires_and_repeats() {
        let mut enc = encounter(EnemyDefinition::new("troll", "Troll", 40), &[]);
        enc.place_hero(0, hero("miley", 10)).unwrap();
        enc.pending_effects.push(PendingEffect {
            id: CardId::new("miley"),
            slot: 0,
            dmg: 8,
            trigger: Trigger::AfterEnemy,
            times: Some(2),
        });

        let turn = enc.enemy_act();
        assert_eq!(
            turn.events,
            vec![EncounterEvent::EnemyDamage {
                id: CardId::new("miley"),
                slot: 0,
                dmg: 8,
                enemy_hp: 32,
                source_name: "miley".to_string(),
            }]
        );
        assert_eq!(enc.pending_effects[0].times, Some(1));

        enc.enemy_act();
        assert_eq!(enc.enemy.hp, 24);
        assert!(enc.pending_effects.is_empty());

        enc.enemy_act();
        assert_eq!(enc.enemy.hp, 24);
    }

    #[test]
    fn test_cooldowns_tick_and_support_gate_resets() {
        let mut enc = encounter(EnemyDefinition::new("troll", "Troll", 40), &[]);
        enc.summon_cooldowns.insert(SummonId::from("volo"), 2);
        enc.support_used.insert(CardId::new("brer"));
        enc.enemy_act();
        assert_eq!(enc.summon_cooldowns.get(&SummonId::from("volo")), Some(&1));
        assert!(enc.support_used.is_empty());
    }

    #[test]
    fn test_hero_conditions_tick_first() {
        let atk = EnemyAttack::new("Jab", AttackType::Single, 1).with_effect(AttackEffect::Stun);
        let mut enc = encounter(enemy_with(atk), &[0.0, 0.0, 0.0, 0.9]);
        enc.place_hero(0, hero("aria", 10)).unwrap();
        enc.hero_mut(0).unwrap().enfeebled_turns = 1;
        let turn = enc.enemy_act();
        let aria = enc.hero(0).unwrap();
        assert_eq!(aria.enfeebled_turns, 0);
        assert_eq!(aria.stunned_turns, 1);
        assert!(matches!(
            turn.events.last(),
            Some(EncounterEvent::HeroStunned { slot: 0, turns: 1, .. })
        ));
    }
}
