//! Player-facing messages for action results and enemy-turn events

use crate::core::StatusIcon;
use crate::error::ActionError;
use crate::game::{
    AttackOutcome, EncounterEvent, EnemyTurn, EnemyTurnKind, HealOutcome, HeroActionOutcome,
    HitEvent, Winner,
};

fn turns_suffix(turns: u32) -> &'static str {
    if turns > 1 {
        "s"
    } else {
        ""
    }
}

/// Name for a hero-bearing event, falling back to its space number
fn event_name(name: &str, slot: usize) -> String {
    if name.is_empty() {
        format!("space {}", slot + 1)
    } else {
        name.to_string()
    }
}

pub fn attack(hero: &str, enemy: &str, out: &AttackOutcome) -> String {
    if out.missed {
        format!("{hero} missed {enemy}")
    } else if out.crit {
        format!(
            "{hero} critically hit {enemy} for {} damage. {enemy} HP: {}",
            out.dmg, out.enemy_hp
        )
    } else {
        format!("{hero} dealt {} damage. {enemy} HP: {}", out.dmg, out.enemy_hp)
    }
}

/// `name_of` resolves the display name of the hero in a slot
pub fn heal(out: &HealOutcome, name_of: impl Fn(usize) -> String) -> String {
    match out {
        HealOutcome::Single { healed, hp, .. } => format!("Hero healed {healed} HP (now {hp})"),
        HealOutcome::Party { healed, targets } if targets.is_empty() => {
            format!("Healed {healed} HP")
        }
        HealOutcome::Party { healed, targets } => {
            let parts: Vec<String> = targets
                .iter()
                .map(|t| format!("{}: {}", name_of(t.slot), t.hp))
                .collect();
            format!("Healed {healed} HP to party: {}", parts.join(", "))
        }
    }
}

pub fn hero_action(
    hero: &str,
    enemy: &str,
    out: &HeroActionOutcome,
    name_of: impl Fn(usize) -> String,
) -> String {
    match out {
        HeroActionOutcome::Attack(a) => attack(hero, enemy, a),
        HeroActionOutcome::Heal(h) => heal(h, name_of),
        HeroActionOutcome::Support(_) => "Support ability used".to_string(),
    }
}

pub fn placed(name: &str, slot: usize) -> String {
    format!("Placed {name} in space {}", slot + 1)
}

pub fn replaced(name: &str, slot: usize) -> String {
    format!("Replaced space {} with {name}", slot + 1)
}

pub fn dodging(hero: &str) -> String {
    format!("{hero} is dodging")
}

pub fn summon_used(name: &str) -> String {
    format!("Summon: {name} used")
}

pub fn summon_spent_for_run(name: &str) -> String {
    format!("Summon '{name}' is only usable once per run")
}

pub fn summon_target_prompt(name: &str) -> String {
    format!("Click a space to target {name}")
}

pub fn rejection(err: ActionError) -> String {
    match err {
        ActionError::NoAp => "Not enough AP".to_string(),
        other => other.reason().to_string(),
    }
}

fn hit(enemy: &str, ev: &HitEvent) -> String {
    let name = event_name(&ev.hero_name, ev.slot);
    let total = ev.total_taken();
    let prefix = if ev.attack_name.is_empty() {
        format!("{enemy} ")
    } else {
        format!("{enemy} used {} and ", ev.attack_name)
    };
    let verb = if ev.crit { "critically hit" } else { "hit" };

    if ev.missed {
        format!("{prefix}missed {name}")
    } else if ev.died {
        format!("{prefix}{verb} {name} for {total} and killed it")
    } else if total == 0 {
        format!("{prefix}attacked {name} but dealt no damage")
    } else {
        format!("{prefix}{verb} {name} for {total}, remaining HP: {}", ev.remaining_hp)
    }
}

/// One line for an enemy-turn event
pub fn enemy_event(enemy: &str, ev: &EncounterEvent) -> String {
    match ev {
        EncounterEvent::Stunned { .. } => format!("{enemy} stunned and skipped its turn"),
        EncounterEvent::EnemyDamage {
            dmg,
            enemy_hp,
            source_name,
            ..
        } => format!("{source_name} dealt {dmg} damage to {enemy}. HP: {enemy_hp}"),
        EncounterEvent::Hit(h) => hit(enemy, h),
        EncounterEvent::HeroStunned {
            slot,
            turns,
            hero_name,
        } => format!(
            "{} stunned for {turns} turn{}.",
            event_name(hero_name, *slot),
            turns_suffix(*turns)
        ),
        EncounterEvent::HeroEnfeebled {
            slot,
            turns,
            hero_name,
        } => format!(
            "{} enfeebled: physical attacks deal half damage for {turns} turn{}.",
            event_name(hero_name, *slot),
            turns_suffix(*turns)
        ),
        EncounterEvent::HeroBlinded {
            slot,
            turns,
            hero_name,
        } => format!(
            "{} blinded: 50% miss chance for {turns} turn{}.",
            event_name(hero_name, *slot),
            turns_suffix(*turns)
        ),
    }
}

/// Every line for an enemy turn; never empty
pub fn enemy_turn(enemy: &str, turn: &EnemyTurn) -> Vec<String> {
    let lines: Vec<String> = turn.events.iter().map(|ev| enemy_event(enemy, ev)).collect();
    if !lines.is_empty() {
        return lines;
    }
    match turn.did {
        EnemyTurnKind::Stunned => vec![format!("{enemy} stunned and skipped its turn")],
        EnemyTurnKind::Acted => vec![format!("{enemy} could not attack (no targets)")],
    }
}

/// Short label for one status badge
pub fn badge(icon: &StatusIcon) -> String {
    match icon {
        StatusIcon::Defend => "defending".to_string(),
        StatusIcon::Help => "drawing attacks".to_string(),
        StatusIcon::Assist { amount } => format!("+{:.0}% hit", amount * 100.0),
        StatusIcon::Protected { turns } => format!("protected {turns}t"),
        StatusIcon::Stunned { turns } => format!("stunned {turns}t"),
        StatusIcon::Enfeebled { turns } => format!("enfeebled {turns}t"),
        StatusIcon::Blind { turns } => format!("blinded {turns}t"),
        StatusIcon::PendingDamage { dmg, .. } => format!("{dmg} damage pending"),
        StatusIcon::Persistent { label } => label.clone(),
    }
}

/// "Aria 10 HP [defending, stunned 1t]", or no brackets without badges
pub fn status_line(name: &str, hp: i32, icons: &[StatusIcon]) -> String {
    if icons.is_empty() {
        return format!("{name} {hp} HP");
    }
    let badges: Vec<String> = icons.iter().map(badge).collect();
    format!("{name} {hp} HP [{}]", badges.join(", "))
}

pub fn outcome(winner: Winner, enemy: &str) -> String {
    match winner {
        Winner::Player => format!("{enemy} was defeated"),
        Winner::Enemy => format!("The party fell to {enemy}"),
    }
}
