//! Skirmish - command-line driver for the encounter engine
//!
//! Runs autopilot encounters against catalog enemies and lists catalog data

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use encounter_engine::{
    core::SummonDefinition,
    game::{
        Autopilot, ChaChaSource, Encounter, EncounterOptions, Formation, GameLogger,
        OutputFormat, PlayerAction, StepReport, VerbosityLevel, Winner,
    },
    hand::Hand,
    loader::Catalog,
    session::{narration, RunLedger},
};
use std::path::PathBuf;

/// Verbosity level for output (accepts names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Turn-based hero encounter engine", long_about = None)]
struct Cli {
    /// Directory holding cards.json, enemies.json and summons.json
    #[arg(long, global = true, default_value = "data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a run of encounters on autopilot
    Simulate {
        /// Enemy ids to face in order
        #[arg(value_name = "ENEMY", required = true)]
        enemies: Vec<String>,

        /// Hero card ids for the starting hand (comma separated)
        #[arg(long, value_delimiter = ',', default_value = "aria,cleric,piter")]
        heroes: Vec<String>,

        /// Summon ids available during the run (comma separated)
        #[arg(long, value_delimiter = ',')]
        summons: Vec<String>,

        /// Random seed for deterministic runs
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// AP restored every round
        #[arg(long, default_value_t = 3)]
        ap: u32,

        /// Formation (1 standard, 2 left stack, 3 line)
        #[arg(long, default_value_t = 1)]
        formation: u8,

        /// Enemy turns before an encounter is abandoned
        #[arg(long, default_value_t = 50)]
        max_turns: u32,

        /// Verbosity level for output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,
    },

    /// List catalog entries
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = Catalog::load_from_dir(&cli.data)
        .with_context(|| format!("loading catalog from {}", cli.data.display()))?;

    match cli.command {
        Commands::Simulate {
            enemies,
            heroes,
            summons,
            seed,
            ap,
            formation,
            max_turns,
            verbosity,
            format,
        } => {
            let mut logger = GameLogger::with_verbosity(verbosity.into());
            logger.set_output_format(format.into());
            let options = EncounterOptions {
                ap_per_turn: ap,
                formation: Formation::from(formation),
            };
            run_simulation(
                &catalog, &enemies, &heroes, &summons, seed, options, max_turns, logger,
            )?
        }
        Commands::List => list_catalog(&catalog),
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_simulation(
    catalog: &Catalog,
    enemies: &[String],
    heroes: &[String],
    summon_ids: &[String],
    seed: u64,
    options: EncounterOptions,
    max_turns: u32,
    mut logger: GameLogger,
) -> anyhow::Result<()> {
    if heroes.is_empty() {
        bail!("at least one hero is required");
    }
    let summons: Vec<SummonDefinition> = summon_ids
        .iter()
        .map(|id| catalog.require_summon(id).cloned())
        .collect::<encounter_engine::Result<_>>()?;

    let mut ledger = RunLedger::new();
    ledger.start_run();

    for (round, enemy_id) in enemies.iter().enumerate() {
        let enemy = catalog.require_enemy(enemy_id)?;
        let mut hand = Hand::new();
        for id in heroes {
            hand.push(catalog.require_card(id)?.clone());
        }

        let round_seed = seed.wrapping_add(round as u64);
        let mut enc = Encounter::start(enemy, hand, ChaChaSource::seed_from_u64(round_seed), options)
            .with_logger(std::mem::take(&mut logger));
        enc.logger.normal(&format!("Next enemy: {}", enc.enemy.name()));

        // Once-per-run summons already spent stay out of this encounter
        let available: Vec<SummonDefinition> = summons
            .iter()
            .filter(|s| !ledger.is_spent_for_run(s))
            .cloned()
            .collect();

        let mut used = Vec::new();
        let result = Autopilot::with_seed(round_seed).run_encounter(
            &mut enc,
            &available,
            max_turns,
            |enc, action, report| {
                if let (PlayerAction::Summon { index, .. }, StepReport::Summoned(_)) = (action, report) {
                    used.push(available[*index].id.clone());
                }
                narrate_step(enc, &available, action, report);
            },
        );
        for id in &used {
            ledger.record_summon(id);
        }

        match result.winner {
            Some(Winner::Player) => ledger.record_victory(&enemy.id),
            Some(Winner::Enemy) => ledger.record_defeat(&enemy.id),
            None => {}
        }
        logger = std::mem::take(&mut enc.logger);
        if result.winner != Some(Winner::Player) {
            break;
        }
    }

    let summary = format!(
        "Run over: {} defeated{}",
        ledger.defeated.len(),
        match &ledger.died_to {
            Some(id) => format!(", fell to {id}"),
            None => String::new(),
        }
    );
    logger.event(VerbosityLevel::Minimal, &ledger, &summary);
    Ok(())
}

/// Narrate one autopilot step through the encounter's logger
fn narrate_step(
    enc: &Encounter<ChaChaSource>,
    summons: &[SummonDefinition],
    action: &PlayerAction,
    report: &StepReport,
) {
    let logger = &enc.logger;
    if !logger.enabled(VerbosityLevel::Normal) {
        return;
    }
    let name_of = |slot: usize| match enc.hero(slot) {
        Some(h) => h.name().to_string(),
        None => format!("Hero {}", slot + 1),
    };
    let enemy = enc.enemy.name();

    let lines = match (action, report) {
        (_, StepReport::Placed(out)) => vec![narration::placed(&name_of(out.slot), out.slot)],
        (PlayerAction::Act { slot, .. }, StepReport::Acted(out)) => {
            vec![narration::hero_action(&name_of(*slot), enemy, out, name_of)]
        }
        (_, StepReport::Defended(out)) => vec![narration::dodging(&name_of(out.slot))],
        (PlayerAction::Summon { index, .. }, StepReport::Summoned(_)) => {
            let name = summons.get(*index).map_or("summon", |s| s.display_name());
            vec![narration::summon_used(name)]
        }
        (_, StepReport::EnemyTurn(turn)) => narration::enemy_turn(enemy, turn),
        _ => Vec::new(),
    };

    if logger.output_format() == OutputFormat::Json {
        logger.event(VerbosityLevel::Normal, report, &lines.join("\n"));
    } else {
        for line in &lines {
            logger.narration(line);
        }
    }

    if matches!(report, StepReport::EnemyTurn(_)) && logger.enabled(VerbosityLevel::Verbose) {
        for slot in enc.occupied_slots() {
            if let Some(hero) = enc.hero(slot) {
                let icons = enc.status_icons(slot);
                logger.verbose(&narration::status_line(hero.name(), hero.hp, &icons));
            }
        }
    }
}

fn list_catalog(catalog: &Catalog) {
    println!("Heroes:");
    for card in catalog.cards() {
        let (_, ability) = card.primary_ability();
        println!(
            "  {:<12} {:<20} hp {:>3}  {}",
            card.id.as_str(),
            card.display_name(),
            card.hp,
            ability.text
        );
    }
    println!("Enemies:");
    for enemy in catalog.enemies() {
        println!(
            "  {:<12} {:<20} hp {:>3}  {} attacks",
            enemy.id.as_str(),
            enemy.name,
            enemy.hp,
            enemy.attacks.len()
        );
    }
    println!("Summons:");
    for summon in catalog.summons() {
        println!(
            "  {:<12} {:<20} {}",
            summon.id.as_str(),
            summon.display_name(),
            summon.restriction.as_deref().unwrap_or("")
        );
    }
}
