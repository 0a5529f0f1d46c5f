//! Encounter state machine, logging, random sources and the autopilot

/// Log at Verbose level, skipping the `format!` when nobody will read it
///
/// Compiles to nothing without the `verbose-logging` feature.
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            if $logger.enabled($crate::game::VerbosityLevel::Verbose) {
                $logger.verbose(&format!($($arg)*));
            }
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod actions;
pub mod autopilot;
pub mod enemy_turn;
pub mod events;
pub mod logger;
pub mod rng;
pub mod state;
pub mod summon;
pub mod support;
pub mod targeting;

pub use actions::Target;
pub use autopilot::{Autopilot, EncounterResult, PlayerAction, StepReport};
pub use events::{
    AttackOutcome, DefendOutcome, EncounterEvent, EnemyTurn, EnemyTurnKind, HealOutcome,
    HealTarget, HeroActionOutcome, HitEvent, PlaceOutcome, SummonApplied, SummonOutcome,
    SupportApplied, SupportOutcome, Winner,
};
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use rng::{ChaChaSource, RandomSource, ScriptedSource};
pub use state::{Encounter, EncounterOptions, PendingEffect, Trigger, DEFAULT_AP_PER_TURN};
pub use summon::LOCKED_COOLDOWN;
pub use targeting::{select_single_target, Formation, Playfield, PLAYFIELD_SLOTS};
