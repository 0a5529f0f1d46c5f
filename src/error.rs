//! Error types for the encounter engine
//!
//! Two families live here. [`EncounterError`] covers infrastructure failures
//! (reading catalog files, malformed JSON). [`ActionError`] is the expected,
//! recoverable rejection of a player or summon action; callers branch on it and
//! re-prompt, and the encounter is left untouched whenever one is returned.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncounterError {
    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(String),

    #[error("Unknown catalog entry: {0}")]
    UnknownEntry(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EncounterError>;

/// Rejection of an encounter operation
///
/// The `reason()` codes are the stable contract the presentation layer keys
/// its messages on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionError {
    #[error("not enough action points")]
    NoAp,

    #[error("slot index is outside the playfield")]
    InvalidSlot,

    #[error("slot is already occupied")]
    SlotOccupied,

    #[error("no card supplied")]
    NoCard,

    #[error("no hero in that slot")]
    NoHero,

    #[error("hero is stunned")]
    Stunned,

    #[error("ability is on cooldown")]
    Cooldown,

    #[error("already used this encounter")]
    Used,

    #[error("support already used this round")]
    UsedThisRound,

    #[error("a target must be chosen")]
    TargetRequired,

    #[error("unsupported action type")]
    UnsupportedActionType,

    #[error("hero has no support action")]
    NoSupportAction,

    #[error("no valid target")]
    NoTarget,

    #[error("invalid definition")]
    Invalid,
}

impl ActionError {
    /// Stable reason code for this rejection
    pub fn reason(&self) -> &'static str {
        match self {
            ActionError::NoAp => "no_ap",
            ActionError::InvalidSlot => "invalid_slot",
            ActionError::SlotOccupied => "slot_occupied",
            ActionError::NoCard => "no_card",
            ActionError::NoHero => "no_hero",
            ActionError::Stunned => "stunned",
            ActionError::Cooldown => "cooldown",
            ActionError::Used => "used",
            ActionError::UsedThisRound => "used_this_round",
            ActionError::TargetRequired => "target_required",
            ActionError::UnsupportedActionType => "unsupported_action_type",
            ActionError::NoSupportAction => "no_support_action",
            ActionError::NoTarget => "no_target",
            ActionError::Invalid => "invalid",
        }
    }
}

/// Result of an encounter operation
pub type ActionResult<T> = std::result::Result<T, ActionError>;
