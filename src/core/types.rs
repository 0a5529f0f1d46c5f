//! Strongly-typed identifiers for encounter concepts
//!
//! Catalog records are keyed by short string ids ("piter", "volo", "goblin").
//! Wrapping them keeps a hero id from being passed where a summon id is
//! expected, and gives the bookkeeping maps on the encounter typed keys.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_id!(
    /// Hero card definition id (e.g. "piter", "scout")
    CardId
);

string_id!(
    /// Summon definition id (e.g. "volo", "blackrazor")
    SummonId
);

string_id!(
    /// Enemy definition id
    EnemyId
);

/// Unique id of one placement of a hero on the playfield
///
/// Assigned from a per-encounter counter starting at 1. Replacing a hero, or
/// placing the same card again after it was returned to hand, yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HeroInstanceId(u32);

impl HeroInstanceId {
    pub fn new(id: u32) -> Self {
        HeroInstanceId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HeroInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Cooldown key for one ability of one placed hero
///
/// `ability` is the index into the card's ability list, or `None` for a card
/// that only carries legacy top-level ability fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityKey {
    pub hero: HeroInstanceId,
    pub ability: Option<usize>,
}

impl AbilityKey {
    pub fn new(hero: HeroInstanceId, ability: Option<usize>) -> Self {
        AbilityKey { hero, ability }
    }
}

impl fmt::Display for AbilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ability {
            Some(idx) => write!(f, "{}:ability{}", self.hero, idx),
            None => write!(f, "{}:abilityprimary", self.hero),
        }
    }
}
