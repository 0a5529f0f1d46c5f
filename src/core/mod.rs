//! Core encounter records and identifiers

pub mod card;
pub mod effects;
pub mod enemy;
pub mod hero;
pub mod magnitude;
pub mod summon;
pub mod types;

pub use card::{Ability, ActionTarget, ActionType, CardDefinition};
pub use effects::{SummonEffect, SupportEffect};
pub use enemy::{AttackEffect, AttackType, Enemy, EnemyAttack, EnemyDefinition};
pub use hero::{DamageTaken, HeroInstance, Protection, StatusIcon};
pub use summon::{Restriction, SummonDefinition};
pub use types::{AbilityKey, CardId, EnemyId, HeroInstanceId, SummonId};
