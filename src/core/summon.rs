//! Summon definitions

use crate::core::SummonId;
use serde::{Deserialize, Serialize};

/// Usage restriction parsed from a summon's free-text `restriction`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    None,
    OncePerEncounter,
    /// Locked for the encounter here; run-wide tracking belongs to the session
    OncePerRun,
}

/// Static summon record from the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonDefinition {
    pub id: SummonId,

    #[serde(default)]
    pub name: String,

    /// Descriptive text; unknown summons heal the party by its first number
    #[serde(default)]
    pub ability: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u32>,

    /// Whether the presentation layer should ask for a target first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_target: Option<bool>,
}

impl SummonDefinition {
    pub fn new(id: impl Into<SummonId>, name: impl Into<String>) -> Self {
        SummonDefinition {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.restriction = Some(restriction.into());
        self
    }

    pub fn restriction(&self) -> Restriction {
        let text = match &self.restriction {
            Some(r) => r.to_lowercase(),
            None => return Restriction::None,
        };
        if text.contains("once per encounter") {
            Restriction::OncePerEncounter
        } else if text.contains("once per run") {
            Restriction::OncePerRun
        } else {
            Restriction::None
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restriction_parsing() {
        let s = SummonDefinition::new("garon", "Garon").with_restriction("Once per Encounter");
        assert_eq!(s.restriction(), Restriction::OncePerEncounter);

        let s = SummonDefinition::new("wave", "Wave").with_restriction("Usable once per run.");
        assert_eq!(s.restriction(), Restriction::OncePerRun);

        let s = SummonDefinition::new("volo", "Volo");
        assert_eq!(s.restriction(), Restriction::None);
    }
}
