//! Run-wide bookkeeping that outlives a single encounter

use crate::core::{EnemyId, Restriction, SummonDefinition, SummonId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record of one run: summon usage, enemies beaten and who ended it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunLedger {
    /// Uses this run; cleared when a new run starts
    pub summon_usage: BTreeMap<SummonId, u32>,
    /// Uses across every run
    pub total_summon_usage: BTreeMap<SummonId, u32>,
    pub defeated: Vec<EnemyId>,
    pub died_to: Option<EnemyId>,
    pub runs: u32,
}

impl RunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a once-per-run summon was already used this run
    pub fn is_spent_for_run(&self, def: &SummonDefinition) -> bool {
        def.restriction() == Restriction::OncePerRun
            && self.summon_usage.get(&def.id).is_some_and(|&n| n > 0)
    }

    pub fn record_summon(&mut self, id: &SummonId) {
        *self.summon_usage.entry(id.clone()).or_insert(0) += 1;
        *self.total_summon_usage.entry(id.clone()).or_insert(0) += 1;
    }

    pub fn record_victory(&mut self, enemy: &EnemyId) {
        self.defeated.push(enemy.clone());
    }

    pub fn record_defeat(&mut self, enemy: &EnemyId) {
        self.died_to = Some(enemy.clone());
    }

    /// Start a new run, keeping only lifetime totals
    pub fn start_run(&mut self) {
        self.summon_usage.clear();
        self.defeated.clear();
        self.died_to = None;
        self.runs += 1;
    }

    pub fn is_over(&self) -> bool {
        self.died_to.is_some()
    }
}
