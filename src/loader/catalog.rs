//! Catalog of card, enemy and summon definitions
//!
//! Provides lookup of definitions by id

use crate::core::{CardDefinition, CardId, EnemyDefinition, EnemyId, SummonDefinition, SummonId};
use crate::{EncounterError, Result};
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use std::path::Path;

pub const CARDS_FILE: &str = "cards.json";
pub const ENEMIES_FILE: &str = "enemies.json";
pub const SUMMONS_FILE: &str = "summons.json";
/// Optional; entries with `hp` are hero cards, the rest summons
pub const LEGENDARY_FILE: &str = "legendary.json";

/// Definitions loaded from a data directory
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    cards: FxHashMap<CardId, CardDefinition>,
    enemies: FxHashMap<EnemyId, EnemyDefinition>,
    summons: FxHashMap<SummonId, SummonDefinition>,
    /// Enemy ids in file order
    enemy_order: Vec<EnemyId>,
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every catalog file from `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(EncounterError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Data directory not found: {dir:?}"),
            )));
        }

        let mut catalog = Catalog::new();
        for card in read_array::<CardDefinition>(&dir.join(CARDS_FILE))? {
            catalog.add_card(card)?;
        }
        for enemy in read_array::<EnemyDefinition>(&dir.join(ENEMIES_FILE))? {
            catalog.add_enemy(enemy)?;
        }
        for summon in read_array::<SummonDefinition>(&dir.join(SUMMONS_FILE))? {
            catalog.add_summon(summon)?;
        }

        let legendary = dir.join(LEGENDARY_FILE);
        if legendary.is_file() {
            for entry in read_array::<serde_json::Value>(&legendary)? {
                if entry.get("hp").is_some_and(serde_json::Value::is_number) {
                    catalog.add_card(serde_json::from_value(entry)?)?;
                } else {
                    catalog.add_summon(serde_json::from_value(entry)?)?;
                }
            }
        }
        Ok(catalog)
    }

    /// Add a hero card; the id must be non-empty
    pub fn add_card(&mut self, card: CardDefinition) -> Result<()> {
        if card.id.is_empty() {
            return Err(EncounterError::InvalidCatalog(format!(
                "card without id: {}",
                card.name
            )));
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    pub fn add_enemy(&mut self, enemy: EnemyDefinition) -> Result<()> {
        if enemy.id.is_empty() {
            return Err(EncounterError::InvalidCatalog(format!(
                "enemy without id: {}",
                enemy.name
            )));
        }
        if !self.enemies.contains_key(&enemy.id) {
            self.enemy_order.push(enemy.id.clone());
        }
        self.enemies.insert(enemy.id.clone(), enemy);
        Ok(())
    }

    pub fn add_summon(&mut self, summon: SummonDefinition) -> Result<()> {
        if summon.id.is_empty() {
            return Err(EncounterError::InvalidCatalog(format!(
                "summon without id: {}",
                summon.name
            )));
        }
        self.summons.insert(summon.id.clone(), summon);
        Ok(())
    }

    pub fn card(&self, id: &str) -> Option<&CardDefinition> {
        self.cards.get(&CardId::new(id))
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(&EnemyId::new(id))
    }

    pub fn summon(&self, id: &str) -> Option<&SummonDefinition> {
        self.summons.get(&SummonId::new(id))
    }

    /// Look up a card, failing with `UnknownEntry`
    pub fn require_card(&self, id: &str) -> Result<&CardDefinition> {
        self.card(id)
            .ok_or_else(|| EncounterError::UnknownEntry(format!("card '{id}'")))
    }

    pub fn require_enemy(&self, id: &str) -> Result<&EnemyDefinition> {
        self.enemy(id)
            .ok_or_else(|| EncounterError::UnknownEntry(format!("enemy '{id}'")))
    }

    pub fn require_summon(&self, id: &str) -> Result<&SummonDefinition> {
        self.summon(id)
            .ok_or_else(|| EncounterError::UnknownEntry(format!("summon '{id}'")))
    }

    /// Cards sorted by id
    pub fn cards(&self) -> Vec<&CardDefinition> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        cards
    }

    /// Enemies in file order
    pub fn enemies(&self) -> impl Iterator<Item = &EnemyDefinition> {
        self.enemy_order.iter().filter_map(|id| self.enemies.get(id))
    }

    /// Summons sorted by id
    pub fn summons(&self) -> Vec<&SummonDefinition> {
        let mut summons: Vec<_> = self.summons.values().collect();
        summons.sort_by(|a, b| a.id.cmp(&b.id));
        summons
    }

    /// Total number of definitions
    pub fn len(&self) -> usize {
        self.cards.len() + self.enemies.len() + self.summons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
