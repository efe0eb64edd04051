use crate::move_data::MoveTemplate;
use schema::{BaseStats, CreatureType, GrowthRate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnableMove {
    pub move_: Arc<MoveTemplate>,
    pub level: u8,
}

/// Immutable species data a combatant is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    /// Second slot is `Typeless` for single-typed species.
    pub types: [CreatureType; 2],
    pub base_stats: BaseStats,
    pub exp_yield: u32,
    pub growth_rate: GrowthRate,
    /// Sorted by unlock level.
    pub learnable_moves: Vec<LearnableMove>,
}

impl CreatureTemplate {
    pub fn new(
        name: &str,
        types: [CreatureType; 2],
        base_stats: BaseStats,
        exp_yield: u32,
        growth_rate: GrowthRate,
    ) -> Self {
        Self {
            name: name.to_string(),
            types,
            base_stats,
            exp_yield,
            growth_rate,
            learnable_moves: Vec::new(),
        }
    }

    pub fn learns(mut self, level: u8, move_: Arc<MoveTemplate>) -> Self {
        self.learnable_moves.push(LearnableMove { move_, level });
        self.learnable_moves.sort_by_key(|learnable| learnable.level);
        self
    }

    pub fn has_type(&self, creature_type: CreatureType) -> bool {
        creature_type != CreatureType::Typeless && self.types.contains(&creature_type)
    }

    /// Moves unlocked at or below `level`, in unlock order.
    pub fn moves_up_to(&self, level: u8) -> impl Iterator<Item = &Arc<MoveTemplate>> {
        self.learnable_moves
            .iter()
            .filter(move |learnable| learnable.level <= level)
            .map(|learnable| &learnable.move_)
    }

    pub fn moves_at(&self, level: u8) -> impl Iterator<Item = &Arc<MoveTemplate>> {
        self.learnable_moves
            .iter()
            .filter(move |learnable| learnable.level == level)
            .map(|learnable| &learnable.move_)
    }
}

impl fmt::Display for CreatureTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 12;

        writeln!(f, "{}", self.name)?;
        writeln!(f, "--------------------")?;
        let type_names: Vec<String> = self
            .types
            .iter()
            .filter(|t| **t != CreatureType::Typeless)
            .map(|t| t.to_string())
            .collect();
        writeln!(f, "Type(s): {}", type_names.join(" / "))?;
        writeln!(f, "--------------------")?;
        let stats = &self.base_stats;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", stats.hp)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", stats.attack)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", stats.defense)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Atk", stats.sp_attack)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Def", stats.sp_defense)?;
        write!(f, "{:<LABEL_WIDTH$} : {}", "Speed", stats.speed)
    }
}
