use schema::{ConditionId, CreatureType, MoveCategory, MoveTarget, Stat};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accuracy {
    /// Hit chance out of 100 before accuracy and evasion stages are applied.
    Percent(u8),
    /// Skips the accuracy roll entirely.
    AlwaysHits,
}

/// What a move (or one of its secondary effects) does besides dealing damage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectBundle {
    pub boosts: Vec<(Stat, i8)>,
    /// Inflicted on the foe. Confusion lands in the volatile slot, everything else in the major slot.
    pub status: Option<ConditionId>,
}

impl EffectBundle {
    pub fn boosts(boosts: Vec<(Stat, i8)>) -> Self {
        Self { boosts, status: None }
    }

    pub fn status(status: ConditionId) -> Self {
        Self {
            boosts: Vec::new(),
            status: Some(status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty() && self.status.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    pub effects: EffectBundle,
    /// Percent chance, rolled against 1..=100.
    pub chance: u8,
    /// Who receives the boosts.
    pub target: MoveTarget,
}

/// Immutable definition of a move. Shared between combatants through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTemplate {
    pub name: String,
    pub move_type: CreatureType,
    pub category: MoveCategory,
    pub power: u16,
    pub accuracy: Accuracy,
    pub max_pp: u8,
    pub priority: i8,
    /// Who receives the primary boosts.
    pub target: MoveTarget,
    pub effects: EffectBundle,
    pub secondaries: Vec<SecondaryEffect>,
}

impl MoveTemplate {
    pub fn new(
        name: &str,
        move_type: CreatureType,
        category: MoveCategory,
        power: u16,
        accuracy: u8,
        max_pp: u8,
    ) -> Self {
        Self {
            name: name.to_string(),
            move_type,
            category,
            power,
            accuracy: Accuracy::Percent(accuracy),
            max_pp,
            priority: 0,
            target: MoveTarget::Foe,
            effects: EffectBundle::default(),
            secondaries: Vec::new(),
        }
    }

    pub fn always_hits(mut self) -> Self {
        self.accuracy = Accuracy::AlwaysHits;
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_effects(mut self, target: MoveTarget, effects: EffectBundle) -> Self {
        self.target = target;
        self.effects = effects;
        self
    }

    pub fn with_secondary(mut self, chance: u8, target: MoveTarget, effects: EffectBundle) -> Self {
        self.secondaries.push(SecondaryEffect {
            effects,
            chance,
            target,
        });
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }
}

impl fmt::Display for MoveTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {:?}", self.name, self.move_type, self.category)?;
        if self.is_damaging() {
            write!(f, ", power {}", self.power)?;
        }
        match self.accuracy {
            Accuracy::Percent(accuracy) => write!(f, ", {}% accurate", accuracy)?,
            Accuracy::AlwaysHits => write!(f, ", never misses")?,
        }
        write!(f, ", {} PP)", self.max_pp)
    }
}
