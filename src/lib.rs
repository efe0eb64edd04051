//! Creature Battle Engine
//!
//! A turn-based, one-on-one creature battle engine. Combatants are built from shared species and
//! move templates, fight through an intent-driven state machine, and report every narrative step
//! as an ordered stream of presentation events.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod creature;
pub mod errors;
pub mod move_data;
pub mod party;
pub mod prefab_teams;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, ConditionId, CreatureType, GrowthRate, MoveCategory, MoveTarget, Stat,
};

// --- From this crate's modules (`src/`) ---

// Session driver and the events it produces.
pub use battle::ai::{Behavior, BehaviorKind, RandomBehavior, ScoringBehavior};
pub use battle::session::{
    ActionChoice, BattleIntent, BattleReport, BattleSession, Encounter, TrainerParty,
};
pub use battle::state::{
    AnimationKind, BattleEvent, BattleObserver, BattleOutcome, BattlePhase, BattleSlot, EventBus,
    PromptKind, TurnRng,
};

// Core runtime types for a battle.
pub use creature::{Combatant, MoveInstance};
pub use move_data::{Accuracy, EffectBundle, MoveTemplate, SecondaryEffect};
pub use party::Party;
pub use species::CreatureTemplate;

pub use config::BattleConfig;
pub use errors::{BattleError, BattleResult, ConfigError, ConfigResult, RosterError};
