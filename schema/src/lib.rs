// Creature Battle Schema - Shared type definitions
// This crate contains the static, data-only enums shared between the battle
// engine and anything that authors creature or move data for it.

pub use creature_types::*;
pub use move_types::*;
pub use stats::*;

pub mod creature_types;
pub mod move_types;
pub mod stats;
