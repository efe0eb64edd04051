pub mod ai;
pub mod calculators;
pub mod conditions;
pub mod engine;
pub mod progression;
pub mod session;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
