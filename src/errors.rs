use crate::battle::session::BattleIntent;
use crate::battle::state::BattlePhase;
use thiserror::Error;

/// Main error type for the creature battle engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    /// The intent has no meaning in the phase the session is currently in
    #[error("intent {intent:?} is not accepted while in {phase:?}")]
    UnexpectedIntent {
        intent: BattleIntent,
        phase: BattlePhase,
    },

    /// The battle already reached a terminal state
    #[error("the battle is already over")]
    BattleAlreadyOver,

    /// `start` was called twice
    #[error("the battle has already started")]
    AlreadyStarted,

    /// Abort was requested while a turn was still resolving
    #[error("a battle can only be aborted at a turn boundary")]
    MidTurnAbort,

    /// The player's roster has nobody able to fight
    #[error("no healthy combatant is available to send out")]
    NoHealthyCombatant,

    /// Move slot index out of bounds for the active combatant
    #[error("invalid move index: {0}")]
    InvalidMoveIndex(usize),

    /// Party slot index out of bounds for the roster
    #[error("invalid party index: {0}")]
    InvalidPartyIndex(usize),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to building or growing a party roster
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("a party needs at least one member")]
    Empty,

    #[error("a party cannot hold more than {max} members")]
    Full { max: usize },
}

/// Errors related to loading a battle configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(String),

    #[error("could not parse config: {0}")]
    Parse(String),

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
