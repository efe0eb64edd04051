use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Who receives a move's effect bundle: the user itself or the opposing combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MoveTarget {
    User,
    Foe,
}

/// Every status condition the engine knows about.
///
/// The first five are major statuses (at most one at a time); the rest are
/// volatile and can sit alongside a major status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ConditionId {
    #[strum(to_string = "PSN")]
    Poison,
    #[strum(to_string = "BRN")]
    Burn,
    #[strum(to_string = "PAR")]
    Paralysis,
    #[strum(to_string = "FRZ")]
    Freeze,
    #[strum(to_string = "SLP")]
    Sleep,
    #[strum(to_string = "CNF")]
    Confusion,
}

impl ConditionId {
    pub fn is_volatile(self) -> bool {
        matches!(self, ConditionId::Confusion)
    }

    pub fn is_major(self) -> bool {
        !self.is_volatile()
    }
}
