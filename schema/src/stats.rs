use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// A stat that can carry a boost stage during battle.
///
/// Accuracy and Evasion are not real stats; they only exist as stage tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
pub enum Stat {
    Attack,
    Defense,
    #[strum(to_string = "Sp. Attack")]
    SpAttack,
    #[strum(to_string = "Sp. Defense")]
    SpDefense,
    Speed,
    #[strum(to_string = "accuracy")]
    Accuracy,
    #[strum(to_string = "evasiveness")]
    Evasion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp + self.attack + self.defense + self.sp_attack + self.sp_defense + self.speed
    }

    /// Base value for a stage-able stat. Accuracy and Evasion have no base value.
    pub fn get(&self, stat: Stat) -> Option<u16> {
        match stat {
            Stat::Attack => Some(self.attack),
            Stat::Defense => Some(self.defense),
            Stat::SpAttack => Some(self.sp_attack),
            Stat::SpDefense => Some(self.sp_defense),
            Stat::Speed => Some(self.speed),
            Stat::Accuracy | Stat::Evasion => None,
        }
    }
}

/// Experience curve category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum GrowthRate {
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
}

impl GrowthRate {
    /// Total experience needed to be at `level`. Never negative.
    pub fn exp_for_level(self, level: u8) -> u32 {
        let l = level as i64;
        let cube = l * l * l;
        let exp = match self {
            GrowthRate::Fast => 4 * cube / 5,
            GrowthRate::MediumFast => cube,
            GrowthRate::MediumSlow => 6 * cube / 5 - 15 * l * l + 100 * l - 140,
            GrowthRate::Slow => 5 * cube / 4,
        };
        exp.max(0) as u32
    }
}
