use schema::BaseStats;

pub const MAX_STAGE: i8 = 6;

/// Stage `n` scales by `(3 + n) / 3`; negative stages invert the fraction.
fn stage_fraction(stage: i8) -> (u32, u32) {
    let stage = stage.clamp(-MAX_STAGE, MAX_STAGE);
    let magnitude = 3 + stage.unsigned_abs() as u32;
    if stage >= 0 {
        (magnitude, 3)
    } else {
        (3, magnitude)
    }
}

/// Multiplier for a boost stage, shared by real stats and accuracy/evasion.
pub fn stage_multiplier(stage: i8) -> f32 {
    let (numerator, denominator) = stage_fraction(stage);
    numerator as f32 / denominator as f32
}

/// Apply a boost stage to a computed stat, flooring the result.
pub fn apply_stage(stat: u16, stage: i8) -> u16 {
    let (numerator, denominator) = stage_fraction(stage);
    (stat as u32 * numerator / denominator).min(u16::MAX as u32) as u16
}

/// Hit threshold out of 100 once the attacker's accuracy stage and the defender's evasion
/// stage are applied. Can exceed 100.
pub fn effective_accuracy(base_accuracy: u8, accuracy_stage: i8, evasion_stage: i8) -> u32 {
    let (acc_num, acc_den) = stage_fraction(accuracy_stage);
    let (eva_num, eva_den) = stage_fraction(evasion_stage);
    base_accuracy as u32 * acc_num * eva_den / (acc_den * eva_num)
}

pub fn calculate_max_hp(base: u16, level: u8) -> u16 {
    (base as u32 * level as u32 / 100) as u16 + 10 + level as u16
}

pub fn calculate_stat(base: u16, level: u8) -> u16 {
    (base as u32 * level as u32 / 100) as u16 + 5
}

/// Level-scaled stats for a species. The `hp` field carries max HP.
pub fn calculate_stats(base: &BaseStats, level: u8) -> BaseStats {
    BaseStats {
        hp: calculate_max_hp(base.hp, level),
        attack: calculate_stat(base.attack, level),
        defense: calculate_stat(base.defense, level),
        sp_attack: calculate_stat(base.sp_attack, level),
        sp_defense: calculate_stat(base.sp_defense, level),
        speed: calculate_stat(base.speed, level),
    }
}
