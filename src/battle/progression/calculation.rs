use crate::config::BattleConfig;
use crate::creature::Combatant;

/// Experience awarded for knocking out `defeated`: `yield * level * bonus / 7`, floored.
/// The bonus only applies when the defeated combatant belonged to a trainer.
pub fn experience_gain(defeated: &Combatant, trainer_battle: bool, config: &BattleConfig) -> u32 {
    let bonus = if trainer_battle {
        config.trainer_exp_bonus
    } else {
        1.0
    };
    let gain = defeated.template.exp_yield as f32 * defeated.level as f32 * bonus / 7.0;
    gain.floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::CreatureTemplate;
    use rstest::rstest;
    use schema::{BaseStats, CreatureType, GrowthRate};
    use std::sync::Arc;

    #[rstest]
    #[case(false, 5, 45)]
    #[case(true, 5, 68)]
    #[case(false, 1, 9)]
    fn gain_follows_the_yield_formula(#[case] trainer: bool, #[case] level: u8, #[case] expected: u32) {
        let template = CreatureTemplate::new(
            "Sproutle",
            [CreatureType::Grass, CreatureType::Typeless],
            BaseStats { hp: 45, attack: 49, defense: 49, sp_attack: 65, sp_defense: 65, speed: 45 },
            64,
            GrowthRate::MediumSlow,
        );
        let defeated = Combatant::new(Arc::new(template), level);
        assert_eq!(experience_gain(&defeated, trainer, &BattleConfig::default()), expected);
    }
}
