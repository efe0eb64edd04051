use crate::battle::state::TurnRng;
use crate::battle::stats::effective_accuracy;
use crate::config::BattleConfig;
use crate::creature::Combatant;
use crate::move_data::{Accuracy, MoveTemplate};
use schema::{CreatureType, MoveCategory, Stat};
use serde::{Deserialize, Serialize};

/// Result of one damaging hit, used to pick the follow-up dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageDetails {
    pub damage: u16,
    /// 1.0, or the configured critical multiplier.
    pub critical: f32,
    pub type_effectiveness: f32,
    pub fainted: bool,
}

impl DamageDetails {
    pub fn is_critical(&self) -> bool {
        self.critical > 1.0
    }
}

/// Roll the accuracy check. Always-hit moves consume no draw.
pub fn move_hits(
    move_: &MoveTemplate,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut TurnRng,
) -> bool {
    let Accuracy::Percent(base_accuracy) = move_.accuracy else {
        return true;
    };
    let threshold = effective_accuracy(
        base_accuracy,
        attacker.stat_stage(Stat::Accuracy),
        defender.stat_stage(Stat::Evasion),
    );
    rng.next_in("Accuracy Roll", 1..=100) as u32 <= threshold
}

fn attack_and_defense(category: MoveCategory) -> (Stat, Stat) {
    match category {
        MoveCategory::Special => (Stat::SpAttack, Stat::SpDefense),
        MoveCategory::Physical | MoveCategory::Status => (Stat::Attack, Stat::Defense),
    }
}

/// Compute damage without applying it. Draws the critical roll, then the damage roll.
pub fn calculate_damage(
    move_: &MoveTemplate,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> DamageDetails {
    let critical = if rng.next_in("Critical Hit", 1..=config.critical_hit_rate) == 1 {
        config.critical_multiplier
    } else {
        1.0
    };
    let roll = rng.next_in("Damage Roll", config.damage_roll_min as u16..=100);
    let type_effectiveness =
        CreatureType::effectiveness_against(move_.move_type, defender.types());

    let (attack_stat, defense_stat) = attack_and_defense(move_.category);
    let attack = attacker.stat(attack_stat).max(1) as f32;
    let defense = defender.stat(defense_stat).max(1) as f32;

    let a = (2.0 * attacker.level as f32 + 10.0) / 250.0;
    let d = a * move_.power as f32 * (attack / defense) + 2.0;
    let stab = if attacker.template.has_type(move_.move_type) {
        config.same_type_bonus
    } else {
        1.0
    };
    let base = (d * (roll as f32 / 100.0) * stab).floor();
    let scaled = (base * type_effectiveness * critical).floor();

    let damage = if type_effectiveness == 0.0 {
        0
    } else {
        scaled.max(1.0).min(u16::MAX as f32) as u16
    };

    DamageDetails {
        damage,
        critical,
        type_effectiveness,
        fainted: false,
    }
}

/// Compute damage and subtract it from the defender's HP.
pub fn deal_damage(
    move_: &MoveTemplate,
    attacker: &Combatant,
    defender: &mut Combatant,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> DamageDetails {
    let mut details = calculate_damage(move_, attacker, defender, rng, config);
    details.fainted = defender.take_damage(details.damage);
    details
}
