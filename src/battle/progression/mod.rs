pub mod calculation;

pub use calculation::experience_gain;

use crate::battle::state::{BattleEvent, BattleSlot, BattleState, EventBus};
use crate::config::BattleConfig;
use tracing::debug;

/// Give `gain` experience to the player's active combatant and resolve any level-ups it
/// causes. A knocked-out combatant gets nothing.
pub fn award_experience(
    state: &mut BattleState,
    gain: u32,
    bus: &mut EventBus,
    config: &BattleConfig,
) {
    let combatant = state.active_mut(BattleSlot::Player);
    if combatant.is_fainted() {
        return;
    }

    combatant.exp = combatant.exp.saturating_add(gain);
    bus.dialogue(format!("{} gained {} exp!", combatant.name(), gain));

    let mut leveled = false;
    while combatant.check_for_level_up(config.max_level) {
        leveled = true;
        debug!(name = combatant.name(), level = combatant.level, "level up");
        bus.dialogue(format!("{} grew to level {}!", combatant.name(), combatant.level));

        for move_ in combatant.moves_unlocked_at_level() {
            if combatant.moves.iter().any(|known| known.template.name == move_.name) {
                continue;
            }
            if combatant.learn_move(move_.clone()) {
                bus.dialogue(format!("{} learned {}!", combatant.name(), move_.name));
            } else {
                bus.dialogue(format!(
                    "{} is trying to learn {}, but it can't learn more than {} moves!",
                    combatant.name(),
                    move_.name,
                    crate::creature::MAX_MOVES
                ));
            }
        }
    }

    bus.push(BattleEvent::ExperienceDisplay {
        level: combatant.level,
        fraction: combatant.exp_fraction(),
    });
    if leveled {
        combatant.hp_changed = false;
        bus.push(BattleEvent::HealthDisplay {
            slot: BattleSlot::Player,
            hp: combatant.hp(),
            max_hp: combatant.max_hp(),
        });
    }
}
