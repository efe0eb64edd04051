use crate::battle::calculators::{deal_damage, move_hits, DamageDetails};
use crate::battle::progression::{award_experience, experience_gain};
use crate::battle::state::{
    AnimationKind, BattleEvent, BattleKind, BattleOutcome, BattlePhase, BattleSlot, BattleState,
    EventBus, FaintFollowUp, PartyContext, PromptKind, TurnRng,
};
use crate::config::BattleConfig;
use crate::move_data::EffectBundle;
use schema::{MoveTarget, Stat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What one side does with its turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    UseMove { move_index: usize },
    Switch { party_index: usize },
    Run,
    /// Nothing usable; the side only gets its after-turn effects.
    Pass,
}

#[derive(Debug, Clone, Copy)]
struct ActionPriority {
    action_priority: i8, // Run: 10, Switch: 6, Move/Pass: 0
    move_priority: i8,
    speed: u16,
}

fn calculate_action_priority(
    slot: BattleSlot,
    action: TurnAction,
    state: &BattleState,
) -> ActionPriority {
    let combatant = state.active(slot);
    match action {
        TurnAction::Run => ActionPriority {
            action_priority: 10,
            move_priority: 0,
            speed: 0,
        },
        TurnAction::Switch { .. } => ActionPriority {
            action_priority: 6,
            move_priority: 0,
            speed: 0,
        },
        TurnAction::UseMove { move_index } => ActionPriority {
            action_priority: 0,
            move_priority: combatant
                .moves
                .get(move_index)
                .map(|m| m.template.priority)
                .unwrap_or(0),
            speed: combatant.stat(Stat::Speed),
        },
        TurnAction::Pass => ActionPriority {
            action_priority: 0,
            move_priority: i8::MIN,
            speed: 0,
        },
    }
}

/// Sort actions by action priority, then move priority, then speed. The sort is stable, so on a
/// full tie the earlier entry (the player's) goes first.
pub fn determine_action_order(
    state: &BattleState,
    actions: &[(BattleSlot, TurnAction)],
) -> Vec<(BattleSlot, TurnAction)> {
    let mut prioritized: Vec<(BattleSlot, TurnAction, ActionPriority)> = actions
        .iter()
        .map(|&(slot, action)| (slot, action, calculate_action_priority(slot, action, state)))
        .collect();

    prioritized.sort_by(|a, b| {
        b.2.action_priority
            .cmp(&a.2.action_priority)
            .then(b.2.move_priority.cmp(&a.2.move_priority))
            .then(b.2.speed.cmp(&a.2.speed))
    });

    prioritized
        .into_iter()
        .map(|(slot, action, _)| (slot, action))
        .collect()
}

/// Resolve one full turn. A faint ends the turn once the acting combatant's after-turn effects
/// have run; the replacements it calls for are asked for only then.
pub fn run_turn(
    state: &mut BattleState,
    player_action: TurnAction,
    opponent_action: TurnAction,
    bus: &mut EventBus,
    rng: &mut TurnRng,
    config: &BattleConfig,
) {
    state.phase = BattlePhase::RunningTurn;
    state.turn_number += 1;

    let order = determine_action_order(
        state,
        &[
            (BattleSlot::Player, player_action),
            (BattleSlot::Opponent, opponent_action),
        ],
    );
    debug!(turn = state.turn_number, ?order, "resolving turn");

    for (slot, action) in order {
        execute_action(state, slot, action, bus, rng, config);
        if state.is_over() || state.follow_up.is_pending() {
            break;
        }
    }

    if !state.is_over() {
        resolve_follow_up(state, bus);
    }
}

/// Ask for whatever this turn's faints left open. The player's own replacement comes first; a
/// trainer waiting to send out its next combatant does so after it.
fn resolve_follow_up(state: &mut BattleState, bus: &mut EventBus) {
    if state.follow_up.replace_player {
        state.follow_up.replace_player = false;
        state.phase = BattlePhase::PartySelection(PartyContext::Fainted);
        bus.push(BattleEvent::Prompt(PromptKind::ChoosePartyMember { forced: true }));
        return;
    }
    match state.follow_up.next_opponent.take() {
        Some(next_opponent) => offer_switch_or_send_next(state, next_opponent, bus),
        None => {
            state.phase = BattlePhase::ActionSelection;
            bus.push(BattleEvent::Prompt(PromptKind::ChooseAction));
        }
    }
}

/// Bring in the player's pick after a faint, then any trainer combatant held back for it.
pub fn replace_fainted_player(state: &mut BattleState, index: usize, bus: &mut EventBus) {
    switch_in(state, BattleSlot::Player, index, bus);
    if let Some(next_opponent) = state.follow_up.next_opponent.take() {
        send_next_opponent(state, next_opponent, bus);
    }
}

fn execute_action(
    state: &mut BattleState,
    slot: BattleSlot,
    action: TurnAction,
    bus: &mut EventBus,
    rng: &mut TurnRng,
    config: &BattleConfig,
) {
    match action {
        TurnAction::UseMove { move_index } => {
            run_move(state, slot, move_index, bus, rng, config);
            if !state.is_over() {
                run_after_turn(state, slot, bus, config);
            }
        }
        TurnAction::Switch { party_index } => switch_in(state, slot, party_index, bus),
        TurnAction::Run => {
            if attempt_escape(state, rng) {
                bus.dialogue("Got away safely!");
                end_battle(state, BattleOutcome::Escaped, bus);
            } else {
                bus.dialogue("Can't escape!");
            }
        }
        TurnAction::Pass => {
            let name = state.active(slot).name().to_string();
            bus.dialogue(format!("{} has no moves left!", name));
            run_after_turn(state, slot, bus, config);
        }
    }
}

/// Execute one move for the combatant in `slot`.
pub fn run_move(
    state: &mut BattleState,
    slot: BattleSlot,
    move_index: usize,
    bus: &mut EventBus,
    rng: &mut TurnRng,
    config: &BattleConfig,
) {
    let target_slot = slot.opponent();
    if state.active(slot).is_fainted() {
        return;
    }

    let can_move = state.active_mut(slot).on_before_move(rng);
    sync_combatant(state, slot, bus);
    if state.active(slot).is_fainted() {
        handle_faint(state, slot, bus, config);
        return;
    }
    if !can_move {
        return;
    }

    let (user, foe) = state.pair_mut(slot);
    let Some(move_instance) = user.moves.get_mut(move_index) else {
        warn!(move_index, name = user.name(), "move index out of range");
        return;
    };
    move_instance.use_pp();
    let move_ = move_instance.template.clone();
    let user_name = user.name().to_string();
    debug!(user = %user_name, move_name = %move_.name, "move used");
    bus.dialogue(format!("{} used {}!", user_name, move_.name));

    if !move_hits(&move_, user, foe, rng) {
        bus.dialogue(format!("{}'s attack missed!", user_name));
        return;
    }
    bus.push(BattleEvent::Animation {
        kind: AnimationKind::Attack,
        slot,
    });

    if move_.is_damaging() {
        bus.push(BattleEvent::Animation {
            kind: AnimationKind::Hit,
            slot: target_slot,
        });
        let details = deal_damage(&move_, user, foe, rng, config);
        let target_name = foe.name().to_string();
        sync_combatant(state, target_slot, bus);
        show_damage_details(&details, &target_name, bus);
    } else {
        run_move_effects(state, slot, &move_.effects, move_.target, bus, rng);
    }

    if !state.active(target_slot).is_fainted() {
        for secondary in &move_.secondaries {
            if rng.next_in("Secondary Effect", 1..=100) <= secondary.chance as u16 {
                run_move_effects(state, slot, &secondary.effects, secondary.target, bus, rng);
            }
        }
    }

    if state.active(target_slot).is_fainted() {
        handle_faint(state, target_slot, bus, config);
    }
}

fn show_damage_details(details: &DamageDetails, target_name: &str, bus: &mut EventBus) {
    if details.is_critical() {
        bus.dialogue("A critical hit!");
    }
    if details.type_effectiveness == 0.0 {
        bus.dialogue(format!("It doesn't affect {}...", target_name));
    } else if details.type_effectiveness > 1.0 {
        bus.dialogue("It's super effective!");
    } else if details.type_effectiveness < 1.0 {
        bus.dialogue("It's not very effective!");
    }
}

/// Apply an effect bundle: boosts to whoever `target` names, status to the foe.
pub fn run_move_effects(
    state: &mut BattleState,
    user_slot: BattleSlot,
    effects: &EffectBundle,
    target: MoveTarget,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) {
    let (user, foe) = state.pair_mut(user_slot);
    if !effects.boosts.is_empty() {
        match target {
            MoveTarget::User => user.apply_boosts(&effects.boosts),
            MoveTarget::Foe => foe.apply_boosts(&effects.boosts),
        }
    }
    if let Some(status) = effects.status {
        foe.inflict(status, rng);
    }

    sync_combatant(state, user_slot, bus);
    sync_combatant(state, user_slot.opponent(), bus);
}

/// After-turn hooks for the combatant in `slot`.
pub fn run_after_turn(
    state: &mut BattleState,
    slot: BattleSlot,
    bus: &mut EventBus,
    config: &BattleConfig,
) {
    if state.active(slot).is_fainted() {
        return;
    }
    state.active_mut(slot).on_after_turn();
    sync_combatant(state, slot, bus);
    if state.active(slot).is_fainted() {
        handle_faint(state, slot, bus, config);
    }
}

/// Flush a combatant's queued dialogue and any HP/status display changes onto the bus.
pub fn sync_combatant(state: &mut BattleState, slot: BattleSlot, bus: &mut EventBus) {
    let combatant = state.active_mut(slot);
    while let Some(line) = combatant.status_changes.pop_front() {
        bus.dialogue(line);
    }
    if combatant.hp_changed {
        combatant.hp_changed = false;
        bus.push(BattleEvent::HealthDisplay {
            slot,
            hp: combatant.hp(),
            max_hp: combatant.max_hp(),
        });
    }
    if combatant.status_changed {
        combatant.status_changed = false;
        bus.push(BattleEvent::StatusDisplay {
            slot,
            status: combatant.status,
        });
    }
}

fn handle_faint(
    state: &mut BattleState,
    slot: BattleSlot,
    bus: &mut EventBus,
    config: &BattleConfig,
) {
    let name = state.active(slot).name().to_string();
    debug!(?slot, %name, "combatant fainted");
    bus.dialogue(format!("{} fainted!", name));
    bus.push(BattleEvent::Animation {
        kind: AnimationKind::Faint,
        slot,
    });

    match slot {
        BattleSlot::Player => {
            if state.side(BattleSlot::Player).party.has_healthy_member() {
                state.follow_up.replace_player = true;
            } else {
                bus.dialogue("You have no more creatures that can fight!");
                end_battle(state, BattleOutcome::Lost, bus);
            }
        }
        BattleSlot::Opponent => {
            let gain = experience_gain(
                state.active(BattleSlot::Opponent),
                state.is_trainer_battle(),
                config,
            );
            award_experience(state, gain, bus, config);

            let next = match state.kind {
                BattleKind::Wild => None,
                BattleKind::Trainer { .. } => state.side(BattleSlot::Opponent).party.healthy_member(),
            };
            match next {
                None => end_battle(state, BattleOutcome::Won, bus),
                Some(next_opponent) => state.follow_up.next_opponent = Some(next_opponent),
            }
        }
    }
}

fn offer_switch_or_send_next(state: &mut BattleState, next_opponent: usize, bus: &mut EventBus) {
    let player = state.side(BattleSlot::Player);
    let can_switch = !player.active().is_fainted()
        && player.party.healthy_member_except(player.active_index).is_some();

    if can_switch {
        let opponent = state.side(BattleSlot::Opponent);
        let next_name = opponent.party.members()[next_opponent].name().to_string();
        bus.dialogue(format!(
            "{} is about to send out {}. Will you switch?",
            opponent.name, next_name
        ));
        state.phase = BattlePhase::AboutToSwitch { next_opponent };
        bus.push(BattleEvent::Prompt(PromptKind::ConfirmSwitch));
    } else {
        send_next_opponent(state, next_opponent, bus);
        state.phase = BattlePhase::ActionSelection;
        bus.push(BattleEvent::Prompt(PromptKind::ChooseAction));
    }
}

/// The trainer replaces its fainted combatant with the party member at `index`.
pub fn send_next_opponent(state: &mut BattleState, index: usize, bus: &mut EventBus) {
    let side = state.side_mut(BattleSlot::Opponent);
    side.active_mut().on_battle_over();
    side.active_index = index;
    send_out(state, BattleSlot::Opponent, bus);
}

/// Swap `slot`'s active combatant for the party member at `index`.
pub fn switch_in(state: &mut BattleState, slot: BattleSlot, index: usize, bus: &mut EventBus) {
    let side = state.side_mut(slot);
    let outgoing_name = side.active().name().to_string();
    if !side.active().is_fainted() {
        let line = match slot {
            BattleSlot::Player => format!("Come back, {}!", outgoing_name),
            BattleSlot::Opponent => format!("{} withdrew {}!", side.name, outgoing_name),
        };
        bus.dialogue(line);
        bus.push(BattleEvent::Animation {
            kind: AnimationKind::Recall,
            slot,
        });
    }
    side.active_mut().on_battle_over();
    side.active_index = index;
    debug!(?slot, from = %outgoing_name, to = index, "switched");
    send_out(state, slot, bus);
}

/// Announce `slot`'s active combatant and refresh every display for it.
pub fn send_out(state: &mut BattleState, slot: BattleSlot, bus: &mut EventBus) {
    let is_trainer_battle = state.is_trainer_battle();
    let side = state.side(slot);
    let combatant = side.active();
    match slot {
        BattleSlot::Player => bus.dialogue(format!("Go {}!", combatant.name())),
        BattleSlot::Opponent if is_trainer_battle => {
            bus.dialogue(format!("{} sent out {}!", side.name, combatant.name()))
        }
        BattleSlot::Opponent => {}
    }
    bus.push(BattleEvent::SentOut {
        slot,
        name: combatant.name().to_string(),
        level: combatant.level,
    });
    bus.push(BattleEvent::Animation {
        kind: AnimationKind::Enter,
        slot,
    });
    bus.push(BattleEvent::HealthDisplay {
        slot,
        hp: combatant.hp(),
        max_hp: combatant.max_hp(),
    });
    bus.push(BattleEvent::StatusDisplay {
        slot,
        status: combatant.status,
    });
    if slot == BattleSlot::Player {
        bus.push(BattleEvent::ExperienceDisplay {
            level: combatant.level,
            fraction: combatant.exp_fraction(),
        });
    }

    let combatant = state.active_mut(slot);
    combatant.hp_changed = false;
    combatant.status_changed = false;
}

/// Roll to flee from a wild battle. Every attempt, successful or not, counts toward the odds of
/// the next one. A faster player always gets away.
pub fn attempt_escape(state: &mut BattleState, rng: &mut TurnRng) -> bool {
    state.escape_attempts += 1;
    let player_speed = state.active(BattleSlot::Player).stat(Stat::Speed) as u32;
    let opponent_speed = state.active(BattleSlot::Opponent).stat(Stat::Speed) as u32;

    if opponent_speed < player_speed {
        return true;
    }

    let odds = (player_speed * 128 / opponent_speed.max(1) + 30 * state.escape_attempts) % 256;
    (rng.next_in("Escape Roll", 0..=255) as u32) < odds
}

/// Move to `BattleOver` and, for a trainer configured to do so, hand its lead to the player.
pub fn end_battle(state: &mut BattleState, outcome: BattleOutcome, bus: &mut EventBus) {
    if outcome == BattleOutcome::Won {
        if let BattleKind::Trainer {
            recruit_on_defeat: true,
        } = state.kind
        {
            recruit_opponent_lead(state, bus);
        }
    }

    info!(?outcome, turns = state.turn_number, "battle over");
    state.follow_up = FaintFollowUp::default();
    state.phase = BattlePhase::BattleOver(Some(outcome));
    bus.push(BattleEvent::BattleEnded {
        player_won: outcome.player_won(),
    });
}

fn recruit_opponent_lead(state: &mut BattleState, bus: &mut EventBus) {
    let mut recruit = state.side(BattleSlot::Opponent).party.members()[0].clone();
    recruit.heal_full();
    recruit.on_battle_over();
    recruit.status_changes.clear();

    let name = recruit.name().to_string();
    match state.side_mut(BattleSlot::Player).party.add_member(recruit.clone()) {
        Ok(()) => {
            bus.dialogue(format!("{} joined your party!", name));
            state.recruited = Some(recruit);
        }
        Err(err) => {
            debug!(%err, "no room for the recruit");
            bus.dialogue(format!("{} wanted to join, but your party is full.", name));
        }
    }
}
