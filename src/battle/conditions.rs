//! Status condition registry.
//!
//! Each condition is a static table of plain function pointers. Hooks a condition does not
//! care about stay `None` via `..Condition::NONE`.

use crate::battle::state::TurnRng;
use crate::creature::Combatant;
use schema::ConditionId;

/// Runs when the condition is applied, usually to roll a duration.
pub type OnStart = fn(combatant: &mut Combatant, rng: &mut TurnRng);

/// Runs before the combatant acts. Returning false cancels the move.
pub type OnBeforeMove = fn(combatant: &mut Combatant, rng: &mut TurnRng) -> bool;

/// Runs after the combatant's move resolves.
pub type OnAfterTurn = fn(combatant: &mut Combatant);

#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub name: &'static str,
    /// Appended to the combatant's name when the condition lands.
    pub start_message: &'static str,
    pub on_start: Option<OnStart>,
    pub on_before_move: Option<OnBeforeMove>,
    pub on_after_turn: Option<OnAfterTurn>,
}

impl Condition {
    pub const NONE: Condition = Condition {
        name: "",
        start_message: "",
        on_start: None,
        on_before_move: None,
        on_after_turn: None,
    };
}

static POISON: Condition = Condition {
    name: "Poison",
    start_message: " was poisoned!",
    on_after_turn: Some(poison_after_turn),
    ..Condition::NONE
};

static BURN: Condition = Condition {
    name: "Burn",
    start_message: " was burned!",
    on_after_turn: Some(burn_after_turn),
    ..Condition::NONE
};

static PARALYSIS: Condition = Condition {
    name: "Paralysis",
    start_message: " is paralyzed! It may be unable to move!",
    on_before_move: Some(paralysis_before_move),
    ..Condition::NONE
};

static FREEZE: Condition = Condition {
    name: "Freeze",
    start_message: " was frozen solid!",
    on_before_move: Some(freeze_before_move),
    ..Condition::NONE
};

static SLEEP: Condition = Condition {
    name: "Sleep",
    start_message: " fell asleep!",
    on_start: Some(sleep_start),
    on_before_move: Some(sleep_before_move),
    ..Condition::NONE
};

static CONFUSION: Condition = Condition {
    name: "Confusion",
    start_message: " became confused!",
    on_start: Some(confusion_start),
    on_before_move: Some(confusion_before_move),
    ..Condition::NONE
};

pub fn condition(id: ConditionId) -> &'static Condition {
    match id {
        ConditionId::Poison => &POISON,
        ConditionId::Burn => &BURN,
        ConditionId::Paralysis => &PARALYSIS,
        ConditionId::Freeze => &FREEZE,
        ConditionId::Sleep => &SLEEP,
        ConditionId::Confusion => &CONFUSION,
    }
}

fn say(combatant: &mut Combatant, message: &str) {
    let line = format!("{}{}", combatant.name(), message);
    combatant.status_changes.push_back(line);
}

fn poison_after_turn(combatant: &mut Combatant) {
    combatant.take_damage(combatant.max_hp() / 8);
    say(combatant, " is hurt by poison!");
}

fn burn_after_turn(combatant: &mut Combatant) {
    combatant.take_damage(combatant.max_hp() / 16);
    say(combatant, " is hurt by its burn!");
}

fn paralysis_before_move(combatant: &mut Combatant, rng: &mut TurnRng) -> bool {
    if rng.next_in("Paralysis Check", 1..=4) == 1 {
        say(combatant, " is fully paralyzed!");
        return false;
    }
    true
}

fn freeze_before_move(combatant: &mut Combatant, rng: &mut TurnRng) -> bool {
    if rng.next_in("Thaw Check", 1..=4) == 1 {
        combatant.cure_status();
        say(combatant, " thawed out!");
        return true;
    }
    say(combatant, " is frozen solid!");
    false
}

fn sleep_start(combatant: &mut Combatant, rng: &mut TurnRng) {
    combatant.status_time = rng.next_in("Sleep Duration", 1..=3) as u8;
}

fn sleep_before_move(combatant: &mut Combatant, _rng: &mut TurnRng) -> bool {
    if combatant.status_time == 0 {
        combatant.cure_status();
        say(combatant, " woke up!");
        return true;
    }
    combatant.status_time -= 1;
    say(combatant, " is fast asleep.");
    false
}

fn confusion_start(combatant: &mut Combatant, rng: &mut TurnRng) {
    combatant.volatile_status_time = rng.next_in("Confusion Duration", 1..=4) as u8;
}

fn confusion_before_move(combatant: &mut Combatant, rng: &mut TurnRng) -> bool {
    if combatant.volatile_status_time == 0 {
        combatant.cure_volatile_status();
        say(combatant, " snapped out of confusion!");
        return true;
    }
    combatant.volatile_status_time -= 1;
    say(combatant, " is confused!");

    if rng.next_in("Confusion Check", 1..=2) == 1 {
        return true;
    }
    combatant.take_damage(combatant.max_hp() / 8);
    say(combatant, " hurt itself in its confusion!");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_data::MoveTemplate;
    use crate::species::CreatureTemplate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{BaseStats, CreatureType, GrowthRate, MoveCategory};
    use std::sync::Arc;

    fn combatant() -> Combatant {
        let tackle = Arc::new(MoveTemplate::new("Tackle", CreatureType::Normal, MoveCategory::Physical, 40, 100, 35));
        let template = CreatureTemplate::new(
            "Mossling",
            [CreatureType::Grass, CreatureType::Typeless],
            BaseStats { hp: 200, attack: 50, defense: 50, sp_attack: 50, sp_defense: 50, speed: 50 },
            64,
            GrowthRate::MediumSlow,
        )
        .learns(1, tackle);
        // Max HP = 100 + 10 + 50 = 160 at level 50.
        Combatant::new(Arc::new(template), 50)
    }

    fn drain(combatant: &mut Combatant) -> Vec<String> {
        combatant.status_changes.drain(..).collect()
    }

    #[test]
    fn every_condition_is_registered_with_a_message() {
        let all = [
            ConditionId::Poison,
            ConditionId::Burn,
            ConditionId::Paralysis,
            ConditionId::Freeze,
            ConditionId::Sleep,
            ConditionId::Confusion,
        ];
        for id in all {
            let entry = condition(id);
            assert!(!entry.name.is_empty());
            assert!(entry.start_message.ends_with('!'));
        }
    }

    #[rstest]
    #[case(ConditionId::Poison, 160 - 20)]
    #[case(ConditionId::Burn, 160 - 10)]
    fn damage_over_time(#[case] id: ConditionId, #[case] expected_hp: u16) {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![]);
        mon.set_status(id, &mut rng);
        mon.on_after_turn();
        assert_eq!(mon.hp(), expected_hp);
    }

    #[rstest]
    #[case(1, false)]
    #[case(2, true)]
    #[case(4, true)]
    fn paralysis_blocks_one_in_four(#[case] roll: u16, #[case] can_move: bool) {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![roll]);
        mon.set_status(ConditionId::Paralysis, &mut rng);
        assert_eq!(mon.on_before_move(&mut rng), can_move);
        assert_eq!(mon.status, Some(ConditionId::Paralysis));
    }

    #[test]
    fn freeze_thaws_on_a_one() {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![3, 1]);
        mon.set_status(ConditionId::Freeze, &mut rng);
        assert!(!mon.on_before_move(&mut rng));
        assert!(mon.on_before_move(&mut rng));
        assert_eq!(mon.status, None);
        assert!(drain(&mut mon).contains(&"Mossling thawed out!".to_string()));
    }

    #[test]
    fn sleep_counter_of_n_blocks_n_moves() {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![2]);
        mon.set_status(ConditionId::Sleep, &mut rng);
        assert_eq!(mon.status_time, 2);

        assert!(!mon.on_before_move(&mut rng));
        assert!(!mon.on_before_move(&mut rng));
        assert!(mon.on_before_move(&mut rng));
        assert_eq!(mon.status, None);
        assert_eq!(
            drain(&mut mon),
            vec![
                "Mossling fell asleep!",
                "Mossling is fast asleep.",
                "Mossling is fast asleep.",
                "Mossling woke up!",
            ]
        );
    }

    #[test]
    fn confusion_self_hit_costs_an_eighth() {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![3, 2, 1]);
        mon.set_volatile_status(ConditionId::Confusion, &mut rng);
        assert_eq!(mon.volatile_status_time, 3);

        assert!(!mon.on_before_move(&mut rng));
        assert_eq!(mon.hp(), 160 - 20);
        assert!(mon.on_before_move(&mut rng));
        assert_eq!(mon.volatile_status_time, 1);
    }

    #[test]
    fn confusion_wears_off_when_the_counter_hits_zero() {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![1, 1]);
        mon.set_volatile_status(ConditionId::Confusion, &mut rng);
        assert!(mon.on_before_move(&mut rng));
        assert!(mon.on_before_move(&mut rng));
        assert_eq!(mon.volatile_status, None);
        assert_eq!(rng.remaining_scripted(), Some(0));
    }

    #[test]
    fn major_status_blocks_before_volatile_hook_runs() {
        let mut mon = combatant();
        let mut rng = TurnRng::new_for_test(vec![1, 3]);
        mon.set_volatile_status(ConditionId::Confusion, &mut rng);
        mon.set_status(ConditionId::Sleep, &mut rng);
        assert!(!mon.on_before_move(&mut rng));
        assert_eq!(mon.volatile_status_time, 1);
    }
}
