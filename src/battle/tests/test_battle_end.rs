#[cfg(test)]
mod tests {
    use crate::battle::session::{ActionChoice, BattleIntent};
    use crate::battle::state::{BattleEvent, BattleOutcome, BattlePhase, BattleSlot, TurnRng};
    use crate::battle::tests::common::{
        assert_ok, growl, lines, predictable_rng, splash, start_trainer_battle, start_wild_battle,
        tackle, uniform_stats, TestCreatureBuilder,
    };
    use crate::creature::Combatant;
    use pretty_assertions::assert_eq;
    use schema::ConditionId;

    fn heavy_hitter(name: &str) -> Combatant {
        TestCreatureBuilder::new(name, 50)
            .with_stats(uniform_stats(100))
            .with_moves(vec![tackle()])
            .build()
    }

    fn fragile(name: &str) -> Combatant {
        TestCreatureBuilder::new(name, 2)
            .with_stats(uniform_stats(20))
            .with_moves(vec![splash()])
            .build()
    }

    #[test]
    fn test_faster_player_always_escapes() {
        // Level 100: speed = base + 5.
        let player = TestCreatureBuilder::new("Zippy", 100)
            .with_base_speed(95)
            .with_moves(vec![splash()])
            .build();
        let wild = TestCreatureBuilder::new("Plodder", 100)
            .with_base_speed(45)
            .with_moves(vec![splash()])
            .build();
        // No scripted values: the escape must not draw.
        let mut session = start_wild_battle(vec![player], wild, TurnRng::new_for_test(vec![]));

        let bus = assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Run)));

        assert_eq!(lines(&bus), vec!["Got away safely!"]);
        assert_eq!(session.outcome(), Some(BattleOutcome::Escaped));
        assert_eq!(session.state().escape_attempts, 1);
        assert_eq!(
            bus.events().last(),
            Some(&BattleEvent::BattleEnded { player_won: false })
        );
    }

    #[test]
    fn test_failed_escape_gives_the_foe_its_turn() {
        let player = TestCreatureBuilder::new("Zippy", 10)
            .with_moves(vec![splash()])
            .build();
        let wild = TestCreatureBuilder::new("Plodder", 10)
            .with_moves(vec![splash()])
            .build();
        // Equal speed: odds are (128 + 30) % 256 = 158 on the first attempt.
        let mut session = start_wild_battle(vec![player], wild, TurnRng::new_for_test(vec![200]));

        let bus = assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Run)));

        assert_eq!(lines(&bus), vec!["Can't escape!", "Plodder used Splash!"]);
        assert_eq!(session.phase(), BattlePhase::ActionSelection);
        assert_eq!(session.state().escape_attempts, 1);
    }

    #[test]
    fn test_cannot_run_from_a_trainer() {
        let mut session = start_trainer_battle(
            vec![heavy_hitter("Sparky")],
            vec![fragile("Pidge")],
            false,
            TurnRng::new_for_test(vec![]),
        );

        let bus = assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Run)));

        assert_eq!(lines(&bus), vec!["You can't run from a trainer battle!"]);
        assert_eq!(session.state().escape_attempts, 0);
        assert_eq!(session.state().turn_number, 0);
        assert_eq!(session.phase(), BattlePhase::ActionSelection);
    }

    #[test]
    fn test_wild_victory_awards_experience_and_levels_up() {
        // MediumFast: 125 exp at level 5, 216 for level 6, 343 for level 7.
        let player = TestCreatureBuilder::new("Sprout", 5)
            .with_stats(uniform_stats(100))
            .learns(1, tackle())
            .learns(6, growl())
            .build();
        assert_eq!(player.moves.len(), 1);
        let wild = TestCreatureBuilder::new("Puddle", 5)
            .with_exp_yield(255)
            .with_moves(vec![splash()])
            .with_hp(1)
            .build();
        let mut session = start_wild_battle(vec![player], wild, predictable_rng());

        assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Fight)));
        let bus = assert_ok(session.handle(BattleIntent::SelectMove(0)));

        // 255 * 5 / 7 = 182.
        assert_eq!(
            lines(&bus),
            vec![
                "Sprout used Tackle!",
                "Puddle fainted!",
                "Sprout gained 182 exp!",
                "Sprout grew to level 6!",
                "Sprout learned Growl!",
            ]
        );
        assert_eq!(session.outcome(), Some(BattleOutcome::Won));
        assert_eq!(
            bus.events().last(),
            Some(&BattleEvent::BattleEnded { player_won: true })
        );

        let report = session.finish();
        let sprout = &report.party.members()[0];
        assert_eq!(sprout.level, 6);
        assert_eq!(sprout.exp, 307);
        assert_eq!(sprout.moves.len(), 2);
        assert_eq!(report.recruited, None);
    }

    #[test]
    fn test_beaten_trainer_lead_joins_the_party() {
        let mut session = start_trainer_battle(
            vec![heavy_hitter("Sparky")],
            vec![fragile("Pidge")],
            true,
            predictable_rng(),
        );

        assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Fight)));
        let bus = assert_ok(session.handle(BattleIntent::SelectMove(0)));

        assert!(lines(&bus).contains(&"Pidge joined your party!".to_string()));
        assert_eq!(session.outcome(), Some(BattleOutcome::Won));

        let report = session.finish();
        assert_eq!(report.party.len(), 2);
        let recruit = match report.recruited {
            Some(recruit) => recruit,
            None => panic!("expected a recruit"),
        };
        assert_eq!(recruit.name(), "Pidge");
        assert_eq!(recruit.hp(), recruit.max_hp());
        assert_eq!(report.party.members()[1].hp(), recruit.max_hp());
    }

    #[test]
    fn test_recruit_is_turned_away_when_the_party_is_full() {
        let mut roster = vec![heavy_hitter("Sparky")];
        roster.extend((1..6).map(|i| heavy_hitter(&format!("Bench{}", i))));
        let mut session = start_trainer_battle(roster, vec![fragile("Pidge")], true, predictable_rng());

        assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Fight)));
        let bus = assert_ok(session.handle(BattleIntent::SelectMove(0)));

        assert!(lines(&bus).contains(&"Pidge wanted to join, but your party is full.".to_string()));
        let report = session.finish();
        assert_eq!(report.party.len(), 6);
        assert_eq!(report.recruited, None);
        assert_eq!(report.outcome, Some(BattleOutcome::Won));
    }

    #[test]
    fn test_no_poison_tick_once_the_wild_battle_is_won() {
        let player = TestCreatureBuilder::new("Sparky", 50)
            .with_stats(uniform_stats(100))
            .with_moves(vec![tackle()])
            .with_status(ConditionId::Poison, 0)
            .build();
        let mut session = start_wild_battle(vec![player], fragile("Pidge"), predictable_rng());

        assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Fight)));
        let bus = assert_ok(session.handle(BattleIntent::SelectMove(0)));

        assert!(!lines(&bus).iter().any(|line| line.contains("hurt by poison")));
        assert_eq!(session.outcome(), Some(BattleOutcome::Won));
        assert_eq!(session.state().active(BattleSlot::Player).hp(), 110);
    }

    #[test]
    fn test_losing_the_last_combatant_ends_the_battle() {
        let mut session = start_wild_battle(
            vec![fragile("Fragile")],
            heavy_hitter("Brute"),
            predictable_rng(),
        );

        assert_ok(session.handle(BattleIntent::SelectAction(ActionChoice::Fight)));
        let bus = assert_ok(session.handle(BattleIntent::SelectMove(0)));

        assert!(lines(&bus).contains(&"You have no more creatures that can fight!".to_string()));
        assert_eq!(session.outcome(), Some(BattleOutcome::Lost));
        assert!(session.state().active(BattleSlot::Player).is_fainted());
        assert_eq!(
            bus.events().last(),
            Some(&BattleEvent::BattleEnded { player_won: false })
        );
    }
}
