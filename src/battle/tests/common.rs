use crate::battle::ai::BehaviorKind;
use crate::battle::session::{BattleSession, Encounter, TrainerParty};
use crate::battle::state::{EventBus, TurnRng};
use crate::config::BattleConfig;
use crate::creature::Combatant;
use crate::errors::BattleResult;
use crate::move_data::{EffectBundle, MoveTemplate};
use crate::party::Party;
use crate::species::CreatureTemplate;
use schema::{BaseStats, ConditionId, CreatureType, GrowthRate, MoveCategory, MoveTarget, Stat};
use std::sync::Arc;

/// A builder for creating test combatants with common defaults: a single Normal type, every base
/// stat at 50, and a fresh species template so nothing is shared between tests.
///
/// # Example
/// ```ignore
/// let combatant = TestCreatureBuilder::new("Sparky", 25)
///     .with_types(CreatureType::Electric, CreatureType::Typeless)
///     .with_moves(vec![tackle()])
///     .with_status(ConditionId::Paralysis, 0)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    name: String,
    level: u8,
    types: [CreatureType; 2],
    base_stats: BaseStats,
    exp_yield: u32,
    learnset: Vec<(u8, MoveTemplate)>,
    moves: Option<Vec<MoveTemplate>>,
    status: Option<(ConditionId, u8)>,
    current_hp: Option<u16>,
}

impl TestCreatureBuilder {
    pub fn new(name: &str, level: u8) -> Self {
        Self {
            name: name.to_string(),
            level,
            types: [CreatureType::Normal, CreatureType::Typeless],
            base_stats: uniform_stats(50),
            exp_yield: 50,
            learnset: Vec::new(),
            moves: None,
            status: None,
            current_hp: None,
        }
    }

    pub fn with_types(mut self, primary: CreatureType, secondary: CreatureType) -> Self {
        self.types = [primary, secondary];
        self
    }

    pub fn with_stats(mut self, base_stats: BaseStats) -> Self {
        self.base_stats = base_stats;
        self
    }

    pub fn with_base_hp(mut self, hp: u16) -> Self {
        self.base_stats.hp = hp;
        self
    }

    pub fn with_base_speed(mut self, speed: u16) -> Self {
        self.base_stats.speed = speed;
        self
    }

    pub fn with_exp_yield(mut self, exp_yield: u32) -> Self {
        self.exp_yield = exp_yield;
        self
    }

    /// Adds a learnset entry. Moves unlocked by the starting level are known from the start.
    pub fn learns(mut self, level: u8, move_: MoveTemplate) -> Self {
        self.learnset.push((level, move_));
        self
    }

    /// Overrides the move list derived from the learnset.
    pub fn with_moves(mut self, moves: Vec<MoveTemplate>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Sets a major status with its turn counter, skipping the on-start roll.
    pub fn with_status(mut self, status: ConditionId, turns: u8) -> Self {
        self.status = Some((status, turns));
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Combatant {
        let mut template = CreatureTemplate::new(
            &self.name,
            self.types,
            self.base_stats,
            self.exp_yield,
            GrowthRate::MediumFast,
        );
        for (level, move_) in self.learnset {
            template = template.learns(level, Arc::new(move_));
        }

        let mut combatant = Combatant::new(Arc::new(template), self.level);
        if let Some(moves) = self.moves {
            combatant.set_moves(moves.into_iter().map(Arc::new).collect());
        }
        if let Some((status, turns)) = self.status {
            combatant.status = Some(status);
            combatant.status_time = turns;
        }
        if let Some(hp) = self.current_hp {
            combatant.set_hp(hp);
        }
        combatant.hp_changed = false;
        combatant
    }
}

pub fn uniform_stats(value: u16) -> BaseStats {
    BaseStats {
        hp: value,
        attack: value,
        defense: value,
        sp_attack: value,
        sp_defense: value,
        speed: value,
    }
}

/// Normal, physical, 40 power, 100% accurate (so it consumes an accuracy draw).
pub fn tackle() -> MoveTemplate {
    MoveTemplate::new("Tackle", CreatureType::Normal, MoveCategory::Physical, 40, 100, 35)
}

/// Fire, special, 40 power, never misses.
pub fn ember() -> MoveTemplate {
    MoveTemplate::new("Ember", CreatureType::Fire, MoveCategory::Special, 40, 100, 25).always_hits()
}

/// A status move with no effect at all. Consumes no draws.
pub fn splash() -> MoveTemplate {
    MoveTemplate::new("Splash", CreatureType::Normal, MoveCategory::Status, 0, 100, 40).always_hits()
}

pub fn growl() -> MoveTemplate {
    MoveTemplate::new("Growl", CreatureType::Normal, MoveCategory::Status, 0, 100, 40)
        .always_hits()
        .with_effects(MoveTarget::Foe, EffectBundle::boosts(vec![(Stat::Attack, -1)]))
}

/// Builds and starts a wild battle.
pub fn start_wild_battle(player: Vec<Combatant>, wild: Combatant, rng: TurnRng) -> BattleSession {
    let party = match Party::new(player) {
        Ok(party) => party,
        Err(err) => panic!("invalid test party: {}", err),
    };
    let mut session = assert_ok(BattleSession::new(
        party,
        Encounter::Wild(wild),
        BattleConfig::default(),
        rng,
    ));
    assert_ok(session.start());
    session
}

/// Builds and starts a battle against a trainer that scores its moves (no AI draws).
pub fn start_trainer_battle(
    player: Vec<Combatant>,
    trainer: Vec<Combatant>,
    recruit_on_defeat: bool,
    rng: TurnRng,
) -> BattleSession {
    let (party, trainer_party) = match (Party::new(player), Party::new(trainer)) {
        (Ok(party), Ok(trainer_party)) => (party, trainer_party),
        _ => panic!("invalid test party"),
    };
    let encounter = Encounter::Trainer(TrainerParty {
        name: "Rival".to_string(),
        party: trainer_party,
        behavior: BehaviorKind::Scoring,
        recruit_on_defeat,
    });
    let mut session = assert_ok(BattleSession::new(party, encounter, BattleConfig::default(), rng));
    assert_ok(session.start());
    session
}

/// Dialogue lines of a bus, owned so they outlive the bus.
pub fn lines(bus: &EventBus) -> Vec<String> {
    bus.dialogue_lines().into_iter().map(str::to_string).collect()
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// With the default config that means: every accuracy roll hits, no critical hits, the lowest
/// damage roll (85), and no secondary effect with a chance below 50%.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
