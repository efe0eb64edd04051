//! A module for defining AI behaviors for battle opponents.

use crate::battle::state::TurnRng;
use crate::creature::Combatant;
use crate::move_data::Accuracy;
use schema::{CreatureType, MoveCategory, MoveTarget};
use serde::{Deserialize, Serialize};

/// A trait for anything that can pick a move for a combatant.
pub trait Behavior {
    /// Index of the move `me` should use against `foe`, or `None` if nothing has PP left.
    fn choose_move(&self, me: &Combatant, foe: &Combatant, rng: &mut TurnRng) -> Option<usize>;
}

/// Which behavior a trainer uses. Wild creatures always pick at random.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorKind {
    #[default]
    Random,
    Scoring,
}

impl BehaviorKind {
    pub fn behavior(self) -> Box<dyn Behavior> {
        match self {
            BehaviorKind::Random => Box::new(RandomBehavior),
            BehaviorKind::Scoring => Box::new(ScoringBehavior),
        }
    }
}

/// Uniform pick among moves with PP left. A single option consumes no draw.
pub struct RandomBehavior;

impl Behavior for RandomBehavior {
    fn choose_move(&self, me: &Combatant, _foe: &Combatant, rng: &mut TurnRng) -> Option<usize> {
        let usable = me.usable_move_indices();
        match usable.len() {
            0 => None,
            1 => Some(usable[0]),
            n => {
                let pick = rng.next_in("Opponent Move Choice", 0..=(n as u16 - 1));
                usable.get(pick as usize).copied()
            }
        }
    }
}

/// Picks the move with the best expected value: damage for attacks, utility for status moves.
pub struct ScoringBehavior;

impl ScoringBehavior {
    fn score_move(&self, me: &Combatant, foe: &Combatant, move_index: usize) -> f32 {
        let Some(move_instance) = me.moves.get(move_index) else {
            return f32::MIN;
        };
        let template = &move_instance.template;

        // --- Damage score ---
        let mut damage_score = 0.0;
        if template.category != MoveCategory::Status {
            let effectiveness = CreatureType::effectiveness_against(template.move_type, foe.types());
            // An immune target makes this a wasted turn.
            if effectiveness == 0.0 {
                return -1.0;
            }
            let stab = if me.template.has_type(template.move_type) {
                1.5
            } else {
                1.0
            };
            damage_score = template.power as f32 * effectiveness * stab;
        }

        // --- Utility score ---
        let mut utility_score = 0.0;
        for &(stat, stages) in &template.effects.boosts {
            match template.target {
                MoveTarget::User if stages > 0 && me.stat_stage(stat) < 6 => {
                    let potential_gain = 1.0 - (me.stat_stage(stat) as f32 / 6.0);
                    utility_score += 20.0 * stages as f32 * potential_gain;
                }
                MoveTarget::Foe if stages < 0 && foe.stat_stage(stat) > -6 => {
                    utility_score += 15.0 * stages.unsigned_abs() as f32;
                }
                _ => {}
            }
        }
        if let Some(status) = template.effects.status {
            let already_afflicted = if status.is_volatile() {
                foe.volatile_status.is_some()
            } else {
                foe.status.is_some()
            };
            if !already_afflicted {
                utility_score += 45.0;
            }
        }
        for secondary in &template.secondaries {
            if secondary.effects.status.is_some() && foe.status.is_none() {
                utility_score += 45.0 * secondary.chance as f32 / 100.0;
            }
        }

        if template.category == MoveCategory::Status && utility_score < 1.0 {
            return -1.0;
        }

        let accuracy = match template.accuracy {
            Accuracy::Percent(accuracy) => accuracy as f32,
            Accuracy::AlwaysHits => 101.0,
        };
        (damage_score + utility_score) * accuracy / 100.0
    }
}

impl Behavior for ScoringBehavior {
    fn choose_move(&self, me: &Combatant, foe: &Combatant, _rng: &mut TurnRng) -> Option<usize> {
        me.usable_move_indices()
            .into_iter()
            .max_by_key(|&index| ordered_float::OrderedFloat(self.score_move(me, foe, index)))
    }
}
