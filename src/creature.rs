use crate::battle::conditions::condition;
use crate::battle::state::TurnRng;
use crate::battle::stats::{apply_stage, calculate_stats, MAX_STAGE};
use crate::move_data::MoveTemplate;
use crate::species::CreatureTemplate;
use schema::{BaseStats, ConditionId, CreatureType, Stat};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const MAX_MOVES: usize = 4;

/// A move slot: the shared template plus this combatant's remaining PP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub template: Arc<MoveTemplate>,
    pub pp: u8,
}

impl MoveInstance {
    pub fn new(template: Arc<MoveTemplate>) -> Self {
        let pp = template.max_pp;
        Self { template, pp }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn is_usable(&self) -> bool {
        self.pp > 0
    }

    pub fn use_pp(&mut self) {
        self.pp = self.pp.saturating_sub(1);
    }

    pub fn restore_pp(&mut self) {
        self.pp = self.template.max_pp;
    }
}

/// A creature instance taking part in battles. HP, status, level, experience and PP persist
/// between battles; stat stages and the volatile status do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub template: Arc<CreatureTemplate>,
    pub level: u8,
    pub exp: u32,
    hp: u16,
    /// Level-scaled stats before stages. `hp` holds max HP.
    stats: BaseStats,
    pub moves: Vec<MoveInstance>,
    pub status: Option<ConditionId>,
    pub status_time: u8,
    pub volatile_status: Option<ConditionId>,
    pub volatile_status_time: u8,
    stat_stages: HashMap<Stat, i8>,
    /// Dialogue produced by the combatant itself, drained by the engine after each step.
    #[serde(skip)]
    pub status_changes: VecDeque<String>,
    #[serde(skip)]
    pub hp_changed: bool,
    #[serde(skip)]
    pub status_changed: bool,
}

impl Combatant {
    /// Builds a combatant at full health with the most recently unlocked moves for its level.
    pub fn new(template: Arc<CreatureTemplate>, level: u8) -> Self {
        let stats = calculate_stats(&template.base_stats, level);
        let unlocked: Vec<Arc<MoveTemplate>> = template.moves_up_to(level).cloned().collect();
        let moves = unlocked
            .iter()
            .skip(unlocked.len().saturating_sub(MAX_MOVES))
            .cloned()
            .map(MoveInstance::new)
            .collect();
        let exp = template.growth_rate.exp_for_level(level);

        Self {
            template,
            level,
            exp,
            hp: stats.hp,
            stats,
            moves,
            status: None,
            status_time: 0,
            volatile_status: None,
            volatile_status_time: 0,
            stat_stages: HashMap::new(),
            status_changes: VecDeque::new(),
            hp_changed: false,
            status_changed: false,
        }
    }

    /// Replace the move list, keeping at most four.
    pub fn set_moves(&mut self, moves: Vec<Arc<MoveTemplate>>) {
        self.moves = moves.into_iter().take(MAX_MOVES).map(MoveInstance::new).collect();
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn types(&self) -> &[CreatureType; 2] {
        &self.template.types
    }

    pub fn hp(&self) -> u16 {
        self.hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.hp = hp.min(self.max_hp());
        self.hp_changed = true;
    }

    /// Lower HP by `damage`, stopping at zero. Returns true if this knocked the combatant out.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        let was_standing = self.hp > 0;
        self.hp = self.hp.saturating_sub(damage);
        self.hp_changed = true;
        was_standing && self.hp == 0
    }

    /// Full HP, PP restored, every status cleared.
    pub fn heal_full(&mut self) {
        self.hp = self.max_hp();
        self.status = None;
        self.status_time = 0;
        self.volatile_status = None;
        self.volatile_status_time = 0;
        for move_instance in &mut self.moves {
            move_instance.restore_pp();
        }
        self.hp_changed = true;
        self.status_changed = true;
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(MoveInstance::is_usable)
    }

    pub fn usable_move_indices(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, move_instance)| move_instance.is_usable())
            .map(|(index, _)| index)
            .collect()
    }

    /// Level-scaled stat before stages. Accuracy and evasion have no value of their own.
    pub fn raw_stat(&self, stat: Stat) -> u16 {
        self.stats.get(stat).unwrap_or(0)
    }

    /// Stat after applying its current stage.
    pub fn stat(&self, stat: Stat) -> u16 {
        apply_stage(self.raw_stat(stat), self.stat_stage(stat))
    }

    pub fn stat_stage(&self, stat: Stat) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Apply stage changes, clamped to +/-6. A change that hits the clamp is absorbed silently.
    pub fn apply_boosts(&mut self, boosts: &[(Stat, i8)]) {
        for &(stat, change) in boosts {
            let current = self.stat_stage(stat);
            let updated = (current + change).clamp(-MAX_STAGE, MAX_STAGE);
            if updated == current {
                continue;
            }
            self.stat_stages.insert(stat, updated);

            let verb = if updated > current { "rose" } else { "fell" };
            let line = format!("{}'s {} {}!", self.name(), stat, verb);
            self.status_changes.push_back(line);
        }
    }

    pub fn reset_stat_stages(&mut self) {
        self.stat_stages.clear();
    }

    /// Inflict a status. Confusion goes to the volatile slot; anything else to the major slot,
    /// which only takes a new status when empty.
    pub fn inflict(&mut self, id: ConditionId, rng: &mut TurnRng) {
        if id.is_volatile() {
            self.set_volatile_status(id, rng);
        } else {
            self.set_status(id, rng);
        }
    }

    pub fn set_status(&mut self, id: ConditionId, rng: &mut TurnRng) {
        if self.status.is_some() {
            return;
        }
        self.status = Some(id);
        self.status_time = 0;
        let entry = condition(id);
        if let Some(on_start) = entry.on_start {
            on_start(self, rng);
        }
        let line = format!("{}{}", self.name(), entry.start_message);
        self.status_changes.push_back(line);
        self.status_changed = true;
    }

    pub fn cure_status(&mut self) {
        self.status = None;
        self.status_time = 0;
        self.status_changed = true;
    }

    pub fn set_volatile_status(&mut self, id: ConditionId, rng: &mut TurnRng) {
        if self.volatile_status.is_some() {
            return;
        }
        self.volatile_status = Some(id);
        self.volatile_status_time = 0;
        let entry = condition(id);
        if let Some(on_start) = entry.on_start {
            on_start(self, rng);
        }
        let line = format!("{}{}", self.name(), entry.start_message);
        self.status_changes.push_back(line);
    }

    pub fn cure_volatile_status(&mut self) {
        self.volatile_status = None;
        self.volatile_status_time = 0;
    }

    /// Runs the major status hook, then the volatile one. False means the move is cancelled.
    pub fn on_before_move(&mut self, rng: &mut TurnRng) -> bool {
        let major_hook = self.status.and_then(|id| condition(id).on_before_move);
        if let Some(hook) = major_hook {
            if !hook(self, rng) {
                return false;
            }
        }

        let volatile_hook = self.volatile_status.and_then(|id| condition(id).on_before_move);
        match volatile_hook {
            Some(hook) => hook(self, rng),
            None => true,
        }
    }

    pub fn on_after_turn(&mut self) {
        if let Some(hook) = self.status.and_then(|id| condition(id).on_after_turn) {
            hook(self);
        }
        if let Some(hook) = self.volatile_status.and_then(|id| condition(id).on_after_turn) {
            hook(self);
        }
    }

    /// Clears battle-only state: stages and the volatile status.
    pub fn on_battle_over(&mut self) {
        self.cure_volatile_status();
        self.reset_stat_stages();
    }

    pub fn exp_for_next_level(&self) -> u32 {
        let next = self.level.saturating_add(1);
        self.template.growth_rate.exp_for_level(next)
    }

    /// Progress from the current level's threshold to the next, in `0.0..=1.0`.
    pub fn exp_fraction(&self) -> f32 {
        let floor = self.template.growth_rate.exp_for_level(self.level);
        let ceiling = self.exp_for_next_level();
        if ceiling <= floor {
            return 1.0;
        }
        let progress = self.exp.saturating_sub(floor) as f32 / (ceiling - floor) as f32;
        progress.clamp(0.0, 1.0)
    }

    /// Gain one level if experience has reached the next threshold. Stats are recomputed and
    /// current HP rises by the max HP gained.
    pub fn check_for_level_up(&mut self, max_level: u8) -> bool {
        if self.level >= max_level || self.exp < self.exp_for_next_level() {
            return false;
        }

        let old_max_hp = self.max_hp();
        self.level += 1;
        self.stats = calculate_stats(&self.template.base_stats, self.level);
        let gained = self.max_hp().saturating_sub(old_max_hp);
        self.hp = (self.hp + gained).min(self.max_hp());
        self.hp_changed = true;
        true
    }

    /// Moves the species unlocks exactly at the current level.
    pub fn moves_unlocked_at_level(&self) -> Vec<Arc<MoveTemplate>> {
        self.template.moves_at(self.level).cloned().collect()
    }

    /// Adds the move if a slot is free and it is not already known.
    pub fn learn_move(&mut self, move_: Arc<MoveTemplate>) -> bool {
        if self.moves.len() >= MAX_MOVES || self.moves.iter().any(|m| m.template.name == move_.name) {
            return false;
        }
        self.moves.push(MoveInstance::new(move_));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{GrowthRate, MoveCategory};

    fn move_named(name: &str) -> Arc<MoveTemplate> {
        Arc::new(MoveTemplate::new(name, CreatureType::Normal, MoveCategory::Physical, 40, 100, 10))
    }

    fn template() -> Arc<CreatureTemplate> {
        let mut template = CreatureTemplate::new(
            "Pebblit",
            [CreatureType::Rock, CreatureType::Typeless],
            BaseStats { hp: 40, attack: 80, defense: 100, sp_attack: 30, sp_defense: 30, speed: 20 },
            60,
            GrowthRate::MediumFast,
        );
        for (level, name) in [(1, "Tackle"), (1, "Defense Curl"), (5, "Rock Throw"), (8, "Mud Sport"), (11, "Rollout"), (12, "Magnitude")] {
            template = template.learns(level, move_named(name));
        }
        Arc::new(template)
    }

    #[test]
    fn new_combatant_keeps_last_four_unlocked_moves() {
        let combatant = Combatant::new(template(), 11);
        let names: Vec<&str> = combatant.moves.iter().map(MoveInstance::name).collect();
        assert_eq!(names, vec!["Defense Curl", "Rock Throw", "Mud Sport", "Rollout"]);
        assert!(combatant.moves.iter().all(|m| m.pp == 10));
        assert_eq!(combatant.exp, 1331);
        assert_eq!(combatant.hp(), combatant.max_hp());
    }

    #[test]
    fn damage_clamps_at_zero_and_reports_the_knockout_once() {
        let mut combatant = Combatant::new(template(), 10);
        let max = combatant.max_hp();
        assert!(!combatant.take_damage(max - 1));
        assert_eq!(combatant.hp(), 1);
        assert!(combatant.take_damage(500));
        assert_eq!(combatant.hp(), 0);
        assert!(!combatant.take_damage(5));
        assert!(combatant.is_fainted());
    }

    #[test]
    fn boosts_clamp_silently_at_six() {
        let mut combatant = Combatant::new(template(), 10);
        combatant.apply_boosts(&[(Stat::Attack, 4)]);
        combatant.apply_boosts(&[(Stat::Attack, 4)]);
        assert_eq!(combatant.stat_stage(Stat::Attack), 6);
        assert_eq!(combatant.status_changes.len(), 2);

        combatant.status_changes.clear();
        combatant.apply_boosts(&[(Stat::Attack, 1)]);
        assert_eq!(combatant.stat_stage(Stat::Attack), 6);
        assert!(combatant.status_changes.is_empty());
        assert_eq!(combatant.stat(Stat::Attack), combatant.raw_stat(Stat::Attack) * 3);
    }

    #[test]
    fn boost_lines_name_the_stat() {
        let mut combatant = Combatant::new(template(), 10);
        combatant.apply_boosts(&[(Stat::Defense, 1), (Stat::Speed, -2)]);
        assert_eq!(
            combatant.status_changes.iter().cloned().collect::<Vec<_>>(),
            vec!["Pebblit's Defense rose!".to_string(), "Pebblit's Speed fell!".to_string()]
        );
    }

    #[test]
    fn major_status_is_not_overwritten() {
        let mut combatant = Combatant::new(template(), 10);
        let mut rng = TurnRng::new_for_test(vec![]);
        combatant.set_status(ConditionId::Poison, &mut rng);
        combatant.set_status(ConditionId::Burn, &mut rng);
        assert_eq!(combatant.status, Some(ConditionId::Poison));
        assert!(combatant.status_changed);
    }

    #[test]
    fn battle_over_resets_only_battle_state() {
        let mut combatant = Combatant::new(template(), 10);
        let mut rng = TurnRng::new_for_test(vec![2]);
        combatant.apply_boosts(&[(Stat::Speed, 2)]);
        combatant.inflict(ConditionId::Confusion, &mut rng);
        combatant.inflict(ConditionId::Burn, &mut rng);
        combatant.take_damage(3);

        combatant.on_battle_over();
        assert_eq!(combatant.stat_stage(Stat::Speed), 0);
        assert_eq!(combatant.volatile_status, None);
        assert_eq!(combatant.status, Some(ConditionId::Burn));
        assert_eq!(combatant.hp(), combatant.max_hp() - 3);
    }

    #[test]
    fn level_up_raises_hp_by_the_max_hp_gain() {
        let mut combatant = Combatant::new(template(), 10);
        combatant.take_damage(5);
        let before = (combatant.hp(), combatant.max_hp());
        combatant.exp = 1331;

        assert!(combatant.check_for_level_up(100));
        assert_eq!(combatant.level, 11);
        let gain = combatant.max_hp() - before.1;
        assert_eq!(combatant.hp(), before.0 + gain);
        assert!(!combatant.check_for_level_up(100));
    }

    #[test]
    fn level_is_capped() {
        let mut combatant = Combatant::new(template(), 10);
        combatant.exp = u32::MAX;
        assert!(!combatant.check_for_level_up(10));
        assert_eq!(combatant.level, 10);
    }

    #[test]
    fn learning_fails_when_slots_are_full() {
        let mut combatant = Combatant::new(template(), 11);
        assert!(!combatant.learn_move(move_named("Magnitude")));

        let mut young = Combatant::new(template(), 1);
        assert!(young.learn_move(move_named("Rock Throw")));
        assert!(!young.learn_move(move_named("Rock Throw")));
        assert_eq!(young.moves.len(), 3);
    }

    #[test]
    fn experience_fraction_tracks_progress() {
        let mut combatant = Combatant::new(template(), 10);
        assert_eq!(combatant.exp_fraction(), 0.0);
        combatant.exp = 1000 + 331 / 2;
        assert!((combatant.exp_fraction() - 0.5).abs() < 0.01);
    }
}
