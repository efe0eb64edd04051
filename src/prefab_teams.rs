use crate::battle::ai::BehaviorKind;
use crate::battle::session::{Encounter, TrainerParty};
use crate::creature::Combatant;
use crate::errors::RosterError;
use crate::move_data::{EffectBundle, MoveTemplate};
use crate::party::Party;
use crate::species::CreatureTemplate;
use schema::{BaseStats, ConditionId, CreatureType, GrowthRate, MoveCategory, MoveTarget, Stat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A predefined roster configuration for demo battles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabTeam {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<PrefabMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabMember {
    pub species: String,
    pub level: u8,
}

impl PrefabMember {
    fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
        }
    }
}

/// A small built-in catalog of species, each sharing its move templates through `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dex {
    species: HashMap<String, Arc<CreatureTemplate>>,
}

impl Dex {
    pub fn species(&self, name: &str) -> Option<Arc<CreatureTemplate>> {
        self.species.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    fn insert(&mut self, template: CreatureTemplate) {
        self.species.insert(template.name.clone(), Arc::new(template));
    }

    /// Builds a combatant, or `None` for an unknown species name.
    pub fn combatant(&self, name: &str, level: u8) -> Option<Combatant> {
        self.species(name).map(|template| Combatant::new(template, level))
    }

    /// Unknown species in the team are skipped.
    pub fn build_party(&self, team: &PrefabTeam) -> Result<Party, RosterError> {
        let members = team
            .members
            .iter()
            .filter_map(|member| self.combatant(&member.species, member.level))
            .collect();
        Party::new(members)
    }
}

fn stats(hp: u16, attack: u16, defense: u16, sp_attack: u16, sp_defense: u16, speed: u16) -> BaseStats {
    BaseStats {
        hp,
        attack,
        defense,
        sp_attack,
        sp_defense,
        speed,
    }
}

/// The demo catalog.
pub fn demo_dex() -> Dex {
    use CreatureType::*;

    let tackle = Arc::new(MoveTemplate::new("Tackle", Normal, MoveCategory::Physical, 40, 100, 35));
    let scratch = Arc::new(MoveTemplate::new("Scratch", Normal, MoveCategory::Physical, 40, 100, 35));
    let quick_attack = Arc::new(
        MoveTemplate::new("Quick Attack", Normal, MoveCategory::Physical, 40, 100, 30).with_priority(1),
    );
    let growl = Arc::new(
        MoveTemplate::new("Growl", Normal, MoveCategory::Status, 0, 100, 40)
            .with_effects(MoveTarget::Foe, EffectBundle::boosts(vec![(Stat::Attack, -1)])),
    );
    let tail_whip = Arc::new(
        MoveTemplate::new("Tail Whip", Normal, MoveCategory::Status, 0, 100, 30)
            .with_effects(MoveTarget::Foe, EffectBundle::boosts(vec![(Stat::Defense, -1)])),
    );
    let growth = Arc::new(
        MoveTemplate::new("Growth", Normal, MoveCategory::Status, 0, 100, 20)
            .always_hits()
            .with_effects(MoveTarget::User, EffectBundle::boosts(vec![(Stat::SpAttack, 1)])),
    );
    let ember = Arc::new(
        MoveTemplate::new("Ember", Fire, MoveCategory::Special, 40, 100, 25).with_secondary(
            10,
            MoveTarget::Foe,
            EffectBundle::status(ConditionId::Burn),
        ),
    );
    let water_gun = Arc::new(MoveTemplate::new("Water Gun", Water, MoveCategory::Special, 40, 100, 25));
    let vine_whip = Arc::new(MoveTemplate::new("Vine Whip", Grass, MoveCategory::Physical, 45, 100, 25));
    let poison_powder = Arc::new(
        MoveTemplate::new("Poison Powder", Poison, MoveCategory::Status, 0, 75, 35)
            .with_effects(MoveTarget::Foe, EffectBundle::status(ConditionId::Poison)),
    );
    let sleep_powder = Arc::new(
        MoveTemplate::new("Sleep Powder", Grass, MoveCategory::Status, 0, 75, 15)
            .with_effects(MoveTarget::Foe, EffectBundle::status(ConditionId::Sleep)),
    );
    let thunder_shock = Arc::new(
        MoveTemplate::new("Thunder Shock", Electric, MoveCategory::Special, 40, 100, 30).with_secondary(
            10,
            MoveTarget::Foe,
            EffectBundle::status(ConditionId::Paralysis),
        ),
    );
    let thunder_wave = Arc::new(
        MoveTemplate::new("Thunder Wave", Electric, MoveCategory::Status, 0, 90, 20)
            .with_effects(MoveTarget::Foe, EffectBundle::status(ConditionId::Paralysis)),
    );
    let confusion = Arc::new(
        MoveTemplate::new("Confusion", Psychic, MoveCategory::Special, 50, 100, 25).with_secondary(
            10,
            MoveTarget::Foe,
            EffectBundle::status(ConditionId::Confusion),
        ),
    );
    let gust = Arc::new(MoveTemplate::new("Gust", Flying, MoveCategory::Special, 40, 100, 35));
    let rock_throw = Arc::new(MoveTemplate::new("Rock Throw", Rock, MoveCategory::Physical, 50, 90, 15));
    let defense_curl = Arc::new(
        MoveTemplate::new("Defense Curl", Normal, MoveCategory::Status, 0, 100, 40)
            .always_hits()
            .with_effects(MoveTarget::User, EffectBundle::boosts(vec![(Stat::Defense, 1)])),
    );
    let lick = Arc::new(
        MoveTemplate::new("Lick", Ghost, MoveCategory::Physical, 30, 100, 30).with_secondary(
            30,
            MoveTarget::Foe,
            EffectBundle::status(ConditionId::Paralysis),
        ),
    );

    let mut dex = Dex::default();
    dex.insert(
        CreatureTemplate::new("Sproutle", [Grass, Poison], stats(45, 49, 49, 65, 65, 45), 64, GrowthRate::MediumSlow)
            .learns(1, tackle.clone())
            .learns(3, growl.clone())
            .learns(7, vine_whip.clone())
            .learns(10, poison_powder)
            .learns(13, sleep_powder)
            .learns(16, growth),
    );
    dex.insert(
        CreatureTemplate::new("Emberling", [Fire, Typeless], stats(39, 52, 43, 60, 50, 65), 62, GrowthRate::MediumSlow)
            .learns(1, scratch.clone())
            .learns(1, growl.clone())
            .learns(7, ember)
            .learns(13, quick_attack.clone()),
    );
    dex.insert(
        CreatureTemplate::new("Shellkin", [Water, Typeless], stats(44, 48, 65, 50, 64, 43), 63, GrowthRate::MediumSlow)
            .learns(1, tackle.clone())
            .learns(4, tail_whip.clone())
            .learns(7, water_gun)
            .learns(10, defense_curl.clone()),
    );
    dex.insert(
        CreatureTemplate::new("Voltmouse", [Electric, Typeless], stats(35, 55, 40, 50, 50, 90), 112, GrowthRate::MediumFast)
            .learns(1, thunder_shock)
            .learns(1, growl.clone())
            .learns(6, tail_whip.clone())
            .learns(9, thunder_wave)
            .learns(11, quick_attack.clone()),
    );
    dex.insert(
        CreatureTemplate::new("Pebblet", [Rock, Ground], stats(40, 80, 100, 30, 30, 20), 60, GrowthRate::MediumSlow)
            .learns(1, tackle.clone())
            .learns(1, defense_curl)
            .learns(11, rock_throw),
    );
    dex.insert(
        CreatureTemplate::new("Wisplet", [Ghost, Poison], stats(30, 35, 30, 100, 35, 80), 62, GrowthRate::MediumSlow)
            .learns(1, lick)
            .learns(8, confusion),
    );
    dex.insert(
        CreatureTemplate::new("Skylark", [Normal, Flying], stats(40, 45, 40, 35, 35, 56), 50, GrowthRate::MediumSlow)
            .learns(1, tackle)
            .learns(5, gust)
            .learns(9, quick_attack),
    );
    dex
}

pub fn get_prefab_teams() -> Vec<PrefabTeam> {
    vec![
        PrefabTeam {
            id: "starter_team".to_string(),
            name: "Starter Team".to_string(),
            description: "A young trio covering Grass, Fire and Water".to_string(),
            members: vec![
                PrefabMember::new("Sproutle", 12),
                PrefabMember::new("Emberling", 11),
                PrefabMember::new("Shellkin", 11),
            ],
        },
        PrefabTeam {
            id: "rival_team".to_string(),
            name: "Rival Team".to_string(),
            description: "Fast hitters with status moves to slow the player down".to_string(),
            members: vec![
                PrefabMember::new("Skylark", 9),
                PrefabMember::new("Pebblet", 10),
                PrefabMember::new("Voltmouse", 11),
            ],
        },
    ]
}

pub fn get_prefab_team(id: &str) -> Option<PrefabTeam> {
    get_prefab_teams().into_iter().find(|team| team.id == id)
}

/// The opposing side for a demo battle: a wild creature, or the rival trainer.
pub fn demo_encounter(dex: &Dex, trainer: bool) -> Result<Encounter, RosterError> {
    if trainer {
        let team = get_prefab_team("rival_team").ok_or(RosterError::Empty)?;
        return Ok(Encounter::Trainer(TrainerParty {
            name: "Rival".to_string(),
            party: dex.build_party(&team)?,
            behavior: BehaviorKind::Scoring,
            recruit_on_defeat: true,
        }));
    }
    dex.combatant("Wisplet", 10)
        .map(Encounter::Wild)
        .ok_or(RosterError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_prefab_member_exists_in_the_dex() {
        let dex = demo_dex();
        for team in get_prefab_teams() {
            for member in &team.members {
                assert!(dex.species(&member.species).is_some(), "{} missing", member.species);
            }
            let party = dex.build_party(&team).unwrap();
            assert_eq!(party.len(), team.members.len());
        }
    }

    #[test]
    fn combatants_start_with_their_latest_moves() {
        let dex = demo_dex();
        let sproutle = dex.combatant("Sproutle", 12).unwrap();
        let names: Vec<&str> = sproutle.moves.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Tackle", "Growl", "Vine Whip", "Poison Powder"]);

        let sproutle = dex.combatant("Sproutle", 16).unwrap();
        let names: Vec<&str> = sproutle.moves.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Vine Whip", "Poison Powder", "Sleep Powder", "Growth"]);
    }

    #[test]
    fn demo_encounters_are_well_formed() {
        let dex = demo_dex();
        assert!(matches!(demo_encounter(&dex, false), Ok(Encounter::Wild(_))));
        match demo_encounter(&dex, true) {
            Ok(Encounter::Trainer(trainer)) => {
                assert_eq!(trainer.party.len(), 3);
                assert!(trainer.recruit_on_defeat);
            }
            other => panic!("expected a trainer encounter, got {:?}", other),
        }
    }
}
