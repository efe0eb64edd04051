use crate::creature::Combatant;
use crate::party::Party;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::ConditionId;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::trace;

/// One of the two sides of a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleSlot {
    Player,
    Opponent,
}

impl BattleSlot {
    pub fn to_index(self) -> usize {
        match self {
            BattleSlot::Player => 0,
            BattleSlot::Opponent => 1,
        }
    }

    pub fn opponent(self) -> BattleSlot {
        match self {
            BattleSlot::Player => BattleSlot::Opponent,
            BattleSlot::Opponent => BattleSlot::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Attack,
    Hit,
    Faint,
    Enter,
    Recall,
}

/// What the presentation layer should ask the player for next.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    ChooseAction,
    ChooseMove,
    ChoosePartyMember { forced: bool },
    ConfirmSwitch,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    DialogueLine(String),
    HealthDisplay {
        slot: BattleSlot,
        hp: u16,
        max_hp: u16,
    },
    /// Major status shown next to the health bar.
    StatusDisplay {
        slot: BattleSlot,
        status: Option<ConditionId>,
    },
    ExperienceDisplay {
        level: u8,
        fraction: f32,
    },
    Animation {
        kind: AnimationKind,
        slot: BattleSlot,
    },
    SentOut {
        slot: BattleSlot,
        name: String,
        level: u8,
    },
    Prompt(PromptKind),
    BattleEnded {
        player_won: bool,
    },
}

impl BattleEvent {
    /// The text a presentation layer would print, if the event has any.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::DialogueLine(line) => Some(line.clone()),
            BattleEvent::HealthDisplay { slot, hp, max_hp } => {
                Some(format!("[{:?} HP {}/{}]", slot, hp, max_hp))
            }
            BattleEvent::StatusDisplay { slot, status } => match status {
                Some(status) => Some(format!("[{:?} {}]", slot, status)),
                None => None,
            },
            BattleEvent::BattleEnded { player_won } => Some(if *player_won {
                "[You won the battle]".to_string()
            } else {
                "[The battle is over]".to_string()
            }),
            _ => None,
        }
    }

    /// Remaining health as a fraction of max, for health bars.
    pub fn health_fraction(&self) -> Option<f32> {
        match self {
            BattleEvent::HealthDisplay { hp, max_hp, .. } if *max_hp > 0 => {
                Some(*hp as f32 / *max_hp as f32)
            }
            _ => None,
        }
    }
}

/// Receives battle events as they are replayed.
pub trait BattleObserver {
    fn on_event(&mut self, event: &BattleEvent);
}

impl<F: FnMut(&BattleEvent)> BattleObserver for F {
    fn on_event(&mut self, event: &BattleEvent) {
        self(event)
    }
}

/// Ordered record of everything one intent produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn dialogue(&mut self, line: impl Into<String>) {
        self.events.push(BattleEvent::DialogueLine(line.into()));
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn dialogue_lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::DialogueLine(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn replay(&self, observer: &mut dyn BattleObserver) {
        for event in &self.events {
            observer.on_event(event);
        }
    }

    /// Print the dialogue, skipping events that carry no text.
    pub fn print_formatted(&self) {
        for event in &self.events {
            if let Some(formatted) = event.format() {
                println!("  {}", formatted);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { outcomes: Vec<u16>, index: usize },
}

/// The only source of randomness for a battle. Every draw carries a reason label so scripted
/// tests can tell which roll they ran out on.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    /// Replays `outcomes` in order. Values outside a draw's range are clamped into it.
    pub fn new_for_test(outcomes: Vec<u16>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn next_in(&mut self, reason: &str, range: RangeInclusive<u16>) -> u16 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(range),
            RngSource::Scripted { outcomes, index } => {
                let Some(&value) = outcomes.get(*index) else {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                *index += 1;
                value.clamp(*range.start(), *range.end())
            }
        };
        trace!(reason, outcome, "rng draw");
        outcome
    }

    /// Scripted values not yet consumed. `None` for a seeded source.
    pub fn remaining_scripted(&self) -> Option<usize> {
        match &self.source {
            RngSource::Seeded(_) => None,
            RngSource::Scripted { outcomes, index } => Some(outcomes.len() - index),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Won,
    Lost,
    Escaped,
}

impl BattleOutcome {
    pub fn player_won(self) -> bool {
        self == BattleOutcome::Won
    }
}

/// Why the party screen is open.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyContext {
    /// Chosen from the action menu; costs the player's turn.
    Voluntary,
    /// The active combatant fainted and must be replaced.
    Fainted,
    /// Accepted the offer to switch before the trainer sends out `next_opponent`.
    AboutToSwitch { next_opponent: usize },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Start,
    ActionSelection,
    MoveSelection,
    PartySelection(PartyContext),
    /// The trainer is about to send out the party member at `next_opponent`.
    AboutToSwitch { next_opponent: usize },
    RunningTurn,
    /// `None` when the battle was aborted.
    BattleOver(Option<BattleOutcome>),
}

impl BattlePhase {
    /// Phases that wait for player input.
    pub fn is_turn_boundary(self) -> bool {
        matches!(
            self,
            BattlePhase::Start
                | BattlePhase::ActionSelection
                | BattlePhase::MoveSelection
                | BattlePhase::PartySelection(_)
                | BattlePhase::AboutToSwitch { .. }
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleKind {
    Wild,
    Trainer { recruit_on_defeat: bool },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleSide {
    pub name: String,
    pub party: Party,
    pub active_index: usize,
}

impl BattleSide {
    pub fn new(name: &str, party: Party, active_index: usize) -> Self {
        Self {
            name: name.to_string(),
            party,
            active_index,
        }
    }

    pub fn active(&self) -> &Combatant {
        &self.party.members()[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut Combatant {
        &mut self.party.members_mut()[self.active_index]
    }
}

/// Faints from the current turn that still need the player's input once the turn stops.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaintFollowUp {
    /// The player's active combatant fainted and must be replaced.
    pub replace_player: bool,
    /// The trainer's next combatant, sent out after the player's replacement if there is one.
    pub next_opponent: Option<usize>,
}

impl FaintFollowUp {
    pub fn is_pending(&self) -> bool {
        self.replace_player || self.next_opponent.is_some()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub sides: [BattleSide; 2],
    pub kind: BattleKind,
    pub phase: BattlePhase,
    pub turn_number: u32,
    /// Escape attempts so far; each failure makes the next one likelier.
    pub escape_attempts: u32,
    /// Copy of the combatant that joined the player's party after a trainer victory.
    pub recruited: Option<Combatant>,
    #[serde(default)]
    pub follow_up: FaintFollowUp,
}

impl BattleState {
    pub fn new(player: BattleSide, opponent: BattleSide, kind: BattleKind) -> Self {
        Self {
            sides: [player, opponent],
            kind,
            phase: BattlePhase::Start,
            turn_number: 0,
            escape_attempts: 0,
            recruited: None,
            follow_up: FaintFollowUp::default(),
        }
    }

    pub fn side(&self, slot: BattleSlot) -> &BattleSide {
        &self.sides[slot.to_index()]
    }

    pub fn side_mut(&mut self, slot: BattleSlot) -> &mut BattleSide {
        &mut self.sides[slot.to_index()]
    }

    pub fn active(&self, slot: BattleSlot) -> &Combatant {
        self.side(slot).active()
    }

    pub fn active_mut(&mut self, slot: BattleSlot) -> &mut Combatant {
        self.side_mut(slot).active_mut()
    }

    /// Both active combatants at once, `slot`'s first.
    pub fn pair_mut(&mut self, slot: BattleSlot) -> (&mut Combatant, &mut Combatant) {
        let [player, opponent] = &mut self.sides;
        let (player, opponent) = (player.active_mut(), opponent.active_mut());
        match slot {
            BattleSlot::Player => (player, opponent),
            BattleSlot::Opponent => (opponent, player),
        }
    }

    pub fn is_trainer_battle(&self) -> bool {
        matches!(self.kind, BattleKind::Trainer { .. })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, BattlePhase::BattleOver(_))
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::BattleOver(outcome) => outcome,
            _ => None,
        }
    }
}
