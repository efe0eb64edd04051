use crate::battle::ai::{Behavior, BehaviorKind, RandomBehavior};
use crate::battle::engine::{
    replace_fainted_player, run_turn, send_next_opponent, send_out, switch_in, TurnAction,
};
use crate::battle::state::{
    BattleEvent, BattleKind, BattleOutcome, BattlePhase, BattleSide, BattleSlot, BattleState,
    EventBus, PartyContext, PromptKind, TurnRng,
};
use crate::config::BattleConfig;
use crate::creature::Combatant;
use crate::errors::{BattleError, BattleResult};
use crate::party::Party;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A choice from the top-level battle menu.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChoice {
    Fight,
    Party,
    Item,
    Run,
}

/// Player input, already abstracted from whatever device produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleIntent {
    SelectAction(ActionChoice),
    SelectMove(usize),
    SelectPartyMember(usize),
    ConfirmSwitchChoice(bool),
    CancelToActionSelection,
}

/// A trainer's roster and how it fights.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrainerParty {
    pub name: String,
    pub party: Party,
    pub behavior: BehaviorKind,
    /// The trainer's lead joins the player's party when the trainer is beaten.
    pub recruit_on_defeat: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum Encounter {
    Wild(Combatant),
    Trainer(TrainerParty),
}

/// What the caller gets back once the session is finished.
#[derive(Serialize, Debug, Clone)]
pub struct BattleReport {
    /// The player's roster with HP, status, level and experience carried over.
    pub party: Party,
    /// `None` if the battle was aborted.
    pub outcome: Option<BattleOutcome>,
    pub recruited: Option<Combatant>,
    pub turns: u32,
}

/// One battle between the player's party and an encounter, driven by [`BattleIntent`]s.
pub struct BattleSession {
    state: BattleState,
    rng: TurnRng,
    config: BattleConfig,
    opponent_ai: Box<dyn Behavior>,
}

impl std::fmt::Debug for BattleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleSession")
            .field("state", &self.state)
            .field("rng", &self.rng)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BattleSession {
    pub fn new(
        player: Party,
        encounter: Encounter,
        config: BattleConfig,
        rng: TurnRng,
    ) -> BattleResult<Self> {
        config.validate()?;
        let player_active = player
            .healthy_member()
            .ok_or(BattleError::NoHealthyCombatant)?;
        let player_side = BattleSide::new("Player", player, player_active);

        let (opponent_side, kind, opponent_ai): (BattleSide, BattleKind, Box<dyn Behavior>) =
            match encounter {
                Encounter::Wild(combatant) => {
                    if combatant.is_fainted() {
                        return Err(BattleError::NoHealthyCombatant);
                    }
                    (
                        BattleSide::new("Wild", Party::solo(combatant), 0),
                        BattleKind::Wild,
                        Box::new(RandomBehavior),
                    )
                }
                Encounter::Trainer(trainer) => {
                    let active = trainer
                        .party
                        .healthy_member()
                        .ok_or(BattleError::NoHealthyCombatant)?;
                    (
                        BattleSide::new(&trainer.name, trainer.party, active),
                        BattleKind::Trainer {
                            recruit_on_defeat: trainer.recruit_on_defeat,
                        },
                        trainer.behavior.behavior(),
                    )
                }
            };

        Ok(Self {
            state: BattleState::new(player_side, opponent_side, kind),
            rng,
            config,
            opponent_ai,
        })
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.state.outcome()
    }

    /// Introduce the encounter, send out both leads and ask for the first action.
    pub fn start(&mut self) -> BattleResult<EventBus> {
        match self.state.phase {
            BattlePhase::Start => {}
            BattlePhase::BattleOver(_) => return Err(BattleError::BattleAlreadyOver),
            _ => return Err(BattleError::AlreadyStarted),
        }

        let mut bus = EventBus::new();
        let opponent = self.state.side(BattleSlot::Opponent);
        match self.state.kind {
            BattleKind::Wild => bus.dialogue(format!("A wild {} appeared!", opponent.active().name())),
            BattleKind::Trainer { .. } => bus.dialogue(format!("{} wants to battle!", opponent.name)),
        }
        info!(
            player = self.state.active(BattleSlot::Player).name(),
            opponent = opponent.active().name(),
            kind = ?self.state.kind,
            "battle started"
        );

        send_out(&mut self.state, BattleSlot::Opponent, &mut bus);
        send_out(&mut self.state, BattleSlot::Player, &mut bus);
        self.prompt_action(&mut bus);
        Ok(bus)
    }

    /// Feed one player intent into the state machine.
    pub fn handle(&mut self, intent: BattleIntent) -> BattleResult<EventBus> {
        let mut bus = EventBus::new();
        match (self.state.phase, intent) {
            (BattlePhase::BattleOver(_), _) => return Err(BattleError::BattleAlreadyOver),

            (BattlePhase::ActionSelection, BattleIntent::SelectAction(choice)) => {
                self.handle_action_choice(choice, &mut bus)
            }

            (BattlePhase::MoveSelection, BattleIntent::SelectMove(index)) => {
                self.handle_move_choice(index, &mut bus)?
            }
            (BattlePhase::MoveSelection, BattleIntent::CancelToActionSelection) => {
                self.prompt_action(&mut bus)
            }

            (BattlePhase::PartySelection(context), BattleIntent::SelectPartyMember(index)) => {
                self.handle_party_choice(context, index, &mut bus)?
            }
            (BattlePhase::PartySelection(context), BattleIntent::CancelToActionSelection) => {
                match context {
                    PartyContext::Voluntary => self.prompt_action(&mut bus),
                    PartyContext::Fainted => {
                        bus.dialogue("You must choose a combatant!");
                        bus.push(BattleEvent::Prompt(PromptKind::ChoosePartyMember { forced: true }));
                    }
                    PartyContext::AboutToSwitch { next_opponent } => {
                        send_next_opponent(&mut self.state, next_opponent, &mut bus);
                        self.prompt_action(&mut bus);
                    }
                }
            }

            (BattlePhase::AboutToSwitch { next_opponent }, BattleIntent::ConfirmSwitchChoice(true)) => {
                self.state.phase =
                    BattlePhase::PartySelection(PartyContext::AboutToSwitch { next_opponent });
                bus.push(BattleEvent::Prompt(PromptKind::ChoosePartyMember { forced: false }));
            }
            (BattlePhase::AboutToSwitch { next_opponent }, BattleIntent::ConfirmSwitchChoice(false)) => {
                send_next_opponent(&mut self.state, next_opponent, &mut bus);
                self.prompt_action(&mut bus);
            }

            (phase, intent) => return Err(BattleError::UnexpectedIntent { intent, phase }),
        }
        Ok(bus)
    }

    /// Stop the battle without an outcome. Only allowed while waiting for input.
    pub fn abort(&mut self) -> BattleResult<()> {
        match self.state.phase {
            BattlePhase::BattleOver(_) => Err(BattleError::BattleAlreadyOver),
            phase if !phase.is_turn_boundary() => Err(BattleError::MidTurnAbort),
            _ => {
                info!(turns = self.state.turn_number, "battle aborted");
                self.state.phase = BattlePhase::BattleOver(None);
                Ok(())
            }
        }
    }

    /// Hand the player's roster back, with battle-only modifiers cleared.
    pub fn finish(self) -> BattleReport {
        let outcome = self.state.outcome();
        let turns = self.state.turn_number;
        let recruited = self.state.recruited;
        let [player, _] = self.state.sides;
        let mut party = player.party;
        party.on_battle_over();
        BattleReport {
            party,
            outcome,
            recruited,
            turns,
        }
    }

    fn handle_action_choice(&mut self, choice: ActionChoice, bus: &mut EventBus) {
        match choice {
            // Nothing left to pick from; the engine announces the pass.
            ActionChoice::Fight if !self.state.active(BattleSlot::Player).has_usable_move() => {
                self.resolve_turn(TurnAction::Pass, bus);
            }
            ActionChoice::Fight => {
                self.state.phase = BattlePhase::MoveSelection;
                bus.push(BattleEvent::Prompt(PromptKind::ChooseMove));
            }
            ActionChoice::Party => {
                self.state.phase = BattlePhase::PartySelection(PartyContext::Voluntary);
                bus.push(BattleEvent::Prompt(PromptKind::ChoosePartyMember { forced: false }));
            }
            ActionChoice::Item => {
                bus.dialogue("There are no items in the bag.");
                bus.push(BattleEvent::Prompt(PromptKind::ChooseAction));
            }
            ActionChoice::Run if self.state.is_trainer_battle() => {
                bus.dialogue("You can't run from a trainer battle!");
                bus.push(BattleEvent::Prompt(PromptKind::ChooseAction));
            }
            ActionChoice::Run => self.resolve_turn(TurnAction::Run, bus),
        }
    }

    fn handle_move_choice(&mut self, index: usize, bus: &mut EventBus) -> BattleResult<()> {
        let move_instance = self
            .state
            .active(BattleSlot::Player)
            .moves
            .get(index)
            .ok_or(BattleError::InvalidMoveIndex(index))?;
        if !move_instance.is_usable() {
            bus.dialogue("There's no PP left for this move!");
            bus.push(BattleEvent::Prompt(PromptKind::ChooseMove));
            return Ok(());
        }
        self.resolve_turn(TurnAction::UseMove { move_index: index }, bus);
        Ok(())
    }

    fn handle_party_choice(
        &mut self,
        context: PartyContext,
        index: usize,
        bus: &mut EventBus,
    ) -> BattleResult<()> {
        let side = self.state.side(BattleSlot::Player);
        let chosen = side
            .party
            .get(index)
            .ok_or(BattleError::InvalidPartyIndex(index))?;
        let forced = context == PartyContext::Fainted;
        if chosen.is_fainted() {
            bus.dialogue(format!("{} cannot fight right now!", chosen.name()));
            bus.push(BattleEvent::Prompt(PromptKind::ChoosePartyMember { forced }));
            return Ok(());
        }
        if index == side.active_index {
            bus.dialogue(format!("{} is already in battle!", chosen.name()));
            bus.push(BattleEvent::Prompt(PromptKind::ChoosePartyMember { forced }));
            return Ok(());
        }

        match context {
            PartyContext::Voluntary => {
                self.resolve_turn(TurnAction::Switch { party_index: index }, bus)
            }
            PartyContext::Fainted => {
                replace_fainted_player(&mut self.state, index, bus);
                self.prompt_action(bus);
            }
            PartyContext::AboutToSwitch { next_opponent } => {
                switch_in(&mut self.state, BattleSlot::Player, index, bus);
                send_next_opponent(&mut self.state, next_opponent, bus);
                self.prompt_action(bus);
            }
        }
        Ok(())
    }

    /// Let the opponent pick its move, then run the turn.
    fn resolve_turn(&mut self, player_action: TurnAction, bus: &mut EventBus) {
        let opponent_action = self
            .opponent_ai
            .choose_move(
                self.state.active(BattleSlot::Opponent),
                self.state.active(BattleSlot::Player),
                &mut self.rng,
            )
            .map_or(TurnAction::Pass, |move_index| TurnAction::UseMove { move_index });
        debug!(?player_action, ?opponent_action, "actions chosen");
        run_turn(
            &mut self.state,
            player_action,
            opponent_action,
            bus,
            &mut self.rng,
            &self.config,
        );
    }

    fn prompt_action(&mut self, bus: &mut EventBus) {
        self.state.phase = BattlePhase::ActionSelection;
        bus.push(BattleEvent::Prompt(PromptKind::ChooseAction));
    }
}
