//! Creature Battle - demo entry point
//!
//! Plays one battle between prefab rosters, choosing the player's intents automatically, and
//! prints the resulting dialogue with health and status markers (or every event as JSON).

use clap::Parser;
use creature_battle::battle::ai::{Behavior, ScoringBehavior};
use creature_battle::prefab_teams::{demo_dex, demo_encounter, get_prefab_team};
use creature_battle::{
    ActionChoice, BattleConfig, BattleIntent, BattlePhase, BattleResult,
    BattleSession, BattleSlot, EventBus, RosterError, TurnRng,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Intents are capped so a stalemate between two walls still terminates.
const MAX_INTENTS: usize = 1_000;

#[derive(Parser, Debug)]
#[command(name = "creature-battle", about = "Run a demo creature battle")]
struct Args {
    /// Seed for the battle RNG. Entropy is used when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a RON battle config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fight the rival trainer instead of a wild creature.
    #[arg(long)]
    trainer: bool,

    /// Print every event as a JSON line instead of dialogue.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creature_battle=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "battle failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> BattleResult<()> {
    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => TurnRng::from_seed(seed),
        None => TurnRng::from_entropy(),
    };

    let dex = demo_dex();
    let team = get_prefab_team("starter_team").ok_or(RosterError::Empty)?;
    let party = dex.build_party(&team)?;
    let encounter = demo_encounter(&dex, args.trainer)?;

    let mut session = BattleSession::new(party, encounter, config, rng)?;
    print_events(&session.start()?, args.json);

    // The autopilot never draws from the battle RNG.
    let mut autopilot_rng = TurnRng::from_seed(0);
    for _ in 0..MAX_INTENTS {
        if session.is_over() {
            break;
        }
        let intent = choose_intent(&session, &mut autopilot_rng);
        let bus = session.handle(intent)?;
        print_events(&bus, args.json);
    }

    if !session.is_over() {
        warn!(limit = MAX_INTENTS, "intent limit reached, aborting");
        session.abort()?;
    }

    let report = session.finish();
    info!(outcome = ?report.outcome, turns = report.turns, "demo finished");
    if !args.json {
        println!();
        for member in report.party.members() {
            println!(
                "{} Lv.{} HP {}/{}",
                member.name(),
                member.level,
                member.hp(),
                member.max_hp()
            );
        }
    }
    Ok(())
}

fn choose_intent(session: &BattleSession, rng: &mut TurnRng) -> BattleIntent {
    let state = session.state();
    match session.phase() {
        BattlePhase::ActionSelection => BattleIntent::SelectAction(ActionChoice::Fight),
        BattlePhase::MoveSelection => {
            let me = state.active(BattleSlot::Player);
            let foe = state.active(BattleSlot::Opponent);
            match ScoringBehavior.choose_move(me, foe, rng) {
                Some(index) => BattleIntent::SelectMove(index),
                None => BattleIntent::CancelToActionSelection,
            }
        }
        BattlePhase::PartySelection(_) => {
            let side = state.side(BattleSlot::Player);
            match side.party.healthy_member_except(side.active_index) {
                Some(index) => BattleIntent::SelectPartyMember(index),
                None => BattleIntent::CancelToActionSelection,
            }
        }
        BattlePhase::AboutToSwitch { .. } => BattleIntent::ConfirmSwitchChoice(false),
        // Start, RunningTurn and BattleOver never wait on the autopilot.
        _ => BattleIntent::CancelToActionSelection,
    }
}

fn print_events(bus: &EventBus, json: bool) {
    if !json {
        bus.print_formatted();
        return;
    }
    for event in bus.events() {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(err) => warn!(%err, ?event, "could not serialize event"),
        }
    }
}
