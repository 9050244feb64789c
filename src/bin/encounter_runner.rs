//! Headless Encounter Runner
//!
//! Plays a run of fully simulated encounters with a starter party and
//! prints a JSON or text report.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use encounter_engine::attributes::AttributeSet;
use encounter_engine::encounter::{EncounterCatalog, EnemyTypeList};
use encounter_engine::session::SettlementReport;
use encounter_engine::{
    ActionCatalog, CombatantId, EngineConfig, EngineError, GameSession, Team,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Encounter Runner - AI-played encounters for balancing
#[derive(Parser, Debug)]
#[command(name = "encounter_runner")]
#[command(about = "Play simulated encounters and report the outcome")]
struct Args {
    /// Number of encounters to play
    #[arg(long, default_value_t = 10)]
    encounters: u32,

    /// Maximum rounds per encounter before giving up
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Action catalog file (TOML), defaults to the built-in catalog
    #[arg(long)]
    actions: Option<PathBuf>,

    /// Enemy types file (TOML)
    #[arg(long)]
    enemies: Option<PathBuf>,

    /// Encounter sets file (TOML)
    #[arg(long)]
    sets: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// One played encounter
#[derive(Serialize)]
struct EncounterSummary {
    index: u64,
    party: Vec<String>,
    enemies: Vec<String>,
    rounds: u32,
    winner: Team,
    /// Missing when the encounter was abandoned without a winner
    settlement: Option<SettlementReport>,
}

#[derive(Serialize)]
struct MemberSummary {
    name: String,
    level: u32,
    hp: i64,
    max_hp: i64,
    available: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    encounters: Vec<EncounterSummary>,
    rests: u32,
    roster: Vec<MemberSummary>,
}

const STARTER_PARTY: [(&str, [i64; 6]); 4] = [
    ("Warrior", [6, 0, 3, 2, 1, 1]),
    ("Mage", [0, 7, 1, 1, 1, 2]),
    ("Rogue", [3, 0, 1, 6, 0, 3]),
    ("Captain", [3, 1, 2, 1, 5, 1]),
];

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        "encounter_engine=debug"
    } else {
        "encounter_engine=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(result) => {
            print_result(&result, &args.format);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("encounter_runner: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunResult, Box<dyn Error>> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let catalog = match &args.actions {
        Some(path) => ActionCatalog::load_from_toml(path)?,
        None => ActionCatalog::with_defaults()?,
    };
    let types = match &args.enemies {
        Some(path) => EnemyTypeList::load_from_toml(path)?,
        None => EnemyTypeList::with_defaults()?,
    };
    let sets = match &args.sets {
        Some(path) => EncounterCatalog::load_from_toml(path)?,
        None => EncounterCatalog::with_defaults()?,
    };
    sets.check_types(&types)?;

    let mut session = GameSession::new(Arc::new(catalog), config)?;
    for (name, values) in STARTER_PARTY {
        session.create_party_member(name, AttributeSet::from_raw(values))?;
    }

    let mut encounters = Vec::new();
    let mut rests = 0;
    for _ in 0..args.encounters {
        if session.roster().is_empty() {
            tracing::warn!("The whole party has fallen");
            break;
        }

        let party: Vec<CombatantId> = session.available_party().iter().map(|c| c.id).collect();
        if party.is_empty() {
            // Nobody is ready; an empty encounter lets cooldowns tick down
            session.start_encounter(&[], Vec::new(), Vec::new(), true)?;
            session.finish_encounter(&mut rng)?;
            rests += 1;
            continue;
        }

        let index = session.start_generated_encounter(&party, &sets, &types, true, &mut rng)?;
        let party_names = names(&session, &party);
        let enemy_names = session.encounter().enemies.iter().map(|e| e.name.clone()).collect();

        let mut rounds = 0;
        let mut winner = Team::None;
        while rounds < args.max_rounds {
            rounds += 1;
            match session.simulate_round(&mut rng) {
                Ok(log) => winner = log.winner,
                Err(EngineError::NoLegalAction(id)) => {
                    tracing::warn!(
                        "Combatant {} has no legal action, stopping encounter {}",
                        id,
                        index
                    );
                    break;
                }
                Err(e) => return Err(e.into()),
            }
            if winner != Team::None {
                break;
            }
        }

        let settlement = if winner == Team::None {
            tracing::warn!("Encounter {} ended without a winner", index);
            session.abandon_encounter()?;
            None
        } else {
            let report = session.finish_encounter(&mut rng)?;
            spend_points(&mut session, &mut rng);
            Some(report)
        };

        encounters.push(EncounterSummary {
            index,
            party: party_names,
            enemies: enemy_names,
            rounds,
            winner,
            settlement,
        });
    }

    let roster = session
        .roster()
        .iter()
        .map(|c| MemberSummary {
            name: c.name.clone(),
            level: c.level,
            hp: c.hp,
            max_hp: c.max_hp,
            available: c.is_available(),
        })
        .collect();

    Ok(RunResult {
        seed,
        encounters,
        rests,
        roster,
    })
}

fn names(session: &GameSession, ids: &[CombatantId]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| session.member(*id))
        .map(|c| c.name.clone())
        .collect()
}

/// Assign any level-up points the way a player who trusts the defaults would
fn spend_points(session: &mut GameSession, rng: &mut ChaCha8Rng) {
    let ids: Vec<CombatantId> = session.roster().iter().map(|c| c.id).collect();
    for id in ids {
        if let Some(member) = session.member_mut(id) {
            member.assign_attribute_points(rng);
        }
    }
}

fn print_result(result: &RunResult, format: &str) {
    match format {
        "text" => {
            println!("Encounter Run");
            println!("=============");
            for encounter in &result.encounters {
                println!(
                    "#{}: {} vs {} -> {:?} after {} rounds",
                    encounter.index,
                    encounter.party.join(", "),
                    encounter.enemies.join(", "),
                    encounter.winner,
                    encounter.rounds
                );
                let Some(settlement) = &encounter.settlement else {
                    println!("    abandoned");
                    continue;
                };
                for award in &settlement.awards {
                    println!(
                        "    {} +{} XP (+{} levels)",
                        award.name, award.xp, award.levels_gained
                    );
                }
                if !settlement.fallen.is_empty() {
                    println!("    {} fallen", settlement.fallen.len());
                }
                if settlement.recruit.is_some() {
                    println!("    a new member joined");
                }
            }
            println!();
            println!("Rests: {}", result.rests);
            println!("Roster:");
            for member in &result.roster {
                println!(
                    "  {} (level {}) {}/{} HP",
                    member.name,
                    member.level,
                    member.hp,
                    member.max_hp
                );
            }
            println!("Seed: {}", result.seed);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("encounter_runner: failed to serialize report: {}", e),
            }
        }
    }
}
