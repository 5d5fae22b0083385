#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Blast Arena match in the terminal.

mod arena;

use std::{fs, path::PathBuf};

use anyhow::Context;
use blast_arena_core::{Command, Event, PlayerId, PlayerKind, TilePoint};
use blast_arena_system_decision::{Decision, ScoreWeights};
use blast_arena_world::{apply, query, World};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the Blast Arena binary.
#[derive(Debug, Parser)]
#[command(name = "blast-arena", about = "Runs an AI-only Blast Arena match")]
struct Args {
    /// Number of tile columns in the arena.
    #[arg(long, default_value_t = 17)]
    width: u32,
    /// Number of tile rows in the arena.
    #[arg(long, default_value_t = 11)]
    height: u32,
    /// Number of AI opponents to spawn, up to three.
    #[arg(long, default_value_t = 3)]
    opponents: u32,
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 64)]
    ticks: u64,
    /// Seed for the crate layout generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Probability that an open tile holds a crate.
    #[arg(long, default_value_t = 0.35)]
    crate_density: f64,
    /// Print the field after every tick instead of only at the end.
    #[arg(long)]
    watch: bool,
    /// Path to a TOML file overriding the scoring weights.
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Blast radius of every placed bomb.
    #[arg(long, default_value_t = 2)]
    explosion_radius: u32,
    /// Ticks a player must wait between successive moves.
    #[arg(long, default_value_t = 1)]
    movement_cooldown: u32,
}

/// Entry point for the Blast Arena command-line interface.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let weights = load_weights(args.weights.as_deref())?;

    let mut world = World::new();
    let mut events = Vec::new();
    println!("{}", query::welcome_banner(&world));

    for command in arena::layout_commands(args.width, args.height, args.crate_density, args.seed) {
        apply(&mut world, command, &mut events);
    }

    let corners = arena::spawn_corners(args.width, args.height);
    let user = spawn(
        &mut world,
        &mut events,
        PlayerKind::User,
        corners[0],
        &args,
    )
    .context("user spawn tile rejected; arena too small")?;
    let opponent_count = args.opponents.min(3) as usize;
    let mut opponents = Vec::with_capacity(opponent_count);
    for corner in corners.iter().skip(1).take(opponent_count) {
        let id = spawn(&mut world, &mut events, PlayerKind::Ai, *corner, &args)
            .context("opponent spawn tile rejected; arena too small")?;
        opponents.push(id);
    }
    info!(user = user.get(), opponents = opponents.len(), "match started");

    let mut decision = Decision::with_weights(weights);
    let mut commands = Vec::new();
    for _ in 0..args.ticks {
        events.clear();
        apply(&mut world, Command::Tick, &mut events);

        for opponent in &opponents {
            commands.clear();
            decision.update(&world, *opponent, &mut commands);
            for command in commands.drain(..) {
                apply(&mut world, command, &mut events);
            }
        }

        for event in &events {
            if let Event::PlayerRemoved { player } = event {
                decision.cleanup(*player);
                opponents.retain(|id| id != player);
            }
        }

        if args.watch {
            println!("{}", arena::render(&world));
        }
    }

    if !args.watch {
        println!("{}", arena::render(&world));
    }
    info!(
        bombs = query::field(&world).bombs().len(),
        "match finished"
    );
    Ok(())
}

fn load_weights(path: Option<&std::path::Path>) -> anyhow::Result<ScoreWeights> {
    let Some(path) = path else {
        return Ok(ScoreWeights::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read weights file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse weights file {}", path.display()))
}

fn spawn(
    world: &mut World,
    events: &mut Vec<Event>,
    kind: PlayerKind,
    position: TilePoint,
    args: &Args,
) -> Option<PlayerId> {
    events.clear();
    apply(
        world,
        Command::SpawnPlayer {
            kind,
            position,
            explosion_radius: args.explosion_radius,
            movement_cooldown: args.movement_cooldown,
        },
        events,
    );
    events.iter().find_map(|event| match event {
        Event::PlayerSpawned { player, .. } => Some(*player),
        _ => None,
    })
}
