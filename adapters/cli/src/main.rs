#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the tower defence simulation headless.

mod ascii;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tower_defence_core::{Command, Event, GameConfig, TileCoord, TowerKind, Vec2};
use tower_defence_rendering::{FrameInput, NoAssets, RenderingBackend, Scene};
use tower_defence_world::{apply, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ascii::AsciiBackend;

/// Pointer position used while no cursor is over the map.
const NO_POINTER: Vec2 = Vec2::new(-1.0, -1.0);

#[derive(Parser, Debug)]
#[command(name = "tower-defence")]
#[command(about = "Runs a tower defence match headless and prints the final frame")]
struct Args {
    /// TOML file overriding the default game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level map file, one row of tile characters per line
    #[arg(long)]
    map: Option<PathBuf>,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Tower type used by --build clicks (archer or cannon)
    #[arg(long, value_parser = parse_kind, default_value = "archer")]
    select: TowerKind,

    /// Tile clicked before the first tick, as `column,row`; may be repeated
    #[arg(long = "build", value_parser = parse_tile)]
    builds: Vec<TileCoord>,
}

/// Entry point for the tower defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let tile_size = config.tile_size;
    let mut world = load_world(config, args.map.as_deref())?;

    let mut events = Vec::new();
    let mut summary = Summary::default();
    for input in scripted_inputs(args.select, &args.builds, tile_size) {
        for command in commands_for(input) {
            apply(&mut world, command, &mut events);
        }
    }
    summary.record(&events);

    for _ in 0..args.ticks {
        events.clear();
        apply(
            &mut world,
            Command::Tick {
                pointer: NO_POINTER,
            },
            &mut events,
        );
        summary.record(&events);
        if query::is_game_over(&world) {
            break;
        }
    }

    let mut backend = AsciiBackend::new(io::stdout().lock());
    backend.present(&Scene::capture(&world, &NoAssets))?;

    info!(
        ticks = query::tick_index(&world),
        towers = summary.towers,
        kills = summary.kills,
        breaches = summary.breaches,
        game_over = query::is_game_over(&world),
        "simulation finished"
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GameConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn load_world(config: GameConfig, map: Option<&Path>) -> Result<World> {
    let Some(path) = map else {
        return World::with_default_map(config).context("failed to build the default level");
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    let lines: Vec<&str> = contents.lines().collect();
    World::new(config, lines.as_slice()).with_context(|| format!("invalid map {}", path.display()))
}

/// Selection first, then one click per requested build tile.
fn scripted_inputs(select: TowerKind, builds: &[TileCoord], tile_size: f32) -> Vec<FrameInput> {
    let mut inputs = vec![FrameInput {
        select_kind: Some(select),
        ..FrameInput::default()
    }];
    inputs.extend(builds.iter().map(|tile| FrameInput {
        cursor_world_space: Some(tile.center(tile_size)),
        confirm_action: true,
        ..FrameInput::default()
    }));
    inputs
}

fn commands_for(input: FrameInput) -> Vec<Command> {
    let mut commands = Vec::new();
    if let Some(kind) = input.select_kind {
        commands.push(Command::SelectTowerType { kind });
    }
    if input.confirm_action {
        if let Some(pointer) = input.cursor_world_space {
            commands.push(Command::Click { pointer });
        }
    }
    commands
}

fn parse_kind(value: &str) -> Result<TowerKind, String> {
    TowerKind::from_name(value).ok_or_else(|| format!("unknown tower type `{value}`"))
}

fn parse_tile(value: &str) -> Result<TileCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("bad column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("bad row `{row}`: {error}"))?;
    Ok(TileCoord::new(column, row))
}

/// Running totals reported when the simulation ends.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    towers: u32,
    kills: u32,
    breaches: u32,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowerBuilt { .. } => self.towers += 1,
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyBreached { .. } => self.breaches += 1,
                _ => {}
            }
        }
    }
}
