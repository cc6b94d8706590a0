//! Game binary: opens a window and drops the player into a small arena.
use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use haert::spawn::dress_arena_system;
use haert::{init_logging, spawn_arena_system, ArenaSettings, InputMap, UnitsPlugin};

/// A third-person mech/car action game
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file remapping keyboard and mouse controls
    #[arg(long, value_name = "PATH")]
    input_map: Option<PathBuf>,

    /// Number of enemies in the arena
    #[arg(long, default_value_t = 3)]
    enemies: u16,

    /// Starting health of each enemy
    #[arg(long, default_value_t = haert::DEFAULT_ENEMY_HEALTH)]
    enemy_health: i32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input_map = match &args.input_map {
        Some(path) => InputMap::load(path)?,
        None => InputMap::default(),
    };

    let exit = App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_plugins(UnitsPlugin::default())
        .insert_resource(input_map)
        .insert_resource(ArenaSettings {
            enemy_count: args.enemies,
            enemy_health: args.enemy_health,
        })
        .add_systems(Startup, spawn_arena_system)
        .add_systems(Update, dress_arena_system)
        .run();

    if let AppExit::Error(code) = exit {
        anyhow::bail!("game exited with code {code}");
    }
    Ok(())
}
