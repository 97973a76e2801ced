#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs an Orb Arena match in the terminal.

mod config;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use orb_arena_core::{Event, Team};
use orb_arena_rendering::{
    describe_event, MessageLog, Presentation, RenderingBackend, Scene, TextBackend,
};
use orb_arena_system_bootstrap::Roster;
use orb_arena_system_tick_driver::{Match, MatchConfig, ResolutionMode};
use orb_arena_world::{map_import, MapLoadError, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::GameConfig;

const TITLE: &str = "GAME OF ORB";

/// Runs an Orb Arena match in the terminal.
#[derive(Debug, Parser)]
#[command(name = "orb-arena", version, about)]
struct CliArgs {
    /// TOML file with game settings; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Name of the map, without extension.
    #[arg(long)]
    map: Option<String>,
    /// Folder containing the maps.
    #[arg(long)]
    map_folder: Option<PathBuf>,
    /// Number of ticks before the match ends.
    #[arg(long)]
    max_ticks: Option<u32>,
    /// Delay between ticks in milliseconds.
    #[arg(long)]
    tick_delay_ms: Option<u64>,
    /// Number of message log lines kept on screen.
    #[arg(long)]
    max_messages: Option<usize>,
    /// How decisions within a tick see each other's moves.
    #[arg(long, value_enum)]
    resolution: Option<ResolutionArg>,
    /// Red team player; repeat for more players.
    #[arg(long = "red")]
    red: Vec<String>,
    /// Blue team player; repeat for more players.
    #[arg(long = "blue")]
    blue: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResolutionArg {
    Sequential,
    Snapshot,
}

impl From<ResolutionArg> for ResolutionMode {
    fn from(value: ResolutionArg) -> Self {
        match value {
            ResolutionArg::Sequential => Self::Sequential,
            ResolutionArg::Snapshot => Self::Snapshot,
        }
    }
}

impl CliArgs {
    fn apply_to(self, config: &mut GameConfig) {
        if let Some(map) = self.map {
            config.map = map;
        }
        if let Some(folder) = self.map_folder {
            config.map_folder = folder;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(delay) = self.tick_delay_ms {
            config.tick_delay_ms = delay;
        }
        if let Some(max_messages) = self.max_messages {
            config.max_messages = max_messages;
        }
        if let Some(resolution) = self.resolution {
            config.resolution = resolution.into();
        }
        if !self.red.is_empty() {
            config.red = self.red;
        }
        if !self.blue.is_empty() {
            config.blue = self.blue;
        }
    }
}

/// Entry point for the Orb Arena command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    args.apply_to(&mut config);

    run(&config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(config: &GameConfig) -> Result<()> {
    let world = load_arena(&config.map_folder, &config.map)?;
    let roster = Roster::new(config.red.clone(), config.blue.clone());
    let (mut game, setup_events) = Match::setup(
        world,
        &roster,
        MatchConfig::new(config.max_ticks, config.resolution),
    );
    info!(
        max_ticks = game.config().max_ticks(),
        resolution = ?game.config().resolution(),
        players = game.turn_order().len(),
        "match_started"
    );
    for event in &setup_events {
        if let Event::PlayerSpawnRejected { name, cell, reason } = event {
            warn!(name = %name, ?cell, %reason, "player_not_seated");
        }
    }

    let mut log = MessageLog::new(config.max_messages);
    let scene = Scene::capture(header(&game), game.world(), &log);
    let backend = TextBackend::new(
        io::stdout().lock(),
        Duration::from_millis(config.tick_delay_ms),
    );

    backend.run(Presentation::new(TITLE, scene), |scene| {
        let report = game.process_tick();
        for event in report.events() {
            if let Some(line) = describe_event(game.world(), event) {
                log.push(line);
            }
        }
        if report.finished() {
            log.push("Game finished!");
        } else {
            log.push(format!("Tick {}: Game continues...", report.tick()));
        }
        *scene = Scene::capture(header(&game), game.world(), &log);
        !report.finished()
    })?;

    let scoreboard = game.scoreboard();
    info!(
        ticks = game.tick(),
        red = scoreboard.deliveries(Team::Red),
        blue = scoreboard.deliveries(Team::Blue),
        "game_over"
    );
    Ok(())
}

/// Loads `<folder>/<name>.png`, falling back to a `<folder>/<name>.txt`
/// text layout when no image exists.
fn load_arena(folder: &Path, name: &str) -> Result<World> {
    match map_import::load_named(folder, name) {
        Ok(world) => Ok(world),
        Err(MapLoadError::AssetMissing { path }) => {
            let layout_path = folder.join(format!("{name}.txt"));
            if !layout_path.is_file() {
                return Err(MapLoadError::AssetMissing { path })
                    .with_context(|| format!("failed to load map '{name}'"));
            }
            let layout = fs::read_to_string(&layout_path).with_context(|| {
                format!("failed to read map layout '{}'", layout_path.display())
            })?;
            let world = map_import::parse_ascii(&layout)
                .with_context(|| format!("invalid map layout '{}'", layout_path.display()))?;
            info!(path = %layout_path.display(), "map_loaded");
            Ok(world)
        }
        Err(error) => Err(error).with_context(|| format!("failed to load map '{name}'")),
    }
}

fn header(game: &Match) -> String {
    let scoreboard = game.scoreboard();
    format!(
        "tick {:>3}/{} | {} {} : {} {}",
        game.tick(),
        game.config().max_ticks(),
        Team::Red.label(),
        scoreboard.deliveries(Team::Red),
        scoreboard.deliveries(Team::Blue),
        Team::Blue.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_values() {
        let args = CliArgs::try_parse_from([
            "orb-arena",
            "--max-ticks",
            "5",
            "--red",
            "Zed",
            "--red",
            "Ann",
            "--resolution",
            "snapshot",
        ])
        .expect("valid flags");
        let mut config = GameConfig::default();

        args.apply_to(&mut config);

        assert_eq!(config.max_ticks, 5);
        assert_eq!(config.red, vec!["Zed".to_owned(), "Ann".to_owned()]);
        assert_eq!(config.blue, GameConfig::default().blue);
        assert_eq!(config.resolution, ResolutionMode::Snapshot);
    }

    #[test]
    fn header_shows_budget_and_score() {
        let world = map_import::parse_ascii("r.o.b").expect("valid layout");
        let roster = Roster::new(vec!["Alice".to_owned()], vec!["Charlie".to_owned()]);
        let (game, _) = Match::setup(
            world,
            &roster,
            MatchConfig::new(12, ResolutionMode::Sequential),
        );

        assert_eq!(header(&game), "tick   0/12 | RED 0 : 0 BLUE");
    }

    #[test]
    fn text_layout_is_used_when_no_image_exists() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("duel.txt"), "r.o.b\n").expect("write layout");

        let world = load_arena(dir.path(), "duel").expect("layout loads");
        assert_eq!(orb_arena_world::query::dimensions(&world), (5, 1));

        let error = load_arena(dir.path(), "absent").expect_err("missing map");
        assert!(matches!(
            error.downcast_ref::<MapLoadError>(),
            Some(MapLoadError::AssetMissing { .. })
        ));
    }
}
