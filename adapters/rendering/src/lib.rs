#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Orb Arena adapters.

use std::{collections::VecDeque, io::Write, thread, time::Duration};

use anyhow::{Context, Result as AnyResult};
use orb_arena_core::{CellCoord, Event, PlayerId, Rgb, Team, ORB_DISPLAY_COLOR};
use orb_arena_world::{map_import::glyph_for_tile, query, World};

/// Default number of lines kept by a [`MessageLog`].
pub const DEFAULT_MAX_MESSAGES: usize = 6;

/// Bounded log of human-readable lines. The oldest line is evicted first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl MessageLog {
    /// Creates an empty log holding at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a line, evicting the oldest ones beyond capacity.
    pub fn push<T>(&mut self, line: T)
    where
        T: Into<String>,
    {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            let _ = self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Lines currently held, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

/// Human-readable line for the events worth showing to a viewer.
///
/// Movement and rejections are left to the diagnostic log.
#[must_use]
pub fn describe_event(world: &World, event: &Event) -> Option<String> {
    let name = |player: PlayerId| {
        query::player(world, player)
            .map_or_else(|| format!("#{}", player.get()), |p| p.name().to_owned())
    };
    match event {
        Event::OrbPickedUp { player, .. } => {
            Some(format!("Player {} picked up the Meta Orb", name(*player)))
        }
        Event::OrbDropped { player, .. } => {
            Some(format!("Player {} dropped the Meta Orb", name(*player)))
        }
        Event::OrbDelivered { player, team, .. } => Some(format!(
            "Player {} brought the Meta Orb home for {}",
            name(*player),
            team.label()
        )),
        _ => None,
    }
}

/// What a single field looks like in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPresentation {
    /// Character drawn by text backends.
    pub glyph: char,
    /// Color drawn by graphical backends.
    pub color: Rgb,
}

/// Glyph for a player of the team standing on a field.
#[must_use]
pub const fn player_glyph(team: Team) -> char {
    match team {
        Team::Red => 'R',
        Team::Blue => 'B',
    }
}

/// Glyph for the player carrying the orb.
pub const CARRIER_GLYPH: char = '@';
/// Glyph for the orb lying on the ground.
pub const ORB_GLYPH: char = '*';

fn present_cell(world: &World, cell: CellCoord) -> CellPresentation {
    let Some(field) = query::field(world, cell) else {
        return CellPresentation {
            glyph: ' ',
            color: Rgb::new(0, 0, 0),
        };
    };
    if let Some(team) = field
        .player
        .and_then(|player| query::player(world, player))
        .map(|player| player.team())
    {
        let glyph = if field.orb {
            CARRIER_GLYPH
        } else {
            player_glyph(team)
        };
        return CellPresentation {
            glyph,
            color: team.display_color(),
        };
    }
    if field.orb {
        return CellPresentation {
            glyph: ORB_GLYPH,
            color: ORB_DISPLAY_COLOR,
        };
    }
    CellPresentation {
        glyph: glyph_for_tile(field.tile.kind()),
        color: field.tile.display_color(),
    }
}

/// Snapshot of the arena and message log ready to be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Line drawn above the arena.
    pub header: String,
    /// Width of the arena in fields.
    pub width: u32,
    /// Height of the arena in fields.
    pub height: u32,
    /// Fields row by row, top row first.
    pub cells: Vec<CellPresentation>,
    /// Message log lines, oldest first.
    pub messages: Vec<String>,
}

impl Scene {
    /// Captures the current arena and log.
    #[must_use]
    pub fn capture<T>(header: T, world: &World, log: &MessageLog) -> Self
    where
        T: Into<String>,
    {
        let (width, height) = query::dimensions(world);
        let mut cells = Vec::new();
        for y in (0..height).rev() {
            for x in 0..width {
                cells.push(present_cell(world, CellCoord::new(x, y)));
            }
        }
        Self {
            header: header.into(),
            width,
            height,
            cells,
            messages: log.lines().map(str::to_owned).collect(),
        }
    }

    /// Plain-text rendering: header, arena rows, then the messages.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.header);
        text.push('\n');
        let width = usize::try_from(self.width).unwrap_or(0);
        if width > 0 {
            for row in self.cells.chunks(width) {
                text.extend(row.iter().map(|cell| cell.glyph));
                text.push('\n');
            }
        }
        for message in &self.messages {
            text.push_str("> ");
            text.push_str(message);
            text.push('\n');
        }
        text
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Orb Arena scenes.
pub trait RenderingBackend {
    /// Runs the backend until `update_scene` reports that nothing is left to
    /// show.
    ///
    /// `update_scene` is called once per frame and returns `false` after the
    /// final scene has been written into it.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(&mut Scene) -> bool;
}

/// Backend that prints every frame as text to a writer.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
    frame_delay: Duration,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend that waits `frame_delay` between frames.
    #[must_use]
    pub const fn new(out: W, frame_delay: Duration) -> Self {
        Self { out, frame_delay }
    }

    fn draw(&mut self, scene: &Scene) -> AnyResult<()> {
        self.out
            .write_all(scene.to_text().as_bytes())
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush())
            .context("failed to write frame")
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(&mut Scene) -> bool,
    {
        writeln!(self.out, "{}", presentation.title).context("failed to write title")?;
        let mut scene = presentation.scene;
        self.draw(&scene)?;
        loop {
            if !self.frame_delay.is_zero() {
                thread::sleep(self.frame_delay);
            }
            let keep_going = update_scene(&mut scene);
            self.draw(&scene)?;
            if !keep_going {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use orb_arena_core::Command;
    use orb_arena_world::{self as world, map_import};

    use super::*;

    fn populated_world() -> (World, PlayerId, PlayerId) {
        let mut world = map_import::parse_ascii(
            "
            r.#
            .ob
            ",
        )
        .expect("valid layout");
        let mut events = Vec::new();
        for command in [
            Command::SpawnPlayer {
                name: "Alice".to_owned(),
                team: Team::Red,
                cell: CellCoord::new(0, 1),
            },
            Command::SpawnPlayer {
                name: "Charlie".to_owned(),
                team: Team::Blue,
                cell: CellCoord::new(2, 0),
            },
            Command::SpawnOrb {
                cell: CellCoord::new(1, 0),
            },
        ] {
            world::apply(&mut world, command, &mut events);
        }
        let ids: Vec<PlayerId> = query::players(&world).iter().map(|p| p.id()).collect();
        (world, ids[0], ids[1])
    }

    #[test]
    fn message_log_evicts_oldest_lines() {
        let mut log = MessageLog::new(2);
        log.push("one");
        log.push("two");
        log.push("three");

        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["two", "three"]);
    }

    #[test]
    fn zero_capacity_log_keeps_nothing() {
        let mut log = MessageLog::new(0);
        log.push("ignored");
        assert_eq!(log.lines().count(), 0);
    }

    #[test]
    fn scene_draws_top_row_first_with_occupants() {
        let (world, _, _) = populated_world();
        let mut log = MessageLog::default();
        log.push("Tick 1: Game continues...");

        let scene = Scene::capture("GAME OF ORB", &world, &log);

        assert_eq!(
            scene.to_text(),
            "GAME OF ORB\nR.#\n.*B\n> Tick 1: Game continues...\n"
        );
        assert_eq!(scene.cells[0].color, Team::Red.display_color());
        assert_eq!(scene.cells[4].color, ORB_DISPLAY_COLOR);
    }

    #[test]
    fn carrier_is_drawn_with_carrier_glyph() {
        let (mut world, alice, _) = populated_world();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::MovePlayer {
                player: alice,
                target: CellCoord::new(0, 0),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::MovePlayer {
                player: alice,
                target: CellCoord::new(1, 0),
            },
            &mut events,
        );
        world::apply(&mut world, Command::PickUpOrb { player: alice }, &mut events);

        let scene = Scene::capture("", &world, &MessageLog::default());

        assert_eq!(scene.to_text(), "\nr.#\n.@B\n");
        let lines: Vec<String> = events
            .iter()
            .filter_map(|event| describe_event(&world, event))
            .collect();
        assert_eq!(lines, vec!["Player Alice picked up the Meta Orb".to_owned()]);
    }

    #[test]
    fn text_backend_draws_until_update_stops() {
        let (world, _, _) = populated_world();
        let scene = Scene::capture("frame 0", &world, &MessageLog::default());
        let mut out = Vec::new();
        let mut frames = 0;

        TextBackend::new(&mut out, Duration::ZERO)
            .run(Presentation::new("GAME OF ORB", scene), |scene| {
                frames += 1;
                scene.header = format!("frame {frames}");
                frames < 2
            })
            .expect("writing to memory succeeds");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("GAME OF ORB\nframe 0\n"));
        assert!(text.contains("frame 1\n"));
        assert!(text.contains("frame 2\n"));
        assert!(!text.contains("frame 3"));
    }
}
