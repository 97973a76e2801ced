#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that runs a match: one decision and one action per player per
//! tick, in a fixed order, until the tick budget is spent.

use orb_arena_core::{Action, Event, PlayerId, Team};
use orb_arena_system_bootstrap::{Bootstrap, Roster};
use orb_arena_system_strategy::{StraightToOrb, Strategy};
use orb_arena_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default number of ticks a match lasts.
pub const DEFAULT_MAX_TICKS: u32 = 100;

/// How player decisions within one tick relate to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Each player decides against the world as left by the players before
    /// it, and its action is applied immediately.
    #[default]
    Sequential,
    /// Every player decides against the world as it was when the tick
    /// started; the actions are then applied in turn order.
    Snapshot,
}

/// Parameters that shape a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    max_ticks: u32,
    resolution: ResolutionMode,
}

impl MatchConfig {
    /// Creates a configuration with the provided tick budget and resolution.
    #[must_use]
    pub const fn new(max_ticks: u32, resolution: ResolutionMode) -> Self {
        Self {
            max_ticks,
            resolution,
        }
    }

    /// Last tick on which players still act.
    #[must_use]
    pub const fn max_ticks(&self) -> u32 {
        self.max_ticks
    }

    /// Resolution mode used for every tick.
    #[must_use]
    pub const fn resolution(&self) -> ResolutionMode {
        self.resolution
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TICKS, ResolutionMode::Sequential)
    }
}

/// Deliveries counted per team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scoreboard {
    red: u32,
    blue: u32,
}

impl Scoreboard {
    /// Deliveries made by the team so far.
    #[must_use]
    pub const fn deliveries(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    fn record(&mut self, team: Team) {
        let slot = match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Outcome of a single call to [`Match::process_tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    tick: u32,
    events: Vec<Event>,
    finished: bool,
}

impl TickReport {
    /// Tick counter after the call.
    #[must_use]
    pub const fn tick(&self) -> u32 {
        self.tick
    }

    /// World events produced during the tick, in application order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether the match has stopped.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }
}

#[derive(Debug)]
struct Contestant {
    player: PlayerId,
    strategy: Option<Box<dyn Strategy>>,
}

/// A running match: the arena, the players in turn order and the clock.
#[derive(Debug)]
pub struct Match {
    world: World,
    contestants: Vec<Contestant>,
    config: MatchConfig,
    tick: u32,
    running: bool,
    scoreboard: Scoreboard,
}

impl Match {
    /// Wraps an already populated world.
    ///
    /// Turn order is the world's registration order and every player starts
    /// with the [`StraightToOrb`] strategy.
    #[must_use]
    pub fn new(world: World, config: MatchConfig) -> Self {
        let contestants = query::players(&world)
            .iter()
            .map(|player| Contestant {
                player: player.id(),
                strategy: Some(Box::new(StraightToOrb) as Box<dyn Strategy>),
            })
            .collect();
        Self {
            world,
            contestants,
            config,
            tick: 0,
            running: true,
            scoreboard: Scoreboard::default(),
        }
    }

    /// Seats the roster and spawns the orb, then wraps the world.
    ///
    /// Returns the events produced while populating the arena.
    #[must_use]
    pub fn setup(mut world: World, roster: &Roster, config: MatchConfig) -> (Self, Vec<Event>) {
        let mut commands = Vec::new();
        Bootstrap.handle(&world, roster, &mut commands);

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        info!(
            players = query::players(&world).len(),
            orb = query::orb(&world).is_some(),
            "match_ready"
        );
        (Self::new(world, config), events)
    }

    /// Replaces the player's strategy; `None` leaves the player idle.
    ///
    /// Returns `false` when the player does not take part in the match.
    pub fn set_strategy(&mut self, player: PlayerId, strategy: Option<Box<dyn Strategy>>) -> bool {
        match self
            .contestants
            .iter_mut()
            .find(|contestant| contestant.player == player)
        {
            Some(contestant) => {
                contestant.strategy = strategy;
                true
            }
            None => false,
        }
    }

    /// Read-only access to the arena.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Players in the order they act within a tick.
    #[must_use]
    pub fn turn_order(&self) -> Vec<PlayerId> {
        self.contestants
            .iter()
            .map(|contestant| contestant.player)
            .collect()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub const fn tick(&self) -> u32 {
        self.tick
    }

    /// Whether players still act on the next tick.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Deliveries tallied so far.
    #[must_use]
    pub const fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Configuration the match runs with.
    #[must_use]
    pub const fn config(&self) -> MatchConfig {
        self.config
    }

    /// Advances the clock by one tick and lets every player act once.
    ///
    /// The tick that pushes the counter past the budget stops the match
    /// without any player acting. Later calls only advance the counter.
    pub fn process_tick(&mut self) -> TickReport {
        self.tick = self.tick.saturating_add(1);
        if !self.running {
            return self.report(Vec::new());
        }
        if self.tick > self.config.max_ticks {
            self.running = false;
            info!(
                tick = self.tick,
                red = self.scoreboard.red,
                blue = self.scoreboard.blue,
                "match_finished"
            );
            return self.report(Vec::new());
        }

        debug!(tick = self.tick, mode = ?self.config.resolution, "tick_started");
        let mut events = Vec::new();
        match self.config.resolution {
            ResolutionMode::Sequential => {
                for index in 0..self.contestants.len() {
                    let action = self.decide(index);
                    self.perform(index, action, &mut events);
                }
            }
            ResolutionMode::Snapshot => {
                let actions: Vec<Action> = (0..self.contestants.len())
                    .map(|index| self.decide(index))
                    .collect();
                for (index, action) in actions.into_iter().enumerate() {
                    self.perform(index, action, &mut events);
                }
            }
        }

        for event in &events {
            if let Event::OrbDelivered { team, .. } = event {
                self.scoreboard.record(*team);
            }
        }
        self.report(events)
    }

    fn decide(&self, index: usize) -> Action {
        let contestant = &self.contestants[index];
        contestant
            .strategy
            .as_ref()
            .map_or(Action::Idle, |strategy| strategy.decide(contestant.player, &self.world))
    }

    fn perform(&mut self, index: usize, action: Action, events: &mut Vec<Event>) {
        let player = self.contestants[index].player;
        if let Some(command) = action.into_command(player) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn report(&self, events: Vec<Event>) -> TickReport {
        TickReport {
            tick: self.tick,
            events,
            finished: !self.running,
        }
    }
}
