#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that populates a freshly loaded arena.

use orb_arena_core::{CellCoord, Command, Team, TileKind};
use orb_arena_world::{query, World};
use tracing::warn;

/// Player names of both teams, in the order they join the match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    red: Vec<String>,
    blue: Vec<String>,
}

impl Roster {
    /// Creates a roster from the two team lists.
    #[must_use]
    pub fn new(red: Vec<String>, blue: Vec<String>) -> Self {
        Self { red, blue }
    }

    /// Names registered for the team.
    #[must_use]
    pub fn team(&self, team: Team) -> &[String] {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    /// Entries alternating between the teams: red 0, blue 0, red 1, blue 1.
    ///
    /// Each entry carries the player's index within its own team. Once the
    /// shorter team runs out, the longer one continues alone.
    #[must_use]
    pub fn interleaved(&self) -> Vec<(Team, usize, &str)> {
        let rounds = self.red.len().max(self.blue.len());
        let mut entries = Vec::with_capacity(self.red.len() + self.blue.len());
        for index in 0..rounds {
            for team in [Team::Red, Team::Blue] {
                if let Some(name) = self.team(team).get(index) {
                    entries.push((team, index, name.as_str()));
                }
            }
        }
        entries
    }
}

/// Emits the commands that seat every roster player and spawn the orb.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Places the i-th player of each team on the i-th spawn field of that
    /// team in map reading order, then spawns the orb on the first orb spawn
    /// field.
    ///
    /// Players without a spawn field of their own are skipped. Maps without an
    /// orb spawn field leave the orb unspawned.
    pub fn handle(&self, world: &World, roster: &Roster, out: &mut Vec<Command>) {
        let red_cells = query::cells_of_kind(world, TileKind::RedSpawn);
        let blue_cells = query::cells_of_kind(world, TileKind::BlueSpawn);

        for (team, index, name) in roster.interleaved() {
            let cells: &[CellCoord] = match team {
                Team::Red => &red_cells,
                Team::Blue => &blue_cells,
            };
            let Some(cell) = cells.get(index).copied() else {
                warn!(name, team = team.label(), available = cells.len(), "no_spawn_field");
                continue;
            };
            out.push(Command::SpawnPlayer {
                name: name.to_owned(),
                team,
                cell,
            });
        }

        match query::cells_of_kind(world, TileKind::OrbSpawn).first() {
            Some(cell) => out.push(Command::SpawnOrb { cell: *cell }),
            None => warn!("no_orb_spawn_field"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn interleaved_alternates_and_continues_longer_team() {
        let roster = Roster::new(names(&["Alice", "Bob", "Eve"]), names(&["Charlie"]));

        assert_eq!(
            roster.interleaved(),
            vec![
                (Team::Red, 0, "Alice"),
                (Team::Blue, 0, "Charlie"),
                (Team::Red, 1, "Bob"),
                (Team::Red, 2, "Eve"),
            ]
        );
    }

    #[test]
    fn empty_roster_has_no_entries() {
        assert!(Roster::default().interleaved().is_empty());
    }
}
