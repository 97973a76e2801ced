#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision policies that choose one action per player per tick.

use std::fmt::Debug;

use orb_arena_core::{Action, CellCoord, PlayerId};
use orb_arena_world::{query, OrbLocation, World};
use tracing::trace;

/// Policy deciding what a player does next.
///
/// Implementations only read the world; every mutation happens when the
/// returned action is applied.
pub trait Strategy: Debug {
    /// Chooses the action for `player` given the current arena.
    fn decide(&self, player: PlayerId, world: &World) -> Action;
}

/// Baseline policy: fetch the orb, bring it home, chase whoever stole it.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightToOrb;

impl Strategy for StraightToOrb {
    fn decide(&self, player: PlayerId, world: &World) -> Action {
        let Some(orb) = query::orb(world) else {
            return Action::Idle;
        };
        let (Some(position), Some(me)) = (
            query::position_of(world, player),
            query::player(world, player),
        ) else {
            return Action::Idle;
        };

        let goal = match orb.location() {
            OrbLocation::Carried(carrier) => {
                let carrier_team = query::player(world, carrier).map(|other| other.team());
                if carrier_team == Some(me.team()) {
                    query::nearest_cell_of_kind(world, position, me.team().spawn_tile())
                } else {
                    query::position_of(world, carrier)
                }
            }
            OrbLocation::OnGround(cell) if cell == position => return Action::PickUp,
            OrbLocation::OnGround(cell) => Some(cell),
        };

        step_toward(world, player, position, goal)
    }
}

fn step_toward(
    world: &World,
    player: PlayerId,
    position: CellCoord,
    goal: Option<CellCoord>,
) -> Action {
    let Some(goal) = goal else {
        return Action::Idle;
    };
    match query::next_step(world, position, goal) {
        Some(target) => Action::Move { target },
        None => {
            trace!(player = player.get(), ?position, ?goal, "no_step_available");
            Action::Idle
        }
    }
}
