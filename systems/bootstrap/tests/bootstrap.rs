use orb_arena_core::{CellCoord, Command, Event, SpawnError, Team};
use orb_arena_system_bootstrap::{Bootstrap, Roster};
use orb_arena_world::{self as world, map_import, query};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| (*name).to_owned()).collect()
}

#[test]
fn players_take_spawn_fields_in_reading_order() {
    let world = map_import::parse_ascii(
        "
        r...b
        r.o.b
        ..o..
        ",
    )
    .expect("valid layout");
    let roster = Roster::new(names(&["Alice", "Bob"]), names(&["Charlie", "Diana"]));

    let mut commands = Vec::new();
    Bootstrap.handle(&world, &roster, &mut commands);

    assert_eq!(
        commands,
        vec![
            Command::SpawnPlayer {
                name: "Alice".to_owned(),
                team: Team::Red,
                cell: CellCoord::new(0, 2),
            },
            Command::SpawnPlayer {
                name: "Charlie".to_owned(),
                team: Team::Blue,
                cell: CellCoord::new(4, 2),
            },
            Command::SpawnPlayer {
                name: "Bob".to_owned(),
                team: Team::Red,
                cell: CellCoord::new(0, 1),
            },
            Command::SpawnPlayer {
                name: "Diana".to_owned(),
                team: Team::Blue,
                cell: CellCoord::new(4, 1),
            },
            Command::SpawnOrb {
                cell: CellCoord::new(2, 1),
            },
        ]
    );
}

#[test]
fn surplus_players_are_not_seated() {
    let world = map_import::parse_ascii("r.o.b").expect("valid layout");
    let roster = Roster::new(names(&["Alice", "Bob"]), names(&["Charlie"]));

    let mut commands = Vec::new();
    Bootstrap.handle(&world, &roster, &mut commands);

    let seated: Vec<&str> = commands
        .iter()
        .filter_map(|command| match command {
            Command::SpawnPlayer { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(seated, vec!["Alice", "Charlie"]);
}

#[test]
fn map_without_orb_spawn_leaves_orb_unspawned() {
    let mut world = map_import::parse_ascii("r...b").expect("valid layout");
    let roster = Roster::new(names(&["Alice"]), names(&["Charlie"]));

    let mut commands = Vec::new();
    Bootstrap.handle(&world, &roster, &mut commands);
    assert!(!commands
        .iter()
        .any(|command| matches!(command, Command::SpawnOrb { .. })));

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    assert!(query::orb(&world).is_none());
    assert_eq!(query::players(&world).len(), 2);
}

#[test]
fn applied_commands_register_players_in_interleaved_order() {
    let mut world = map_import::parse_ascii(
        "
        r.o.b
        r...b
        ",
    )
    .expect("valid layout");
    let roster = Roster::new(names(&["Alice", "Bob"]), names(&["Charlie", "Diana"]));

    let mut commands = Vec::new();
    Bootstrap.handle(&world, &roster, &mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let order: Vec<&str> = query::players(&world)
        .iter()
        .map(|player| player.name())
        .collect();
    assert_eq!(order, vec!["Alice", "Charlie", "Bob", "Diana"]);
    assert!(events.contains(&Event::OrbSpawned {
        cell: CellCoord::new(2, 1),
    }));
    assert!(!events.iter().any(|event| matches!(
        event,
        Event::PlayerSpawnRejected {
            reason: SpawnError::Occupied,
            ..
        }
    )));
}
