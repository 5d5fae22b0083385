use blast_arena_core::{Command, Event, JobKind, PlayerId, PlayerKind, Terrain, TilePoint};
use blast_arena_system_decision::Decision;
use blast_arena_world::{apply, query, World};

fn open_world(width: u32, height: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(&mut world, Command::ConfigureField { width, height }, &mut events);
    world
}

fn spawn(world: &mut World, kind: PlayerKind, position: TilePoint, cooldown: u32) -> PlayerId {
    let mut events = Vec::new();
    apply(
        world,
        Command::SpawnPlayer {
            kind,
            position,
            explosion_radius: 1,
            movement_cooldown: cooldown,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::PlayerSpawned { player, .. }] => *player,
        other => panic!("expected a spawn event, got {other:?}"),
    }
}

fn run_tick(
    world: &mut World,
    decision: &mut Decision,
    agent: PlayerId,
    out_events: &mut Vec<Event>,
) {
    let mut commands = Vec::new();
    decision.update(world, agent, &mut commands);
    for command in commands {
        apply(world, command, out_events);
    }
}

#[test]
fn open_field_generates_one_bomb_candidate_per_tile() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut commands = Vec::new();
    decision.update(&world, agent, &mut commands);

    let list = decision
        .job_list(agent)
        .expect("decision tick must build a job list");
    assert_eq!(
        list.len(),
        25,
        "an all-walkable, reachable, safe field keeps every bomb site",
    );
    assert!(list.iter().all(|job| job.kind() == JobKind::BombDrop));
}

#[test]
fn agent_advances_one_step_toward_the_winning_bomb_site() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut events = Vec::new();
    run_tick(&mut world, &mut decision, agent, &mut events);

    let position = query::player(&world, agent)
        .expect("agent still exists")
        .position;
    assert_eq!(
        TilePoint::new(0, 0).manhattan_distance(position),
        1,
        "the agent must advance exactly one pathfinding hop",
    );
}

#[test]
fn bomb_run_ends_with_a_placed_bomb() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut events = Vec::new();
    for _ in 0..16 {
        run_tick(&mut world, &mut decision, agent, &mut events);
        if events
            .iter()
            .any(|event| matches!(event, Event::BombPlaced { .. }))
        {
            break;
        }
    }

    let placed = events.iter().find_map(|event| match event {
        Event::BombPlaced { player, bomb } => Some((*player, *bomb)),
        _ => None,
    });
    let (player, bomb) = placed.expect("the bomb run must end with a placement");
    assert_eq!(player, agent);
    assert_eq!(
        bomb.position,
        query::player(&world, agent).expect("agent exists").position,
        "the bomb lands on the tile the agent walked to",
    );
}

#[test]
fn burning_tile_produces_an_escape_move() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let start = TilePoint::new(2, 2);
    let agent = spawn(&mut world, PlayerKind::Ai, start, 0);
    let mut events = Vec::new();
    apply(&mut world, Command::IgniteTile { position: start }, &mut events);
    let mut decision = Decision::new();

    run_tick(&mut world, &mut decision, agent, &mut events);

    let list = decision.job_list(agent).expect("job list exists");
    assert!(
        list.iter().any(|job| job.kind() == JobKind::Escape),
        "a threatened agent must hold escape candidates",
    );

    let position = query::player(&world, agent).expect("agent exists").position;
    assert_ne!(position, start, "the agent must leave the burning tile");
    assert_eq!(start.manhattan_distance(position), 1);
}

#[test]
fn walls_prune_unreachable_bomb_sites() {
    let mut world = open_world(5, 5);
    let mut events = Vec::new();
    // Solid wall column at x = 2 splits the field in half.
    for y in 0..5 {
        apply(
            &mut world,
            Command::SetTerrain {
                position: TilePoint::new(2, y),
                terrain: Terrain::Wall,
            },
            &mut events,
        );
    }
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut commands = Vec::new();
    decision.update(&world, agent, &mut commands);

    let list = decision.job_list(agent).expect("job list exists");
    assert_eq!(
        list.len(),
        10,
        "only the ten tiles on the agent's side of the wall survive",
    );
    assert!(list.iter().all(|job| job.position().x() < 2));
}

#[test]
fn missing_user_player_aborts_the_tick() {
    let mut world = open_world(5, 5);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut commands = Vec::new();
    decision.update(&world, agent, &mut commands);

    assert!(commands.is_empty(), "no user player, no action");
    assert!(decision.job_list(agent).is_none());
}

#[test]
fn user_players_are_never_driven() {
    let mut world = open_world(5, 5);
    let user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let _agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut commands = Vec::new();
    decision.update(&world, user, &mut commands);

    assert!(commands.is_empty());
    assert!(decision.job_list(user).is_none());
}

#[test]
fn movement_cooldown_gates_action_but_not_recomputation() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 3);
    let mut decision = Decision::new();

    // First tick: cooldown starts at zero, so the agent moves and the
    // world re-arms the cooldown.
    let mut events = Vec::new();
    run_tick(&mut world, &mut decision, agent, &mut events);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
    assert_eq!(
        query::player(&world, agent).expect("agent exists").movement_cooldown,
        3,
    );

    // Second tick without any Tick command: the candidate set is rebuilt
    // but no action is taken.
    let mut commands = Vec::new();
    decision.update(&world, agent, &mut commands);
    assert!(commands.is_empty(), "cooldown must gate the action");
    assert!(
        decision
            .job_list(agent)
            .is_some_and(|list| !list.is_empty()),
        "recomputation still happens while cooling down",
    );
}

#[test]
fn cleanup_forgets_the_player_and_tolerates_strangers() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut commands = Vec::new();
    decision.update(&world, agent, &mut commands);
    assert!(decision.job_list(agent).is_some());

    decision.cleanup(agent);
    assert!(decision.job_list(agent).is_none());

    // Unknown players are a silent no-op.
    decision.cleanup(PlayerId::new(999));
}

#[test]
fn placed_bomb_turns_the_next_tick_into_an_escape() {
    let mut world = open_world(5, 5);
    let _user = spawn(&mut world, PlayerKind::User, TilePoint::new(4, 4), 0);
    let agent = spawn(&mut world, PlayerKind::Ai, TilePoint::new(0, 0), 0);
    let mut decision = Decision::new();

    let mut events = Vec::new();
    for _ in 0..16 {
        run_tick(&mut world, &mut decision, agent, &mut events);
        if events
            .iter()
            .any(|event| matches!(event, Event::BombPlaced { .. }))
        {
            break;
        }
    }
    let bomb_tile = query::player(&world, agent).expect("agent exists").position;

    // The agent now stands inside its own bomb's blast; the next tick
    // must route it off the tile.
    run_tick(&mut world, &mut decision, agent, &mut events);

    let list = decision.job_list(agent).expect("job list exists");
    assert!(list.iter().any(|job| job.kind() == JobKind::Escape));
    let position = query::player(&world, agent).expect("agent exists").position;
    assert_ne!(position, bomb_tile);
}
