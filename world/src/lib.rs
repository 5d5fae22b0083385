#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Blast Arena.
//!
//! The world owns the field grid, the live bombs and fire flags, and the
//! player registry. All mutation flows through [`apply`], which executes
//! [`Command`] values and broadcasts [`Event`] values; read access flows
//! through the [`query`] module and the [`navigation`] searches.

pub mod navigation;

use blast_arena_core::{
    Bomb, Command, Event, MoveError, PlayerId, PlayerKind, Terrain, TilePoint, WELCOME_BANNER,
};
use tracing::{debug, warn};

const DEFAULT_FIELD_WIDTH: u32 = 17;
const DEFAULT_FIELD_HEIGHT: u32 = 11;

/// Fixed-size tile grid holding terrain, fire flags, and live bombs.
#[derive(Clone, Debug)]
pub struct Field {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
    fire: Vec<bool>,
    bombs: Vec<Bomb>,
}

impl Field {
    /// Creates an all-floor field of the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            terrain: vec![Terrain::Floor; capacity],
            fire: vec![false; capacity],
            bombs: Vec::new(),
        }
    }

    /// Number of tile columns in the field.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows in the field.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the field bounds.
    #[must_use]
    pub const fn contains(&self, position: TilePoint) -> bool {
        position.x() < self.width && position.y() < self.height
    }

    /// Terrain stored at the tile; out-of-bounds tiles read as `Wall`.
    #[must_use]
    pub fn terrain(&self, position: TilePoint) -> Terrain {
        self.index(position)
            .and_then(|offset| self.terrain.get(offset).copied())
            .unwrap_or(Terrain::Wall)
    }

    /// Reports whether the tile is open floor, ignoring bombs and hazards.
    ///
    /// This is the terrain-only check blast rays and refuge reachability
    /// use; bombs and fire pass through it.
    #[must_use]
    pub fn is_floor(&self, position: TilePoint) -> bool {
        self.terrain(position).is_floor()
    }

    /// Reports whether a player could stand on the tile: open floor with no
    /// bomb resting on it.
    #[must_use]
    pub fn is_walkable(&self, position: TilePoint) -> bool {
        self.is_floor(position) && !self.has_bomb(position)
    }

    /// Reports whether the tile is currently burning.
    #[must_use]
    pub fn has_fire(&self, position: TilePoint) -> bool {
        self.index(position)
            .and_then(|offset| self.fire.get(offset).copied())
            .unwrap_or(false)
    }

    /// Reports whether a live bomb rests on the tile.
    #[must_use]
    pub fn has_bomb(&self, position: TilePoint) -> bool {
        self.bombs.iter().any(|bomb| bomb.position == position)
    }

    /// Live bombs currently resting on the field.
    #[must_use]
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    /// Iterates every tile coordinate in row-major order.
    pub fn points(&self) -> impl Iterator<Item = TilePoint> + '_ {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| TilePoint::new(x, y)))
    }

    fn set_terrain(&mut self, position: TilePoint, terrain: Terrain) {
        if let Some(offset) = self.index(position) {
            if let Some(slot) = self.terrain.get_mut(offset) {
                *slot = terrain;
            }
        }
    }

    fn set_fire(&mut self, position: TilePoint, burning: bool) {
        if let Some(offset) = self.index(position) {
            if let Some(slot) = self.fire.get_mut(offset) {
                *slot = burning;
            }
        }
    }

    fn add_bomb(&mut self, bomb: Bomb) {
        self.bombs.push(bomb);
    }

    fn index(&self, position: TilePoint) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let x = usize::try_from(position.x()).ok()?;
        let y = usize::try_from(position.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }
}

#[derive(Clone, Copy, Debug)]
struct PlayerState {
    id: PlayerId,
    kind: PlayerKind,
    position: TilePoint,
    explosion_radius: u32,
    movement_cooldown: u32,
    movement_cooldown_initial: u32,
}

/// Represents the authoritative Blast Arena world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    field: Field,
    players: Vec<PlayerState>,
    next_player_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new Blast Arena world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            field: Field::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
            players: Vec::new(),
            next_player_id: 0,
            tick_index: 0,
        }
    }

    fn player_mut(&mut self, player: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|state| state.id == player)
    }

    fn allocate_player_id(&mut self) -> PlayerId {
        let id = PlayerId::new(self.next_player_id);
        self.next_player_id = self.next_player_id.wrapping_add(1);
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureField { width, height } => {
            world.field = Field::new(width, height);
            let mut removed = Vec::new();
            world.players.retain(|state| {
                if world.field.contains(state.position) {
                    true
                } else {
                    removed.push(state.id);
                    false
                }
            });
            out_events.push(Event::FieldConfigured { width, height });
            for player in removed {
                out_events.push(Event::PlayerRemoved { player });
            }
        }
        Command::SetTerrain { position, terrain } => {
            if world.field.contains(position) {
                world.field.set_terrain(position, terrain);
            } else {
                debug!(?position, "ignored terrain write outside the field");
            }
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            for state in world.players.iter_mut() {
                state.movement_cooldown = state.movement_cooldown.saturating_sub(1);
            }
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SpawnPlayer {
            kind,
            position,
            explosion_radius,
            movement_cooldown,
        } => {
            if !world.field.contains(position) {
                warn!(?position, "rejected spawn outside the field");
                return;
            }
            let id = world.allocate_player_id();
            world.players.push(PlayerState {
                id,
                kind,
                position,
                explosion_radius,
                movement_cooldown: 0,
                movement_cooldown_initial: movement_cooldown,
            });
            out_events.push(Event::PlayerSpawned {
                player: id,
                kind,
                position,
            });
        }
        Command::RemovePlayer { player } => {
            let before = world.players.len();
            world.players.retain(|state| state.id != player);
            if world.players.len() != before {
                out_events.push(Event::PlayerRemoved { player });
            }
        }
        Command::MovePlayer { player, to } => {
            let rejection = if world.player_mut(player).is_none() {
                Some(MoveError::MissingPlayer)
            } else if !world.field.contains(to) {
                Some(MoveError::OutOfBounds)
            } else if !world.field.is_walkable(to) {
                Some(MoveError::Blocked)
            } else {
                None
            };

            if let Some(reason) = rejection {
                out_events.push(Event::MoveRejected { player, to, reason });
                return;
            }

            if let Some(state) = world.player_mut(player) {
                let from = state.position;
                state.position = to;
                state.movement_cooldown = state.movement_cooldown_initial;
                out_events.push(Event::PlayerMoved { player, from, to });
            }
        }
        Command::PlaceBomb { player } => {
            let Some(state) = world.player_mut(player) else {
                warn!(player = player.get(), "ignored bomb from unknown player");
                return;
            };
            let bomb = Bomb {
                position: state.position,
                radius: state.explosion_radius,
            };
            if world.field.has_bomb(bomb.position) {
                debug!(?bomb.position, "tile already holds a bomb");
                return;
            }
            world.field.add_bomb(bomb);
            out_events.push(Event::BombPlaced { player, bomb });
        }
        Command::IgniteTile { position } => {
            world.field.set_fire(position, true);
        }
        Command::ExtinguishTile { position } => {
            world.field.set_fire(position, false);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Field, World};
    use blast_arena_core::{PlayerId, PlayerKind, TilePoint};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the field grid.
    #[must_use]
    pub fn field(world: &World) -> &Field {
        &world.field
    }

    /// Captures snapshots of every player, sorted by identifier.
    #[must_use]
    pub fn players(world: &World) -> Vec<PlayerSnapshot> {
        let mut snapshots: Vec<PlayerSnapshot> =
            world.players.iter().map(PlayerSnapshot::from_state).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures a snapshot of a single player, if it exists.
    #[must_use]
    pub fn player(world: &World, player: PlayerId) -> Option<PlayerSnapshot> {
        world
            .players
            .iter()
            .find(|state| state.id == player)
            .map(PlayerSnapshot::from_state)
    }

    /// Captures a snapshot of the user-controlled player, if one exists.
    #[must_use]
    pub fn user_player(world: &World) -> Option<PlayerSnapshot> {
        world
            .players
            .iter()
            .find(|state| state.kind == PlayerKind::User)
            .map(PlayerSnapshot::from_state)
    }

    /// Immutable representation of a single player's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Unique identifier assigned to the player.
        pub id: PlayerId,
        /// Whether the player is user- or AI-controlled.
        pub kind: PlayerKind,
        /// Tile the player currently occupies.
        pub position: TilePoint,
        /// Blast radius of bombs the player places.
        pub explosion_radius: u32,
        /// Ticks remaining until the player may move again.
        pub movement_cooldown: u32,
        /// Cooldown assigned after each successful step.
        pub movement_cooldown_initial: u32,
    }

    impl PlayerSnapshot {
        pub(super) fn from_state(state: &super::PlayerState) -> Self {
            Self {
                id: state.id,
                kind: state.kind,
                position: state.position,
                explosion_radius: state.explosion_radius,
                movement_cooldown: state.movement_cooldown,
                movement_cooldown_initial: state.movement_cooldown_initial,
            }
        }
    }
}
