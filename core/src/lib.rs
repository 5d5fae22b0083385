#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blast Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the decision system. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for observers to react to deterministically. The decision system consumes
//! read-only world queries and responds exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Blast Arena.";

/// Location of a single field tile expressed as x and y coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePoint {
    x: u32,
    y: u32,
}

impl TilePoint {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TilePoint) -> u32 {
        self.x().abs_diff(other.x()) + self.y().abs_diff(other.y())
    }
}

/// Static terrain classification of a single field tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground that players can walk on and blasts propagate through.
    Floor,
    /// Indestructible wall that blocks movement and blasts.
    Wall,
    /// Destructible obstacle that blocks movement and blasts until cleared.
    Crate,
}

impl Terrain {
    /// Reports whether the terrain itself permits traversal.
    ///
    /// Bombs and hazards are tracked separately; this answers the pure
    /// terrain question used by blast rays and refuge reachability.
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// Classification of a candidate action held in a player's job list.
///
/// Declaration order doubles as the priority rank that keeps job lists
/// grouped by kind: `Escape` groups sort before `BombDrop` groups, which
/// sort before `PowerUp` groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobKind {
    /// Flee to the target tile because the current tile is threatened.
    Escape,
    /// Walk to the target tile and place a bomb there.
    BombDrop,
    /// Collect a power-up at the target tile. Reserved; no generator
    /// currently produces jobs of this kind.
    PowerUp,
}

/// Obstacle class applied to a pathfinding query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    /// Ordinary movement: solid terrain, bombs, and live hazards all block.
    Normal,
    /// Only solid terrain blocks. Used by blast rays and refuge
    /// reachability, where current hazards may have cleared by the time the
    /// route is walked.
    TerrainOnly,
    /// Flight from danger: solid terrain and bombs block, hazards do not.
    Evasion,
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Distinguishes the human-controlled player from computer opponents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Controlled by external input; never driven by the decision system.
    User,
    /// Controlled by the decision system every tick.
    Ai,
}

/// A live bomb resting on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bomb {
    /// Tile the bomb occupies.
    pub position: TilePoint,
    /// Number of tiles each of the four blast rays can cover.
    pub radius: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the field as an all-floor grid of the provided dimensions.
    ConfigureField {
        /// Number of tile columns in the new field.
        width: u32,
        /// Number of tile rows in the new field.
        height: u32,
    },
    /// Overwrites the terrain of a single tile.
    SetTerrain {
        /// Tile whose terrain should change.
        position: TilePoint,
        /// Terrain to store at the tile.
        terrain: Terrain,
    },
    /// Advances the simulation by one tick.
    Tick,
    /// Adds a new player to the arena.
    SpawnPlayer {
        /// Whether the player is user- or AI-controlled.
        kind: PlayerKind,
        /// Tile the player starts on.
        position: TilePoint,
        /// Blast radius of bombs the player places.
        explosion_radius: u32,
        /// Minimum ticks the player must wait between successive moves.
        movement_cooldown: u32,
    },
    /// Removes a player from the arena.
    RemovePlayer {
        /// Identifier of the player to remove.
        player: PlayerId,
    },
    /// Moves a player one step to an adjacent walkable tile.
    MovePlayer {
        /// Identifier of the player attempting the move.
        player: PlayerId,
        /// Destination tile of the step.
        to: TilePoint,
    },
    /// Places a bomb on the tile the player currently occupies.
    PlaceBomb {
        /// Identifier of the player placing the bomb.
        player: PlayerId,
    },
    /// Marks a tile as burning. Harness hook standing in for the
    /// out-of-scope bomb detonation mechanics.
    IgniteTile {
        /// Tile to set on fire.
        position: TilePoint,
    },
    /// Clears the fire flag of a tile.
    ExtinguishTile {
        /// Tile to extinguish.
        position: TilePoint,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the field was rebuilt with new dimensions.
    FieldConfigured {
        /// Number of tile columns in the rebuilt field.
        width: u32,
        /// Number of tile rows in the rebuilt field.
        height: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Confirms that a player joined the arena.
    PlayerSpawned {
        /// Identifier assigned to the player by the world.
        player: PlayerId,
        /// Whether the player is user- or AI-controlled.
        kind: PlayerKind,
        /// Tile the player starts on.
        position: TilePoint,
    },
    /// Confirms that a player left the arena.
    PlayerRemoved {
        /// Identifier of the removed player.
        player: PlayerId,
    },
    /// Confirms that a player stepped between two tiles.
    PlayerMoved {
        /// Identifier of the player that moved.
        player: PlayerId,
        /// Tile the player occupied before the step.
        from: TilePoint,
        /// Tile the player occupies after the step.
        to: TilePoint,
    },
    /// Reports that a movement request was rejected.
    MoveRejected {
        /// Identifier of the player whose move failed.
        player: PlayerId,
        /// Destination tile that was requested.
        to: TilePoint,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that a bomb was placed on the field.
    BombPlaced {
        /// Identifier of the player that placed the bomb.
        player: PlayerId,
        /// Bomb that now rests on the field.
        bomb: Bomb,
    },
}

/// Reasons a movement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    /// The destination lies outside the configured field bounds.
    #[error("destination lies outside the field")]
    OutOfBounds,
    /// The destination tile is not walkable.
    #[error("destination tile is blocked")]
    Blocked,
    /// No player with the provided identifier exists.
    #[error("no such player")]
    MissingPlayer,
}

#[cfg(test)]
mod tests {
    use super::{JobKind, Terrain, TilePoint};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = TilePoint::new(1, 1);
        let destination = TilePoint::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn job_kinds_rank_in_declaration_order() {
        assert!(JobKind::Escape < JobKind::BombDrop);
        assert!(JobKind::BombDrop < JobKind::PowerUp);
    }

    #[test]
    fn only_floor_terrain_is_traversable() {
        assert!(Terrain::Floor.is_floor());
        assert!(!Terrain::Wall.is_floor());
        assert!(!Terrain::Crate.is_floor());
    }
}
