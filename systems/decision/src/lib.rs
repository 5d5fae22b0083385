#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick decision system driving the AI players of Blast Arena.
//!
//! Every tick, for every AI player, the system rebuilds a candidate set of
//! actions from scratch: a bomb-drop job for every tile, pruned by terrain,
//! reachability, and blast-refuge validation, plus a permissive escape set
//! whenever the player's own tile is threatened. The surviving candidates
//! are scored against pathfinding distances and the winner is translated
//! into movement and bomb-placement commands for the world to apply. The
//! system never mutates the world directly; like every Blast Arena system
//! it responds exclusively with command batches.

pub mod hazard;
pub mod jobs;

use std::collections::HashMap;

use blast_arena_core::{Command, JobKind, PlayerId, PlayerKind, TilePoint, TravelMode};
use blast_arena_world::{navigation, query, Field, World};
use tracing::{debug, error};

pub use hazard::{HazardGrid, HazardLayer};
pub use jobs::{Job, JobList, ScoreWeights};

/// Decision system state: one job list per AI player plus the shared
/// hazard grid and scoring policy.
#[derive(Debug, Default)]
pub struct Decision {
    hazard: HazardGrid,
    jobs: HashMap<PlayerId, JobList>,
    weights: ScoreWeights,
}

impl Decision {
    /// Creates a decision system with the default scoring policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_weights(ScoreWeights::default())
    }

    /// Creates a decision system with an explicit scoring policy.
    #[must_use]
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            hazard: HazardGrid::new(),
            jobs: HashMap::new(),
            weights,
        }
    }

    /// Candidate set most recently built for the player, if any. Exposed
    /// for adapters and tests that inspect the decision process.
    #[must_use]
    pub fn job_list(&self, player: PlayerId) -> Option<&JobList> {
        self.jobs.get(&player)
    }

    /// Runs one decision tick for one player, appending the resulting
    /// commands to `out`.
    ///
    /// No-op for user-controlled or unknown players. A missing
    /// user-controlled opponent aborts the tick with a logged error; no
    /// commands are emitted. The candidate set is recomputed even while
    /// the player's movement cooldown gates the action, so a fresh field
    /// state always backs the next possible step.
    pub fn update(&mut self, world: &World, player: PlayerId, out: &mut Vec<Command>) {
        let Some(agent) = query::player(world, player) else {
            debug!(player = player.get(), "decision tick for unknown player");
            return;
        };
        if agent.kind != PlayerKind::Ai {
            return;
        }
        let Some(user) = query::user_player(world) else {
            error!("failed to find user controlled player");
            return;
        };

        let field = query::field(world);

        // Rebuild the real hazard layer from ground truth.
        self.hazard.match_field(field);
        self.hazard.reset_real();
        for bomb in field.bombs() {
            self.hazard
                .cast_explosion(field, bomb.position, bomb.radius, HazardLayer::Real);
        }
        self.hazard.copy_real_from_fire(field);

        let list = self.jobs.entry(player).or_default();
        list.clear();

        // Every tile is a potential bomb site.
        for point in field.points() {
            list.insert(Job::new(point, JobKind::BombDrop));
        }

        // Prune sites on non-walkable tiles.
        for point in field.points() {
            if !field.is_walkable(point) {
                list.remove(point, JobKind::BombDrop);
            }
        }

        // Prune sites the agent cannot reach under normal movement.
        for point in field.points() {
            if route_length(field, &self.hazard, agent.position, point, TravelMode::Normal)
                .is_none()
            {
                list.remove(point, JobKind::BombDrop);
            }
        }

        // Prune sites whose blast would leave the agent nowhere to hide.
        for point in field.points() {
            if self.hazard.count_refuge(field, point, agent.explosion_radius) == 0 {
                list.remove(point, JobKind::BombDrop);
            }
        }

        // A threatened agent gets the full escape set. Escape candidates
        // are deliberately permissive: walkability is the only filter, so
        // at least one option usually survives even on a burning field.
        if !self.hazard.is_real_safe(agent.position) {
            for point in field.points() {
                list.insert(Job::new(point, JobKind::Escape));
            }
            for point in field.points() {
                if !field.is_walkable(point) {
                    list.remove(point, JobKind::Escape);
                }
            }
        }

        let hazard = &self.hazard;
        let chosen = list
            .select_optimal(
                user.position,
                agent.position,
                |from, to, mode| route_length(field, hazard, from, to, mode),
                |point| hazard.is_real_safe(point),
                &self.weights,
            )
            .copied();

        let Some(job) = chosen else {
            return;
        };
        if agent.movement_cooldown != 0 {
            return;
        }

        match job.kind() {
            JobKind::Escape => {
                if let Some(step) = route_step(
                    field,
                    hazard,
                    agent.position,
                    job.position(),
                    TravelMode::Evasion,
                ) {
                    out.push(Command::MovePlayer { player, to: step });
                }
            }
            JobKind::BombDrop => {
                if let Some(step) = route_step(
                    field,
                    hazard,
                    agent.position,
                    job.position(),
                    TravelMode::Normal,
                ) {
                    out.push(Command::MovePlayer { player, to: step });
                    if step == job.position() {
                        out.push(Command::PlaceBomb { player });
                    }
                }
            }
            // Reserved kind; nothing generates it and nothing acts on it.
            JobKind::PowerUp => {}
        }
    }

    /// Releases the player's candidate set. No-op for players that never
    /// ran a decision tick.
    pub fn cleanup(&mut self, player: PlayerId) {
        if self.jobs.remove(&player).is_some() {
            debug!(player = player.get(), "released job list");
        }
    }
}

/// Pathfinding hop count between two tiles under the obstacle class the
/// travel mode selects.
fn route_length(
    field: &Field,
    hazard: &HazardGrid,
    from: TilePoint,
    to: TilePoint,
    mode: TravelMode,
) -> Option<u32> {
    let (width, height) = (field.width(), field.height());
    match mode {
        TravelMode::Normal => navigation::path_length(width, height, from, to, |p| {
            !field.is_walkable(p) || !hazard.is_real_safe(p)
        }),
        TravelMode::TerrainOnly => {
            navigation::path_length(width, height, from, to, |p| !field.is_floor(p))
        }
        TravelMode::Evasion => {
            navigation::path_length(width, height, from, to, |p| !field.is_walkable(p))
        }
    }
}

/// First hop of a shortest route under the mode's obstacle class.
fn route_step(
    field: &Field,
    hazard: &HazardGrid,
    from: TilePoint,
    to: TilePoint,
    mode: TravelMode,
) -> Option<TilePoint> {
    let (width, height) = (field.width(), field.height());
    match mode {
        TravelMode::Normal => navigation::next_step(width, height, from, to, |p| {
            !field.is_walkable(p) || !hazard.is_real_safe(p)
        }),
        TravelMode::TerrainOnly => {
            navigation::next_step(width, height, from, to, |p| !field.is_floor(p))
        }
        TravelMode::Evasion => {
            navigation::next_step(width, height, from, to, |p| !field.is_walkable(p))
        }
    }
}
