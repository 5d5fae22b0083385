//! Candidate-action bookkeeping for one AI player.
//!
//! A [`JobList`] holds every action the decision core is still considering
//! this tick. Insertion keeps jobs of one kind clustered together and
//! deduplicates on `(position, kind)`; selection recomputes every score and
//! yields the global minimum, where a lower score is a more desirable
//! action.

use blast_arena_core::{JobKind, TilePoint, TravelMode};
use serde::Deserialize;

/// One candidate action: walk to `position` and perform `kind` there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Job {
    position: TilePoint,
    kind: JobKind,
    score: f32,
}

impl Job {
    /// Creates a detached job with a neutral score.
    #[must_use]
    pub const fn new(position: TilePoint, kind: JobKind) -> Self {
        Self {
            position,
            kind,
            score: 0.0,
        }
    }

    /// Target tile of the action.
    #[must_use]
    pub const fn position(&self) -> TilePoint {
        self.position
    }

    /// Action performed once the target tile is reached.
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        self.kind
    }

    /// Score assigned during the most recent selection pass. Lower is
    /// better.
    #[must_use]
    pub const fn score(&self) -> f32 {
        self.score
    }
}

/// Tunable policy constants of the scoring pass.
///
/// The penalties have no derivation beyond play-tested defaults, so they
/// are carried as named configuration rather than literals.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Flat penalty applied when a scored distance is unreachable, so a
    /// candidate set of only unreachable options still degrades to "least
    /// bad" instead of collapsing to no choice.
    pub unreachable_penalty: f32,
    /// Penalty for escape destinations that are themselves still inside a
    /// blast zone.
    pub unsafe_refuge_penalty: f32,
    /// Weight of the agent-to-refuge walking distance for escape jobs.
    pub escape_walk_weight: f32,
    /// Weight of the refuge-to-user distance for escape jobs; farther from
    /// the user is worse, keeping the agent in the fight.
    pub escape_user_weight: f32,
    /// Weight of the agent-to-bomb-site walking distance.
    pub bomb_walk_weight: f32,
    /// Weight of the bomb-site-to-user distance; bombs the user can never
    /// reach are low value.
    pub bomb_user_weight: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            unreachable_penalty: 25.0,
            unsafe_refuge_penalty: 5.0,
            escape_walk_weight: 0.1,
            escape_user_weight: 0.05,
            bomb_walk_weight: 0.1,
            bomb_user_weight: 0.2,
        }
    }
}

/// Ordered candidate set for one AI player, rebuilt from empty every tick.
#[derive(Clone, Debug, Default)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    /// Creates an empty job list.
    #[must_use]
    pub const fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Number of jobs currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Reports whether the list holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterator over the jobs in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Reports whether a job with the same position and kind is present.
    #[must_use]
    pub fn contains(&self, position: TilePoint, kind: JobKind) -> bool {
        self.jobs
            .iter()
            .any(|job| job.position == position && job.kind == kind)
    }

    /// Inserts a job, keeping kind groups clustered.
    ///
    /// A job whose `(position, kind)` pair is already present is discarded.
    /// A job sharing the head's kind becomes the new head, so the most
    /// recently inserted job of a kind sorts first within its group; any
    /// other job is spliced in at the first slot past the head whose
    /// occupant ranks at or after the new kind.
    pub fn insert(&mut self, job: Job) {
        if self.contains(job.position, job.kind) {
            return;
        }

        if self.jobs.is_empty() {
            self.jobs.push(job);
            return;
        }

        if self.jobs[0].kind == job.kind {
            self.jobs.insert(0, job);
            return;
        }

        let slot = (1..self.jobs.len())
            .find(|&index| self.jobs[index].kind >= job.kind)
            .unwrap_or(self.jobs.len());
        self.jobs.insert(slot, job);
    }

    /// Removes the job matching both position and kind; no-op when absent.
    pub fn remove(&mut self, position: TilePoint, kind: JobKind) {
        if let Some(index) = self
            .jobs
            .iter()
            .position(|job| job.position == position && job.kind == kind)
        {
            let _ = self.jobs.remove(index);
        }
    }

    /// Discards every job. Safe to call on an already-empty list.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    /// Scores every job and returns the one with the lowest score, or
    /// `None` when the list is empty.
    ///
    /// `distance` answers pathfinding hop-count queries (`None` means
    /// unreachable) and `is_hazard_safe` reports whether a tile is free of
    /// live blast zones. Ties keep the earliest job in list order.
    pub fn select_optimal<D, S>(
        &mut self,
        user_position: TilePoint,
        agent_position: TilePoint,
        mut distance: D,
        mut is_hazard_safe: S,
        weights: &ScoreWeights,
    ) -> Option<&Job>
    where
        D: FnMut(TilePoint, TilePoint, TravelMode) -> Option<u32>,
        S: FnMut(TilePoint) -> bool,
    {
        for job in self.jobs.iter_mut() {
            job.score = 0.0;

            match job.kind {
                JobKind::Escape => {
                    let to_refuge = distance(agent_position, job.position, TravelMode::Evasion);
                    let to_user = distance(job.position, user_position, TravelMode::Evasion);

                    match to_refuge {
                        None => job.score += weights.unreachable_penalty,
                        Some(hops) => job.score += hops as f32 * weights.escape_walk_weight,
                    }

                    if let Some(hops) = to_user {
                        job.score += hops as f32 * weights.escape_user_weight;
                    }

                    if !is_hazard_safe(job.position) {
                        job.score += weights.unsafe_refuge_penalty;
                    }
                }
                JobKind::BombDrop => {
                    let to_site = distance(agent_position, job.position, TravelMode::Normal);
                    let to_user = distance(job.position, user_position, TravelMode::Normal);

                    match to_user {
                        None => job.score += weights.unreachable_penalty,
                        Some(hops) => job.score += hops as f32 * weights.bomb_user_weight,
                    }

                    // Unreachable sites are pruned during generation, so
                    // the walking term only applies when a route exists.
                    if let Some(hops) = to_site {
                        job.score += hops as f32 * weights.bomb_walk_weight;
                    }
                }
                JobKind::PowerUp => {}
            }
        }

        let mut best: Option<usize> = None;
        let mut best_score = f32::INFINITY;
        for (index, job) in self.jobs.iter().enumerate() {
            if job.score < best_score {
                best_score = job.score;
                best = Some(index);
            }
        }

        best.map(|index| &self.jobs[index])
    }
}
