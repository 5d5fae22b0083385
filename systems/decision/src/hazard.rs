//! Per-tile blast model backing candidate validation.
//!
//! The grid keeps two independent safety layers. The real layer mirrors
//! ground truth (live bombs and fire) and is rebuilt at the start of every
//! decision tick; the simulated layer holds the blast of one hypothetical
//! bomb and is wiped before each evaluation. Keeping the layers apart lets
//! the same ray caster answer both "is this tile dangerous right now" and
//! "would placing a bomb here trap me" without touching world state.

use blast_arena_core::TilePoint;
use blast_arena_world::{navigation, Field};

/// Selects which safety layer an operation writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardLayer {
    /// Ground truth: live bombs and fire on the field.
    Real,
    /// The hypothetical bomb currently under evaluation.
    Simulated,
}

/// Dense pair of per-tile safety layers sized to match the field.
#[derive(Clone, Debug, Default)]
pub struct HazardGrid {
    width: u32,
    height: u32,
    real_safe: Vec<bool>,
    simulated_safe: Vec<bool>,
}

impl HazardGrid {
    /// Creates an unsized grid; every query reports unsafe until
    /// [`HazardGrid::match_field`] has run.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            real_safe: Vec::new(),
            simulated_safe: Vec::new(),
        }
    }

    /// Resizes the grid to the field's dimensions, marking every tile safe
    /// in both layers when the dimensions change.
    pub fn match_field(&mut self, field: &Field) {
        if self.width == field.width() && self.height == field.height() {
            return;
        }

        let capacity_u64 = u64::from(field.width()) * u64::from(field.height());
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        self.width = field.width();
        self.height = field.height();
        self.real_safe = vec![true; capacity];
        self.simulated_safe = vec![true; capacity];
    }

    /// Marks every tile safe in the real layer.
    pub fn reset_real(&mut self) {
        self.real_safe.fill(true);
    }

    /// Marks every tile safe in the simulated layer.
    pub fn reset_simulated(&mut self) {
        self.simulated_safe.fill(true);
    }

    /// Marks one tile unsafe in the selected layer.
    pub fn mark_unsafe(&mut self, position: TilePoint, layer: HazardLayer) {
        let Some(offset) = self.index(position) else {
            return;
        };
        let cells = match layer {
            HazardLayer::Real => &mut self.real_safe,
            HazardLayer::Simulated => &mut self.simulated_safe,
        };
        if let Some(slot) = cells.get_mut(offset) {
            *slot = false;
        }
    }

    /// Reports whether the tile is free of real hazards. Out-of-bounds and
    /// unsized grids read as unsafe.
    #[must_use]
    pub fn is_real_safe(&self, position: TilePoint) -> bool {
        self.index(position)
            .and_then(|offset| self.real_safe.get(offset).copied())
            .unwrap_or(false)
    }

    /// Reports whether the tile is outside the simulated blast.
    /// Out-of-bounds and unsized grids read as unsafe.
    #[must_use]
    pub fn is_simulated_safe(&self, position: TilePoint) -> bool {
        self.index(position)
            .and_then(|offset| self.simulated_safe.get(offset).copied())
            .unwrap_or(false)
    }

    /// Marks the blast of a bomb at `origin` unsafe in the selected layer.
    ///
    /// Four axis rays propagate independently. The positive rays start on
    /// the origin tile, so the origin is marked exactly once; the negative
    /// rays start one step before it, cover at most `radius - 1` tiles, and
    /// never reach column or row zero. Each ray stops at the first tile
    /// that is not floor terrain; bombs, fire, and hazard flags do not
    /// block propagation.
    pub fn cast_explosion(
        &mut self,
        field: &Field,
        origin: TilePoint,
        radius: u32,
        layer: HazardLayer,
    ) {
        for step in 0..radius {
            let Some(x) = origin.x().checked_add(step) else {
                break;
            };
            let tile = TilePoint::new(x, origin.y());
            if x >= field.width() || !field.is_floor(tile) {
                break;
            }
            self.mark_unsafe(tile, layer);
        }

        for step in 1..radius {
            let Some(x) = origin.x().checked_sub(step) else {
                break;
            };
            let tile = TilePoint::new(x, origin.y());
            if x == 0 || !field.is_floor(tile) {
                break;
            }
            self.mark_unsafe(tile, layer);
        }

        for step in 0..radius {
            let Some(y) = origin.y().checked_add(step) else {
                break;
            };
            let tile = TilePoint::new(origin.x(), y);
            if y >= field.height() || !field.is_floor(tile) {
                break;
            }
            self.mark_unsafe(tile, layer);
        }

        for step in 1..radius {
            let Some(y) = origin.y().checked_sub(step) else {
                break;
            };
            let tile = TilePoint::new(origin.x(), y);
            if y == 0 || !field.is_floor(tile) {
                break;
            }
            self.mark_unsafe(tile, layer);
        }
    }

    /// Mirrors the field's fire flags into the real layer.
    pub fn copy_real_from_fire(&mut self, field: &Field) {
        for point in field.points() {
            if field.has_fire(point) {
                self.mark_unsafe(point, HazardLayer::Real);
            }
        }
    }

    /// Counts the tiles an agent could hide on after placing a bomb of the
    /// given radius at `origin`.
    ///
    /// The simulated layer is rebuilt for this one hypothesis. A refuge
    /// must be walkable, safe in both layers, and reachable from the
    /// origin under terrain-only rules, since the hazards blocking the
    /// route today may have burned out by the time the agent flees. A
    /// count of zero means the bomb site would trap its owner and must be
    /// rejected.
    #[must_use]
    pub fn count_refuge(&mut self, field: &Field, origin: TilePoint, radius: u32) -> usize {
        self.reset_simulated();
        self.cast_explosion(field, origin, radius, HazardLayer::Simulated);

        field
            .points()
            .filter(|&point| {
                field.is_walkable(point)
                    && self.is_real_safe(point)
                    && self.is_simulated_safe(point)
                    && navigation::path_length(field.width(), field.height(), origin, point, |p| {
                        !field.is_floor(p)
                    })
                    .is_some()
            })
            .count()
    }

    fn index(&self, position: TilePoint) -> Option<usize> {
        if position.x() >= self.width || position.y() >= self.height {
            return None;
        }
        let x = usize::try_from(position.x()).ok()?;
        let y = usize::try_from(position.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blast_arena_core::{Command, Terrain, TilePoint};
    use blast_arena_world::{apply, query, World};

    fn open_world(width: u32, height: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureField { width, height }, &mut events);
        world
    }

    fn sized_grid(field: &Field) -> HazardGrid {
        let mut grid = HazardGrid::new();
        grid.match_field(field);
        grid
    }

    #[test]
    fn unsized_grid_reports_everything_unsafe() {
        let grid = HazardGrid::new();
        assert!(!grid.is_real_safe(TilePoint::new(0, 0)));
        assert!(!grid.is_simulated_safe(TilePoint::new(0, 0)));
    }

    #[test]
    fn radius_three_blast_covers_seven_tiles_on_an_open_field() {
        let world = open_world(5, 5);
        let field = query::field(&world);
        let mut grid = sized_grid(field);

        grid.cast_explosion(field, TilePoint::new(2, 2), 3, HazardLayer::Real);

        let unsafe_tiles: Vec<TilePoint> = field
            .points()
            .filter(|&point| !grid.is_real_safe(point))
            .collect();

        // Positive rays run to the field edge; negative rays stop before
        // column and row zero.
        assert_eq!(
            unsafe_tiles,
            vec![
                TilePoint::new(2, 1),
                TilePoint::new(1, 2),
                TilePoint::new(2, 2),
                TilePoint::new(3, 2),
                TilePoint::new(4, 2),
                TilePoint::new(2, 3),
                TilePoint::new(2, 4),
            ],
        );
    }

    #[test]
    fn walls_stop_a_ray_without_being_marked() {
        let mut world = open_world(5, 5);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetTerrain {
                position: TilePoint::new(3, 2),
                terrain: Terrain::Wall,
            },
            &mut events,
        );
        let field = query::field(&world);
        let mut grid = sized_grid(field);

        grid.cast_explosion(field, TilePoint::new(2, 2), 3, HazardLayer::Real);

        assert!(!grid.is_real_safe(TilePoint::new(2, 2)));
        assert!(grid.is_real_safe(TilePoint::new(3, 2)), "walls stay safe");
        assert!(
            grid.is_real_safe(TilePoint::new(4, 2)),
            "tiles behind a wall stay safe",
        );
    }

    #[test]
    fn zero_radius_blast_marks_nothing() {
        let world = open_world(5, 5);
        let field = query::field(&world);
        let mut grid = sized_grid(field);

        grid.cast_explosion(field, TilePoint::new(2, 2), 0, HazardLayer::Real);

        assert!(field.points().all(|point| grid.is_real_safe(point)));
    }

    #[test]
    fn layers_are_independent() {
        let world = open_world(5, 5);
        let field = query::field(&world);
        let mut grid = sized_grid(field);
        let tile = TilePoint::new(2, 2);

        grid.cast_explosion(field, tile, 2, HazardLayer::Simulated);

        assert!(grid.is_real_safe(tile));
        assert!(!grid.is_simulated_safe(tile));

        grid.reset_simulated();
        assert!(grid.is_simulated_safe(tile));
    }

    #[test]
    fn fire_flags_mirror_into_the_real_layer() {
        let mut world = open_world(5, 5);
        let burning = TilePoint::new(1, 3);
        let mut events = Vec::new();
        apply(&mut world, Command::IgniteTile { position: burning }, &mut events);
        let field = query::field(&world);
        let mut grid = sized_grid(field);

        grid.copy_real_from_fire(field);

        assert!(!grid.is_real_safe(burning));
        assert!(grid.is_real_safe(TilePoint::new(1, 2)));
    }

    #[test]
    fn refuge_count_on_an_open_field_excludes_only_the_blast() {
        let world = open_world(5, 5);
        let field = query::field(&world);
        let mut grid = sized_grid(field);

        // A radius-1 blast covers just its origin tile.
        assert_eq!(grid.count_refuge(field, TilePoint::new(2, 2), 1), 24);
    }

    #[test]
    fn an_enclosed_dead_end_offers_no_refuge() {
        let mut world = open_world(5, 5);
        let mut events = Vec::new();
        // Wall in everything except a one-wide corridor along y = 1.
        for point in query::field(&world).points().collect::<Vec<_>>() {
            let corridor = point.y() == 1 && (1..=3).contains(&point.x());
            if !corridor {
                apply(
                    &mut world,
                    Command::SetTerrain {
                        position: point,
                        terrain: Terrain::Wall,
                    },
                    &mut events,
                );
            }
        }
        let field = query::field(&world);
        let mut grid = sized_grid(field);

        // A radius-3 bomb in the corridor's centre reaches both ends.
        assert_eq!(grid.count_refuge(field, TilePoint::new(2, 1), 3), 0);
    }

    #[test]
    fn real_hazards_shrink_the_refuge_count() {
        let mut world = open_world(5, 5);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::IgniteTile {
                position: TilePoint::new(0, 0),
            },
            &mut events,
        );
        let field = query::field(&world);
        let mut grid = sized_grid(field);
        grid.copy_real_from_fire(field);

        assert_eq!(grid.count_refuge(field, TilePoint::new(2, 2), 1), 23);
    }
}
