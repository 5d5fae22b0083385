//! Grid pathfinding used by the world crate and the decision system.
//!
//! Both entry points run a breadth-first search over the field grid. The
//! caller supplies an `is_blocked` closure so the same search serves every
//! obstacle class: ordinary movement, terrain-only reachability, and
//! evasion. The closure is never consulted for the starting tile, which lets
//! players route away from a tile they could not legally enter, such as one
//! that is already burning.

use std::collections::VecDeque;

use blast_arena_core::TilePoint;

/// Number of pathfinding hops between two tiles, or `None` when no route
/// exists under the provided blocking rule.
#[must_use]
pub fn path_length<F>(width: u32, height: u32, from: TilePoint, to: TilePoint, is_blocked: F) -> Option<u32>
where
    F: FnMut(TilePoint) -> bool,
{
    let distances = flood(width, height, from, to, is_blocked)?;
    let offset = index(width, to)?;
    let distance = *distances.get(offset)?;
    (distance != UNREACHED).then_some(distance)
}

/// First hop of a shortest route from `from` to `to`, or `None` when no
/// route exists.
///
/// When the two tiles coincide the step resolves to `from` itself, so a
/// caller standing on its destination still observes a successful step.
#[must_use]
pub fn next_step<F>(
    width: u32,
    height: u32,
    from: TilePoint,
    to: TilePoint,
    is_blocked: F,
) -> Option<TilePoint>
where
    F: FnMut(TilePoint) -> bool,
{
    if from == to {
        return in_bounds(width, height, from).then_some(from);
    }

    let distances = flood(width, height, from, to, is_blocked)?;
    let goal_offset = index(width, to)?;
    if *distances.get(goal_offset)? == UNREACHED {
        return None;
    }

    // Walk the distance gradient backwards from the goal to the tile
    // adjacent to the start.
    let mut cursor = to;
    loop {
        let cursor_distance = index(width, cursor).and_then(|offset| distances.get(offset))?;
        if *cursor_distance == 1 {
            return Some(cursor);
        }

        let mut stepped = false;
        for neighbor in neighbors(cursor, width, height) {
            let Some(offset) = index(width, neighbor) else {
                continue;
            };
            if distances[offset] != UNREACHED && distances[offset] + 1 == *cursor_distance {
                cursor = neighbor;
                stepped = true;
                break;
            }
        }

        if !stepped {
            return None;
        }
    }
}

const UNREACHED: u32 = u32::MAX;

/// Dense forward breadth-first search seeded at `from`. Returns `None` when
/// the grid is empty or the start lies outside it; otherwise the distance
/// grid, with `UNREACHED` marking tiles no route reaches. The search stops
/// early once `to` has been assigned a distance.
fn flood<F>(
    width: u32,
    height: u32,
    from: TilePoint,
    to: TilePoint,
    mut is_blocked: F,
) -> Option<Vec<u32>>
where
    F: FnMut(TilePoint) -> bool,
{
    let width_usize = usize::try_from(width).ok()?;
    let height_usize = usize::try_from(height).ok()?;
    let cell_count = width_usize.checked_mul(height_usize)?;

    if cell_count == 0 || !in_bounds(width, height, from) {
        return None;
    }

    let mut distances = vec![UNREACHED; cell_count];
    let origin_offset = index(width, from)?;
    distances[origin_offset] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            break;
        }

        let current = index(width, cell).map(|offset| distances[offset])?;
        let next_distance = current.checked_add(1)?;

        for neighbor in neighbors(cell, width, height) {
            if is_blocked(neighbor) {
                continue;
            }

            let Some(offset) = index(width, neighbor) else {
                continue;
            };

            if distances[offset] <= next_distance {
                continue;
            }

            distances[offset] = next_distance;
            queue.push_back(neighbor);
        }
    }

    Some(distances)
}

fn in_bounds(width: u32, height: u32, cell: TilePoint) -> bool {
    cell.x() < width && cell.y() < height
}

fn neighbors(cell: TilePoint, width: u32, height: u32) -> impl Iterator<Item = TilePoint> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(y) = cell.y().checked_sub(1) {
        candidates[count] = Some(TilePoint::new(cell.x(), y));
        count += 1;
    }

    if let Some(x) = cell.x().checked_add(1) {
        if x < width {
            candidates[count] = Some(TilePoint::new(x, cell.y()));
            count += 1;
        }
    }

    if let Some(y) = cell.y().checked_add(1) {
        if y < height {
            candidates[count] = Some(TilePoint::new(cell.x(), y));
            count += 1;
        }
    }

    if let Some(x) = cell.x().checked_sub(1) {
        candidates[count] = Some(TilePoint::new(x, cell.y()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: u32, cell: TilePoint) -> Option<usize> {
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(width).ok()?;
    if x >= width {
        return None;
    }
    y.checked_mul(width)?.checked_add(x)
}
