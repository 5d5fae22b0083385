//! Arena generation and plain-text rendering for the CLI adapter.

use blast_arena_core::{Command, PlayerKind, Terrain, TilePoint};
use blast_arena_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Produces the command batch that carves a classic arena into a freshly
/// configured field: perimeter walls, a lattice of interior pillars, and
/// seeded random crates everywhere except the spawn pockets.
pub(crate) fn layout_commands(
    width: u32,
    height: u32,
    crate_density: f64,
    seed: u64,
) -> Vec<Command> {
    let mut commands = vec![Command::ConfigureField { width, height }];
    let crate_density = crate_density.clamp(0.0, 1.0);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pockets = spawn_pockets(width, height);

    for y in 0..height {
        for x in 0..width {
            let position = TilePoint::new(x, y);
            let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            let pillar = x % 2 == 0 && y % 2 == 0;

            if border || pillar {
                commands.push(Command::SetTerrain {
                    position,
                    terrain: Terrain::Wall,
                });
            } else if !pockets.contains(&position) && rng.gen_bool(crate_density) {
                commands.push(Command::SetTerrain {
                    position,
                    terrain: Terrain::Crate,
                });
            }
        }
    }

    commands
}

/// Corner tiles reserved for players, kept clear of crates together with
/// their two neighbours so every spawn has room to move.
pub(crate) fn spawn_corners(width: u32, height: u32) -> [TilePoint; 4] {
    let right = width.saturating_sub(2).max(1);
    let bottom = height.saturating_sub(2).max(1);
    [
        TilePoint::new(1, 1),
        TilePoint::new(right, 1),
        TilePoint::new(1, bottom),
        TilePoint::new(right, bottom),
    ]
}

fn spawn_pockets(width: u32, height: u32) -> Vec<TilePoint> {
    let mut pockets = Vec::new();
    for corner in spawn_corners(width, height) {
        pockets.push(corner);
        pockets.push(TilePoint::new(corner.x() + 1, corner.y()));
        pockets.push(TilePoint::new(corner.x().saturating_sub(1), corner.y()));
        pockets.push(TilePoint::new(corner.x(), corner.y() + 1));
        pockets.push(TilePoint::new(corner.x(), corner.y().saturating_sub(1)));
    }
    pockets
}

/// Renders the field and players as one character per tile.
pub(crate) fn render(world: &World) -> String {
    let field = query::field(world);
    let players = query::players(world);
    let mut out = String::new();

    for y in 0..field.height() {
        for x in 0..field.width() {
            let position = TilePoint::new(x, y);
            let player = players.iter().find(|p| p.position == position);
            let glyph = if let Some(player) = player {
                match player.kind {
                    PlayerKind::User => 'U',
                    PlayerKind::Ai => 'A',
                }
            } else if field.has_bomb(position) {
                'o'
            } else if field.has_fire(position) {
                '*'
            } else {
                match field.terrain(position) {
                    Terrain::Floor => '.',
                    Terrain::Wall => '#',
                    Terrain::Crate => '%',
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }

    out
}
