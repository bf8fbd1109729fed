//! Text backend that prints a scene as a character grid followed by the sidebar.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use tower_defence_core::{TerrainKind, TileCoord, TowerKind, Vec2};
use tower_defence_rendering::{RenderingBackend, Scene};

/// Writes each presented frame to the wrapped writer.
pub(crate) struct AsciiBackend<W> {
    out: W,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.out
            .write_all(render(scene).as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")
    }
}

fn terrain_glyph(terrain: TerrainKind) -> char {
    match terrain {
        TerrainKind::Grass => '.',
        TerrainKind::Rock => '#',
        TerrainKind::Path => '=',
        TerrainKind::Unknown => '?',
    }
}

fn tower_glyph(kind: TowerKind) -> char {
    match kind {
        TowerKind::Archer => 'A',
        TowerKind::Cannon => 'C',
    }
}

/// Paints the map with towers, projectiles, then enemies on top, and appends
/// the sidebar text.
pub(crate) fn render(scene: &Scene) -> String {
    let columns = usize::try_from(scene.columns).unwrap_or(0);
    let rows = usize::try_from(scene.rows).unwrap_or(0);
    let mut canvas = vec![vec![' '; columns]; rows];

    let mut plot = |coord: Option<TileCoord>, glyph: char| {
        let Some(coord) = coord else {
            return;
        };
        let cell = usize::try_from(coord.row())
            .ok()
            .and_then(|row| canvas.get_mut(row))
            .and_then(|line| line.get_mut(usize::try_from(coord.column()).ok()?));
        if let Some(cell) = cell {
            *cell = glyph;
        }
    };
    let tile_of = |point: Vec2| TileCoord::from_world(point, scene.tile_size);

    for tile in &scene.tiles {
        plot(Some(tile.coord), terrain_glyph(tile.terrain));
    }
    for tower in &scene.towers {
        plot(tile_of(tower.rect.center()), tower_glyph(tower.kind));
    }
    for projectile in &scene.projectiles {
        plot(tile_of(projectile.rect.center()), '*');
    }
    for enemy in &scene.enemies {
        plot(tile_of(enemy.rect.center()), '@');
    }

    let mut frame = String::new();
    for line in &canvas {
        frame.extend(line.iter());
        frame.push('\n');
    }
    frame.push('\n');
    for line in scene
        .sidebar
        .status_lines()
        .into_iter()
        .chain(scene.sidebar.info_lines())
    {
        frame.push_str(&line);
        frame.push('\n');
    }
    frame
}
