#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for tower defence adapters.
//!
//! A [`Scene`] is captured from the world's read-only queries once per frame.
//! Every scene element implements [`Drawable`], which lowers it into backend
//! agnostic [`DrawCommand`] values; a [`RenderingBackend`] presents them.

use anyhow::Result as AnyResult;
use tower_defence_core::{
    InfoPanel, Rgb, TerrainKind, TileCoord, TowerId, TowerKind, Vec2, WorldRect,
};
use tower_defence_world::{query, World};

/// Window background.
pub const BACKGROUND: Color = Color::from_rgb_u8(0, 0, 0);
/// Sidebar background.
pub const SIDEBAR: Color = Color::from_rgb_u8(50, 50, 50);
/// Outline drawn around every tile.
pub const GRID_LINE: Color = Color::from_rgb_u8(50, 50, 50);
/// Default text colour.
pub const TEXT: Color = Color::from_rgb_u8(255, 255, 255);
/// Enemy body colour.
pub const ENEMY: Color = Color::from_rgb_u8(255, 0, 0);
/// Translucent fill of a tower's range circle.
pub const RANGE: Color = Color::new(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0);
/// Border of the selected catalog button.
pub const SELECTED: Color = Color::from_rgb_u8(255, 255, 0);
/// Cost text when the balance covers it.
pub const AFFORDABLE: Color = Color::from_rgb_u8(0, 255, 0);
/// Cost text when the balance falls short.
pub const EXPENSIVE: Color = Color::from_rgb_u8(255, 100, 100);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Input gathered by adapters before the next simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in world units, if the cursor is over the window.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the primary button was pressed this frame.
    pub confirm_action: bool,
    /// Catalog entry chosen in the sidebar this frame.
    pub select_kind: Option<TowerKind>,
}

/// Lookup for image assets a backend was able to load.
pub trait AssetCatalog {
    /// Reports whether the named image can be drawn.
    fn contains(&self, file: &str) -> bool;
}

/// Catalog without any images; every sprite falls back to its colour.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetCatalog for NoAssets {
    fn contains(&self, _file: &str) -> bool {
        false
    }
}

/// How a tower body is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
    /// Loaded image drawn over the tile.
    Image(&'static str),
    /// Plain colour square used when no image resolves.
    Solid(Color),
}

impl Sprite {
    /// Resolves an optional image against the catalog, falling back to `colour`.
    #[must_use]
    pub fn resolve(image: Option<&'static str>, colour: Rgb, assets: &dyn AssetCatalog) -> Self {
        match image {
            Some(file) if assets.contains(file) => Self::Image(file),
            _ => Self::Solid(colour.into()),
        }
    }
}

/// Primitive produced by [`Drawable`] implementations.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle.
    FillRect {
        /// Area to fill.
        rect: WorldRect,
        /// Fill colour.
        color: Color,
    },
    /// Rectangle outline.
    StrokeRect {
        /// Area to outline.
        rect: WorldRect,
        /// Line colour.
        color: Color,
        /// Line width in world units.
        width: f32,
    },
    /// Filled circle.
    FillCircle {
        /// Circle centre.
        center: Vec2,
        /// Circle radius.
        radius: f32,
        /// Fill colour.
        color: Color,
    },
    /// Image stretched over a rectangle.
    Image {
        /// Area covered by the image.
        rect: WorldRect,
        /// Asset file name.
        file: &'static str,
    },
    /// Single line of text anchored at its upper-left corner.
    Text {
        /// Anchor position.
        position: Vec2,
        /// Text to draw.
        text: String,
        /// Text colour.
        color: Color,
    },
}

/// Entity that can lower itself into draw commands.
pub trait Drawable {
    /// Appends the commands that paint the entity to `out`.
    fn draw(&self, out: &mut Vec<DrawCommand>);
}

/// Tile as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Grid coordinate.
    pub coord: TileCoord,
    /// Terrain kind.
    pub terrain: TerrainKind,
    /// World-space area of the tile.
    pub rect: WorldRect,
    /// Fill colour derived from the terrain.
    pub color: Color,
}

impl Drawable for TilePresentation {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::FillRect {
            rect: self.rect,
            color: self.color,
        });
        out.push(DrawCommand::StrokeRect {
            rect: self.rect,
            color: GRID_LINE,
            width: 1.0,
        });
    }
}

/// Tower as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier allocated by the world.
    pub id: TowerId,
    /// Catalog entry.
    pub kind: TowerKind,
    /// Area of the tile the tower stands on.
    pub rect: WorldRect,
    /// Current targeting radius.
    pub range: f32,
    /// Current level.
    pub level: u32,
    /// Body visual.
    pub sprite: Sprite,
    /// Whether the range circle is shown (hovered or selected).
    pub show_range: bool,
}

impl Drawable for TowerPresentation {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        if self.show_range {
            out.push(DrawCommand::FillCircle {
                center: self.rect.center(),
                radius: self.range,
                color: RANGE,
            });
        }
        out.push(match self.sprite {
            Sprite::Image(file) => DrawCommand::Image {
                rect: self.rect,
                file,
            },
            Sprite::Solid(color) => DrawCommand::FillRect {
                rect: self.rect,
                color,
            },
        });
    }
}

/// Enemy as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Area the enemy occupies.
    pub rect: WorldRect,
    /// Remaining health in `0.0..=1.0`.
    pub health_fraction: f32,
}

impl Drawable for EnemyPresentation {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::FillRect {
            rect: self.rect,
            color: ENEMY,
        });

        let bar_height = (self.rect.size().y * 0.1).max(1.0);
        let bar = WorldRect::new(
            self.rect.min() - Vec2::new(0.0, bar_height),
            Vec2::new(self.rect.size().x * self.health_fraction, bar_height),
        );
        out.push(DrawCommand::FillRect {
            rect: bar,
            color: AFFORDABLE,
        });
    }
}

/// Projectile as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Area the projectile occupies.
    pub rect: WorldRect,
    /// Colour of the firing tower.
    pub color: Color,
}

impl Drawable for ProjectilePresentation {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::FillRect {
            rect: self.rect,
            color: self.color,
        });
    }
}

/// Catalog button in the sidebar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogButton {
    /// Catalog entry the button selects.
    pub kind: TowerKind,
    /// Button area.
    pub rect: WorldRect,
    /// Whether the entry is the current build selection.
    pub selected: bool,
}

impl Drawable for CatalogButton {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        let tower_type = self.kind.tower_type();
        out.push(DrawCommand::FillRect {
            rect: self.rect,
            color: tower_type.colour.into(),
        });
        let (color, width) = if self.selected {
            (SELECTED, 4.0)
        } else {
            (BACKGROUND, 2.0)
        };
        out.push(DrawCommand::StrokeRect {
            rect: self.rect,
            color,
            width,
        });
    }
}

/// Sidebar with the status lines, catalog buttons, and info panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Sidebar {
    /// Sidebar area.
    pub rect: WorldRect,
    /// Current balance.
    pub money: u32,
    /// Lives left.
    pub lives: u32,
    /// Spawner status line.
    pub wave_text: String,
    /// One button per catalog entry.
    pub buttons: Vec<CatalogButton>,
    /// Details of the hovered tower or the selected catalog entry.
    pub info: InfoPanel,
}

impl Sidebar {
    /// Status lines in display order.
    #[must_use]
    pub fn status_lines(&self) -> [String; 3] {
        [
            format!("Money: ${}", self.money),
            format!("Lives: {}", self.lives),
            self.wave_text.clone(),
        ]
    }

    /// Info panel lines in display order, with upgrade previews in brackets.
    #[must_use]
    pub fn info_lines(&self) -> Vec<String> {
        let stats = self.info.stats;
        let preview = self.info.preview;
        let line = |label: &str, value: u32, next: Option<u32>| match next {
            Some(next) => format!("{label}: {value} -> {next}"),
            None => format!("{label}: {value}"),
        };

        vec![
            self.info.title.clone(),
            line("Dmg", stats.damage, preview.map(|next| next.damage)),
            line("Rng", stats.range, preview.map(|next| next.range)),
            line(
                "Cool",
                stats.cooldown_ticks,
                preview.map(|next| next.cooldown_ticks),
            ),
            format!("Cost: ${}", self.info.cost),
            self.info.footer.to_owned(),
        ]
    }
}

impl Drawable for Sidebar {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::FillRect {
            rect: self.rect,
            color: SIDEBAR,
        });

        let line_height = 20.0;
        let mut cursor = self.rect.min() + Vec2::splat(10.0);
        for text in self.status_lines() {
            out.push(DrawCommand::Text {
                position: cursor,
                text,
                color: TEXT,
            });
            cursor.y += line_height;
        }

        for button in &self.buttons {
            button.draw(out);
        }

        cursor.y = self.buttons.iter().fold(cursor.y, |lowest, button| {
            lowest.max(button.rect.max().y)
        }) + line_height;
        let cost_color = if self.info.affordable(self.money) {
            AFFORDABLE
        } else {
            EXPENSIVE
        };
        for text in self.info_lines() {
            let color = if text.starts_with("Cost") { cost_color } else { TEXT };
            out.push(DrawCommand::Text {
                position: cursor,
                text,
                color,
            });
            cursor.y += line_height;
        }
    }
}

/// Everything a backend needs to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of map columns.
    pub columns: u32,
    /// Number of map rows.
    pub rows: u32,
    /// Side length of a tile.
    pub tile_size: f32,
    /// Tiles in scan order.
    pub tiles: Vec<TilePresentation>,
    /// Towers in build order.
    pub towers: Vec<TowerPresentation>,
    /// Enemies in spawn order.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Sidebar contents.
    pub sidebar: Sidebar,
}

impl Scene {
    /// Width of the sidebar in world units.
    pub const SIDEBAR_WIDTH: f32 = 200.0;

    /// Captures the current world state.
    #[must_use]
    pub fn capture(world: &World, assets: &dyn AssetCatalog) -> Self {
        let (columns, rows) = query::grid_size(world);
        let tile_size = query::config(world).tile_size;

        let tiles = query::tiles(world)
            .into_iter()
            .map(|tile| TilePresentation {
                coord: tile.coord,
                terrain: tile.terrain,
                rect: tile.coord.bounds(tile_size),
                color: tile.terrain.colour().into(),
            })
            .collect();

        let tower_view = query::tower_view(world);
        let towers = tower_view
            .iter()
            .map(|tower| {
                let tower_type = tower.kind.tower_type();
                TowerPresentation {
                    id: tower.id,
                    kind: tower.kind,
                    rect: tower.tile.bounds(tile_size),
                    range: tower.stats.range as f32,
                    level: tower.level,
                    sprite: Sprite::resolve(tower_type.image_file, tower_type.colour, assets),
                    show_range: tower.hovered || tower.selected,
                }
            })
            .collect();

        let enemies = query::enemy_view(world)
            .iter()
            .map(|enemy| EnemyPresentation {
                rect: WorldRect::centered_square(enemy.position, tile_size),
                health_fraction: enemy.health_fraction(),
            })
            .collect();

        let projectiles = query::projectiles(world)
            .into_iter()
            .map(|projectile| {
                let color = tower_view
                    .iter()
                    .find(|tower| tower.id == projectile.tower)
                    .map_or(TEXT, |tower| tower.kind.tower_type().colour.into());
                ProjectilePresentation {
                    rect: WorldRect::centered_square(projectile.position, projectile.size),
                    color,
                }
            })
            .collect();

        let map_width = columns as f32 * tile_size;
        let sidebar_rect = WorldRect::new(
            Vec2::new(map_width, 0.0),
            Vec2::new(Self::SIDEBAR_WIDTH, rows as f32 * tile_size),
        );
        let button_size = 50.0;
        let buttons = TowerKind::ALL
            .iter()
            .enumerate()
            .map(|(index, kind)| CatalogButton {
                kind: *kind,
                rect: WorldRect::new(
                    sidebar_rect.min()
                        + Vec2::new(10.0 + index as f32 * (button_size + 10.0), 80.0),
                    Vec2::splat(button_size),
                ),
                selected: world.is_selected(*kind),
            })
            .collect();

        Self {
            columns,
            rows,
            tile_size,
            tiles,
            towers,
            enemies,
            projectiles,
            sidebar: Sidebar {
                rect: sidebar_rect,
                money: query::money(world),
                lives: query::lives(world),
                wave_text: query::spawner_text(world),
                buttons,
                info: query::info_panel(world),
            },
        }
    }

    /// Catalog entry whose sidebar button lies under `pointer`, if any.
    #[must_use]
    pub fn button_at(&self, pointer: Vec2) -> Option<TowerKind> {
        self.sidebar
            .buttons
            .iter()
            .find(|button| button.rect.contains(pointer))
            .map(|button| button.kind)
    }

    /// Lowers the whole scene in paint order: tiles, towers, enemies,
    /// projectiles, then the sidebar.
    #[must_use]
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        self.draw(&mut out);
        out
    }
}

impl Drawable for Scene {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        for tile in &self.tiles {
            tile.draw(out);
        }
        for tower in &self.towers {
            tower.draw(out);
        }
        for enemy in &self.enemies {
            enemy.draw(out);
        }
        for projectile in &self.projectiles {
            projectile.draw(out);
        }
        self.sidebar.draw(out);
    }
}

/// Rendering backend capable of presenting captured scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}
