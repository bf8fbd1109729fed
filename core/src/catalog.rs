//! Immutable tower catalog and the upgrade arithmetic applied to placed towers.

use serde::{Deserialize, Serialize};

use crate::{Rgb, TerrainKind};

/// Footer shown beneath catalog entries in the info panel.
pub const BUILD_FOOTER: &str = "(Click to Build)";

/// Footer shown beneath placed towers in the info panel.
pub const UPGRADE_FOOTER: &str = "(Click to Upg)";

/// Range added to a tower by each upgrade.
pub const UPGRADE_RANGE_BONUS: u32 = 15;

/// Shortest cooldown an upgraded tower may reach.
pub const MIN_COOLDOWN_TICKS: u32 = 1;

/// Fixed statistics describing one kind of tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerType {
    /// Display name of the tower.
    pub name: &'static str,
    /// Currency required to build the tower.
    pub cost: u32,
    /// Targeting radius in world units.
    pub range: u32,
    /// Damage applied by a single projectile.
    pub damage: u32,
    /// Ticks the tower waits between shots.
    pub cooldown_ticks: u32,
    /// Distance travelled by a projectile per tick.
    pub projectile_speed: f32,
    /// Side length of the projectile hit box in world units.
    pub projectile_size: f32,
    /// Terrain kinds that accept this tower.
    pub allowed_terrain: &'static [TerrainKind],
    /// Colour used for the tower body and its projectiles.
    pub colour: Rgb,
    /// Optional sprite file; adapters fall back to `colour` when absent or unresolved.
    pub image_file: Option<&'static str>,
}

impl TowerType {
    /// Reports whether the tower may sit on the provided terrain.
    #[must_use]
    pub fn allows(&self, terrain: TerrainKind) -> bool {
        self.allowed_terrain.contains(&terrain)
    }

    /// Statistics the tower starts with at level one.
    #[must_use]
    pub const fn base_stats(&self) -> UpgradeStats {
        UpgradeStats {
            damage: self.damage,
            range: self.range,
            cooldown_ticks: self.cooldown_ticks,
        }
    }

    /// Info panel describing the catalog entry before it is built.
    #[must_use]
    pub fn info(&self) -> InfoPanel {
        InfoPanel {
            title: self.name.to_owned(),
            colour: self.colour,
            stats: self.base_stats(),
            cost: self.cost,
            footer: BUILD_FOOTER,
            preview: None,
        }
    }
}

/// Cheap, fast, low-damage tower restricted to grass.
pub const ARCHER: TowerType = TowerType {
    name: "Archer Tower",
    cost: 50,
    range: 120,
    damage: 10,
    cooldown_ticks: 45,
    projectile_speed: 10.0,
    projectile_size: 4.0,
    allowed_terrain: &[TerrainKind::Grass],
    colour: Rgb::new(0, 0, 200),
    image_file: Some("Dog_1.png"),
};

/// Expensive, slow, high-damage tower restricted to rock.
pub const CANNON: TowerType = TowerType {
    name: "Cannon Tower",
    cost: 150,
    range: 80,
    damage: 30,
    cooldown_ticks: 90,
    projectile_speed: 5.0,
    projectile_size: 8.0,
    allowed_terrain: &[TerrainKind::Rock],
    colour: Rgb::new(150, 50, 0),
    image_file: None,
};

/// Identifies an entry in the tower catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// See [`ARCHER`].
    Archer,
    /// See [`CANNON`].
    Cannon,
}

impl TowerKind {
    /// Every catalog entry in presentation order.
    pub const ALL: [TowerKind; 2] = [TowerKind::Archer, TowerKind::Cannon];

    /// Resolves the shared catalog entry for the kind.
    #[must_use]
    pub const fn tower_type(self) -> &'static TowerType {
        match self {
            Self::Archer => &ARCHER,
            Self::Cannon => &CANNON,
        }
    }

    /// Parses a case-insensitive kind name such as `"archer"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| format!("{kind:?}").eq_ignore_ascii_case(name.trim()))
    }
}

/// Combat statistics of a tower at a given level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeStats {
    /// Damage applied by a single projectile.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: u32,
    /// Ticks between shots.
    pub cooldown_ticks: u32,
}

impl UpgradeStats {
    /// Statistics after one more upgrade.
    ///
    /// Damage scales by 1.5 and cooldown by 0.9, both rounded down; range grows by
    /// [`UPGRADE_RANGE_BONUS`]. Cooldown never drops below [`MIN_COOLDOWN_TICKS`].
    /// Damage and range saturate at `u32::MAX`.
    #[must_use]
    pub fn upgraded(self) -> Self {
        let damage = u64::from(self.damage) * 3 / 2;
        Self {
            damage: u32::try_from(damage).unwrap_or(u32::MAX),
            range: self.range.saturating_add(UPGRADE_RANGE_BONUS),
            cooldown_ticks: (self.cooldown_ticks.saturating_mul(9) / 10).max(MIN_COOLDOWN_TICKS),
        }
    }
}

/// Cost of upgrading a tower of the provided base cost from `level`.
///
/// Equals `floor(base_cost * level * 0.7)`, computed in integers.
#[must_use]
pub fn upgrade_cost(base_cost: u32, level: u32) -> u32 {
    let scaled = u64::from(base_cost) * u64::from(level) * 7 / 10;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Data shown in the sidebar info panel for a tower or catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoPanel {
    /// Heading line, e.g. `"LVL 2 Archer Tower"`.
    pub title: String,
    /// Accent colour of the described tower.
    pub colour: Rgb,
    /// Current statistics.
    pub stats: UpgradeStats,
    /// Build cost for catalog entries, upgrade cost for placed towers.
    pub cost: u32,
    /// Hint describing what clicking does.
    pub footer: &'static str,
    /// Statistics after the next upgrade, for placed towers.
    pub preview: Option<UpgradeStats>,
}

impl InfoPanel {
    /// Reports whether `balance` covers the listed cost.
    #[must_use]
    pub const fn affordable(&self, balance: u32) -> bool {
        balance >= self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archer_and_cannon_are_restricted_to_their_terrain() {
        assert!(ARCHER.allows(TerrainKind::Grass));
        assert!(!ARCHER.allows(TerrainKind::Rock));
        assert!(CANNON.allows(TerrainKind::Rock));
        assert!(!CANNON.allows(TerrainKind::Grass));
        assert!(!CANNON.allows(TerrainKind::Path));
    }

    #[test]
    fn upgrade_scales_and_floors_stats() {
        let next = ARCHER.base_stats().upgraded();
        assert_eq!(
            next,
            UpgradeStats {
                damage: 15,
                range: 135,
                cooldown_ticks: 40,
            }
        );

        let after = next.upgraded();
        assert_eq!(after.damage, 22);
        assert_eq!(after.cooldown_ticks, 36);
    }

    #[test]
    fn upgrades_are_monotonic_until_cooldown_saturates() {
        let mut stats = CANNON.base_stats();
        for _ in 0..30 {
            let next = stats.upgraded();
            assert!(next.damage > stats.damage || stats.damage == 0);
            assert!(next.range > stats.range);
            if stats.cooldown_ticks > MIN_COOLDOWN_TICKS {
                assert!(next.cooldown_ticks < stats.cooldown_ticks);
            } else {
                assert_eq!(next.cooldown_ticks, MIN_COOLDOWN_TICKS);
            }
            stats = next;
        }
    }

    #[test]
    fn damage_keeps_growing_until_it_saturates() {
        let mut stats = ARCHER.base_stats();
        let mut level = 1u32;
        while stats.damage < u32::MAX {
            let next = stats.upgraded();
            assert!(
                next.damage > stats.damage,
                "level {level}: {} -> {}",
                stats.damage,
                next.damage
            );
            stats = next;
            level += 1;
        }

        assert!(level > 50);
        assert_eq!(stats.upgraded().damage, u32::MAX);
    }

    #[test]
    fn upgrade_cost_grows_with_level() {
        assert_eq!(upgrade_cost(50, 1), 35);
        assert_eq!(upgrade_cost(50, 2), 70);
        assert_eq!(upgrade_cost(150, 3), 315);
        for level in 1..20 {
            assert!(upgrade_cost(150, level + 1) > upgrade_cost(150, level));
        }
    }

    #[test]
    fn kind_names_parse_case_insensitively() {
        assert_eq!(TowerKind::from_name("Archer"), Some(TowerKind::Archer));
        assert_eq!(TowerKind::from_name(" cannon "), Some(TowerKind::Cannon));
        assert_eq!(TowerKind::from_name("ballista"), None);
    }

    #[test]
    fn catalog_info_uses_build_footer() {
        let info = CANNON.info();
        assert_eq!(info.title, "Cannon Tower");
        assert_eq!(info.cost, 150);
        assert_eq!(info.footer, BUILD_FOOTER);
        assert!(info.preview.is_none());
        assert!(!info.affordable(149));
        assert!(info.affordable(150));
    }
}
