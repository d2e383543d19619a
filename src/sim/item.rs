//! Purchasable items: consumable ammunition and permanent upgrades
//!
//! Items are plain value data. The purchase logic in [`crate::sim::Tank`]
//! matches exhaustively on [`Item`] - there is deliberately no trait object
//! or downcasting involved.

use serde::{Deserialize, Serialize};

use crate::consts::{BASIC_SHELL_DAMAGE, BASIC_SHELL_NAME, BASIC_SHELL_RADIUS};

/// A named, priced weapon definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ammo {
    pub name: String,
    pub price: u32,
    /// Splash damage radius (world units)
    pub radius: f32,
    /// Damage at the impact point
    pub damage: f32,
}

impl Ammo {
    pub fn new(name: impl Into<String>, price: u32, radius: f32, damage: f32) -> Self {
        Self {
            name: name.into(),
            price,
            radius,
            damage,
        }
    }

    /// The default shell every tank carries in inventory slot 0.
    /// Free, untracked in the charge map, and never removed.
    pub fn basic_shell() -> Self {
        Self::new(BASIC_SHELL_NAME, 0, BASIC_SHELL_RADIUS, BASIC_SHELL_DAMAGE)
    }

    pub fn is_basic_shell(&self) -> bool {
        self.name == BASIC_SHELL_NAME
    }
}

/// Number of upgrade categories (slots in `Tank::upgrade_count`)
pub const UPGRADE_KINDS: usize = 4;

/// Permanent stat-modifier categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    HillClimb,
    Engine,
    StartFuel,
    Armor,
}

impl UpgradeKind {
    /// Fixed slot in the per-tank purchase counter
    pub fn index(self) -> usize {
        match self {
            UpgradeKind::HillClimb => 0,
            UpgradeKind::Engine => 1,
            UpgradeKind::StartFuel => 2,
            UpgradeKind::Armor => 3,
        }
    }
}

/// A named, priced permanent stat modifier
///
/// `qty` multiplies the target stat for every category except
/// [`UpgradeKind::StartFuel`], which adds instead (extra fuel is a bigger
/// tank, not a better engine). Purchases compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub name: String,
    pub price: u32,
    pub kind: UpgradeKind,
    pub qty: f32,
}

impl Upgrade {
    pub fn new(name: impl Into<String>, price: u32, kind: UpgradeKind, qty: f32) -> Self {
        Self {
            name: name.into(),
            price,
            kind,
            qty,
        }
    }
}

/// Anything the store can sell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Ammo(Ammo),
    Upgrade(Upgrade),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Ammo(a) => &a.name,
            Item::Upgrade(u) => &u.name,
        }
    }

    pub fn price(&self) -> u32 {
        match self {
            Item::Ammo(a) => a.price,
            Item::Upgrade(u) => u.price,
        }
    }
}

/// Default store inventory offered between turns
pub fn store_catalog() -> Vec<Item> {
    vec![
        Item::Ammo(Ammo::new("Mortar", 10, 35.0, 35.0)),
        Item::Ammo(Ammo::new("Heavy Shell", 25, 30.0, 50.0)),
        Item::Ammo(Ammo::new("Bunker Buster", 40, 15.0, 80.0)),
        Item::Upgrade(Upgrade::new("Climbing Treads", 30, UpgradeKind::HillClimb, 1.5)),
        Item::Upgrade(Upgrade::new("Tuned Engine", 30, UpgradeKind::Engine, 1.5)),
        Item::Upgrade(Upgrade::new("Auxiliary Fuel Tank", 20, UpgradeKind::StartFuel, 50.0)),
        Item::Upgrade(Upgrade::new("Composite Armor", 40, UpgradeKind::Armor, 1.5)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shell_is_free() {
        let shell = Ammo::basic_shell();
        assert_eq!(shell.price, 0);
        assert!(shell.is_basic_shell());
        assert_eq!(shell.radius, 20.0);
        assert_eq!(shell.damage, 20.0);
    }

    #[test]
    fn test_upgrade_kind_slots_are_distinct() {
        let kinds = [
            UpgradeKind::HillClimb,
            UpgradeKind::Engine,
            UpgradeKind::StartFuel,
            UpgradeKind::Armor,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(kinds.len(), UPGRADE_KINDS);
    }

    #[test]
    fn test_catalog_covers_every_upgrade_category() {
        let catalog = store_catalog();
        let mut seen = [false; UPGRADE_KINDS];
        for item in &catalog {
            if let Item::Upgrade(u) = item {
                seen[u.kind.index()] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_catalog_names_unique_and_priced() {
        let catalog = store_catalog();
        for (i, item) in catalog.iter().enumerate() {
            assert!(item.price() > 0, "store never sells the free shell");
            for other in &catalog[i + 1..] {
                assert_ne!(item.name(), other.name());
            }
        }
    }
}
