//! The tank: the central combat entity
//!
//! A tank owns its vitals, physics stats, inventory, turn flags, and (while
//! a shot is in flight) its projectile. It holds no references to the
//! terrain or the rest of the roster - those are passed in per call, and
//! cross-tank effects travel back to the controller as [`Impact`] events.
//!
//! Player-driven invalid actions (no fuel, too steep, can't afford) are
//! silent no-ops: the player just tries something else. Programming misuse
//! (double-firing, selecting a weapon index that doesn't exist) is a
//! contract violation and fails fast.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::item::{Ammo, Item, UPGRADE_KINDS, UpgradeKind};
use super::projectile::{Impact, Projectile};
use super::terrain::Terrain;
use crate::consts::{
    DEFAULT_FIREPOWER, DEFAULT_FUEL, MUZZLE_OFFSET, TANK_GRAVITY_STEP, TANK_MAX_HP,
};

/// Opponent difficulty levels
///
/// Data only: decision-making for computer opponents lives outside this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiLevel {
    Low,
    Med,
    High,
}

/// A player-controlled artillery vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// 1-based seat index in the match
    pub player_num: usize,
    pub name: String,
    /// Display color, packed RGBA - opaque to the simulation
    pub color: u32,

    // Vitals
    pub hp: f32,
    pub fuel: f32,
    pub money: u32,
    pub score: u32,

    // Physics stats; persist across turns and rounds, upgradeable
    /// Maximum traversable gradient
    pub max_hill_climb: f32,
    /// Fuel-cost divisor
    pub engine_efficiency: f32,
    /// Fuel granted on round reset
    pub starting_fuel: f32,
    /// Damage divisor
    pub armor: f32,

    // Combat stats
    /// Launch speed magnitude (units/s)
    pub firepower: f32,
    /// Radians; 0 is horizontal toward +x
    pub cannon_angle: f32,
    /// Index into `weapons`
    pub selected_weapon: usize,

    // Inventory
    /// Slot 0 is always the basic shell and is never removed
    pub weapons: Vec<Ammo>,
    /// Remaining consumable charges by weapon name; the basic shell is
    /// never tracked here
    pub weapon_count: HashMap<String, u32>,
    /// Purchases made, one slot per upgrade category
    pub upgrade_count: [u32; UPGRADE_KINDS],

    // Spatial state
    pub position: Vec2,
    /// Previous tick's vertical position
    pub last_y: f32,

    // Turn state
    pub turn_ended: bool,
    pub has_fired: bool,

    /// In-flight shot; present only between a fire action and end of turn
    pub projectile: Option<Projectile>,
}

impl Tank {
    pub fn new(color: u32, player_num: usize, name: impl Into<String>) -> Self {
        Self {
            player_num,
            name: name.into(),
            color,
            hp: TANK_MAX_HP,
            fuel: DEFAULT_FUEL,
            money: 0,
            score: 0,
            max_hill_climb: 1.0,
            engine_efficiency: 1.0,
            starting_fuel: DEFAULT_FUEL,
            armor: 1.0,
            firepower: DEFAULT_FIREPOWER,
            cannon_angle: 0.0,
            selected_weapon: 0,
            weapons: vec![Ammo::basic_shell()],
            weapon_count: HashMap::new(),
            upgrade_count: [0; UPGRADE_KINDS],
            position: Vec2::ZERO,
            last_y: 0.0,
            turn_ended: false,
            has_fired: false,
            projectile: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Round reset: restore vitals, keeping purchased upgrades
    pub fn reset(&mut self) {
        self.hp = TANK_MAX_HP;
        self.fuel = self.starting_fuel;
    }

    /// Turn reset, called by the turn controller before this tank's turn
    pub fn reset_state(&mut self) {
        self.turn_ended = false;
        self.has_fired = false;
    }

    /// The only path that clears the projectile slot
    pub fn end_turn(&mut self) {
        self.turn_ended = true;
        self.projectile = None;
    }

    /// Attempt a horizontal displacement of signed magnitude `vector`
    ///
    /// All-or-nothing: rejected moves (no fuel, destination out of bounds,
    /// gradient at or above `max_hill_climb`) change no state at all. The
    /// slope is sampled on the terrain control grid, rounding the current
    /// cell up when moving left and down when moving right so the steeper
    /// side of the tank's cell is the one that counts.
    pub fn drive(&mut self, vector: f32, terrain: &Terrain) {
        if !self.is_alive() || vector == 0.0 {
            return;
        }
        if self.fuel <= 0.0 {
            return;
        }
        let dest = self.position.x + vector;
        if dest < 0.0 || dest >= terrain.width() {
            return;
        }

        let direction: isize = if vector < 0.0 { -1 } else { 1 };
        let cell = if direction < 0 {
            (self.position.x / terrain.chunk_size()).ceil() as isize
        } else {
            (self.position.x / terrain.chunk_size()).floor() as isize
        };
        let here = terrain.height_at(cell.max(0) as usize);
        let next = terrain.height_at((cell + direction).max(0) as usize);
        let gradient = (next - here) / terrain.chunk_size();
        if gradient >= self.max_hill_climb {
            log::debug!(
                "{}: move rejected, gradient {:.2} >= {:.2}",
                self.name,
                gradient,
                self.max_hill_climb
            );
            return;
        }

        self.fuel -= vector.abs() / self.engine_efficiency;
        self.position.x += vector;
        self.position.y += gradient * vector.abs();
    }

    /// Launch the selected weapon
    ///
    /// Contract: at most one shot may be in flight per tank; firing again
    /// before the previous projectile resolves is a defect, not an action
    /// to recover from, and panics rather than leaking the old shot.
    pub fn fire(&mut self) {
        if !self.is_alive() {
            return;
        }
        assert!(
            self.projectile.is_none(),
            "{}: fired while a projectile is still in flight",
            self.name
        );
        assert!(
            self.selected_weapon < self.weapons.len(),
            "{}: selected weapon {} out of range",
            self.name,
            self.selected_weapon
        );

        let ammo = self.weapons[self.selected_weapon].clone();
        let vx = self.firepower * self.cannon_angle.cos();
        let vy = self.firepower * self.cannon_angle.sin();
        let muzzle = self.position + Vec2::new(0.0, MUZZLE_OFFSET);
        self.projectile = Some(Projectile::new(
            vx,
            vy,
            muzzle,
            self.player_num - 1,
            ammo.clone(),
        ));

        if !ammo.is_basic_shell() {
            debug_assert!(
                self.weapon_count.contains_key(&ammo.name),
                "consumable weapon {} has no charge entry",
                ammo.name
            );
            if let Some(count) = self.weapon_count.get_mut(&ammo.name) {
                *count -= 1;
                if *count == 0 {
                    self.weapon_count.remove(&ammo.name);
                    self.weapons.remove(self.selected_weapon);
                    self.selected_weapon = 0;
                }
            }
        }
        self.has_fired = true;
        log::debug!("{} fired {} at angle {:.2}", self.name, ammo.name, self.cannon_angle);
    }

    /// Reduce hp by `amount / armor`; death detection happens in [`Tank::update`]
    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount / self.armor;
    }

    /// Spend credits on a store item
    ///
    /// Silently does nothing when unaffordable - the store UI is expected
    /// to have validated, but calling anyway must be safe.
    pub fn purchase(&mut self, item: &Item) {
        if self.money < item.price() {
            log::debug!(
                "{}: cannot afford {} ({} credits short)",
                self.name,
                item.name(),
                item.price() - self.money
            );
            return;
        }
        self.money -= item.price();
        match item {
            // The basic shell is already in every inventory and is never
            // charge-tracked
            Item::Ammo(ammo) if ammo.is_basic_shell() => {}
            Item::Ammo(ammo) => {
                if !self.weapons.iter().any(|w| w.name == ammo.name) {
                    self.weapons.push(ammo.clone());
                }
                *self.weapon_count.entry(ammo.name.clone()).or_insert(0) += 1;
            }
            Item::Upgrade(upgrade) => {
                match upgrade.kind {
                    UpgradeKind::Armor => self.armor *= upgrade.qty,
                    UpgradeKind::Engine => self.engine_efficiency *= upgrade.qty,
                    UpgradeKind::HillClimb => self.max_hill_climb *= upgrade.qty,
                    // Additive, unlike the other three: extra fuel is a
                    // bigger tank, not a better engine
                    UpgradeKind::StartFuel => self.starting_fuel += upgrade.qty,
                }
                self.upgrade_count[upgrade.kind.index()] += 1;
            }
        }
    }

    /// One simulation tick for the active tank
    ///
    /// Order matters: death check, then projectile advancement, then
    /// passive physics, then the turn-ending impact check. Returns the
    /// impact event (captured before `end_turn` clears the projectile) for
    /// the controller to apply splash damage.
    pub fn update(&mut self, terrain: &Terrain) -> Option<Impact> {
        if self.hp <= 0.0 {
            self.end_turn();
            return None;
        }
        if let Some(p) = self.projectile.as_mut() {
            p.advance(terrain);
        }
        self.passive_update(terrain)
    }

    fn passive_update(&mut self, terrain: &Terrain) -> Option<Impact> {
        self.last_y = self.position.y;
        if !terrain.contains(self.position) {
            self.position.y -= TANK_GRAVITY_STEP;
        }
        if self.position.y <= 0.0 {
            self.hp = 0.0;
            log::info!("{} fell off the world", self.name);
        }
        if self.projectile.as_ref().is_some_and(Projectile::has_impacted) {
            let impact = self.projectile.as_ref().and_then(Projectile::resolve);
            self.end_turn();
            return impact;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::Upgrade;
    use proptest::prelude::*;

    fn flat() -> Terrain {
        Terrain::flat(100.0, 21, 10.0)
    }

    /// Tank seated on the surface of `terrain` at x
    fn tank_on(terrain: &Terrain, x: f32) -> Tank {
        let mut tank = Tank::new(0xff0000ff, 1, "Test");
        tank.position = Vec2::new(x, terrain.surface_height(x));
        tank
    }

    fn mortar() -> Item {
        Item::Ammo(Ammo::new("Mortar", 10, 35.0, 35.0))
    }

    #[test]
    fn test_damage_divided_by_armor() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.take_damage(25.0);
        tank.take_damage(25.0);
        assert_eq!(tank.hp, 50.0);

        let mut armored = tank_on(&flat(), 50.0);
        armored.armor = 2.0;
        armored.take_damage(25.0);
        assert_eq!(armored.hp, 87.5);
    }

    #[test]
    fn test_move_on_flat_terrain() {
        let terrain = flat();
        let mut tank = tank_on(&terrain, 50.0);
        tank.fuel = 10.0;
        tank.drive(5.0, &terrain);
        assert_eq!(tank.position.x, 55.0);
        assert_eq!(tank.fuel, 5.0);
        assert_eq!(tank.position.y, 100.0);
    }

    #[test]
    fn test_move_rides_the_slope() {
        // Rises 5 per 10-unit chunk: gradient 0.5
        let heights: Vec<f32> = (0..21).map(|i| 100.0 + 5.0 * i as f32).collect();
        let terrain = Terrain::new(heights, 10.0);
        let mut tank = tank_on(&terrain, 50.0);
        let y0 = tank.position.y;
        tank.drive(10.0, &terrain);
        assert_eq!(tank.position.x, 60.0);
        assert!((tank.position.y - (y0 + 5.0)).abs() < 1e-4);
        assert_eq!(tank.fuel, DEFAULT_FUEL - 10.0);
    }

    #[test]
    fn test_move_rejected_on_cliff_is_atomic() {
        // Wall between cells 5 and 6
        let mut heights = vec![100.0; 21];
        for h in heights.iter_mut().skip(6) {
            *h = 300.0;
        }
        let terrain = Terrain::new(heights, 10.0);
        let mut tank = tank_on(&terrain, 50.0);
        tank.drive(5.0, &terrain);
        assert_eq!(tank.position, Vec2::new(50.0, 100.0));
        assert_eq!(tank.fuel, DEFAULT_FUEL);
    }

    #[test]
    fn test_move_rejected_without_fuel() {
        let terrain = flat();
        let mut tank = tank_on(&terrain, 50.0);
        tank.fuel = 0.0;
        tank.drive(5.0, &terrain);
        assert_eq!(tank.position.x, 50.0);
    }

    #[test]
    fn test_move_rejected_out_of_bounds() {
        let terrain = flat(); // width 200
        let mut tank = tank_on(&terrain, 195.0);
        tank.drive(10.0, &terrain);
        assert_eq!(tank.position.x, 195.0);
        tank.position.x = 3.0;
        tank.drive(-5.0, &terrain);
        assert_eq!(tank.position.x, 3.0);
    }

    #[test]
    fn test_leftward_move_samples_ceil_cell() {
        // Spike at control point 5: a tank between points 5 and 6 moving
        // left must sample 6 -> 5 (uphill, rejected), not 5 -> 4
        let mut heights = vec![100.0; 21];
        heights[5] = 300.0;
        let terrain = Terrain::new(heights, 10.0);
        let mut tank = tank_on(&terrain, 55.0);
        tank.drive(-2.0, &terrain);
        assert_eq!(tank.position.x, 55.0);
        assert_eq!(tank.fuel, DEFAULT_FUEL);
    }

    #[test]
    fn test_dead_tank_does_not_move_or_fire() {
        let terrain = flat();
        let mut tank = tank_on(&terrain, 50.0);
        tank.hp = 0.0;
        tank.drive(5.0, &terrain);
        assert_eq!(tank.position.x, 50.0);
        tank.fire();
        assert!(tank.projectile.is_none());
        assert!(!tank.has_fired);
    }

    #[test]
    fn test_firing_basic_shell_leaves_inventory_alone() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.fire();
        assert!(tank.projectile.is_some());
        assert!(tank.has_fired);
        assert_eq!(tank.weapons.len(), 1);
        assert!(tank.weapon_count.is_empty());
    }

    #[test]
    fn test_buy_and_exhaust_consumable() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.money = 10;
        tank.purchase(&mortar());
        assert_eq!(tank.money, 0);
        assert_eq!(tank.weapons.len(), 2);
        assert_eq!(tank.weapon_count["Mortar"], 1);

        tank.selected_weapon = 1;
        tank.fire();
        assert!(!tank.weapon_count.contains_key("Mortar"));
        assert!(!tank.weapons.iter().any(|w| w.name == "Mortar"));
        assert_eq!(tank.selected_weapon, 0);
    }

    #[test]
    fn test_charges_accumulate_across_purchases() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.money = 20;
        tank.purchase(&mortar());
        tank.purchase(&mortar());
        // One inventory slot, two charges
        assert_eq!(tank.weapons.len(), 2);
        assert_eq!(tank.weapon_count["Mortar"], 2);

        tank.selected_weapon = 1;
        tank.fire();
        assert_eq!(tank.weapon_count["Mortar"], 1);
        assert_eq!(tank.selected_weapon, 1);

        tank.end_turn();
        tank.fire();
        assert!(!tank.weapon_count.contains_key("Mortar"));
        assert_eq!(tank.selected_weapon, 0);
    }

    #[test]
    #[should_panic(expected = "still in flight")]
    fn test_double_fire_is_a_contract_violation() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.fire();
        tank.fire();
    }

    #[test]
    fn test_purchase_without_funds_is_a_noop() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.money = 5;
        let before_upgrades = tank.upgrade_count;
        tank.purchase(&mortar());
        assert_eq!(tank.money, 5);
        assert_eq!(tank.weapons.len(), 1);
        assert!(tank.weapon_count.is_empty());
        assert_eq!(tank.upgrade_count, before_upgrades);
    }

    #[test]
    fn test_armor_upgrades_compound() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.money = 100;
        let armor = Item::Upgrade(Upgrade::new("Composite Armor", 40, UpgradeKind::Armor, 1.5));
        tank.purchase(&armor);
        tank.purchase(&armor);
        assert!((tank.armor - 2.25).abs() < 1e-5);
        assert_eq!(tank.upgrade_count[UpgradeKind::Armor.index()], 2);
        assert_eq!(tank.money, 20);
    }

    #[test]
    fn test_start_fuel_upgrade_adds_instead_of_multiplying() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.money = 20;
        let fuel_tank =
            Item::Upgrade(Upgrade::new("Auxiliary Fuel Tank", 20, UpgradeKind::StartFuel, 50.0));
        tank.purchase(&fuel_tank);
        assert_eq!(tank.starting_fuel, 150.0);
        assert_eq!(tank.upgrade_count[UpgradeKind::StartFuel.index()], 1);

        tank.fuel = 1.0;
        tank.reset();
        assert_eq!(tank.fuel, 150.0);
        assert_eq!(tank.hp, TANK_MAX_HP);
    }

    #[test]
    fn test_engine_and_hill_climb_upgrades_multiply() {
        let mut tank = tank_on(&flat(), 50.0);
        tank.money = 60;
        tank.purchase(&Item::Upgrade(Upgrade::new(
            "Tuned Engine",
            30,
            UpgradeKind::Engine,
            1.5,
        )));
        tank.purchase(&Item::Upgrade(Upgrade::new(
            "Climbing Treads",
            30,
            UpgradeKind::HillClimb,
            1.5,
        )));
        assert_eq!(tank.engine_efficiency, 1.5);
        assert_eq!(tank.max_hill_climb, 1.5);
    }

    #[test]
    fn test_dead_tank_update_ends_turn_immediately() {
        let terrain = flat();
        let mut tank = tank_on(&terrain, 50.0);
        tank.fire();
        tank.hp = 0.0;
        let pos = tank.position;
        let impact = tank.update(&terrain);
        assert!(impact.is_none());
        assert!(tank.turn_ended);
        assert!(tank.projectile.is_none());
        assert_eq!(tank.position, pos);
    }

    #[test]
    fn test_airborne_tank_falls() {
        let terrain = flat();
        let mut tank = tank_on(&terrain, 50.0);
        tank.position.y = 150.0;
        tank.update(&terrain);
        assert_eq!(tank.position.y, 149.0);
        assert_eq!(tank.last_y, 150.0);

        // Grounded again: no further fall
        tank.position.y = 100.0;
        tank.update(&terrain);
        assert_eq!(tank.position.y, 100.0);
    }

    #[test]
    fn test_falling_off_the_world_kills() {
        let terrain = Terrain::flat(0.0, 21, 10.0);
        let mut tank = tank_on(&terrain, 50.0);
        tank.position.y = 0.5;
        tank.update(&terrain);
        assert_eq!(tank.hp, 0.0);
        // Death is picked up at the start of the next tick
        assert!(!tank.turn_ended);
        tank.update(&terrain);
        assert!(tank.turn_ended);
    }

    #[test]
    fn test_impact_ends_turn_and_reports_event() {
        // Wide enough that a full-power 45° shot lands on the map
        let terrain = Terrain::flat(100.0, 41, 10.0);
        let mut tank = tank_on(&terrain, 50.0);
        tank.cannon_angle = std::f32::consts::FRAC_PI_4;
        tank.fire();
        let mut impact = None;
        for _ in 0..10_000 {
            impact = tank.update(&terrain);
            if tank.turn_ended {
                break;
            }
        }
        assert!(tank.turn_ended);
        assert!(tank.projectile.is_none());
        let impact = impact.expect("shot landed on the battlefield");
        assert!(impact.point.x > 50.0);
        assert_eq!(impact.source, 0);
    }

    proptest! {
        #[test]
        fn prop_doubling_armor_halves_effective_damage(
            damage in 0.1f32..1000.0,
            armor in 0.1f32..10.0,
        ) {
            let mut a = tank_on(&flat(), 50.0);
            let mut b = tank_on(&flat(), 50.0);
            a.armor = armor;
            b.armor = armor * 2.0;
            a.take_damage(damage);
            b.take_damage(damage);
            let loss_a = TANK_MAX_HP - a.hp;
            let loss_b = TANK_MAX_HP - b.hp;
            prop_assert!((loss_a - 2.0 * loss_b).abs() <= loss_a.abs() * 1e-4);
        }

        #[test]
        fn prop_rejected_moves_change_nothing(vector in 0.1f32..40.0) {
            // Sheer wall ahead: every rightward move must be rejected whole
            let mut heights = vec![100.0; 21];
            for h in heights.iter_mut().skip(6) {
                *h = 1000.0;
            }
            let terrain = Terrain::new(heights, 10.0);
            let mut tank = tank_on(&terrain, 50.0);
            tank.drive(vector, &terrain);
            prop_assert_eq!(tank.position, Vec2::new(50.0, 100.0));
            prop_assert_eq!(tank.fuel, DEFAULT_FUEL);
        }
    }
}
