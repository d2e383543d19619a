//! Barrage - a turn-based artillery duel simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tanks, terrain, projectiles, economy)
//!
//! Rendering, input handling, and the store UI live outside this crate;
//! they drive the simulation through [`sim::MatchState`] and read state back
//! for display.

pub mod sim;

pub use sim::{Item, MatchState, Tank, Terrain, TurnInput, tick};

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz). Ballistic quantities use SI units
    /// (per second) and are scaled down by this factor each tick.
    pub const TIME_SCALE: f32 = 60.0;

    /// Tank vitals
    pub const TANK_MAX_HP: f32 = 100.0;
    pub const DEFAULT_FUEL: f32 = 100.0;
    pub const DEFAULT_FIREPOWER: f32 = 50.0;

    /// Default shell carried by every tank (indestructible inventory slot 0)
    pub const BASIC_SHELL_NAME: &str = "Tank Shell";
    pub const BASIC_SHELL_RADIUS: f32 = 20.0;
    pub const BASIC_SHELL_DAMAGE: f32 = 20.0;

    /// Downward acceleration on projectiles (units/s²)
    pub const PROJECTILE_GRAVITY: f32 = 9.81;

    /// Cannon height above the hull; shots spawn here so a tank sitting on
    /// the surface does not detonate its own shell at launch
    pub const MUZZLE_OFFSET: f32 = 8.0;

    /// Passive fall applied to an unsupported tank (units/tick)
    pub const TANK_GRAVITY_STEP: f32 = 1.0;

    /// Credits awarded to the last tank standing at the end of a round
    pub const ROUND_SURVIVOR_BONUS: u32 = 100;
}
