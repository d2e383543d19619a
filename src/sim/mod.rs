//! Deterministic artillery simulation
//!
//! Single-threaded and tick-driven: an external frame/turn controller calls
//! [`tick`] at a fixed rate and all state transitions happen synchronously
//! inside it. Within one tick the active tank's projectile advances first,
//! then passive physics run, then the turn-ending impact check - that order
//! is load-bearing and must not be reshuffled.

pub mod item;
pub mod projectile;
pub mod tank;
pub mod terrain;
pub mod tick;

pub use item::{Ammo, Item, Upgrade, UpgradeKind, store_catalog};
pub use projectile::{Impact, Projectile, splash_damage};
pub use tank::{AiLevel, Tank};
pub use terrain::Terrain;
pub use tick::{MatchState, TurnInput, tick};
