//! Ballistic projectiles
//!
//! A projectile is owned by the tank that fired it and lives for at most
//! one turn. It integrates simple gravity ballistics each tick (velocities
//! are in SI units, scaled by the tick rate) and reports impact state; the
//! match controller applies splash damage from the reported [`Impact`],
//! which keeps tanks from needing mutable access to each other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::item::Ammo;
use super::terrain::Terrain;
use crate::consts::{PROJECTILE_GRAVITY, TIME_SCALE};

/// A resolved shot: where it landed, with what, and who fired it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Impact {
    pub point: Vec2,
    pub ammo: Ammo,
    /// 0-based index of the firing tank in the match roster
    pub source: usize,
}

/// An in-flight ballistic body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pos: Vec2,
    vel: Vec2,
    source: usize,
    ammo: Ammo,
    impacted: bool,
    impact_point: Option<Vec2>,
}

impl Projectile {
    pub fn new(vx: f32, vy: f32, pos: Vec2, source: usize, ammo: Ammo) -> Self {
        Self {
            pos,
            vel: Vec2::new(vx, vy),
            source,
            ammo,
            impacted: false,
            impact_point: None,
        }
    }

    /// Advance one tick
    ///
    /// No-op once the shot has resolved. A projectile that leaves the
    /// horizontal extent of the terrain resolves without an impact point
    /// (the turn still ends, nothing takes damage).
    pub fn advance(&mut self, terrain: &Terrain) {
        if self.impacted {
            return;
        }
        self.vel.y -= PROJECTILE_GRAVITY / TIME_SCALE;
        self.pos += self.vel / TIME_SCALE;

        if self.pos.x < 0.0 || self.pos.x > terrain.width() {
            self.impacted = true;
            return;
        }
        if terrain.contains(self.pos) || self.pos.y <= 0.0 {
            self.impacted = true;
            self.impact_point = Some(self.pos);
        }
    }

    pub fn has_impacted(&self) -> bool {
        self.impacted
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn ammo(&self) -> &Ammo {
        &self.ammo
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// The impact event for a shot that landed on the battlefield
    pub fn resolve(&self) -> Option<Impact> {
        self.impact_point.map(|point| Impact {
            point,
            ammo: self.ammo.clone(),
            source: self.source,
        })
    }
}

/// Damage dealt by an impact to a target `distance` away from it
///
/// Full damage at the impact point, falling off linearly to zero at the
/// edge of the ammo's blast radius.
pub fn splash_damage(ammo: &Ammo, distance: f32) -> f32 {
    if distance >= ammo.radius {
        return 0.0;
    }
    ammo.damage * (1.0 - distance / ammo.radius)
}
