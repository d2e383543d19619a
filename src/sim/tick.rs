//! Fixed timestep turn controller
//!
//! Owns the arena: the terrain and the tank roster live here, and tanks
//! reach them only through parameters, never stored references. Each call
//! to [`tick`] applies one tick's worth of input to the active tank,
//! advances it, and settles any shot that resolved this tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{Impact, splash_damage};
use super::tank::Tank;
use super::terrain::Terrain;
use crate::consts::ROUND_SURVIVOR_BONUS;

/// Input commands for a single tick, applied to the active tank
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    /// Signed horizontal displacement to attempt this tick
    pub drive: f32,
    /// Set the cannon angle (radians)
    pub aim: Option<f32>,
    /// Set the launch speed
    pub power: Option<f32>,
    /// Switch the selected weapon; out-of-range indices are ignored
    pub select_weapon: Option<usize>,
    /// Fire the selected weapon
    pub fire: bool,
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub terrain: Terrain,
    pub tanks: Vec<Tank>,
    /// Index of the tank whose turn it is
    pub active: usize,
    /// 1-based round counter
    pub round: u32,
}

impl MatchState {
    /// Start a match with one tank per seat, spread across the terrain
    pub fn new(terrain: Terrain, seats: Vec<(u32, String)>) -> Self {
        assert!(!seats.is_empty(), "a match needs at least one seat");
        let tanks = seats
            .into_iter()
            .enumerate()
            .map(|(i, (color, name))| Tank::new(color, i + 1, name))
            .collect();
        let mut state = Self {
            terrain,
            tanks,
            active: 0,
            round: 1,
        };
        state.place_tanks();
        log::info!("Match started: {} tanks, round 1", state.tanks.len());
        state
    }

    /// Seat every tank on the terrain surface, spread evenly
    fn place_tanks(&mut self) {
        let n = self.tanks.len() as f32;
        let width = self.terrain.width();
        for (i, tank) in self.tanks.iter_mut().enumerate() {
            let x = width * (i as f32 + 1.0) / (n + 1.0);
            tank.position = Vec2::new(x, self.terrain.surface_height(x));
            tank.last_y = tank.position.y;
        }
    }

    pub fn active_tank(&self) -> &Tank {
        &self.tanks[self.active]
    }

    pub fn active_tank_mut(&mut self) -> &mut Tank {
        &mut self.tanks[self.active]
    }

    /// Has the active tank's turn ended?
    pub fn turn_over(&self) -> bool {
        self.active_tank().turn_ended
    }

    /// Rotate to the next living tank and reset its turn flags
    pub fn next_turn(&mut self) {
        let n = self.tanks.len();
        for step in 1..=n {
            let idx = (self.active + step) % n;
            if self.tanks[idx].is_alive() {
                self.active = idx;
                self.tanks[idx].reset_state();
                log::debug!("Turn passes to {}", self.tanks[idx].name);
                return;
            }
        }
        // Nobody left alive; the round is over and `active` stays put
    }

    /// At most one tank still standing?
    pub fn round_over(&self) -> bool {
        self.tanks.iter().filter(|t| t.is_alive()).count() <= 1
    }

    /// Index of the last tank standing, once the round is over
    pub fn survivor(&self) -> Option<usize> {
        if !self.round_over() {
            return None;
        }
        self.tanks.iter().position(|t| t.is_alive())
    }

    /// Pay out the round and log the result
    pub fn end_round(&mut self) {
        if let Some(idx) = self.survivor() {
            let tank = &mut self.tanks[idx];
            tank.money += ROUND_SURVIVOR_BONUS;
            tank.score += ROUND_SURVIVOR_BONUS;
            log::info!("{} wins round {}", tank.name, self.round);
        } else {
            log::info!("Round {} ends with no survivor", self.round);
        }
    }

    /// Start the next round: restore vitals (upgrades persist) and reseat
    /// every tank on the surface
    pub fn begin_round(&mut self) {
        self.round += 1;
        for tank in &mut self.tanks {
            tank.reset();
            tank.reset_state();
        }
        self.place_tanks();
        self.active = 0;
        log::info!("Round {} begins", self.round);
    }
}

/// Advance the match by one fixed timestep
///
/// Input is applied to the active tank only, and only while its turn is
/// still open. The fire command is gated on `has_fired` and the projectile
/// slot so player input can never trip the one-shot-in-flight contract.
pub fn tick(state: &mut MatchState, input: &TurnInput) {
    let active = state.active;
    let impact = {
        let tank = &mut state.tanks[active];
        if tank.is_alive() && !tank.turn_ended {
            if let Some(aim) = input.aim {
                tank.cannon_angle = aim;
            }
            if let Some(power) = input.power {
                tank.firepower = power.max(0.0);
            }
            if let Some(sel) = input.select_weapon {
                if sel < tank.weapons.len() {
                    tank.selected_weapon = sel;
                }
            }
            if input.drive != 0.0 {
                tank.drive(input.drive, &state.terrain);
            }
            if input.fire && !tank.has_fired && tank.projectile.is_none() {
                tank.fire();
            }
        }
        tank.update(&state.terrain)
    };
    if let Some(impact) = impact {
        apply_impact(&mut state.tanks, &impact);
    }
}

/// Apply splash damage from a resolved shot and credit the shooter for
/// damage dealt to others
fn apply_impact(tanks: &mut [Tank], impact: &Impact) {
    let mut earned = 0.0f32;
    for (i, tank) in tanks.iter_mut().enumerate() {
        if !tank.is_alive() {
            continue;
        }
        let distance = tank.position.distance(impact.point);
        let damage = splash_damage(&impact.ammo, distance);
        if damage <= 0.0 {
            continue;
        }
        tank.take_damage(damage);
        log::info!(
            "{} takes {:.1} damage from {} ({:.0} hp left)",
            tank.name,
            damage / tank.armor,
            impact.ammo.name,
            tank.hp
        );
        if i != impact.source {
            earned += damage;
        }
    }
    if earned > 0.0 {
        if let Some(shooter) = tanks.get_mut(impact.source) {
            let credits = earned.round() as u32;
            shooter.money += credits;
            shooter.score += credits;
        }
    }
}
