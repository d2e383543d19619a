//! Barrage entry point
//!
//! Runs a scripted, headless two-tank duel: each turn the active tank aims
//! a flat-ground ballistic solution at its opponent, fires, and the match
//! ticks until the shot resolves. Useful as a smoke test of the full
//! simulation loop; a real front end drives the same API from input events.

use barrage::consts::{DEFAULT_FIREPOWER, PROJECTILE_GRAVITY};
use barrage::sim::{Item, MatchState, Terrain, TurnInput, store_catalog, tick};

/// Launch angle whose flat-ground range is `distance` at speed `power`
/// (low arc). Falls back to 45 degrees when the target is out of reach.
fn aim_for(distance: f32, power: f32) -> f32 {
    let s = distance * PROJECTILE_GRAVITY / (power * power);
    if s >= 1.0 {
        std::f32::consts::FRAC_PI_4
    } else {
        s.asin() / 2.0
    }
}

fn play_turn(state: &mut MatchState) {
    let me = state.active_tank().position;
    let them = state
        .tanks
        .iter()
        .find(|t| t.is_alive() && t.player_num != state.active_tank().player_num)
        .map(|t| t.position)
        .unwrap_or(me);

    let distance = (them.x - me.x).abs();
    let theta = aim_for(distance, DEFAULT_FIREPOWER);
    let aim = if them.x >= me.x {
        theta
    } else {
        std::f32::consts::PI - theta
    };

    // Use the strongest purchased shell, if any
    let select = (state.active_tank().weapons.len() > 1)
        .then(|| state.active_tank().weapons.len() - 1);

    let mut input = TurnInput {
        aim: Some(aim),
        power: Some(DEFAULT_FIREPOWER),
        select_weapon: select,
        fire: true,
        ..Default::default()
    };
    let mut guard = 0;
    while !state.turn_over() && guard < 100_000 {
        tick(state, &input);
        input.fire = false;
        guard += 1;
    }

    // Between turns: spend winnings at the store
    let catalog = store_catalog();
    let tank = state.active_tank_mut();
    for item in &catalog {
        if matches!(item, Item::Ammo(_)) && tank.money >= item.price() {
            tank.purchase(item);
            log::info!("{} buys {} ({} credits left)", tank.name, item.name(), tank.money);
            break;
        }
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB4113);
    let terrain = Terrain::generate(seed, 61, 10.0);
    let mut state = MatchState::new(
        terrain,
        vec![
            (0xd62828ff, "Crimson".into()),
            (0x457b9dff, "Cobalt".into()),
        ],
    );

    for round in 0..2 {
        let mut turns = 0;
        while !state.round_over() && turns < 500 {
            play_turn(&mut state);
            state.next_turn();
            turns += 1;
        }
        state.end_round();
        for tank in &state.tanks {
            log::info!(
                "{}: hp {:.0}, {} credits, score {}",
                tank.name,
                tank.hp.max(0.0),
                tank.money,
                tank.score
            );
        }
        if round == 0 {
            state.begin_round();
        }
    }
}
