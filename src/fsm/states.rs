//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  This is the classic embedded C FSM pattern expressed
//! in safe Rust.  Every update handler defers to the pure [`decide`]
//! function, which keeps the hysteresis rules in one table-testable place.
//!
//! ```text
//!             [temp < set - h]              [temp > set + h]
//!       ┌─────────────────────── IDLE ───────────────────────┐
//!       ▼                          ▲ ▲                       ▼
//!   HEATING ──[temp >= set]────────┘ └────────[temp <= set]── COOLING
//!
//!   Inside the band (set ± h) nothing re-triggers: an active call holds
//!   until the set point itself is crossed.
//! ```

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Pure decision function
// ═══════════════════════════════════════════════════════════════════════════

/// Derive the next actuation decision from one temperature sample.
///
/// Deterministic and side-effect-free.  The hysteresis band around the set
/// point is a no-change zone: a heat call started below `set - h` is held
/// until the temperature reaches the set point, and a cool call started
/// above `set + h` is held until the temperature falls back to it.  An idle
/// decision stays idle anywhere inside the band, so dither at a band edge
/// can never cycle the outputs.
pub fn decide(temperature_f: f32, setpoint_f: i16, hysteresis_f: f32, previous: StateId) -> StateId {
    let set = f32::from(setpoint_f);
    match previous {
        StateId::Heating if temperature_f < set => StateId::Heating,
        StateId::Cooling if temperature_f > set => StateId::Cooling,
        _ => {
            if temperature_f < set - hysteresis_f {
                StateId::Heating
            } else if temperature_f > set + hysteresis_f {
                StateId::Cooling
            } else {
                StateId::Idle
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Heating
        StateDescriptor {
            id: StateId::Heating,
            name: "Heating",
            on_enter: Some(heating_enter),
            on_exit: None,
            on_update: heating_update,
        },
        // Index 2 — Cooling
        StateDescriptor {
            id: StateId::Cooling,
            name: "Cooling",
            on_enter: Some(cooling_enter),
            on_exit: None,
            on_update: cooling_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — inside the comfort band, outputs released
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    info!(
        "IDLE: {:.1}F within band around {}F",
        ctx.reading.temperature_f, ctx.setpoint_f
    );
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    step(ctx, StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  HEATING state — heat call asserted until the set point is reached
// ═══════════════════════════════════════════════════════════════════════════

fn heating_enter(ctx: &mut FsmContext) {
    info!(
        "HEATING: {:.1}F below {}F - {:.1}F band",
        ctx.reading.temperature_f, ctx.setpoint_f, ctx.config.hysteresis_f
    );
}

fn heating_update(ctx: &mut FsmContext) -> Option<StateId> {
    step(ctx, StateId::Heating)
}

// ═══════════════════════════════════════════════════════════════════════════
//  COOLING state — cool call asserted until the set point is reached
// ═══════════════════════════════════════════════════════════════════════════

fn cooling_enter(ctx: &mut FsmContext) {
    info!(
        "COOLING: {:.1}F above {}F + {:.1}F band",
        ctx.reading.temperature_f, ctx.setpoint_f, ctx.config.hysteresis_f
    );
}

fn cooling_update(ctx: &mut FsmContext) -> Option<StateId> {
    step(ctx, StateId::Cooling)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared transition logic
// ═══════════════════════════════════════════════════════════════════════════

fn step(ctx: &mut FsmContext, current: StateId) -> Option<StateId> {
    let next = decide(
        ctx.reading.temperature_f,
        ctx.setpoint_f,
        ctx.config.hysteresis_f,
        current,
    );
    (next != current).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Table-driven check of the full decision surface at setpoint 72, h = 1.
    #[test]
    fn decide_table() {
        use StateId::{Cooling, Heating, Idle};
        let cases = [
            // (temp, previous, expected)
            (70.0, Idle, Heating),    // below band
            (70.9, Idle, Heating),    // just below band
            (71.0, Idle, Idle),       // lower band edge
            (72.0, Idle, Idle),       // at set point
            (73.0, Idle, Idle),       // upper band edge
            (73.1, Idle, Cooling),    // just above band
            (75.0, Idle, Cooling),    // above band
            (71.5, Heating, Heating), // call holds through lower band
            (72.0, Heating, Idle),    // call releases at set point
            (73.5, Heating, Cooling), // overshoot beyond band flips the call
            (72.5, Cooling, Cooling), // call holds through upper band
            (72.0, Cooling, Idle),    // call releases at set point
            (70.5, Cooling, Heating), // undershoot beyond band flips the call
        ];
        for (temp, prev, expected) in cases {
            assert_eq!(
                decide(temp, 72, 1.0, prev),
                expected,
                "temp {temp} from {prev:?}"
            );
        }
    }

    #[test]
    fn two_below_with_unit_band_heats() {
        assert_eq!(decide(70.0, 72, 1.0, StateId::Idle), StateId::Heating);
    }

    #[test]
    fn wider_band_tolerates_more_drift() {
        assert_eq!(decide(70.0, 72, 2.5, StateId::Idle), StateId::Idle);
        assert_eq!(decide(69.0, 72, 2.5, StateId::Idle), StateId::Heating);
    }
}
