//! Property tests for the interrupt-facing and hardware-protecting cores.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;
use roomstat::config::ThermostatConfig;
use roomstat::control::setpoint::SetPointStore;
use roomstat::drivers::actuator::ActuatorDriver;
use roomstat::drivers::button::{ButtonEvent, DebouncedButton};
use roomstat::fsm::StateId;
use roomstat::fsm::states::decide;

// ── Set-point store invariants ────────────────────────────────

proptest! {
    /// Any sequence of presses leaves the set point inside [min, max],
    /// and every accepted press moves it by at most one degree.
    #[test]
    fn setpoint_always_in_range(presses in proptest::collection::vec(any::<bool>(), 0..500)) {
        let config = ThermostatConfig::default();
        let store = SetPointStore::new(&config);
        let mut prev = store.read();

        for up in presses {
            let next = if up { store.increment() } else { store.decrement() };
            prop_assert!((config.setpoint_min_f..=config.setpoint_max_f).contains(&next));
            prop_assert!((next - prev).abs() <= 1, "one press, one degree");
            prev = next;
        }
    }
}

// ── Debounce invariants ───────────────────────────────────────

proptest! {
    /// For any raw edge timeline, accepted edges are spaced at least one
    /// debounce window apart and the acceptance time never decreases.
    #[test]
    fn accepted_edges_respect_window(gaps in proptest::collection::vec(0u32..1_000, 1..200)) {
        const WINDOW: u32 = 200;
        let btn = DebouncedButton::new(ButtonEvent::Increment, WINDOW);

        let mut now = 0u32;
        let mut last_accept: Option<u32> = None;
        for gap in gaps {
            now += gap;
            btn.on_raw_edge(now);
            if btn.take().is_some() {
                let accepted = btn.last_accepted_ms().unwrap();
                if let Some(prev) = last_accept {
                    prop_assert!(accepted >= prev, "acceptance time decreased");
                    prop_assert!(accepted - prev >= WINDOW, "window violated");
                }
                last_accept = Some(accepted);
            }
        }
    }

    /// Edges all inside one window: exactly one event, regardless of count.
    #[test]
    fn burst_in_one_window_is_one_event(offsets in proptest::collection::vec(0u32..200, 1..50)) {
        let btn = DebouncedButton::new(ButtonEvent::Decrement, 200);
        let base = 10_000;
        let mut offsets = offsets;
        offsets.sort_unstable();
        for off in &offsets {
            btn.on_raw_edge(base + off);
        }
        let mut events = 0;
        while btn.take().is_some() {
            events += 1;
        }
        prop_assert_eq!(events, 1);
        // Only the first edge of the burst was accepted.
        prop_assert_eq!(btn.last_accepted_ms(), Some(base + offsets[0]));
    }
}

// ── Actuator invariants ───────────────────────────────────────

proptest! {
    /// For any decision/time sequence the two relay lines are never
    /// asserted together and outputs change at most once per dwell window.
    #[test]
    fn relays_exclusive_and_dwell_limited(
        steps in proptest::collection::vec((0usize..3, 1u32..5_000), 1..300),
    ) {
        const DWELL: u32 = 10_000;
        let mut driver = ActuatorDriver::new(DWELL);

        let mut now = 0u32;
        let mut last_output = driver.applied();
        let mut last_change: Option<u32> = None;
        for (decision_idx, dt) in steps {
            now += dt;
            let decision = StateId::from_index(decision_idx);
            let applied = driver.apply(decision, now);

            prop_assert!(
                !(driver.heat_line() && driver.cool_line()),
                "both relay lines asserted"
            );

            if applied != last_output {
                if let Some(prev) = last_change {
                    prop_assert!(now - prev >= DWELL, "output changed inside dwell");
                }
                last_change = Some(now);
                last_output = applied;
            }
        }
    }
}

// ── Decision-function invariants ──────────────────────────────

proptest! {
    /// Outside the band the decision is forced regardless of history.
    #[test]
    fn decide_forced_outside_band(
        setpoint in 50i16..=90,
        magnitude in 1.01f32..30.0,
        below in any::<bool>(),
        prev_idx in 0usize..StateId::COUNT,
    ) {
        let prev = StateId::from_index(prev_idx);
        let temp = if below {
            f32::from(setpoint) - magnitude
        } else {
            f32::from(setpoint) + magnitude
        };
        let expected = if below { StateId::Heating } else { StateId::Cooling };
        prop_assert_eq!(decide(temp, setpoint, 1.0, prev), expected);
    }
}
