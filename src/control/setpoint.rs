//! Atomic set-point store.
//!
//! The single piece of numeric state shared between the button interrupt
//! path and the main control loop.  All access goes through lock-free
//! atomics, so the interrupt context is never blocked waiting on the main
//! context and readers can never observe a torn value.
//!
//! Out-of-range adjustments are not errors: `increment()` at the maximum
//! and `decrement()` at the minimum leave the value pinned at the bound.

use core::sync::atomic::{AtomicI16, Ordering};

use crate::config::ThermostatConfig;

/// One button press moves the set point by this many degrees.
const STEP_F: i16 = 1;

/// Range-clamped set point in whole degrees Fahrenheit.
pub struct SetPointStore {
    value: AtomicI16,
    min_f: i16,
    max_f: i16,
}

impl SetPointStore {
    /// Build the store from configuration, seeded with the default set point
    /// (itself clamped, in case the config is inconsistent).
    pub fn new(config: &ThermostatConfig) -> Self {
        let initial = config
            .setpoint_default_f
            .clamp(config.setpoint_min_f, config.setpoint_max_f);
        Self {
            value: AtomicI16::new(initial),
            min_f: config.setpoint_min_f,
            max_f: config.setpoint_max_f,
        }
    }

    /// Raise the set point by one step.  Lock-free; callable from interrupt
    /// context.  Returns the value after the adjustment.
    pub fn increment(&self) -> i16 {
        self.adjust(STEP_F)
    }

    /// Lower the set point by one step.  Lock-free; callable from interrupt
    /// context.  Returns the value after the adjustment.
    pub fn decrement(&self) -> i16 {
        self.adjust(-STEP_F)
    }

    /// Tear-free snapshot of the current set point, any context.
    pub fn read(&self) -> i16 {
        self.value.load(Ordering::Acquire)
    }

    fn adjust(&self, delta: i16) -> i16 {
        // fetch_update retries on contention; the closure is a handful of
        // instructions, which bounds the interrupt-path critical section.
        let mut applied = 0;
        self.value
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                applied = v.saturating_add(delta).clamp(self.min_f, self.max_f);
                Some(applied)
            })
            .ok(); // infallible: the closure always returns Some
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SetPointStore {
        SetPointStore::new(&ThermostatConfig::default())
    }

    #[test]
    fn starts_at_default() {
        assert_eq!(store().read(), 72);
    }

    #[test]
    fn single_press_moves_one_degree() {
        let s = store();
        assert_eq!(s.increment(), 73);
        assert_eq!(s.read(), 73);
        assert_eq!(s.decrement(), 72);
        assert_eq!(s.decrement(), 71);
        assert_eq!(s.read(), 71);
    }

    #[test]
    fn clamps_at_max() {
        let s = store();
        for _ in 0..100 {
            s.increment();
        }
        assert_eq!(s.read(), 90);
        assert_eq!(s.increment(), 90);
    }

    #[test]
    fn clamps_at_min() {
        let s = store();
        for _ in 0..100 {
            s.decrement();
        }
        assert_eq!(s.read(), 50);
        assert_eq!(s.decrement(), 50);
    }

    #[test]
    fn inconsistent_default_is_clamped_at_construction() {
        let mut config = ThermostatConfig::default();
        config.setpoint_default_f = 120;
        let s = SetPointStore::new(&config);
        assert_eq!(s.read(), config.setpoint_max_f);
    }
}
