use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::message::TelemetrySample;

/// Event labels drawn once per tick; half of the slots are empty.
pub const EVENTS: [&str; 6] = [
    "",
    "",
    "",
    "Waypoint reached",
    "Obstacle detected",
    "Motor spike",
];

pub const MAX_SPEED: f64 = 1.8;

/// Random-walk state owned by a single streaming connection.
///
/// `battery` only ever drains and saturates at 0. `temperature` is left
/// unbounded.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub battery:     u8,
    pub temperature: f64,
}

impl SessionState {
    /// Initial reading for a freshly accepted connection:
    /// battery in [60, 95], temperature in [28.0, 38.0).
    pub fn seed<R: Rng>(rng: &mut R) -> Self {
        Self {
            battery:     rng.gen_range(60..=95),
            temperature: rng.gen_range(28.0..38.0),
        }
    }

    /// Advance one tick.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        // one in three ticks drains a percent
        let step = u8::from(rng.gen_ratio(1, 3));
        self.battery = self.battery.saturating_sub(step);
        self.temperature += rng.gen_range(-0.2..=0.2);
    }

    /// Build the outgoing sample for the current state. Speed and event are
    /// drawn fresh and do not feed back into the state.
    pub fn sample<R: Rng>(&self, device_id: &str, rng: &mut R) -> TelemetrySample {
        let event = EVENTS.choose(rng).copied().unwrap_or_default();
        TelemetrySample {
            device_id: device_id.to_owned(),
            ts:        unix_seconds(),
            battery:   self.battery,
            temp_c:    round_to(self.temperature, 1),
            speed:     round_to(rng.gen_range(0.0..=MAX_SPEED), 2),
            event:     event.to_owned(),
        }
    }
}

fn unix_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn decimals(v: f64) -> usize {
        let text = serde_json::to_string(&v).unwrap();
        text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
    }

    #[test]
    fn seed_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5_000 {
            let s = SessionState::seed(&mut rng);
            assert!((60..=95).contains(&s.battery));
            assert!((28.0..38.0).contains(&s.temperature));
        }
    }

    #[test]
    fn battery_never_increases() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut state = SessionState::seed(&mut rng);
            let mut prev = state.battery;
            for _ in 0..400 {
                state.advance(&mut rng);
                assert!(state.battery <= prev);
                assert!(state.battery <= 100);
                prev = state.battery;
            }
        }
    }

    #[test]
    fn battery_stays_at_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut state = SessionState { battery: 2, temperature: 30.0 };
        let mut hit_zero = false;
        for _ in 0..1_000 {
            state.advance(&mut rng);
            if hit_zero {
                assert_eq!(state.battery, 0);
            }
            hit_zero |= state.battery == 0;
        }
        assert!(hit_zero);
    }

    #[test]
    fn drain_rate_is_about_a_third() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SessionState { battery: 100, temperature: 30.0 };
        let ticks = 270;
        for _ in 0..ticks {
            state.advance(&mut rng);
        }
        let drained = 100 - u32::from(state.battery);
        // expected 90
        assert!((60..=100).contains(&drained), "drained {drained}");
    }

    #[test]
    fn temperature_steps_are_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = SessionState::seed(&mut rng);
        for _ in 0..10_000 {
            let before = state.temperature;
            state.advance(&mut rng);
            assert!((state.temperature - before).abs() <= 0.2 + 1e-9);
        }
    }

    #[test]
    fn sample_fields_are_rounded_and_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = SessionState::seed(&mut rng);
        for _ in 0..5_000 {
            state.advance(&mut rng);
            let s = state.sample("rb-001", &mut rng);
            assert_eq!(s.device_id, "rb-001");
            assert_eq!(s.battery, state.battery);
            assert!(decimals(s.temp_c) <= 1, "tempC {}", s.temp_c);
            assert!(decimals(s.speed) <= 2, "speed {}", s.speed);
            assert!((0.0..=MAX_SPEED).contains(&s.speed));
            assert!(EVENTS.contains(&s.event.as_str()));
            assert!(s.ts > 1_600_000_000.0);
        }
    }

    #[test]
    fn half_of_events_are_empty() {
        let mut rng = StdRng::seed_from_u64(99);
        let state = SessionState::seed(&mut rng);
        let n = 60_000;
        let empty = (0..n)
            .filter(|_| state.sample("rb-002", &mut rng).event.is_empty())
            .count();
        let ratio = empty as f64 / n as f64;
        assert!((ratio - 0.5).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = StdRng::seed_from_u64(123);
        let mut b = StdRng::seed_from_u64(123);
        let mut sa = SessionState::seed(&mut a);
        let mut sb = SessionState::seed(&mut b);
        for _ in 0..100 {
            sa.advance(&mut a);
            sb.advance(&mut b);
        }
        assert_eq!(sa, sb);
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(31.46, 1), 31.5);
        assert_eq!(round_to(1.234, 2), 1.23);
        assert_eq!(round_to(-0.04, 1), -0.0);
    }
}
