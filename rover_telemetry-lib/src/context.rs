use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::registry::DeviceRegistry;
use crate::session::TelemetrySession;

pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

/// Where each session's random generator comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    /// Fresh OS entropy per session
    Entropy,
    /// Session `n` is seeded with `base + n`, for reproducible runs
    Fixed(u64),
}

/// Shared, read-only handles every connection needs:
/// the device registry and the parameters used to open sessions.
#[derive(Clone)]
pub struct Context {
    pub registry: Arc<DeviceRegistry>,
    pub tick:     Duration,
    seeds:        SeedSource,
    sessions:     Arc<AtomicU64>,
}

impl Context {
    pub fn new(registry: DeviceRegistry, tick: Duration, seeds: SeedSource) -> Self {
        Self {
            registry: Arc::new(registry),
            tick,
            seeds,
            sessions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open a session for `device_id`. The id is not checked against the
    /// registry; unknown devices stream the same way known ones do.
    pub fn open_session(&self, device_id: &str) -> TelemetrySession<StdRng> {
        let rng = match self.seeds {
            SeedSource::Entropy => StdRng::from_entropy(),
            SeedSource::Fixed(base) => {
                let n = self.sessions.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(base.wrapping_add(n))
            }
        };
        TelemetrySession::new(device_id, rng, self.tick)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DeviceRegistry::with_defaults(), DEFAULT_TICK, SeedSource::Entropy)
    }
}
