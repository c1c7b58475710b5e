//! rover_telemetry-lib: device registry and simulated per-connection telemetry sessions

pub mod context;
pub mod message;
pub mod registry;
pub mod session;
pub mod simulate;

// re-exports for ergonomic imports:
pub use context::{Context, SeedSource};
pub use message::{DeviceRecord, DeviceStatus, TelemetrySample};
pub use registry::DeviceRegistry;
pub use session::{CloseReason, SessionError, SessionSummary, TelemetrySession};
