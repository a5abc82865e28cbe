//! Test harness utilities shared by the unit and behavioural suites.

mod client;
mod config_loader;
mod reporter;
mod sink;
mod world;

pub use client::{TestClient, tick_until};
pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use sink::{RecordingCommandSink, SinkCall};
pub use world::{ConsoleWorld, world};
