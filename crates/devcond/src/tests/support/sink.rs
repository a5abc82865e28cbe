//! Recording [`CommandSink`] double.

use std::sync::{Arc, Mutex};

use crate::protocol::{CommandError, CommandSink};

/// One call received by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Script(String),
    Reload { resource_type: String, resource_name: String },
    Pause,
    Unpause,
}

/// Sink that records every call; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingCommandSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    failing: bool,
}

impl RecordingCommandSink {
    /// Builds a sink whose calls all report failure after recording.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Captures a copy of the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().expect("sink mutex poisoned").clone()
    }

    fn record(&self, call: SinkCall) -> Result<(), CommandError> {
        self.calls.lock().expect("sink mutex poisoned").push(call);
        if self.failing {
            Err("recording sink configured to fail".into())
        } else {
            Ok(())
        }
    }
}

impl CommandSink for RecordingCommandSink {
    fn execute_script(&mut self, script: &str) -> Result<(), CommandError> {
        self.record(SinkCall::Script(script.to_owned()))
    }

    fn request_reload(
        &mut self,
        resource_type: &str,
        resource_name: &str,
    ) -> Result<(), CommandError> {
        self.record(SinkCall::Reload {
            resource_type: resource_type.to_owned(),
            resource_name: resource_name.to_owned(),
        })
    }

    fn pause(&mut self) -> Result<(), CommandError> {
        self.record(SinkCall::Pause)
    }

    fn unpause(&mut self) -> Result<(), CommandError> {
        self.record(SinkCall::Unpause)
    }
}
