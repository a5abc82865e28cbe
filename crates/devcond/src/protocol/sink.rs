//! Host collaborator that carries out client requests.

use std::error::Error;

use tracing::info;

/// Failure reported by a [`CommandSink`].
///
/// The server only logs these; no reply is sent to the client.
pub type CommandError = Box<dyn Error + Send + Sync>;

const SINK_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::sink");

/// Engine-side operations the console can trigger.
///
/// These are the only calls the server makes into the host. Each call is
/// fire-and-forget from the client's point of view.
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink {
    /// Executes script source text.
    ///
    /// # Errors
    ///
    /// Returns the host's failure, which is logged and dropped.
    fn execute_script(&mut self, script: &str) -> Result<(), CommandError>;

    /// Reloads one resource identified by type and name.
    ///
    /// # Errors
    ///
    /// Returns the host's failure, for example an unknown resource.
    fn request_reload(
        &mut self,
        resource_type: &str,
        resource_name: &str,
    ) -> Result<(), CommandError>;

    /// Pauses the host.
    ///
    /// # Errors
    ///
    /// Returns the host's failure.
    fn pause(&mut self) -> Result<(), CommandError>;

    /// Resumes the host.
    ///
    /// # Errors
    ///
    /// Returns the host's failure.
    fn unpause(&mut self) -> Result<(), CommandError>;
}

impl<S> CommandSink for Box<S>
where
    S: CommandSink + ?Sized,
{
    fn execute_script(&mut self, script: &str) -> Result<(), CommandError> {
        (**self).execute_script(script)
    }

    fn request_reload(
        &mut self,
        resource_type: &str,
        resource_name: &str,
    ) -> Result<(), CommandError> {
        (**self).request_reload(resource_type, resource_name)
    }

    fn pause(&mut self) -> Result<(), CommandError> {
        (**self).pause()
    }

    fn unpause(&mut self) -> Result<(), CommandError> {
        (**self).unpause()
    }
}

/// Sink used when no host is attached: every request becomes a `tracing`
/// event and succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCommandSink;

impl CommandSink for TracingCommandSink {
    fn execute_script(&mut self, script: &str) -> Result<(), CommandError> {
        info!(
            target: SINK_TARGET,
            request = "script",
            length = script.len(),
            script,
            "script received"
        );
        Ok(())
    }

    fn request_reload(
        &mut self,
        resource_type: &str,
        resource_name: &str,
    ) -> Result<(), CommandError> {
        info!(
            target: SINK_TARGET,
            request = "reload",
            resource_type,
            resource_name,
            "reload requested"
        );
        Ok(())
    }

    fn pause(&mut self) -> Result<(), CommandError> {
        info!(target: SINK_TARGET, request = "pause", "pause requested");
        Ok(())
    }

    fn unpause(&mut self) -> Result<(), CommandError> {
        info!(target: SINK_TARGET, request = "unpause", "unpause requested");
        Ok(())
    }
}
