//! Routing of decoded requests to the command sink.

use tracing::{debug, warn};

use super::{
    Command, CommandError, CommandSink, PROTOCOL_TARGET, ProtocolError, Request, ServerMessage,
};

/// Maps requests onto [`CommandSink`] calls and produces replies.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dispatcher;

impl Dispatcher {
    /// Builds a dispatcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes `frame` and routes the resulting request.
    ///
    /// Returns the reply owed to the sending client, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] when the frame is not a valid request. The
    /// sink is not called in that case.
    pub fn dispatch<S>(
        &self,
        frame: &[u8],
        sink: &mut S,
    ) -> Result<Option<ServerMessage>, ProtocolError>
    where
        S: CommandSink + ?Sized,
    {
        let request = Request::parse(frame)?;
        Ok(self.route(request, sink))
    }

    /// Routes an already decoded request.
    ///
    /// Sink failures are logged and otherwise ignored; only `ping` produces
    /// a reply.
    pub fn route<S>(&self, request: Request, sink: &mut S) -> Option<ServerMessage>
    where
        S: CommandSink + ?Sized,
    {
        debug!(target: PROTOCOL_TARGET, kind = request.kind(), "routing request");
        match request {
            Request::Ping => Some(ServerMessage::Pong),
            Request::Script { script } => {
                report("script", sink.execute_script(&script));
                None
            }
            Request::Command(command) => {
                let name = command.name();
                let outcome = match command {
                    Command::Reload {
                        resource_type,
                        resource_name,
                    } => sink.request_reload(&resource_type, &resource_name),
                    Command::Pause => sink.pause(),
                    Command::Unpause => sink.unpause(),
                };
                report(name, outcome);
                None
            }
        }
    }
}

fn report(request: &'static str, outcome: Result<(), CommandError>) {
    if let Err(error) = outcome {
        warn!(
            target: PROTOCOL_TARGET,
            request,
            error = %error,
            "command sink rejected request"
        );
    }
}
