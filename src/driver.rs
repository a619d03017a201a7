//! The driver: spawns a child, forwards its output, answers its prompts.

use crate::buffer::RollingBuffer;
use crate::config::SpawnConfig;
use crate::respond::Responder;
use crate::rule::RuleSet;
use crate::session::{self, ExitStatus, Input, Session};
use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, trace};

type OutputHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Runs external commands unattended.
///
/// Every chunk of child output is forwarded to the output handler unmodified
/// and in arrival order, then scanned for prompts via the [`Responder`]. On a
/// match, the responder's answer is written to the child's stdin followed by
/// a newline. The driver imposes no timeout and never interprets the child's
/// exit status.
pub struct Driver {
    responder: Box<dyn Responder>,
    output_handler: OutputHandler,
}

impl Driver {
    /// Create a driver answering prompts from `rules`, forwarding output to
    /// the parent's stdout.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_responder(Box::new(rules))
    }

    /// Create a driver with a custom [`Responder`], forwarding output to the
    /// parent's stdout.
    pub fn with_responder(responder: Box<dyn Responder>) -> Self {
        Self {
            responder,
            output_handler: Arc::new(|data| {
                let mut stdout = io::stdout();
                let _ = stdout.write_all(data);
                let _ = stdout.flush();
            }),
        }
    }

    /// Redirect forwarded output to a custom sink instead of stdout.
    ///
    /// ```no_run
    /// use unattend::{Driver, Rule, RuleSet, SpawnConfig};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let captured = std::sync::Arc::new(std::sync::Mutex::new(Vec::<u8>::new()));
    /// let sink = captured.clone();
    ///
    /// let rules: RuleSet = [Rule::new("? Overwrite", "n")].into_iter().collect();
    /// let mut running = Driver::new(rules)
    ///     .output_handler(move |data| sink.lock().unwrap().extend_from_slice(data))
    ///     .spawn(SpawnConfig::new("ember").args(["install", "ember-electron"]))?;
    ///
    /// let status = running.wait().await?;
    /// println!("{}", String::from_utf8_lossy(&captured.lock().unwrap()));
    /// # Ok(())
    /// # }
    /// ```
    pub fn output_handler(mut self, handler: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.output_handler = Arc::new(handler);
        self
    }

    /// Spawn the configured command.
    ///
    /// Spawn failures (command not found, unable to start) surface here; the
    /// driver performs no retry. On success the child is running and the
    /// returned [`Running`] handle owns its streams.
    pub fn spawn(self, config: SpawnConfig) -> Result<Running> {
        debug!(program = %config.program, args = ?config.args, "spawning child");
        let (session, input, chunks) = session::spawn(&config)?;
        Ok(Running {
            session,
            input,
            chunks,
            buffer: RollingBuffer::new(),
            responder: self.responder,
            output_handler: self.output_handler,
        })
    }
}

/// A spawned child being driven. Obtained from [`Driver::spawn`].
pub struct Running {
    session: Session,
    input: Input,
    chunks: UnboundedReceiver<Vec<u8>>,
    buffer: RollingBuffer,
    responder: Box<dyn Responder>,
    output_handler: OutputHandler,
}

impl Running {
    /// Drive the child to completion and return its exit status unmodified.
    ///
    /// One cooperative loop, one iteration per arriving chunk: forward,
    /// scan, answer, truncate. Returns once the child's output stream ends
    /// and the child has been reaped. A child that blocks forever on an
    /// unanswered prompt makes this call block forever too; impose deadlines
    /// externally if needed.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        while let Some(chunk) = self.chunks.recv().await {
            (self.output_handler)(&chunk);

            self.buffer.push(&chunk);
            if let Some(response) = self.responder.respond(self.buffer.matchable()).await? {
                debug!(%response, "answering prompt");
                self.input.write_line(&response).await?;
            }
            // Keep only the trailing partial line; completed lines have been
            // scanned and must never match again.
            self.buffer.retain_partial_line();
        }

        let status = self.session.wait().await?;
        trace!(%status, "child exited");
        Ok(status)
    }

    /// Terminate the child. The output stream ends shortly after, so a
    /// subsequent [`wait`](Running::wait) drains the remaining chunks and
    /// returns.
    pub fn kill(&mut self) -> Result<()> {
        self.session.kill()
    }
}
