//! The [`Responder`] trait — the seam through which prompt answers are produced.

use anyhow::Result;
use async_trait::async_trait;

/// Decides whether the child's pending output warrants an answer.
///
/// The driver calls [`respond`](Responder::respond) once per arriving chunk,
/// passing the current scan window. The window always begins at a true line
/// start, so implementations may anchor matches to line boundaries. Returning
/// `Some(text)` makes the driver write `text` followed by a newline to the
/// child's stdin; at most one answer is written per chunk.
///
/// The scripted implementation is [`RuleSet`](crate::RuleSet). Implement this
/// trait directly when answers require runtime state or asynchronous lookups:
///
/// ```no_run
/// use unattend::Responder;
/// use async_trait::async_trait;
/// use anyhow::Result;
///
/// struct CountingYes {
///     answered: usize,
/// }
///
/// #[async_trait(?Send)]
/// impl Responder for CountingYes {
///     async fn respond(&mut self, output: &str) -> Result<Option<String>> {
///         if output.lines().any(|line| line.starts_with("? ")) {
///             self.answered += 1;
///             Ok(Some("y".into()))
///         } else {
///             Ok(None)
///         }
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait Responder: 'static {
    /// Inspect the scan window and optionally produce an answer.
    ///
    /// `output` holds the unconsumed tail of the child's output, starting at
    /// a line boundary. Errors abort the drive loop and propagate to the
    /// caller of [`Running::wait`](crate::Running::wait).
    async fn respond(&mut self, output: &str) -> Result<Option<String>>;
}
