//! # Unattend
//!
//! Run interactive terminal programs unattended.
//!
//! Unattend spawns an external command, forwards its output to your own
//! stdout in real time, and watches the stream for confirmation prompts.
//! When a prompt appears, a scripted response is written to the child's
//! stdin, so automated callers (CI jobs, test harnesses, orchestration
//! scripts) never block on an interactive terminal.
//!
//! ## Quick start
//!
//! ```no_run
//! use unattend::{Driver, Rule, RuleSet, SpawnConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Decline the CLI's "? Overwrite foo? (y/N)" confirmations.
//!     let rules: RuleSet = [Rule::new("? Overwrite", "n")].into_iter().collect();
//!
//!     let mut running = Driver::new(rules)
//!         .spawn(SpawnConfig::new("ember").args(["install", "ember-electron"]))?;
//!
//!     let status = running.wait().await?;
//!     if !status.success() {
//!         anyhow::bail!("ember install failed: {status}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## How prompts are detected
//!
//! Child output is accumulated in a rolling buffer. On every arriving chunk
//! the buffer is scanned for a line *beginning with* a rule's token; a match
//! triggers exactly one answer, written as `<response>\n`. After each scan
//! the buffer is truncated past its last newline, so a completed line can
//! never match twice, while a prompt split across chunks still matches once
//! it has fully arrived. Matching is literal, case- and position-sensitive.
//!
//! The driver is a pass-through layer: it imposes no timeout, never retries,
//! and reports the child's exit status exactly as the OS does. A child that
//! waits forever on a prompt no rule answers will hang the call; impose
//! deadlines externally if you need them.
//!
//! ## Rules files
//!
//! Use [`parse_str`] or [`parse_file`] to load rules from a small text
//! format, one rule per line, earlier rules winning:
//!
//! ```text
//! # answer the framework CLI's confirmations
//! on "? Overwrite" reply "n"
//! ```
//!
//! ## PTY mode
//!
//! Some programs only prompt when stdout is a terminal. Enable
//! [`SpawnConfig::pty`] to attach the child to a pseudo-terminal instead of
//! plain pipes; detection and answering work the same way, but stderr is
//! merged into the PTY stream.
//!
//! ## Custom responders and output sinks
//!
//! By default output is forwarded to stdout and answers come from a
//! [`RuleSet`]. Use [`Driver::output_handler`] to capture output elsewhere,
//! and implement [`Responder`] for answering logic that needs runtime state
//! or asynchronous lookups.

pub(crate) mod buffer;
pub mod config;
pub mod driver;
pub mod parser;
pub(crate) mod pty;
pub(crate) mod reader;
pub mod respond;
pub mod rule;
pub(crate) mod session;

pub use config::{SpawnConfig, StderrMode};
pub use driver::{Driver, Running};
pub use parser::{parse_file, parse_str};
pub use respond::Responder;
pub use rule::{Rule, RuleSet};
pub use session::ExitStatus;
