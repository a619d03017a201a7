use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use unattend::{Driver, Rule, RuleSet, SpawnConfig, StderrMode, parse_file};

#[derive(Parser, Debug)]
#[command(
    name = "unattend",
    about = "Run an interactive program unattended, auto-answering its confirmation prompts",
    version
)]
struct Args {
    /// Rules file (`on "<token>" reply "<response>"` per line)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Inline rule; repeatable, tried before rules-file entries
    #[arg(short = 'o', long = "on", value_name = "TOKEN=RESPONSE")]
    inline: Vec<String>,

    /// Working directory for the child
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Extra environment variable for the child; repeatable
    #[arg(short, long, value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Attach the child to a pseudo-terminal instead of pipes
    #[arg(long)]
    pty: bool,

    /// Discard the child's stderr instead of inheriting it
    #[arg(long)]
    null_stderr: bool,

    /// Command to run
    #[arg(required = true)]
    command: String,

    /// Arguments to pass to the command
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the child's forwarded output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut rules = RuleSet::new();
    for spec in &args.inline {
        rules.push(parse_inline_rule(spec)?);
    }
    if let Some(path) = &args.rules {
        for rule in parse_file(path)? {
            rules.push(rule);
        }
    }

    let mut config = SpawnConfig::new(args.command.as_str())
        .args(args.args.iter().map(String::as_str))
        .pty(args.pty);
    if let Some(dir) = &args.cwd {
        config = config.current_dir(dir);
    }
    for pair in &args.env {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid --env value (expected KEY=VALUE): {pair}"))?;
        config = config.env(key, value);
    }
    if args.null_stderr {
        config = config.stderr(StderrMode::Null);
    }

    let mut running = Driver::new(rules)
        .spawn(config)
        .context("Failed to spawn command")?;

    let status = running.wait().await?;

    // Pass the child's status through unmodified.
    match status.code() {
        Some(code) => std::process::exit(code),
        None => {
            warn!(signal = ?status.signal(), "child terminated by signal");
            std::process::exit(1);
        }
    }
}

/// Parse an inline `TOKEN=RESPONSE` rule.
fn parse_inline_rule(spec: &str) -> Result<Rule> {
    let (token, response) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid --on value (expected TOKEN=RESPONSE): {spec}"))?;
    Ok(Rule::new(token, response))
}
