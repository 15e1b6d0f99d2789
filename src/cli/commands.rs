use crate::context::{Context, Request};
use crate::dispatcher::Dispatcher;
use crate::echo::trail;
use crate::manifest::Manifest;
use crate::runtime_config::DispatcherConfig;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line interface for brrtdispatch
///
/// Loads controllers from a YAML manifest and exercises the dispatcher
/// against them.
#[derive(Parser, Debug)]
#[command(name = "brrtdispatch")]
#[command(about = "Action dispatcher inspection tool", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the registered actions and every dispatch type table
    Routes {
        /// Path to the controller manifest (YAML)
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Resolve and dispatch request paths
    Resolve {
        /// Path to the controller manifest (YAML)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Request paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Build the path reaching an action
    Uri {
        /// Path to the controller manifest (YAML)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Action key, e.g. `users/show`
        #[arg(short, long)]
        action: String,

        /// Capture values, outermost chain link first
        captures: Vec<String>,
    },
}

fn load(manifest: &Path) -> anyhow::Result<Dispatcher> {
    Manifest::load(manifest)?.build_dispatcher(DispatcherConfig::from_env())
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The manifest cannot be read or parsed
/// - Setup rejects a duplicate action (internal-action diagnostics enabled)
/// - `uri` names an unknown action or one no dispatch type can reach
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli.command, &mut out)
}

/// Execute `command`, writing its report to `out`
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(command: &Commands, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Commands::Routes { manifest } => {
            let dispatcher = load(manifest)?;
            writeln!(out, "{}", dispatcher.describe())?;
        }
        Commands::Resolve { manifest, paths } => {
            let dispatcher = load(manifest)?;
            for path in paths {
                writeln!(out, "{}", resolve_one(&dispatcher, path))?;
            }
        }
        Commands::Uri {
            manifest,
            action,
            captures,
        } => {
            let dispatcher = load(manifest)?;
            let id = dispatcher
                .get_action_by_path(action)
                .ok_or_else(|| anyhow::anyhow!("Unknown action \"{action}\""))?;
            let uri = dispatcher
                .uri_for_action(id, captures)
                .ok_or_else(|| anyhow::anyhow!("No path reaches \"{action}\" with {} capture(s)", captures.len()))?;
            writeln!(out, "{uri}")?;
        }
    }
    Ok(())
}

/// One line per request: the resolved action and what ran, or why nothing did
fn resolve_one(dispatcher: &Dispatcher, path: &str) -> String {
    let mut ctx = Context::new(dispatcher, Request::new(path));
    dispatcher.prepare_action(&mut ctx);

    let reverse = ctx.resolved_action().map(|a| a.reverse().to_string());
    match dispatcher.dispatch(&mut ctx) {
        Ok(ok) => {
            let request = ctx.request();
            format!(
                "{path} -> /{} args={:?} captures={:?} trail={:?} ok={ok}",
                reverse.unwrap_or_default(),
                request.args(),
                request.captures(),
                trail(&ctx),
            )
        }
        Err(err) => format!("{path} -> {err}"),
    }
}
