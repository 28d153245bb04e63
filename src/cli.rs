//! The command line interface for the program.
use crate::dispatch::{DispatchError, dispatch, rank_units};
use crate::input::load_request;
use crate::log::{self, ConsoleTarget};
use crate::output::{create_output_directory, plan_to_json, write_dispatch_info, write_plan};
use crate::server;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write the merit order to a CSV file
    #[arg(long)]
    pub debug_model: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compute the production plan for a request.
    Run {
        /// Path to the request file.
        request_path: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a request.
    Validate {
        /// Path to the request file.
        request_path: PathBuf,
    },
    /// Start the HTTP service.
    Serve {
        /// The address to listen on (overrides the settings file)
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Manage example requests.
    Example {
        /// The available subcommands for managing example requests.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { request_path, opts } => handle_run_command(&request_path, &opts, None),
            Self::Validate { request_path } => handle_validate_command(&request_path, None),
            Self::Serve { address } => handle_serve_command(address, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ powerplan --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Use the supplied settings or load them from the settings file
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
///
/// The plan is printed to stdout as JSON. If an output directory is given, the plan is also
/// written there as CSV and JSON, along with the log files.
pub fn handle_run_command(
    request_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = settings_or_load(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.debug_model {
        settings.debug_model = true;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }

    let output_path = opts.output_dir.as_deref();
    let overwrite = if let Some(output_path) = output_path {
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?
    } else {
        false
    };

    // Initialise program logger. Console messages go to stderr as stdout is used for the plan.
    log::init(Some(settings.log_level.as_str()), output_path, ConsoleTarget::Stderr)
        .context("Failed to initialise logging.")?;

    let request = load_request(request_path).context("Failed to load request.")?;
    info!("Loaded request from {}", request_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let outcome = match dispatch(&request) {
        Ok(outcome) => outcome,
        Err(err @ DispatchError::InsufficientCapacity { .. }) => {
            bail!("Failed to dispatch request: {err}")
        }
    };

    if let Some(output_path) = output_path {
        write_plan(output_path, outcome.plan()).context("Failed to write production plan.")?;
        if settings.debug_model {
            write_dispatch_info(output_path, &rank_units(&request))
                .context("Failed to write dispatch info.")?;
        }
        info!("Output folder: {}", output_path.display());
    }

    println!("{}", plan_to_json(outcome.plan())?);

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(request_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None, ConsoleTarget::Split)
        .context("Failed to initialise logging.")?;

    load_request(request_path).context("Failed to validate request.")?;
    info!("Request validation successful!");

    Ok(())
}

/// Handle the `serve` command.
pub fn handle_serve_command(address: Option<String>, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;
    log::init(Some(settings.log_level.as_str()), None, ConsoleTarget::Split)
        .context("Failed to initialise logging.")?;

    let address = address.unwrap_or(settings.server_address);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime.")?;
    runtime.block_on(server::serve(&address))
}
