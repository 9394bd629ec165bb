use anyhow::Result;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::{debug, info};
use std::process::ExitCode;

use ghcr_sync::identity::ACTOR_ENV_VAR;
use ghcr_sync::notifier::VerbosityLevel;
use ghcr_sync::{ContainerCli, Engine, ImageSyncer, Notifier, SyncJob, SystemExecutor, Token};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, help = "Source container image to sync (e.g., nginx:latest)")]
    source: Option<String>,

    #[arg(long, help = "Target organization in GHCR (e.g., myorg or ghcr.io/myorg)")]
    target_org: Option<String>,

    #[arg(
        long,
        env = "GHCR_TOKEN",
        hide_env_values = true,
        help = "GitHub token for GHCR authentication"
    )]
    token: Option<String>,

    #[arg(long, env = ACTOR_ENV_VAR, help = "User to log in to GHCR as")]
    actor: Option<String>,

    #[arg(
        short,
        long,
        value_enum,
        default_value = "docker",
        help = "Container engine to use"
    )]
    engine: Engine,

    #[arg(
        long,
        env = "CONTAINER_CLI",
        help = "Path to the container CLI binary, overrides --engine"
    )]
    container_cli: Option<String>,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Verbose mode (-v for info, -vv for debug, -vvv for trace)"
    )]
    verbose: u8,
}

/// The three values a sync cannot run without.
struct Required<'a> {
    source: &'a str,
    target_org: &'a str,
    token: &'a str,
}

impl Cli {
    fn required(&self) -> Option<Required<'_>> {
        Some(Required {
            source: present(&self.source)?,
            target_org: present(&self.target_org)?,
            token: present(&self.token)?,
        })
    }

    fn container_cli(&self) -> ContainerCli {
        match present(&self.container_cli) {
            Some(program) => ContainerCli::new(program),
            None => ContainerCli::from(self.engine),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity level
    let verbosity = VerbosityLevel::from(cli.verbose);
    env_logger::Builder::from_env(Env::default())
        .filter_level(verbosity.to_log_level())
        .init();

    let Some(required) = cli.required() else {
        println!("Error: source image, target organization, and GHCR token are required");
        // Help goes to stdout as well; failing to print it changes nothing about the exit code.
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match run(&cli, &required) {
        Ok(()) => {
            println!("Image sync completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Error syncing image: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, required: &Required<'_>) -> Result<()> {
    let job = SyncJob::new(
        required.source,
        required.target_org,
        Token::new(required.token),
    )?;

    info!("Starting ghcr-sync for image: {}", job.source_reference());
    debug!("Container CLI: {}", cli.container_cli().program());
    debug!("Actor: {:?}", cli.actor);

    let syncer = ImageSyncer::new(SystemExecutor::new())
        .with_cli(cli.container_cli())
        .with_actor(cli.actor.clone())
        .with_notifier(Notifier::new(cli.verbose));

    println!(
        "Syncing image from {} to {}",
        job.source_reference(),
        job.target_reference()
    );
    syncer.sync(&job)?;

    Ok(())
}
