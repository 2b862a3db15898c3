use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = waypoint::cli::Cli::parse();
    waypoint::logging::init(&cli.log_level).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        waypoint::cli::Command::Build(args) => {
            waypoint::build::run(args).context("build")?;
        }
        waypoint::cli::Command::Validate(args) => {
            waypoint::validate::run(args).context("validate")?;
        }
        waypoint::cli::Command::Index(args) => {
            waypoint::index::run(args).context("index")?;
        }
        waypoint::cli::Command::Search(args) => {
            waypoint::engine::run(args).context("search")?;
        }
        waypoint::cli::Command::Serve(args) => {
            waypoint::serve::run(args).await.context("serve")?;
        }
    }

    Ok(())
}
