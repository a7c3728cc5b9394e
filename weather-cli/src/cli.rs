use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Text};
use weather_core::{
    Config, FileQueryStore, RenderOptions, Resolution, ResolutionPipeline, open_meteo_from_config,
    render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup widget")]
pub struct Cli {
    /// Log lookups and state changes to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit endpoints and display settings.
    Configure,

    /// Show the forecast for a city (or the last one searched).
    Show {
        /// City name; stored as the new query when given.
        query: Option<String>,
    },

    /// Type city names at a prompt and see the forecast update.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query } => {
                let (pipeline, options) = build_pipeline()?;
                let outcome = match query {
                    Some(query) => pipeline.set_query(query).await,
                    None => pipeline.start().await,
                };
                report(&outcome);
                print!("{}", render(&pipeline.snapshot(), &options));
                Ok(())
            }
            Command::Interactive => {
                let (pipeline, options) = build_pipeline()?;
                report(&pipeline.start().await);
                interactive(&pipeline, &options).await
            }
        }
    }
}

fn build_pipeline() -> anyhow::Result<(ResolutionPipeline, RenderOptions)> {
    let config = Config::load()?;
    let (geocoder, forecast) = open_meteo_from_config(&config)?;
    let store = FileQueryStore::new(config.state_file_path()?);

    tracing::debug!(state = %store.path().display(), "using state file");

    let pipeline = ResolutionPipeline::new(geocoder, forecast, Box::new(store));
    Ok((pipeline, RenderOptions { show_flag: config.show_flag }))
}

/// Failures don't change what is drawn; they only show up in the log.
/// Superseded lookups are already logged by the pipeline.
fn report(outcome: &Resolution) {
    match outcome {
        Resolution::Failed(err) => tracing::warn!("Lookup failed: {err}"),
        Resolution::Superseded | Resolution::Skipped | Resolution::Resolved(_) => {}
    }
}

async fn interactive(pipeline: &ResolutionPipeline, options: &RenderOptions) -> anyhow::Result<()> {
    println!("{}", render(&pipeline.snapshot(), options));

    loop {
        let current = pipeline.query();
        let answer = Text::new("City:")
            .with_initial_value(&current)
            .with_help_message("Enter to look up, Esc to quit")
            .prompt();

        let query = match answer {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read query"),
        };

        let outcome = if query == current {
            pipeline.refresh().await
        } else {
            pipeline.set_query(query).await
        };
        report(&outcome);

        println!("{}", render(&pipeline.snapshot(), options));
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.endpoints.geocoding_url = Text::new("Geocoding endpoint:")
        .with_initial_value(&config.endpoints.geocoding_url)
        .prompt()?;

    config.endpoints.forecast_url = Text::new("Forecast endpoint:")
        .with_initial_value(&config.endpoints.forecast_url)
        .prompt()?;

    config.show_flag = Confirm::new("Show country as a flag emoji?")
        .with_default(config.show_flag)
        .prompt()?;

    config.validate()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
