use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use deckgen::cli;
use deckgen::cli::generate::GenerateOptions;

#[derive(Parser)]
#[command(name = "deckgen", version)]
#[command(about = "Generate slide-deck JSON using templates/themes context", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a slide deck for a topic
    Generate {
        /// Topic/title for the presentation
        #[arg(long, conflicts_with = "prompt_file")]
        topic: Option<String>,

        /// Path to a text/markdown prompt file (topic/brief)
        #[arg(long)]
        prompt_file: Option<String>,

        /// Directory containing templates.json and themes.json
        #[arg(long)]
        data_dir: Option<String>,

        /// Explicit path to templates.json (overrides --data-dir)
        #[arg(long)]
        templates: Option<String>,

        /// Explicit path to themes.json (overrides --data-dir)
        #[arg(long)]
        themes: Option<String>,

        /// Output JSON path (defaults to <templates dir>/slides_<slug>.json)
        #[arg(short = 'o', long)]
        out: Option<String>,

        /// Language hint (uk/en/...) for generation
        #[arg(long)]
        lang: Option<String>,

        /// Max slides to generate (hint)
        #[arg(long)]
        max_slides: Option<usize>,

        /// Max live provider calls for this request
        #[arg(long)]
        budget: Option<u32>,

        /// Path to config file (defaults to ./deckgen.toml or ~/.config/deckgen/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Override the primary provider model
        #[arg(long)]
        model: Option<String>,

        /// Force stub (no network)
        #[arg(long)]
        offline: bool,

        /// Use the deterministic mock provider for testing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate an existing slides JSON against templates
    Validate {
        /// Path to the slides JSON file
        slides: String,

        /// Path to templates.json
        #[arg(long, default_value = "data/templates.json")]
        templates: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            topic,
            prompt_file,
            data_dir,
            templates,
            themes,
            out,
            lang,
            max_slides,
            budget,
            config,
            model,
            offline,
            dry_run,
        } => {
            cli::generate::run(GenerateOptions {
                topic,
                prompt_file,
                data_dir,
                templates,
                themes,
                out,
                lang,
                max_slides,
                budget,
                config_path: config,
                model,
                offline,
                dry_run,
            })
            .await?;
        }
        Commands::Validate { slides, templates } => {
            cli::validate::run(&slides, &templates)?;
        }
    }

    Ok(())
}
