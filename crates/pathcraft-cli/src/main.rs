mod config;
mod generate_cmd;
mod serve_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::PathcraftConfig;

#[derive(Parser)]
#[command(name = "pathcraft", about = "LLM-backed learning path generator")]
struct Cli {
    /// API key for the generation backend (overrides PATHCRAFT_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a pathcraft config file
    Init {
        /// OpenAI-compatible API root
        #[arg(long, default_value = config::DEFAULT_BASE_URL)]
        base_url: String,
        /// Model identifier to request
        #[arg(long, default_value = config::DEFAULT_MODEL)]
        model: String,
        /// API key to store in the config file (0600 on Unix)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate one validated learning plan and print it as JSON
    Generate {
        /// Subject to build the plan around
        topic: String,
        /// Learner level (e.g. beginner, intermediate, advanced)
        #[arg(long, default_value = "beginner")]
        level: String,
        /// Plan length in weeks
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        /// Study hours per week
        #[arg(long, default_value_t = 5)]
        hours_per_week: u32,
        /// Skip URL validation (plan is returned as generated)
        #[arg(long)]
        skip_validation: bool,
        /// Write the plan to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8787)]
        port: u16,
    },
}

/// Execute the `pathcraft init` command: write config file.
fn cmd_init(base_url: &str, model: &str, api_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        llm: config::LlmSection {
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key,
        },
        validation: config::ValidationSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  llm.base_url = {base_url}");
    println!("  llm.model = {model}");
    if cfg.llm.api_key.is_none() {
        println!();
        println!("No API key stored; set PATHCRAFT_API_KEY before running `pathcraft generate`.");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            base_url,
            model,
            api_key,
            force,
        } => {
            cmd_init(&base_url, &model, api_key.or(cli.api_key), force)?;
        }
        Commands::Generate {
            topic,
            level,
            weeks,
            hours_per_week,
            skip_validation,
            output,
        } => {
            let resolved = PathcraftConfig::resolve(cli.api_key.as_deref())?;
            let args = generate_cmd::GenerateArgs {
                topic,
                level,
                weeks,
                hours_per_week,
                skip_validation,
                output,
            };
            generate_cmd::run_generate(&resolved, args).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = PathcraftConfig::resolve(cli.api_key.as_deref())?;
            let pipeline = generate_cmd::build_pipeline(&resolved)?;
            serve_cmd::run_serve(pipeline, &bind, port).await?;
        }
    }

    Ok(())
}
