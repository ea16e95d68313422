mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use newsdesk_core::SchemaVariant;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(version, about = "Content schema checker and search index builder for news sites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn parse_schema(s: &str) -> Result<SchemaVariant, String> {
    s.parse()
}

#[derive(Parser)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to create site directory
        path: PathBuf,

        /// Post schema: newsroom or ai-models
        #[arg(long, default_value = "ai-models", value_parser = parse_schema)]
        schema: SchemaVariant,

        /// Site title
        #[arg(long, default_value = "AI News")]
        title: String,
    },

    /// Write a new post into the content collection
    New {
        /// Path to site directory
        path: PathBuf,

        #[command(flatten)]
        post: commands::new::NewPost,
    },

    /// Validate every post against the site schema
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Preview site locally with hot reload
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Build search index and pages without serving
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            schema,
            title,
        } => commands::init::run(path, schema, title).await,
        Command::New { path, post } => commands::new::run(path, post).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "newsdesk", &mut io::stdout());
            Ok(())
        }
    }
}
