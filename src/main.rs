//! llm-resolver - Resolve LLM provider settings and build ready-to-use clients
//!
//! Command-line front end: inspect which provider a parameter set resolves
//! to, send a one-off prompt through it, or check the public route list.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use llm_resolver::auth;
use llm_resolver::client::{self, ChatMessage};
use llm_resolver::config::Config;
use llm_resolver::provider::{ConfigMapping, EnvironmentView, Resolver};

#[derive(Parser)]
#[command(name = "llm-resolver")]
#[command(about = "Resolve LLM provider settings and build ready-to-use clients")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which provider a parameter file resolves to
    Resolve {
        /// Flat JSON object of parameters
        #[arg(short, long)]
        params: PathBuf,
    },

    /// Resolve a provider and send it a single prompt
    Complete {
        /// Flat JSON object of parameters
        #[arg(short, long)]
        params: PathBuf,

        /// User prompt
        #[arg(long)]
        prompt: String,

        /// Optional system prompt
        #[arg(long)]
        system: Option<String>,
    },

    /// List public routes, or classify a single path
    Routes {
        /// Path to classify
        #[arg(long)]
        check: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("llm_resolver={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let resolver = Resolver::from_config(&config.resolver);

    match cli.command {
        Commands::Resolve { params } => {
            tracing::info!(params = %params.display(), namespace = %resolver.namespace(), "Resolving provider");
            let mapping = ConfigMapping::from_json_file(&params)?;
            let env = EnvironmentView::from_process();

            let resolution = resolver.resolve_detailed(&mapping, &env);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            Ok(())
        }

        Commands::Complete {
            params,
            prompt,
            system,
        } => {
            let mapping = ConfigMapping::from_json_file(&params)?;
            let env = EnvironmentView::from_process();
            let llm = client::create_client(&resolver, &mapping, &env)?;

            let mut messages = Vec::with_capacity(2);
            if let Some(system) = system {
                messages.push(ChatMessage::system(system));
            }
            messages.push(ChatMessage::user(prompt));

            let reply = llm.complete(&messages).await?;
            println!("{}", reply);
            Ok(())
        }

        Commands::Routes { check } => {
            for route in &config.auth.public_routes {
                auth::add_public_route(route.as_str());
            }

            match check {
                Some(path) => {
                    let verdict = if auth::is_authenticated(&path) {
                        "protected"
                    } else {
                        "public"
                    };
                    println!("{} {}", path, verdict);
                }
                None => {
                    let mut routes: Vec<String> = auth::get_public_routes().into_iter().collect();
                    routes.sort();
                    for route in routes {
                        println!("{}", route);
                    }
                }
            }
            Ok(())
        }
    }
}
