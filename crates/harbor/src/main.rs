mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use harbor_core::{CapabilitySelector, DefaultPluginManager, PluginManager};
use log::info;

/// Harbor: a runtime plugin manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Liveness check
    #[arg(long)]
    ping: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load plugin source files into a fresh manager and report the
    /// resulting registry
    Load {
        /// Plugin source files, loaded in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Only accept blocks declaring this base/capability name
        #[arg(long)]
        capability: Option<String>,
        /// Emit the resulting registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the builtin factories loadable by declared name
    Factories,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return;
    }

    match args.command {
        Some(Commands::Load {
            files,
            capability,
            json,
        }) => {
            let selector = match capability {
                Some(base) => CapabilitySelector::base(base),
                None => CapabilitySelector::Any,
            };
            let manager = DefaultPluginManager::with_selector(cli::builtin_catalog(), selector);

            let mut failures = 0usize;
            for file in &files {
                match manager.load_from_path(file).await {
                    Ok(id) => println!("loaded '{id}' from {}", file.display()),
                    Err(error) => {
                        failures += 1;
                        eprintln!("error loading {}: {error}", file.display());
                    }
                }
            }

            cli::render_registry(&manager, json).await;

            if let Err(error) = manager
                .events()
                .broadcast(|plugin| {
                    info!("plugin '{}' {} online", plugin.name(), plugin.version());
                    Ok(())
                })
                .await
            {
                eprintln!("broadcast failed: {error}");
                std::process::exit(1);
            }

            if failures > 0 {
                std::process::exit(1);
            }
        }
        Some(Commands::Factories) => {
            let catalog = cli::builtin_catalog();
            println!("Builtin factories:");
            for name in catalog.declared_names() {
                println!("  - {name}");
            }
        }
        None => {
            println!("Nothing to do. Try --help.");
        }
    }
}
