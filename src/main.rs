//! Paintquest CLI entry point.

use clap::Parser;

use paintquest::cli::{commands, handle_error, Cli, Commands};
use paintquest::infrastructure::config::ConfigLoader;
use paintquest::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, cli.json).await,
        Commands::Task(args) => commands::task::execute(args, &config, cli.json).await,
        Commands::Attempt(args) => commands::attempt::execute(args, &config, cli.json).await,
        Commands::Quest(args) => commands::quest::execute(args, &config, cli.json).await,
        Commands::Recommend(args) => commands::recommend::execute(args, &config, cli.json).await,
        Commands::Template(args) => commands::template::execute(args, &config, cli.json).await,
        Commands::Arsenal(args) => commands::arsenal::execute(args, &config, cli.json).await,
        Commands::Profile(args) => commands::profile::execute(args, &config, cli.json).await,
        Commands::Review(args) => commands::review::execute(args, &config, cli.json).await,
        Commands::Tags(args) => commands::tags::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
