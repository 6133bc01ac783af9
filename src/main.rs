//! liminaldb CLI binary entry point.

use liminaldb::cli::{self, Cli, Commands};
use liminaldb::config::LiminalConfig;
use liminaldb::error::{LiminalError, Result};
use liminaldb::output::{format_json_error, QUICKSTART};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let config = LiminalConfig::load().apply_cli_overrides(cli.overrides());

    if let Err(e) = liminaldb::logging::init(config.verbose) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = run(cli, &config).await {
        report(&e, &config);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &LiminalConfig) -> Result<()> {
    let command = match cli.command {
        Some(command) if !cli.quickstart => command,
        _ => {
            println!("{QUICKSTART}");
            return Ok(());
        }
    };

    match command {
        Commands::Login(args) => cli::auth::handle_login(config, args.client_id).await,
        Commands::Logout => cli::auth::handle_logout(config),
        Commands::Whoami => cli::auth::handle_whoami(config).await,
        Commands::Health(args) => cli::service::handle_health(config, args.auth).await,
        Commands::Prompts(args) => cli::prompts::handle(config, args.command).await,
        Commands::Tags(args) => cli::service::handle_tags(config, args.command).await,
        Commands::Prefs(args) => cli::service::handle_prefs(config, args.command).await,
    }
}

fn report(error: &LiminalError, config: &LiminalConfig) {
    if config.is_json() {
        eprintln!("{}", format_json_error(error));
        return;
    }
    eprintln!("Error: {error}");
    if let Some(hint) = error.hint() {
        eprintln!("Hint: {hint}");
    }
}
