use clap::Parser;

mod cli;
mod commands;
mod domain;
mod flows;
mod services;
mod wizard;

use cli::Cli;
use commands::{handle_runtime_commands, handle_train_commands};
use services::api::Session;
use services::output::print_fail;
use services::storage::{load_config, load_state, ConfigFile};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        print_fail(cli.json, &err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config()?;
    let session = resolve_session(cli, &config);
    let mut state = load_state()?;

    if handle_train_commands(cli, &config, &session)? {
        return Ok(());
    }
    handle_runtime_commands(cli, &config, &session, &mut state)
}

/// Session is built once here and passed down explicitly; no handler reads
/// ambient auth state.
fn resolve_session(cli: &Cli, config: &ConfigFile) -> Session {
    Session {
        user: cli
            .user
            .clone()
            .or_else(|| config.default_user.clone())
            .unwrap_or_else(|| "anonymous".to_string()),
        token: cli.token.clone().or_else(|| config.token.clone()),
    }
}
