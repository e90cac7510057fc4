use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use wellness_onboarding::cli::{self, Command, HELP};
use wellness_onboarding::config::AppConfig;
use wellness_onboarding::onboarding::FlowController;
use wellness_onboarding::store::{JsonFileSettingsStore, SettingsStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    let store = JsonFileSettingsStore::open(&config.settings_path).with_context(|| {
        format!(
            "failed to open settings at {}",
            config.settings_path.display()
        )
    })?;

    eprintln!("🌱 Wellness onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Settings: {}", store.path().display());
    eprintln!("   Type `help` for commands, `quit` to exit.\n");

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    let mut flow = FlowController::open(store);
    println!("{}\n", cli::render(&flow, config.pretty_results)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}\n"),
            Ok(command) => match cli::execute(&mut flow, command, config.pretty_results) {
                Ok(output) => println!("\n{output}\n"),
                Err(e) => eprintln!("{e}"),
            },
            Err(message) => eprintln!("{message}"),
        }
        eprint!("> ");
    }

    tracing::info!(session_id = %flow.session_id(), phase = %flow.phase(), "Session closed");
    Ok(())
}
