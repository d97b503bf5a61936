//! Operator CLI.
//!
//! [`run`] is the composition root: it loads config, initializes logging,
//! connects a backend, loads rules into a [`BulkMutationEngine`], and
//! dispatches the parsed command.

pub mod command;
pub mod output;
pub mod rules;

use tokio::sync::watch;
use tracing::{debug, warn};

use self::command::{Cli, Commands, RulesCommand};
use self::output::OutputConfig;
use crate::adapter::outbound::connect::{connect_rule_store, StoreMode};
use crate::application::bulk::{BulkMutationEngine, BulkSettings};
use crate::domain::form::RuleForm;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns config, validation, or backend errors; the caller reports them
/// and exits non-zero.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let config = Config::load_or_default(&cli.config)?;
    config.init_logging();
    debug!(path = %cli.config.display(), "Configuration loaded");

    let backend = connect_rule_store(&config).await?;
    output::header(env!("CARGO_PKG_VERSION"), backend.mode.as_str());
    if backend.mode == StoreMode::Demonstration && !config.api.is_demonstration() {
        output::warning("Remote API unreachable; changes will not be persisted.");
    }

    let command = match cli.command {
        Commands::Games => return rules::games(backend.catalog.as_ref()).await,
        Commands::Rules(command) => command,
    };

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            let _ = cancel_tx.send(true);
        }
    });

    let mut engine = BulkMutationEngine::new(
        backend.store,
        backend.catalog,
        BulkSettings::from(&config.bulk),
    )
    .with_cancel_signal(cancel_rx);
    engine.load().await?;
    let invalid = engine.invalid_rules();
    if invalid > 0 {
        output::warning(&format!(
            "{invalid} rules have min bet above max bet or an inverted window; fix them with `rules edit`."
        ));
    }

    match command {
        RulesCommand::List(args) => rules::list(&engine, &args, &config.list),
        RulesCommand::Stats => rules::stats(&engine),
        RulesCommand::Create(args) => rules::create(&mut engine, &args).await,
        RulesCommand::BulkCreate(args) => rules::bulk_create(&mut engine, &args).await,
        RulesCommand::ApplyAll(args) => rules::apply_all(&mut engine, &RuleForm::from(&args)).await,
        RulesCommand::RemoveAll(args) => rules::remove_all(&mut engine, &args).await,
        RulesCommand::Edit(args) => rules::edit(&mut engine, &args).await,
        RulesCommand::Toggle(args) => rules::toggle(&mut engine, &args).await,
        RulesCommand::Delete(args) => rules::delete(&mut engine, &args).await,
    }
}
