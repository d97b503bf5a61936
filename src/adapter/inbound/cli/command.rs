//! Command-line interface definitions.
//!
//! Defines the CLI structure for the houseedge console using `clap`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::application::query::{SortField, SortOrder};
use crate::domain::{
    criteria::Criterion,
    form::RuleForm,
    game::{GameType, GameVariant},
};
use crate::infrastructure::config::settings::DEFAULT_CONFIG_PATH;

/// House-edge rule management console
#[derive(Parser, Debug)]
#[command(name = "houseedge")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage house-edge rules
    #[command(subcommand)]
    Rules(RulesCommand),

    /// List the game catalog
    Games,
}

/// Subcommands for `houseedge rules`.
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// List rules with filters, sorting, and pagination
    List(ListArgs),
    /// Show aggregate counters over all rules
    Stats,
    /// Create one rule for a catalog game
    Create(CreateArgs),
    /// Create one rule per selected catalog game
    BulkCreate(BulkCreateArgs),
    /// Create one rule for every game in the catalog
    ApplyAll(RuleFormArgs),
    /// Delete every rule matching a type/variant filter
    RemoveAll(RemoveAllArgs),
    /// Change a rule; fields not given keep their current values
    Edit(EditArgs),
    /// Flip a rule between active and inactive
    Toggle(RuleIdArg),
    /// Delete a single rule
    Delete(RuleIdArg),
}

/// Arguments for `rules list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on game name or game id
    #[arg(long)]
    pub search: Option<String>,

    /// Only rules of this game type
    #[arg(long = "type")]
    pub game_type: Option<GameType>,

    /// Only rules of this game variant
    #[arg(long = "variant")]
    pub game_variant: Option<GameVariant>,

    /// Only active (true) or inactive (false) rules
    #[arg(long)]
    pub active: Option<bool>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rules per page [default: from config]
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Sort column [default: from config]
    #[arg(long)]
    pub sort_by: Option<SortField>,

    /// Sort direction, asc or desc [default: from config]
    #[arg(long)]
    pub order: Option<SortOrder>,
}

/// Shared rule fields. Values are validated as a form so every problem is
/// reported at once. An omitted flag is a blank field: required on create,
/// unchanged on edit.
#[derive(Args, Debug, Clone)]
pub struct RuleFormArgs {
    /// Game type (slot, sports, table, live, crash, plinko, wheel)
    #[arg(long = "type")]
    pub game_type: Option<String>,

    /// Game variant (classic, v1, v2, demo, real, mobile, desktop)
    #[arg(long = "variant")]
    pub game_variant: Option<String>,

    /// House edge as a percent (5 = 5%) or a fraction (0.05)
    #[arg(long)]
    pub house_edge: Option<String>,

    /// Minimum bet
    #[arg(long)]
    pub min_bet: Option<String>,

    /// Maximum bet
    #[arg(long)]
    pub max_bet: Option<String>,

    /// Start of the effective window (RFC3339 or YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the effective window (RFC3339 or YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub until: Option<String>,

    /// Mark the rule inactive
    #[arg(long)]
    pub inactive: bool,
}

impl From<&RuleFormArgs> for RuleForm {
    fn from(args: &RuleFormArgs) -> Self {
        Self {
            game_type: args.game_type.clone().unwrap_or_default(),
            game_variant: args.game_variant.clone().unwrap_or_default(),
            house_edge: args.house_edge.clone().unwrap_or_default(),
            min_bet: args.min_bet.clone().unwrap_or_default(),
            max_bet: args.max_bet.clone().unwrap_or_default(),
            effective_from: args.from.clone(),
            effective_until: args.until.clone(),
            is_active: args.inactive.then_some(false),
        }
    }
}

/// Arguments for `rules create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Catalog id of the game
    #[arg(long)]
    pub game: String,

    #[command(flatten)]
    pub form: RuleFormArgs,
}

/// Arguments for `rules bulk-create`.
#[derive(Args, Debug)]
pub struct BulkCreateArgs {
    /// Catalog ids of the target games (repeatable)
    #[arg(long = "game", required = true)]
    pub games: Vec<String>,

    #[command(flatten)]
    pub form: RuleFormArgs,
}

/// Arguments for `rules remove-all`.
#[derive(Args, Debug)]
pub struct RemoveAllArgs {
    /// Only rules of this game type; blank or omitted matches any
    #[arg(long = "type", default_value = "", value_parser = criterion::<GameType>)]
    pub game_type: Criterion<GameType>,

    /// Only rules of this game variant; blank or omitted matches any
    #[arg(long = "variant", default_value = "", value_parser = criterion::<GameVariant>)]
    pub game_variant: Criterion<GameVariant>,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub yes: bool,
}

fn criterion<T>(raw: &str) -> Result<Criterion<T>, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    Criterion::<T>::parse(raw).map_err(|err| err.to_string())
}

/// Arguments for `rules edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Rule id
    pub id: String,

    #[command(flatten)]
    pub form: RuleFormArgs,
}

/// A single rule id.
#[derive(Args, Debug)]
pub struct RuleIdArg {
    /// Rule id
    pub id: String,
}
