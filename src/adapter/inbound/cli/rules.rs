//! Handlers for `houseedge rules` and `houseedge games`.

use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};
use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use super::command::{BulkCreateArgs, CreateArgs, EditArgs, ListArgs, RemoveAllArgs, RuleIdArg};
use super::output;
use crate::application::{
    bulk::{BulkMutationEngine, BulkOutcome},
    query::{ListQuery, PageRequest, RuleFilter, SortSpec},
};
use crate::domain::{
    criteria::RuleCriteria,
    form::RuleForm,
    id::{CatalogId, RuleId},
    rule::HouseEdgeRule,
};
use crate::error::{BulkError, Result};
use crate::infrastructure::config::ListConfig;
use crate::port::outbound::catalog::GameCatalogProvider;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Game")]
    game: String,
    #[tabled(rename = "Type")]
    game_type: String,
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Edge")]
    house_edge: String,
    #[tabled(rename = "Min")]
    min_bet: String,
    #[tabled(rename = "Max")]
    max_bet: String,
    #[tabled(rename = "Active")]
    active: &'static str,
    #[tabled(rename = "Effective")]
    window: String,
}

impl From<&HouseEdgeRule> for RuleRow {
    fn from(rule: &HouseEdgeRule) -> Self {
        Self {
            id: rule.id.to_string(),
            game: rule
                .game_name
                .clone()
                .unwrap_or_else(|| rule.game_id.to_string()),
            game_type: rule.game_type.to_string(),
            variant: rule.game_variant.to_string(),
            house_edge: rule.house_edge_display(),
            min_bet: amount(rule.min_bet),
            max_bet: amount(rule.max_bet),
            active: if rule.is_active { "yes" } else { "no" },
            window: format!(
                "{} → {}",
                day(rule.effective_from),
                day(rule.effective_until)
            ),
        }
    }
}

#[derive(Tabled)]
struct GameRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
}

fn amount(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.normalize().to_string())
}

fn day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// `rules list`
pub fn list(engine: &BulkMutationEngine, args: &ListArgs, defaults: &ListConfig) -> Result<()> {
    let default_sort = defaults.sort();
    let query = ListQuery {
        filter: RuleFilter {
            search: args.search.clone(),
            game_type: args.game_type,
            game_variant: args.game_variant,
            is_active: args.active,
        },
        sort: SortSpec::new(
            args.sort_by.unwrap_or(default_sort.sort_by),
            args.order.unwrap_or(default_sort.sort_order),
        ),
        page: PageRequest::new(args.page, args.per_page.unwrap_or(defaults.per_page)),
    };
    let page = engine.query(&query);

    if output::is_json() {
        output::json_output(json!({
            "command": "rules.list",
            "page": page,
        }));
        return Ok(());
    }

    output::section("Rules");
    if page.items.is_empty() {
        output::note("No rules match.");
    } else {
        let rows: Vec<RuleRow> = page.items.iter().map(RuleRow::from).collect();
        output::lines(&Table::new(rows).to_string());
    }
    output::note(&format!(
        "Page {} of {} ({} matching)",
        page.page, page.total_pages, page.total
    ));
    Ok(())
}

/// `rules stats`
pub fn stats(engine: &BulkMutationEngine) -> Result<()> {
    let stats = engine.stats();

    if output::is_json() {
        output::json_output(json!({
            "command": "rules.stats",
            "stats": stats,
        }));
        return Ok(());
    }

    output::section("Rule statistics");
    output::field("Total", stats.total);
    output::field("Active", output::positive(stats.active));
    output::field("Inactive", output::negative(stats.inactive));
    output::field("Game types", stats.game_types);
    output::field("Variants", stats.game_variants);
    Ok(())
}

/// `games`
pub async fn games(catalog: &dyn GameCatalogProvider) -> Result<()> {
    let games = catalog.list_games().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "games",
            "games": games,
        }));
        return Ok(());
    }

    output::section("Game catalog");
    let rows: Vec<GameRow> = games
        .iter()
        .map(|game| GameRow {
            id: game.internal_id.to_string(),
            code: game.game_code.to_string(),
            name: game.name.clone(),
            provider: game.provider.clone(),
            enabled: if game.enabled { "yes" } else { "no" },
        })
        .collect();
    output::lines(&Table::new(rows).to_string());
    output::note(&format!("{} games", games.len()));
    Ok(())
}

/// `rules create`
pub async fn create(engine: &mut BulkMutationEngine, args: &CreateArgs) -> Result<()> {
    let selection = engine
        .resolve_selection(&[CatalogId::new(args.game.clone())])
        .await?;
    let rule = engine
        .create_single(selection.first(), &RuleForm::from(&args.form))
        .await?;
    report_rule("rules.create", "Created", &rule);
    Ok(())
}

/// `rules bulk-create`
pub async fn bulk_create(engine: &mut BulkMutationEngine, args: &BulkCreateArgs) -> Result<()> {
    let ids: Vec<CatalogId> = args.games.iter().cloned().map(CatalogId::from).collect();
    let targets = engine.resolve_selection(&ids).await?;
    let outcome = engine
        .create_bulk(&targets, &RuleForm::from(&args.form))
        .await?;
    report_bulk("rules.bulk_create", &outcome);
    Ok(())
}

/// `rules apply-all`
pub async fn apply_all(engine: &mut BulkMutationEngine, form: &RuleForm) -> Result<()> {
    let outcome = engine.apply_to_all_games(form).await?;
    report_bulk("rules.apply_all", &outcome);
    Ok(())
}

/// `rules remove-all`
///
/// Shows the exact count first; deletes only after the operator confirms it
/// (or passes `--yes`).
pub async fn remove_all(engine: &mut BulkMutationEngine, args: &RemoveAllArgs) -> Result<()> {
    let criteria = RuleCriteria {
        game_type: args.game_type,
        game_variant: args.game_variant,
    };
    let preview = engine.preview_removal(criteria);

    if preview.count() == 0 {
        if output::is_json() {
            output::json_output(json!({
                "command": "rules.remove_all",
                "criteria": criteria.to_string(),
                "removed": 0,
            }));
        } else {
            output::note(&format!("No rules match {criteria}."));
        }
        return Ok(());
    }

    let summary = preview.describe();
    if !args.yes {
        if output::is_json() {
            return Err(BulkError::Unconfirmed { summary }.into());
        }
        if preview.wipes_all() {
            output::warning(&summary);
        } else {
            output::note(&summary);
        }
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} rules?", preview.count()))
            .default(false)
            .interact()?;
        if !proceed {
            output::note("Nothing deleted.");
            return Ok(());
        }
    }

    let count = preview.count();
    let confirmed = preview.confirm(count)?;
    let removed = engine.remove_all_matching(confirmed).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "rules.remove_all",
            "criteria": criteria.to_string(),
            "removed": removed,
        }));
    } else {
        output::success(&format!("Removed {removed} rules"));
    }
    Ok(())
}

/// `rules edit`
pub async fn edit(engine: &mut BulkMutationEngine, args: &EditArgs) -> Result<()> {
    let rule = engine
        .update_rule(&RuleId::from(args.id.as_str()), &RuleForm::from(&args.form))
        .await?;
    report_rule("rules.edit", "Updated", &rule);
    Ok(())
}

/// `rules toggle`
pub async fn toggle(engine: &mut BulkMutationEngine, args: &RuleIdArg) -> Result<()> {
    let rule = engine.toggle_status(&RuleId::from(args.id.as_str())).await?;
    let verb = if rule.is_active { "Activated" } else { "Deactivated" };
    report_rule("rules.toggle", verb, &rule);
    Ok(())
}

/// `rules delete`
pub async fn delete(engine: &mut BulkMutationEngine, args: &RuleIdArg) -> Result<()> {
    let rule = engine.delete_rule(&RuleId::from(args.id.as_str())).await?;
    report_rule("rules.delete", "Deleted", &rule);
    Ok(())
}

fn report_rule(command: &str, verb: &str, rule: &HouseEdgeRule) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "rule": rule,
        }));
        return;
    }
    output::success(&format!(
        "{verb} rule {} for {} ({}/{}) at {}",
        output::highlight(&rule.id),
        rule.game_id,
        rule.game_type,
        rule.game_variant,
        rule.house_edge_display()
    ));
}

fn report_bulk(command: &str, outcome: &BulkOutcome) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "inserted": outcome.inserted(),
            "already_covered": outcome.already_covered,
            "rule_ids": outcome.rule_ids,
        }));
        return;
    }
    output::success(&format!("Created {} rules", outcome.inserted()));
    if outcome.already_covered > 0 {
        output::warning(&format!(
            "{} games already had an active rule for this type and variant",
            outcome.already_covered
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::game::{GameType, GameVariant};
    use crate::testkit::domain::rule;
    use rust_decimal_macros::dec;

    #[test]
    fn row_renders_percent_and_missing_bounds() {
        let mut r = rule("g1", GameType::Slot, GameVariant::Classic);
        r.house_edge = dec!(0.1200);
        r.max_bet = None;
        let row = RuleRow::from(&r);
        assert_eq!(row.house_edge, "12.00%");
        assert_eq!(row.min_bet, "1");
        assert_eq!(row.max_bet, "-");
        assert_eq!(row.window, "2026-01-01 → 2027-01-01");
    }
}
