//! Filtered, sorted, paginated views over the rule collection.
//!
//! Queries never mutate; they re-derive a [`RulePage`] from whatever the
//! store holds right now. [`RuleStats`] always covers the whole collection
//! regardless of the active filter.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    game::{GameType, GameVariant},
    rule::HouseEdgeRule,
};
use crate::error::ConfigError;

/// Narrowing applied before sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    /// Case-insensitive substring matched against game name or game id.
    pub search: Option<String>,
    pub game_type: Option<GameType>,
    pub game_variant: Option<GameVariant>,
    pub is_active: Option<bool>,
}

impl RuleFilter {
    #[must_use]
    pub fn accepts(&self, rule: &HouseEdgeRule) -> bool {
        if let Some(needle) = self.needle() {
            let in_name = rule
                .game_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            let in_id = rule.game_id.as_str().to_lowercase().contains(&needle);
            if !in_name && !in_id {
                return false;
            }
        }
        self.game_type.map_or(true, |t| rule.game_type == t)
            && self.game_variant.map_or(true, |v| rule.game_variant == v)
            && self.is_active.map_or(true, |a| rule.is_active == a)
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Column a page is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    EffectiveFrom,
    EffectiveUntil,
    GameId,
    GameName,
    GameType,
    GameVariant,
    HouseEdge,
    MinBet,
    MaxBet,
    IsActive,
}

impl SortField {
    pub const ALL: [SortField; 12] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::EffectiveFrom,
        SortField::EffectiveUntil,
        SortField::GameId,
        SortField::GameName,
        SortField::GameType,
        SortField::GameVariant,
        SortField::HouseEdge,
        SortField::MinBet,
        SortField::MaxBet,
        SortField::IsActive,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::EffectiveFrom => "effective_from",
            SortField::EffectiveUntil => "effective_until",
            SortField::GameId => "game_id",
            SortField::GameName => "game_name",
            SortField::GameType => "game_type",
            SortField::GameVariant => "game_variant",
            SortField::HouseEdge => "house_edge",
            SortField::MinBet => "min_bet",
            SortField::MaxBet => "max_bet",
            SortField::IsActive => "is_active",
        }
    }

    /// Ascending comparison on this column. `None` sorts before `Some`.
    fn compare(&self, a: &HouseEdgeRule, b: &HouseEdgeRule) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::EffectiveFrom => a.effective_from.cmp(&b.effective_from),
            SortField::EffectiveUntil => a.effective_until.cmp(&b.effective_until),
            SortField::GameId => a.game_id.cmp(&b.game_id),
            SortField::GameName => a.game_name.cmp(&b.game_name),
            SortField::GameType => a.game_type.as_str().cmp(b.game_type.as_str()),
            SortField::GameVariant => a.game_variant.as_str().cmp(b.game_variant.as_str()),
            SortField::HouseEdge => a.house_edge.cmp(&b.house_edge),
            SortField::MinBet => a.min_bet.cmp(&b.min_bet),
            SortField::MaxBet => a.max_bet.cmp(&b.max_bet),
            SortField::IsActive => a.is_active.cmp(&b.is_active),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "sort_by",
                reason: format!("unknown sort column '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ConfigError::InvalidValue {
                field: "sort_order",
                reason: format!("expected 'asc' or 'desc', got '{s}'"),
            }),
        }
    }
}

/// Sort column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl SortSpec {
    #[must_use]
    pub fn new(sort_by: SortField, sort_order: SortOrder) -> Self {
        Self {
            sort_by,
            sort_order,
        }
    }

    fn compare(&self, a: &HouseEdgeRule, b: &HouseEdgeRule) -> Ordering {
        let ordering = self.sort_by.compare(a, b);
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: usize = 20;

    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// A query over the rule collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: RuleFilter,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl ListQuery {
    /// Filter, sort, and slice `rules`.
    #[must_use]
    pub fn run(&self, rules: &[HouseEdgeRule]) -> RulePage {
        query(rules, &self.filter, self.sort, self.page)
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RulePage {
    pub items: Vec<HouseEdgeRule>,
    /// Matches across all pages.
    pub total: usize,
    /// Page actually served, after clamping.
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Counters over the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Distinct game types present.
    pub game_types: usize,
    /// Distinct game variants present.
    pub game_variants: usize,
}

impl RuleStats {
    #[must_use]
    pub fn collect(rules: &[HouseEdgeRule]) -> Self {
        let active = rules.iter().filter(|rule| rule.is_active).count();
        let types: BTreeSet<GameType> = rules.iter().map(|rule| rule.game_type).collect();
        let variants: BTreeSet<GameVariant> = rules.iter().map(|rule| rule.game_variant).collect();
        Self {
            total: rules.len(),
            active,
            inactive: rules.len() - active,
            game_types: types.len(),
            game_variants: variants.len(),
        }
    }
}

/// Filter, sort, and paginate.
///
/// `per_page = 0` is treated as 1, and an out-of-range page is clamped into
/// `[1, total_pages]`, so the last page is served for any page past it.
#[must_use]
pub fn query(
    rules: &[HouseEdgeRule],
    filter: &RuleFilter,
    sort: SortSpec,
    page: PageRequest,
) -> RulePage {
    let mut matched: Vec<&HouseEdgeRule> = rules.iter().filter(|rule| filter.accepts(rule)).collect();
    matched.sort_by(|a, b| sort.compare(a, b));

    let total = matched.len();
    let per_page = page.per_page.max(1);
    let total_pages = total.div_ceil(per_page).max(1);
    let current = page.page.clamp(1, total_pages);
    let start = (current - 1) * per_page;

    let items: Vec<HouseEdgeRule> = matched
        .into_iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    debug!(
        total,
        page = current,
        per_page,
        sort_by = %sort.sort_by,
        sort_order = %sort.sort_order,
        "Rule query"
    );

    RulePage {
        items,
        total,
        page: current,
        per_page,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{epoch, rule, rule_at};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<HouseEdgeRule> {
        let mut a = rule_at("alpha", GameType::Slot, GameVariant::Classic, epoch());
        a.game_name = Some("Sweet Bonanza".into());
        let mut b = rule_at(
            "beta",
            GameType::Crash,
            GameVariant::V1,
            epoch() + Duration::hours(1),
        );
        b.is_active = false;
        b.min_bet = None;
        let mut c = rule_at(
            "gamma",
            GameType::Slot,
            GameVariant::Mobile,
            epoch() + Duration::hours(2),
        );
        c.house_edge = dec!(0.0100);
        vec![a, b, c]
    }

    fn codes(page: &RulePage) -> Vec<&str> {
        page.items.iter().map(|r| r.game_id.as_str()).collect()
    }

    #[test]
    fn default_sort_is_newest_first() {
        let page = query(&sample(), &RuleFilter::default(), SortSpec::default(), PageRequest::default());
        assert_eq!(codes(&page), vec!["gamma", "beta", "alpha"]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn search_matches_name_or_id_case_insensitively() {
        let filter = RuleFilter {
            search: Some("BONANZA".into()),
            ..RuleFilter::default()
        };
        let page = query(&sample(), &filter, SortSpec::default(), PageRequest::default());
        assert_eq!(codes(&page), vec!["alpha"]);

        let filter = RuleFilter {
            search: Some("amm".into()),
            ..RuleFilter::default()
        };
        let page = query(&sample(), &filter, SortSpec::default(), PageRequest::default());
        assert_eq!(codes(&page), vec!["gamma"]);
    }

    #[test]
    fn exact_filters_are_conjunctive() {
        let filter = RuleFilter {
            game_type: Some(GameType::Slot),
            is_active: Some(true),
            game_variant: Some(GameVariant::Mobile),
            ..RuleFilter::default()
        };
        let page = query(&sample(), &filter, SortSpec::default(), PageRequest::default());
        assert_eq!(codes(&page), vec!["gamma"]);
    }

    #[test]
    fn absent_values_sort_first_ascending() {
        let sort = SortSpec::new(SortField::MinBet, SortOrder::Asc);
        let page = query(&sample(), &RuleFilter::default(), sort, PageRequest::default());
        assert_eq!(page.items[0].game_id.as_str(), "beta");
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let rules: Vec<_> = (0..4)
            .map(|i| rule(&format!("r{i}"), GameType::Table, GameVariant::Classic))
            .collect();
        let sort = SortSpec::new(SortField::HouseEdge, SortOrder::Desc);
        let page = query(&rules, &RuleFilter::default(), sort, PageRequest::default());
        assert_eq!(codes(&page), vec!["r0", "r1", "r2", "r3"]);
    }

    #[test]
    fn zero_per_page_and_out_of_range_page_are_clamped() {
        let page = query(
            &sample(),
            &RuleFilter::default(),
            SortSpec::default(),
            PageRequest::new(99, 0),
        );
        assert_eq!(page.per_page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(codes(&page), vec!["alpha"]);

        let empty = query(&[], &RuleFilter::default(), SortSpec::default(), PageRequest::new(0, 10));
        assert_eq!(empty.total_pages, 1);
        assert_eq!(empty.page, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn stats_ignore_filters() {
        let stats = RuleStats::collect(&sample());
        assert_eq!(
            stats,
            RuleStats {
                total: 3,
                active: 2,
                inactive: 1,
                game_types: 2,
                game_variants: 3,
            }
        );
    }

    #[test]
    fn sort_keys_parse() {
        assert_eq!("House_Edge".parse::<SortField>().unwrap(), SortField::HouseEdge);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("price".parse::<SortField>().is_err());
    }
}
