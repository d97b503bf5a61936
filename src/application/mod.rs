//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the rule-management use cases.
//!
//! - [`store`]: In-session rule collection with identity and ordering checks.
//! - [`bulk`]: Single, bulk, and apply-to-all mutations over the collection.
//! - [`removal`]: Preview and confirmation for remove-all-matching.
//! - [`query`]: Filtering, sorting, pagination, and stats.

pub mod bulk;
pub mod query;
pub mod removal;
pub mod store;

pub use bulk::{BulkMutationEngine, BulkOutcome, BulkSettings};
pub use query::{
    ListQuery, PageRequest, RuleFilter, RulePage, RuleStats, SortField, SortOrder, SortSpec,
};
pub use removal::{ConfirmedRemoval, RemovalPreview};
pub use store::HouseEdgeStore;
