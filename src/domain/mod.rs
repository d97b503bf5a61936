//! Transport-agnostic domain logic for house-edge rules.

pub mod criteria;
pub mod error;
pub mod form;
pub mod game;
pub mod id;
pub mod percent;
pub mod rule;
pub mod window;

pub use criteria::{Criterion, RuleCriteria};
pub use error::{DomainError, FieldErrors};
pub use form::{FormContext, RuleForm, RuleTemplate};
pub use game::{Game, GameRef, GameType, GameVariant};
pub use id::{CatalogId, GameCode, RuleId};
pub use rule::HouseEdgeRule;
pub use window::EffectiveWindow;
