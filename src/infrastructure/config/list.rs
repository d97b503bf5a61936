//! Defaults for rule listings.

use serde::Deserialize;

use crate::application::query::{PageRequest, SortField, SortOrder, SortSpec};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub per_page: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl ListConfig {
    #[must_use]
    pub fn sort(&self) -> SortSpec {
        SortSpec::new(self.sort_by, self.sort_order)
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            per_page: PageRequest::DEFAULT_PER_PAGE,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}
