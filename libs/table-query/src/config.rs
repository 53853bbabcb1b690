use odata_core::Error;
use serde::{Deserialize, Serialize};

use crate::catalog::PolicyCatalog;
use crate::policy::EntityPolicy;
use crate::state::TableState;

/// Configuration for table queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableQueryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for entities whose policy sets none.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default = "PolicyCatalog::admin_defaults")]
    pub entities: PolicyCatalog,
}

impl Default for TableQueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            entities: PolicyCatalog::admin_defaults(),
        }
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    1000
}

impl TableQueryConfig {
    /// Policy for `entity`, inheriting the global page cap when it has none.
    ///
    /// # Errors
    /// Returns `Error::UnknownEntity` for unregistered entities.
    pub fn policy_for(&self, entity: &str) -> Result<EntityPolicy, Error> {
        let mut policy = self.entities.get(entity)?.clone();
        if policy.max_page_size.is_none() && self.max_page_size > 0 {
            policy.max_page_size = Some(self.max_page_size);
        }
        Ok(policy)
    }

    /// First page at the configured default size.
    #[must_use]
    pub fn initial_state(&self) -> TableState {
        TableState::page(0, self.default_page_size)
    }
}
