use std::collections::BTreeMap;

use odata_core::{Error, SortDir};
use serde::{Deserialize, Serialize};

use crate::policy::{EntityPolicy, FieldOperator, SearchOperator};

/// Named entity policies, keyed by entity (collection) name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyCatalog {
    entities: BTreeMap<String, EntityPolicy>,
}

impl PolicyCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, policy: EntityPolicy) -> Self {
        self.insert(name, policy);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, policy: EntityPolicy) {
        self.entities.insert(name.into(), policy);
    }

    /// # Errors
    /// Returns `Error::UnknownEntity` when no policy is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&EntityPolicy, Error> {
        self.entities
            .get(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Policies for the admin console collections.
    ///
    /// Boolean status columns are sent by the UI as "true"/"false" strings,
    /// hence `equals_boolean`.
    #[must_use]
    pub fn admin_defaults() -> Self {
        use FieldOperator::{Contains, Equals, EqualsBoolean, EqualsNumber};

        let users = EntityPolicy::new("createdAt", SortDir::Desc)
            .field("id", Equals)
            .field("userName", Contains)
            .field("email", Contains)
            .field("firstName", Contains)
            .field("lastName", Contains)
            .field("phoneNumber", Contains)
            .field("lockoutEnabled", EqualsBoolean)
            .field("emailConfirmed", EqualsBoolean)
            .field("isActive", EqualsBoolean)
            .search_on("id", SearchOperator::Equals)
            .search_on("userName", SearchOperator::Contains)
            .search_on("email", SearchOperator::Contains);

        let clients = EntityPolicy::new("createdAt", SortDir::Desc)
            .field("clientId", Equals)
            .field("clientName", Contains)
            .field("enabled", EqualsBoolean)
            .field("accessTokenLifetime", EqualsNumber)
            .search_on("clientId", SearchOperator::Equals)
            .search_on("clientName", SearchOperator::Contains);

        let roles = EntityPolicy::new("name", SortDir::Asc)
            .field("id", Equals)
            .field("name", Contains)
            .field("isSystem", EqualsBoolean)
            .search_on("id", SearchOperator::Equals)
            .search_on("name", SearchOperator::Contains);

        let audit_logs = EntityPolicy::new("timestamp", SortDir::Desc)
            .field("userId", Equals)
            .field("action", Equals)
            .field("entityName", Contains)
            .field("statusCode", EqualsNumber)
            .field("succeeded", EqualsBoolean)
            .search_on("userId", SearchOperator::Equals)
            .search_on("action", SearchOperator::Contains)
            .search_on("entityName", SearchOperator::Contains);

        Self::new()
            .with("users", users)
            .with("clients", clients)
            .with("roles", roles)
            .with("auditLogs", audit_logs)
    }
}
