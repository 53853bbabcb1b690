//! Translation of data-grid UI state into OData queries.
//!
//! The pieces:
//! - [`state`]: the table state the UI reports (page, sort, column filters, search box)
//! - [`policy`]: per-entity rules for comparing fields and searching
//! - [`catalog`]: named policies, with defaults for the admin console
//! - [`translate`]: `TableState` + `EntityPolicy` → query string

pub mod catalog;
pub mod config;
pub mod policy;
pub mod state;
pub mod translate;

pub use catalog::PolicyCatalog;
pub use config::TableQueryConfig;
pub use policy::{EntityPolicy, FieldOperator, SearchField, SearchOperator};
pub use state::{FilterCondition, FilterValue, PaginationState, SortSpec, TableState};
pub use translate::{assemble, build_query};
