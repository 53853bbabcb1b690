//! Per-table query orchestration
//!
//! A load goes through: debounce → translate → coalesce → sequence → fetch →
//! stale check. Each table view owns one controller.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use odata_core::pagination::scoped_fingerprint;
use odata_core::{normalize_response, QueryResult};
use serde::de::DeserializeOwned;
use table_query::{assemble, EntityPolicy, TableState};
use tracing::{debug, instrument};

use crate::debounce::Debouncer;
use crate::error::ClientError;
use crate::sequence::{QueryCoalescer, RequestSequencer};
use crate::source::PageSource;

#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome<T> {
    /// Fresh page for the latest request.
    Loaded(QueryResult<T>),
    /// A newer load started before this one finished; keep showing that one.
    Superseded,
    /// Same query as the previous load; the current page is still valid.
    Unchanged,
}

impl<T> LoadOutcome<T> {
    #[must_use]
    pub fn into_loaded(self) -> Option<QueryResult<T>> {
        match self {
            LoadOutcome::Loaded(page) => Some(page),
            _ => None,
        }
    }
}

pub struct TableQueryController<T> {
    source: Arc<dyn PageSource>,
    entity_path: String,
    policy: EntityPolicy,
    debouncer: Debouncer,
    coalescer: QueryCoalescer,
    sequencer: RequestSequencer,
    _items: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> TableQueryController<T> {
    pub fn new(
        source: Arc<dyn PageSource>,
        entity_path: impl Into<String>,
        policy: EntityPolicy,
        debounce: Duration,
    ) -> Self {
        Self {
            source,
            entity_path: entity_path.into(),
            policy,
            debouncer: Debouncer::new(debounce),
            coalescer: QueryCoalescer::new(),
            sequencer: RequestSequencer::new(),
            _items: PhantomData,
        }
    }

    #[must_use]
    pub fn entity_path(&self) -> &str {
        &self.entity_path
    }

    #[must_use]
    pub fn policy(&self) -> &EntityPolicy {
        &self.policy
    }

    /// Force the next load to hit the server even if the query is unchanged.
    pub fn invalidate(&self) {
        self.coalescer.reset();
    }

    /// # Errors
    /// `ClientError::Query` when the state cannot be translated; transport,
    /// status and decode errors from the source when this is still the
    /// latest request.
    #[instrument(
        name = "odata_client.load",
        skip_all,
        fields(entity = %self.entity_path, page_index = state.pagination.page_index)
    )]
    pub async fn load(
        &self,
        state: &TableState,
        search_term: Option<&str>,
    ) -> Result<LoadOutcome<T>, ClientError> {
        if !self.debouncer.settle().await {
            debug!("superseded while debouncing");
            return Ok(LoadOutcome::Superseded);
        }

        let query = assemble(state, &self.policy, search_term)?.build()?;
        let fingerprint = scoped_fingerprint(&self.entity_path, &query);
        if !self.coalescer.should_issue(&fingerprint) {
            debug!(%fingerprint, "query unchanged, not reissuing");
            return Ok(LoadOutcome::Unchanged);
        }

        let ticket = self.sequencer.begin();
        debug!(seq = ticket.seq(), %fingerprint, "issuing query");

        match self.source.fetch_envelope(&self.entity_path, &query).await {
            Ok(envelope) => match self.sequencer.accept(ticket, envelope) {
                Some(envelope) => Ok(LoadOutcome::Loaded(normalize_response(envelope))),
                None => {
                    debug!(seq = ticket.seq(), "discarding stale response");
                    Ok(LoadOutcome::Superseded)
                }
            },
            Err(e) if self.sequencer.is_current(ticket) => {
                // a retry of the same query must reach the server
                self.coalescer.reset();
                Err(e)
            }
            Err(e) => {
                debug!(seq = ticket.seq(), error = %e, "discarding stale failure");
                Ok(LoadOutcome::Superseded)
            }
        }
    }
}
