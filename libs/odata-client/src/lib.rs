//! OData collection client for table views
//!
//! [`ODataClient`] fetches pages over HTTP; [`TableQueryController`] drives
//! one table: debouncing input, skipping repeated queries and dropping
//! responses that arrive after a newer request was issued.

pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod sequence;
pub mod source;

pub use client::ODataClient;
pub use config::ClientConfig;
pub use controller::{LoadOutcome, TableQueryController};
pub use debounce::Debouncer;
pub use error::ClientError;
pub use sequence::{QueryCoalescer, RequestSequencer, RequestTicket};
pub use source::PageSource;
