//! Core of the parish calendar.
//!
//! - [`store::EventStore`] owns the event list and persists it across the
//!   remote store, the deploy snapshot and the local cache.
//! - [`grid::render_month`] turns a month of events into a view model.
//! - [`auth`] and [`session`] hold the admin gate and the ephemeral login
//!   session.

pub mod artifact;
pub mod auth;
pub mod collection;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod session;
pub mod store;
pub mod tier;

pub use collection::EventCollection;
pub use error::{CalError, CalResult, RemoteError};
pub use event::{Event, EventDraft, EventType};
