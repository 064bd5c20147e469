//! griv-core: Core library for the griv grievance tracker
//!
//! Provides the grievance data model, the session store with citizen and
//! tracking-code indices, the lifecycle engine that records status changes
//! on an append-only timeline, and the analytics fold behind the admin
//! dashboard. Records persist as JSONL in .griv/ - no database, no daemon.

pub mod analytics;
pub mod config;
pub mod error;
pub mod grievance;
pub mod lifecycle;
pub mod store;
pub mod tracking;

pub use analytics::{Stats, compute_stats};
pub use config::Config;
pub use error::Error;
pub use grievance::{Category, Grievance, Location, NewGrievance, Priority, Status, TimelineEvent};
pub use lifecycle::{add_remark, apply_status_change};
pub use store::{GrievancePatch, GrievanceStore};
pub use tracking::generate_id;

/// Result type for griv operations
pub type Result<T> = std::result::Result<T, Error>;
