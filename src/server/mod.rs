//! HTTP API: dashboard statistics and Zotero collection listing.
//!
//! - [`create_router`] - Route table with request tracing
//! - [`serve`] - Runs the router on a bound listener until Ctrl-C
//! - [`AppState`] - Shared handler state
//! - [`ApiError`] - `{error, details}` JSON error responses

mod error;
mod handlers;
mod router;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{CollectionsResponse, DashboardQuery};
pub use router::{create_router, serve};
pub use state::AppState;
