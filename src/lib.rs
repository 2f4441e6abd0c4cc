pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod models;
pub mod session;

pub use error::{ApiError, ApiResult};
pub use filter::{filter, FilterSpec, Selection};
pub use models::{Category, Condition, Listing, Variant};
pub use session::{Role, SessionContext};
