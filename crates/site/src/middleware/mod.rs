//! HTTP middleware for the site.

pub mod rate_limit;

pub use rate_limit::{api_rate_limiter, lead_rate_limiter};
