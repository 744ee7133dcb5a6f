//! Route handlers: gate endpoints plus the demo downstream handlers that
//! stand in for the application's business logic.

pub mod csrf_token;
pub mod errors;
pub mod health;
pub mod profile;
pub mod root;
pub mod upload;
