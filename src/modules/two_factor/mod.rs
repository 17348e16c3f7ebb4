//! TOTP second factor: setup, verification, disable and status.

pub mod controller;
pub mod routes;
pub mod schema;

pub use routes::two_factor_routes;
