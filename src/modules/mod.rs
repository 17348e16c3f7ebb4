pub mod auth;
pub mod extract;
pub mod license;
pub mod two_factor;
