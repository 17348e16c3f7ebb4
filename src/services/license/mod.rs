//! License state: what this instance is entitled to, and whether it has
//! dropped into the grace period or read-only mode.

pub mod evaluation;
pub mod manager;
pub mod types;
pub mod validator;

pub use evaluation::{evaluate, Evaluation, LicensePolicy};
pub use manager::LicenseManager;
pub use types::{
    LicenseError, LicenseGrant, LicenseInfo, LicenseStatus, LicenseStatusReport, LicenseTier,
};
pub use validator::{HttpLicenseValidator, LicenseValidator};
