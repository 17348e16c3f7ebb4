use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::types::{LicenseError, LicenseGrant};

const PRODUCT: &str = "postbox";
const MAX_ERROR_BODY: usize = 200;

#[async_trait]
pub trait LicenseValidator: Send + Sync {
    /// Ask the license authority what `license_key` entitles this instance to.
    /// A key the server answers for but refuses comes back as a grant with
    /// `valid == false`; only transport and protocol failures are errors.
    async fn validate(&self, license_key: &str) -> Result<LicenseGrant, LicenseError>;
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    license_key: &'a str,
    product: &'static str,
    version: &'static str,
}

/// Validates keys against the remote license server over HTTPS.
#[derive(Clone)]
pub struct HttpLicenseValidator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLicenseValidator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LicenseError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LicenseError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn validate_url(&self) -> String {
        format!("{}/validate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LicenseValidator for HttpLicenseValidator {
    async fn validate(&self, license_key: &str) -> Result<LicenseGrant, LicenseError> {
        let response = self
            .client
            .post(self.validate_url())
            .json(&ValidateRequest {
                license_key,
                product: PRODUCT,
                version: env!("CARGO_PKG_VERSION"),
            })
            .send()
            .await
            .map_err(|e| LicenseError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
            return Err(LicenseError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<LicenseGrant>()
            .await
            .map_err(|e| LicenseError::InvalidResponse(e.to_string()))
    }
}
