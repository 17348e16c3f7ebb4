use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::RwLock, task::JoinHandle};

use super::evaluation::{evaluate, Evaluation, LicensePolicy};
use super::types::{LicenseError, LicenseGrant, LicenseInfo, LicenseStatusReport};
use super::validator::LicenseValidator;

#[derive(Debug, Clone)]
struct ValidatedLicense {
    grant: LicenseGrant,
    validated_at: DateTime<Utc>,
}

/// Process-wide license state.
///
/// Cloning is cheap; every clone shares the same cached validation.
/// Reads never touch the network. Only [`LicenseManager::initialize`],
/// [`LicenseManager::revalidate`] and the periodic task write the cache,
/// and a failed validation leaves the previous result in place.
#[derive(Clone)]
pub struct LicenseManager {
    license_key: Arc<str>,
    policy: LicensePolicy,
    validator: Arc<dyn LicenseValidator>,
    state: Arc<RwLock<Option<ValidatedLicense>>>,
}

impl LicenseManager {
    pub fn new(
        license_key: impl Into<String>,
        policy: LicensePolicy,
        validator: Arc<dyn LicenseValidator>,
    ) -> Self {
        Self {
            license_key: Arc::from(license_key.into()),
            policy,
            validator,
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// The key as configured, regardless of whether it validated.
    pub fn license_key(&self) -> &str {
        &self.license_key
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_some()
    }

    pub async fn last_validated_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.as_ref().map(|s| s.validated_at)
    }

    /// Startup validation. On failure the manager stays uninitialized.
    pub async fn initialize(&self) -> Result<(), LicenseError> {
        self.refresh().await
    }

    /// Validate again now and return the refreshed status.
    pub async fn revalidate(&self) -> Result<LicenseStatusReport, LicenseError> {
        self.refresh().await?;
        Ok(self.status().await)
    }

    pub async fn info(&self) -> Option<LicenseInfo> {
        let state = self.state.read().await;
        let validated = state.as_ref()?;
        let eval = evaluate(&validated.grant, &self.policy, Utc::now());
        let grant = &validated.grant;

        Some(LicenseInfo {
            valid: eval.valid(),
            customer_name: grant.customer_name.clone(),
            tier: grant.tier,
            max_subscribers: grant.max_subscribers,
            features: grant.features.clone(),
            expires_at: grant.expires_at,
            is_lifetime: grant.is_lifetime,
            grace_period: eval.grace_period(),
            days_remaining: eval.days_remaining,
            message: eval.warning.unwrap_or_else(|| grant.message.clone()),
        })
    }

    pub async fn status(&self) -> LicenseStatusReport {
        self.evaluation().await.report()
    }

    pub async fn is_read_only(&self) -> bool {
        self.evaluation().await.read_only()
    }

    async fn evaluation(&self) -> Evaluation {
        match self.state.read().await.as_ref() {
            Some(validated) => evaluate(&validated.grant, &self.policy, Utc::now()),
            None => Evaluation::not_initialized(),
        }
    }

    async fn refresh(&self) -> Result<(), LicenseError> {
        let grant = if self.license_key.is_empty() {
            LicenseGrant::free_tier()
        } else {
            self.validator.validate(&self.license_key).await?
        };

        if grant.valid {
            tracing::info!(
                tier = ?grant.tier,
                max_subscribers = grant.max_subscribers,
                expires_at = ?grant.expires_at,
                "license validated"
            );
        } else {
            tracing::warn!(reason = %grant.message, "license rejected by license server");
        }

        *self.state.write().await = Some(ValidatedLicense {
            grant,
            validated_at: Utc::now(),
        });
        Ok(())
    }

    /// Revalidate on a fixed interval in the background. Failures are
    /// logged and the last known state is kept.
    pub fn spawn_periodic_revalidation(&self, every: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // first tick completes immediately; startup already validated
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = manager.refresh().await {
                    tracing::warn!(error = %e, "periodic license revalidation failed");
                }
            }
        })
    }
}
