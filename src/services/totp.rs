use std::time::{SystemTime, UNIX_EPOCH};
use totp_rs::{Algorithm, Secret, TOTP};

const DIGITS: usize = 6;
/// Accept codes one step either side of now
const SKEW: u8 = 1;
const STEP_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error("invalid TOTP secret: {0}")]
    Secret(String),

    #[error("failed to build TOTP: {0}")]
    Setup(String),

    #[error("failed to render QR code: {0}")]
    QrCode(String),

    #[error("system clock error: {0}")]
    Clock(String),
}

/// Material handed to the user when they start 2FA enrollment.
#[derive(Debug, Clone)]
pub struct TotpEnrollment {
    /// Base32 secret for manual entry
    pub secret: String,
    /// `otpauth://totp/...` provisioning URI
    pub otpauth_url: String,
    /// PNG of the provisioning URI as a `data:` URI
    pub qr_code: String,
}

#[derive(Debug, Clone)]
pub struct TotpService {
    issuer: String,
}

impl TotpService {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }

    pub fn enroll(&self, account_name: &str) -> Result<TotpEnrollment, TotpError> {
        let secret = Secret::generate_secret()
            .to_bytes()
            .map_err(|e| TotpError::Secret(format!("{:?}", e)))?;

        // otpauth labels use ':' to split issuer from account
        let totp = TOTP::new(
            Algorithm::SHA1,
            DIGITS,
            SKEW,
            STEP_SECS,
            secret,
            Some(self.issuer.replace(':', "")),
            account_name.replace(':', ""),
        )
        .map_err(|e| TotpError::Setup(format!("{:?}", e)))?;

        let qr_base64 = totp.get_qr_base64().map_err(TotpError::QrCode)?;

        Ok(TotpEnrollment {
            secret: totp.get_secret_base32(),
            otpauth_url: totp.get_url(),
            qr_code: format!("data:image/png;base64,{}", qr_base64),
        })
    }

    /// Check `code` against the current time step of `secret_base32`.
    pub fn verify(&self, secret_base32: &str, code: &str) -> Result<bool, TotpError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TotpError::Clock(e.to_string()))?
            .as_secs();
        self.verify_at(secret_base32, code, now)
    }

    /// Check `code` as of unix time `time`, allowing `SKEW` steps of drift.
    pub fn verify_at(&self, secret_base32: &str, code: &str, time: u64) -> Result<bool, TotpError> {
        let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();
        if code.len() != DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
            return Ok(false);
        }

        let totp = Self::from_secret(secret_base32)?;
        Ok(totp.check(&code, time))
    }

    fn from_secret(secret_base32: &str) -> Result<TOTP, TotpError> {
        let bytes = Secret::Encoded(secret_base32.to_string())
            .to_bytes()
            .map_err(|e| TotpError::Secret(format!("{:?}", e)))?;

        TOTP::new(Algorithm::SHA1, DIGITS, SKEW, STEP_SECS, bytes, None, String::new())
            .map_err(|e| TotpError::Setup(format!("{:?}", e)))
    }
}
