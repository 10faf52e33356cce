use anyhow::Context;
use serde::Deserialize;

/// Upper bound for `VERIFICATION_TOKEN_TTL_HOURS` (ten years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Front-end origin used to build verification links.
    pub base_url: String,
    pub session: SessionConfig,
    pub smtp: SmtpConfig,
    /// Unset means verification tokens never expire.
    pub verification_token_ttl_hours: Option<i64>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let base_url = std::env::var("BASE_URL")
            .context("BASE_URL")?
            .trim_end_matches('/')
            .to_string();

        let session = SessionConfig {
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            secure_cookie: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        let username = std::env::var("SMTP_USER").context("SMTP_USER")?;
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").context("SMTP_HOST")?,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(465),
            password: std::env::var("SMTP_PASSWORD").context("SMTP_PASSWORD")?,
            from: std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone()),
            username,
        };

        let verification_token_ttl_hours =
            parse_token_ttl_hours(std::env::var("VERIFICATION_TOKEN_TTL_HOURS").ok().as_deref())?;

        Ok(Self {
            database_url,
            base_url,
            session,
            smtp,
            verification_token_ttl_hours,
        })
    }

    pub fn verification_token_ttl(&self) -> Option<time::Duration> {
        self.verification_token_ttl_hours
            .map(|h| time::Duration::seconds(h.saturating_mul(3600)))
    }
}

/// Blank or non-positive disables expiry; anything above the cap is rejected.
fn parse_token_ttl_hours(raw: Option<&str>) -> anyhow::Result<Option<i64>> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let hours: i64 = raw
        .parse()
        .with_context(|| format!("VERIFICATION_TOKEN_TTL_HOURS is not a number: {raw}"))?;
    if hours <= 0 {
        return Ok(None);
    }
    anyhow::ensure!(
        hours <= MAX_TOKEN_TTL_HOURS,
        "VERIFICATION_TOKEN_TTL_HOURS must be at most {MAX_TOKEN_TTL_HOURS}, got {hours}"
    );
    Ok(Some(hours))
}
