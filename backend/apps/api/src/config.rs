//! Environment Configuration
//!
//! Everything the binary reads from the environment, parsed once at startup.
//! Secrets are Base64 (standard alphabet) encodings of 32 bytes. Debug builds
//! fall back to random secrets; release builds refuse to start without them.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use platform::crypto::{random_secret, secret_from_base64};
use platform::secret::HashedPin;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// The two admin PIN hashes, when admin routes are enabled
pub struct AdminPins {
    pub pin1: HashedPin,
    pub pin2: HashedPin,
}

pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub access_grant_secret: [u8; 32],
    pub pin_secret: [u8; 32],
    pub admin_token_secret: [u8; 32],
    pub certificate_secret: [u8; 32],
    pub admin_pins: Option<AdminPins>,
    pub catalog_path: Option<PathBuf>,
    pub frontend_origins: Vec<String>,
    /// Key rate limits on the proxy-appended `X-Forwarded-For` entry
    pub trust_forwarded_for: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let debug = cfg!(debug_assertions);

        let bind_addr = var("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:31113")?;

        Ok(Self {
            bind_addr,
            database_url: var("DATABASE_URL"),
            access_grant_secret: parse_secret(
                "ACCESS_GRANT_SECRET",
                var("ACCESS_GRANT_SECRET"),
                debug,
            )?,
            pin_secret: parse_secret("PIN_DIGEST_SECRET", var("PIN_DIGEST_SECRET"), debug)?,
            admin_token_secret: parse_secret("ADMIN_TOKEN_SECRET", var("ADMIN_TOKEN_SECRET"), debug)?,
            certificate_secret: parse_secret("CERTIFICATE_SECRET", var("CERTIFICATE_SECRET"), debug)?,
            admin_pins: admin_pins(debug)?,
            catalog_path: var("COURSE_CATALOG_PATH").map(PathBuf::from),
            frontend_origins: parse_origins(
                var("FRONTEND_ORIGINS")
                    .as_deref()
                    .unwrap_or(DEFAULT_FRONTEND_ORIGINS),
            ),
            trust_forwarded_for: parse_flag("TRUST_FORWARDED_FOR", var("TRUST_FORWARDED_FOR"))?,
        })
    }
}

/// Non-empty environment variable
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_secret(name: &str, value: Option<String>, debug: bool) -> anyhow::Result<[u8; 32]> {
    match value {
        Some(encoded) => secret_from_base64(&encoded)
            .with_context(|| format!("{name} must be Base64 of exactly 32 bytes")),
        None if debug => {
            tracing::warn!(variable = name, "Secret not set, using a random one");
            Ok(random_secret())
        }
        None => bail!("{name} must be set in production"),
    }
}

fn parse_flag(name: &str, value: Option<String>) -> anyhow::Result<bool> {
    match value.as_deref().map(str::trim) {
        None => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some("0") | Some("false") => Ok(false),
        Some(other) => bail!("{name} must be true or false, got {other:?}"),
    }
}

fn admin_pins(debug: bool) -> anyhow::Result<Option<AdminPins>> {
    if let (Some(pin1), Some(pin2)) = (var("ADMIN_PIN1_HASH"), var("ADMIN_PIN2_HASH")) {
        return Ok(Some(AdminPins {
            pin1: HashedPin::from_phc_string(pin1).context("ADMIN_PIN1_HASH is not a PHC string")?,
            pin2: HashedPin::from_phc_string(pin2).context("ADMIN_PIN2_HASH is not a PHC string")?,
        }));
    }

    if debug {
        if let (Some(pin1), Some(pin2)) = (var("ADMIN_PIN1"), var("ADMIN_PIN2")) {
            let config = admin::AdminConfig::development(&pin1, &pin2)
                .map_err(|e| anyhow::anyhow!("ADMIN_PIN1/ADMIN_PIN2: {e}"))?;
            return Ok(Some(AdminPins {
                pin1: config.pin1,
                pin2: config.pin2,
            }));
        }
    }

    Ok(None)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
