//! Gateway configuration
//!
//! All options come from the environment (with `.env` support via dotenvy).
//! Required: `BUCKET_NAME` and `UPSTREAM_ORIGIN`. Everything else has a
//! logged default.

use std::env;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

/// Runtime configuration for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind host for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Target bucket for the artifact store
    pub bucket: String,
    /// Static credentials for the store; default AWS provider chain when unset
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Origin uncached source assets are fetched from
    pub upstream_origin: String,
    /// Base URL stored artifacts are served from
    pub public_base_url: String,
    /// Lowercased extensions that qualify for conversion
    pub convertible_extensions: Vec<String>,
    /// Target compressed extension, without a leading dot
    pub target_extension: String,
    /// Capacity of the resolution cache
    pub cache_capacity: usize,
    /// Bound on a single upstream fetch
    pub fetch_timeout: Duration,
}

impl GatewayConfig {
    /// Load the configuration from the environment
    pub fn from_env() -> Result<Self> {
        let bucket = match env::var("BUCKET_NAME") {
            Ok(bucket) if !bucket.is_empty() => bucket,
            _ => bail!("BUCKET_NAME must be set"),
        };

        let upstream_origin = match env::var("UPSTREAM_ORIGIN") {
            Ok(origin) if !origin.is_empty() => origin,
            _ => bail!("UPSTREAM_ORIGIN must be set"),
        };

        let public_base_url = env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| {
            let url = format!("https://{}.s3.amazonaws.com", bucket);
            info!(url = %url, "PUBLIC_BASE_URL not set, using bucket endpoint");
            url
        });

        let convertible_extensions = env::var("CONVERTIBLE_EXTENSIONS")
            .map(|raw| parse_extensions(&raw))
            .unwrap_or_else(|_| default_convertible_extensions());
        if convertible_extensions.is_empty() {
            bail!("CONVERTIBLE_EXTENSIONS must name at least one extension");
        }

        let target_extension = env::var("TARGET_EXTENSION")
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .unwrap_or_else(|_| "webp".to_string());

        let cache_capacity = parse_var("CACHE_CAPACITY", 10_000)?;
        let fetch_timeout = Duration::from_secs(parse_var("FETCH_TIMEOUT_SECS", 10)?);

        let host = env::var("RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("RELAY_PORT", 3000)?;

        Ok(Self {
            host,
            port,
            bucket,
            access_key_id: env::var("ACCESS_KEY_ID").ok().filter(|v| !v.is_empty()),
            secret_access_key: env::var("SECRET_ACCESS_KEY").ok().filter(|v| !v.is_empty()),
            upstream_origin,
            public_base_url,
            convertible_extensions,
            target_extension,
            cache_capacity,
            fetch_timeout,
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_convertible_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "bmp", "tiff"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Parse a comma-separated extension list, normalizing case and dots
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Ok(value),
            Err(err) => bail!("Invalid {}: {}", name, err),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions_normalizes_case_and_dots() {
        assert_eq!(
            parse_extensions("JPG, .jpeg,png"),
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
        );
    }

    #[test]
    fn test_parse_extensions_drops_empty_entries() {
        assert_eq!(parse_extensions("jpg,,  ,png"), vec!["jpg", "png"]);
    }

    #[test]
    fn test_default_convertible_extensions_are_raster_formats() {
        let defaults = default_convertible_extensions();
        assert!(defaults.contains(&"jpg".to_string()));
        assert!(defaults.contains(&"png".to_string()));
        assert!(!defaults.contains(&"webp".to_string()));
        assert!(!defaults.contains(&"css".to_string()));
    }
}
