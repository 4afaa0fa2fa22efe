//! HTTP client construction policy for Zotero requests.
//!
//! Per-request timeouts are set by the caller; this builder only fixes the
//! connect timeout, user-agent, compression and proxy handling.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use super::ZoteroError;
use crate::user_agent;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds the shared reqwest client for a [`super::ZoteroClient`].
///
/// Redirects are followed with reqwest's default policy; file downloads are
/// served from a separate storage host behind a redirect.
///
/// # Errors
///
/// Returns [`ZoteroError::Client`] when client construction fails.
pub(crate) fn build_zotero_http_client() -> Result<Client, ZoteroError> {
    match try_build_client(false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic while reading system
            // proxy settings; retry with env-only proxy discovery.
            warn!("Zotero client hit system proxy panic; using env-proxy fallback builder");
            match try_build_client(true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(ZoteroError::Client(
                    "HTTP client construction panicked while reading proxy settings".to_string(),
                )),
                Err(BuildClientFailure::Build(error)) => {
                    Err(ZoteroError::Client(error.to_string()))
                }
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(ZoteroError::Client(error.to_string())),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(disable_system_proxy_lookup: bool) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder();
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder() -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(user_agent::default_api_user_agent())
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

/// Environment variables consulted for a scheme's proxy, in priority order.
fn proxy_env_vars(scheme: &str) -> &'static [&'static str] {
    match scheme {
        "https" => &["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"],
        "http" => &["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"],
        _ => &[],
    }
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    proxy_env_vars(scheme).iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_zotero_http_client_succeeds() {
        assert!(build_zotero_http_client().is_ok());
    }

    #[test]
    fn test_proxy_env_vars_cover_both_schemes() {
        assert_eq!(
            proxy_env_vars("https"),
            ["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]
        );
        assert_eq!(
            proxy_env_vars("http"),
            ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]
        );
        assert!(proxy_env_vars("ftp").is_empty());
    }

    #[test]
    fn test_env_fallback_builder_builds() {
        let builder = apply_env_proxy_fallback(base_builder().no_proxy());
        assert!(builder.build().is_ok());
    }
}
