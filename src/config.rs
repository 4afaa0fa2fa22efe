//! Configuration shared by the server and CLI entry points.
//!
//! Values come from command-line flags with environment-variable fallbacks.
//! Library components receive the parsed values; they never read the
//! environment themselves.

use clap::Args;

use crate::stats::StatsConfig;
use crate::zotero::{LibraryIdentity, ZoteroClient, ZoteroError};

/// Parses a feature-flag value: only a case-insensitive `true` enables.
///
/// # Errors
///
/// Never fails; the `Result` matches clap's value-parser signature.
pub fn parse_feature_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

/// Dashboard feature switches.
#[derive(Debug, Clone, Args)]
pub struct FeatureSettings {
    /// Compute project and task statistics ("true" to enable)
    #[arg(
        long = "projects-enabled",
        env = "PROJECTS_ENABLED",
        default_value = "true",
        action = clap::ArgAction::Set,
        value_parser = parse_feature_flag
    )]
    pub projects_enabled: bool,
}

impl FeatureSettings {
    #[must_use]
    pub fn stats_config(&self) -> StatsConfig {
        StatsConfig {
            projects_enabled: self.projects_enabled,
        }
    }
}

/// Zotero credentials.
#[derive(Clone, Default, Args)]
pub struct ZoteroSettings {
    /// Zotero API key
    #[arg(long, env = "ZOTERO_API_KEY", hide_env_values = true)]
    pub zotero_api_key: Option<String>,

    /// Zotero user library id (mutually exclusive with --zotero-group-id)
    #[arg(long, env = "ZOTERO_USER_ID")]
    pub zotero_user_id: Option<String>,

    /// Zotero group library id (mutually exclusive with --zotero-user-id)
    #[arg(long, env = "ZOTERO_GROUP_ID")]
    pub zotero_group_id: Option<String>,
}

impl std::fmt::Debug for ZoteroSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroSettings")
            .field(
                "zotero_api_key",
                &self.zotero_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("zotero_user_id", &self.zotero_user_id)
            .field("zotero_group_id", &self.zotero_group_id)
            .finish()
    }
}

impl ZoteroSettings {
    /// True when any Zotero credential was supplied.
    #[must_use]
    pub fn is_present(&self) -> bool {
        [
            &self.zotero_api_key,
            &self.zotero_user_id,
            &self.zotero_group_id,
        ]
        .iter()
        .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Validates the settings into a [`LibraryIdentity`].
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError::Config`] for a missing key or an invalid id combination.
    pub fn identity(&self) -> Result<LibraryIdentity, ZoteroError> {
        LibraryIdentity::new(
            self.zotero_api_key.clone().unwrap_or_default(),
            self.zotero_user_id.clone(),
            self.zotero_group_id.clone(),
        )
    }

    /// Builds a client against the public Zotero API.
    ///
    /// # Errors
    ///
    /// See [`ZoteroSettings::identity`] and [`ZoteroClient::new`].
    pub fn client(&self) -> Result<ZoteroClient, ZoteroError> {
        ZoteroClient::new(self.identity()?)
    }
}
