//! Shared User-Agent string for outbound API traffic.
//!
//! The Zotero API asks clients to identify themselves; keeping the format in
//! one place keeps the project URL and version consistent.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/nicksrandall/refshelf";

/// Default User-Agent for Zotero API and file download requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("refshelf/{version} (research-library-client; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_version_and_project_url() {
        let ua = default_api_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("refshelf/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }

    #[test]
    fn test_user_agent_identifies_as_library_client() {
        let ua = default_api_user_agent();
        assert!(
            ua.contains("research-library-client"),
            "UA must identify as research-library-client: {ua}"
        );
    }
}
