//! Library identity: which Zotero library to talk to, and with which key.

use std::fmt;

use super::ZoteroError;

/// Whether a library belongs to a single user or to a shared group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryScope {
    /// A user's personal library (`/users/{id}`).
    Personal,
    /// A group library (`/groups/{id}`).
    Group,
}

impl LibraryScope {
    /// URL path prefix used by the Zotero API.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Personal => "users",
            Self::Group => "groups",
        }
    }
}

impl fmt::Display for LibraryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// Validated credentials for one Zotero library.
///
/// Exactly one of a user id or a group id must be supplied. Empty strings
/// count as absent.
#[derive(Clone, PartialEq, Eq)]
pub struct LibraryIdentity {
    api_key: String,
    scope: LibraryScope,
    library_id: String,
}

impl LibraryIdentity {
    /// Builds an identity from an API key and one library id.
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError::Config`] when the key is empty, when neither id
    /// is given, or when both are.
    pub fn new(
        api_key: impl Into<String>,
        user_id: Option<String>,
        group_id: Option<String>,
    ) -> Result<Self, ZoteroError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ZoteroError::config("Zotero API key is required"));
        }

        let user_id = non_empty(user_id);
        let group_id = non_empty(group_id);

        let (scope, library_id) = match (user_id, group_id) {
            (Some(user), None) => (LibraryScope::Personal, user),
            (None, Some(group)) => (LibraryScope::Group, group),
            (None, None) => {
                return Err(ZoteroError::config(
                    "either a user id or a group id must be provided",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(ZoteroError::config(
                    "cannot specify both a user id and a group id",
                ));
            }
        };

        Ok(Self {
            api_key,
            scope,
            library_id,
        })
    }

    /// Shorthand for a personal library.
    ///
    /// # Errors
    ///
    /// See [`LibraryIdentity::new`].
    pub fn personal(
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, ZoteroError> {
        Self::new(api_key, Some(user_id.into()), None)
    }

    /// Shorthand for a group library.
    ///
    /// # Errors
    ///
    /// See [`LibraryIdentity::new`].
    pub fn group(
        api_key: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Result<Self, ZoteroError> {
        Self::new(api_key, None, Some(group_id.into()))
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn scope(&self) -> LibraryScope {
        self.scope
    }

    #[must_use]
    pub fn library_id(&self) -> &str {
        &self.library_id
    }
}

impl fmt::Debug for LibraryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryIdentity")
            .field("api_key", &"<redacted>")
            .field("scope", &self.scope)
            .field("library_id", &self.library_id)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_personal_library() {
        let identity = LibraryIdentity::new("key", Some("123".to_string()), None).unwrap();
        assert_eq!(identity.scope(), LibraryScope::Personal);
        assert_eq!(identity.library_id(), "123");
        assert_eq!(identity.scope().path_segment(), "users");
    }

    #[test]
    fn test_identity_group_library() {
        let identity = LibraryIdentity::group("key", "987").unwrap();
        assert_eq!(identity.scope(), LibraryScope::Group);
        assert_eq!(identity.scope().path_segment(), "groups");
    }

    #[test]
    fn test_identity_requires_one_id() {
        let err = LibraryIdentity::new("key", None, None).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("either"));
    }

    #[test]
    fn test_identity_rejects_both_ids() {
        let err =
            LibraryIdentity::new("key", Some("1".to_string()), Some("2".to_string())).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_identity_empty_ids_count_as_absent() {
        let identity =
            LibraryIdentity::new("key", Some(String::new()), Some("42".to_string())).unwrap();
        assert_eq!(identity.scope(), LibraryScope::Group);

        let err = LibraryIdentity::new("key", Some("  ".to_string()), None).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_identity_requires_api_key() {
        let err = LibraryIdentity::personal("", "1").unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_identity_debug_redacts_key() {
        let identity = LibraryIdentity::personal("super-secret", "1").unwrap();
        let debug = format!("{identity:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
