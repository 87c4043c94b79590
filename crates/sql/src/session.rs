//! Session context passed along with every statement

use crate::metadata::ident::DEFAULT_SCHEMA_NAME;

/// Per-session state the analyzer reads: the schema unqualified names
/// resolve into, and who is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    default_schema: String,
    user: Option<String>,
}

impl SessionContext {
    pub fn new(default_schema: impl Into<String>, user: Option<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
            user,
        }
    }

    /// The internal session: default schema, no user.
    pub fn system() -> Self {
        Self::new(DEFAULT_SCHEMA_NAME, None)
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_session_has_no_user() {
        let session = SessionContext::default();
        assert_eq!(session.default_schema(), "doc");
        assert_eq!(session.user(), None);

        let session = SessionContext::new("custom", Some("crate".into()));
        assert_eq!(session.default_schema(), "custom");
        assert_eq!(session.user(), Some("crate"));
    }
}
