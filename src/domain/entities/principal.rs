//! Authenticated principal.

use serde::{Deserialize, Serialize};

use super::{IdentityType, Role};

/// Identity of a signed-in user as reported by the authentication service.
///
/// Also serves as the principal snapshot persisted next to the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(default)]
    id: Option<i64>,
    identifier: String,
    #[serde(default)]
    identifier_type: Option<IdentityType>,
    #[serde(default, deserialize_with = "crate::domain::serde_utils::null_as_default")]
    first_name: String,
    #[serde(default, deserialize_with = "crate::domain::serde_utils::null_as_default")]
    last_name: String,
    #[serde(default, deserialize_with = "crate::domain::serde_utils::null_as_default")]
    phone: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, deserialize_with = "crate::domain::serde_utils::null_as_default")]
    role: Role,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Principal {
    /// Creates a principal with the mandatory fields.
    #[must_use]
    pub fn new(identifier: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            identifier_type: None,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            email: None,
            role,
            language: default_language(),
        }
    }

    /// Sets the backend id.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the identity document kind.
    #[must_use]
    pub const fn with_identifier_type(mut self, kind: IdentityType) -> Self {
        self.identifier_type = Some(kind);
        self
    }

    /// Sets contact details.
    #[must_use]
    pub fn with_contact(mut self, phone: impl Into<String>, email: Option<String>) -> Self {
        self.phone = phone.into();
        self.email = email;
        self
    }

    /// Sets the preferred language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Numeric account id from the backend.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// Id or passport number used to sign in.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Kind of identity document behind the identifier.
    #[must_use]
    pub const fn identifier_type(&self) -> Option<IdentityType> {
        self.identifier_type
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Contact number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Email, when one was given.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Role that decides the dashboard.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Preferred language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns "first last", falling back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.identifier.clone()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_full_name() {
        let principal = Principal::new("8001015009087", Role::Patient).with_name("Thandi", "Mokoena");
        assert_eq!(principal.display_name(), "Thandi Mokoena");
    }

    #[test]
    fn test_display_name_falls_back_to_identifier() {
        let principal = Principal::new("ST-0042", Role::Staff);
        assert_eq!(principal.display_name(), "ST-0042");
    }

    #[test]
    fn test_parse_backend_user() {
        let json = r#"{
            "id": 7,
            "identifier": "8001015009087",
            "identifier_type": "id",
            "first_name": "Thandi",
            "last_name": "Mokoena",
            "phone": "0821234567",
            "email": null,
            "role": "patient",
            "language": "isiZulu"
        }"#;

        let principal: Principal = serde_json::from_str(json).unwrap();

        assert_eq!(principal.id(), Some(7));
        assert_eq!(principal.role(), Role::Patient);
        assert_eq!(principal.identifier_type(), Some(IdentityType::NationalId));
        assert_eq!(principal.language(), "isiZulu");
    }

    #[test]
    fn test_parse_minimal_user_defaults() {
        let principal: Principal =
            serde_json::from_str(r#"{"identifier": "x", "role": "nurse"}"#).unwrap();

        assert_eq!(principal.role(), Role::None);
        assert_eq!(principal.language(), "en");
        assert!(principal.email().is_none());
    }
}
