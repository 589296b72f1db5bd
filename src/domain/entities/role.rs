//! Principal role.

use serde::{Deserialize, Serialize};

/// Role carried by an authenticated principal.
///
/// The backend sends roles as free strings; anything that is not one of the
/// known roles becomes [`Role::None`] at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    /// Patient account.
    Patient,
    /// Clinic staff account.
    Staff,
    /// Administrator account.
    Admin,
    /// Unrecognised or missing role.
    #[default]
    None,
}

impl Role {
    /// Roles that own a dashboard.
    pub const WITH_DASHBOARD: [Self; 3] = [Self::Patient, Self::Staff, Self::Admin];

    /// Parses a wire role string, case-insensitively.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "patient" => Self::Patient,
            "staff" => Self::Staff,
            "admin" => Self::Admin,
            _ => Self::None,
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::None => "none",
        }
    }

    /// Returns a capitalised label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Staff => "Staff",
            Self::Admin => "Admin",
            Self::None => "Guest",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from_wire(value)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("patient", Role::Patient ; "patient")]
    #[test_case("STAFF", Role::Staff ; "uppercase staff")]
    #[test_case(" admin ", Role::Admin ; "padded admin")]
    #[test_case("doctor", Role::None ; "unknown role")]
    #[test_case("", Role::None ; "empty role")]
    fn test_from_wire(input: &str, expected: Role) {
        assert_eq!(Role::from_wire(input), expected);
    }

    #[test]
    fn test_deserialize_unknown_role_is_none() {
        let role: Role = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(role, Role::None);
    }

    #[test]
    fn test_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
    }
}
