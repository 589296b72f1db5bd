//! Identity documents accepted for registration and booking.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13}$").expect("valid national id pattern"));
static PASSPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6,12}$").expect("valid passport pattern"));
static FILE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{4,20}$").expect("valid file number pattern"));

/// Kind of identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdentityType {
    /// 13-digit South African ID number.
    #[default]
    #[serde(rename = "id")]
    NationalId,
    /// Passport number.
    #[serde(rename = "passport")]
    Passport,
    /// Hospital file number.
    #[serde(rename = "file")]
    FileNumber,
}

impl IdentityType {
    /// All document kinds in display order.
    pub const ALL: [Self; 3] = [Self::NationalId, Self::Passport, Self::FileNumber];

    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NationalId => "id",
            Self::Passport => "passport",
            Self::FileNumber => "file",
        }
    }

    /// Parses a wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Returns the field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NationalId => "ID Number",
            Self::Passport => "Passport Number",
            Self::FileNumber => "File Number",
        }
    }

    /// Returns the input placeholder.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::NationalId => "Enter 13-digit ID number",
            Self::Passport => "Enter passport number",
            Self::FileNumber => "Enter file number",
        }
    }

    /// Maximum number of characters kept by [`IdentityType::normalize`].
    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            Self::NationalId => 13,
            Self::Passport => 12,
            Self::FileNumber => 20,
        }
    }

    /// Returns whether `number` matches this document's format.
    #[must_use]
    pub fn is_valid(self, number: &str) -> bool {
        let pattern = match self {
            Self::NationalId => &*NATIONAL_ID_RE,
            Self::Passport => &*PASSPORT_RE,
            Self::FileNumber => &*FILE_NUMBER_RE,
        };
        pattern.is_match(number)
    }

    /// Normalises raw keyboard input for this document kind.
    ///
    /// National IDs keep digits only; passports and file numbers keep
    /// uppercased ASCII alphanumerics. The result is truncated to
    /// [`IdentityType::max_len`].
    #[must_use]
    pub fn normalize(self, raw: &str) -> String {
        let kept: Box<dyn Iterator<Item = char>> = match self {
            Self::NationalId => Box::new(raw.chars().filter(char::is_ascii_digit)),
            Self::Passport | Self::FileNumber => Box::new(
                raw.chars()
                    .map(|c| c.to_ascii_uppercase())
                    .filter(char::is_ascii_alphanumeric),
            ),
        };
        kept.take(self.max_len()).collect()
    }

    /// Returns the validation message shown for a malformed number.
    #[must_use]
    pub fn invalid_message(self) -> String {
        match self {
            Self::NationalId => {
                "Please enter a valid 13-digit South African ID number".to_string()
            }
            _ => format!("Please enter a valid {}", self.label().to_lowercase()),
        }
    }
}

impl std::fmt::Display for IdentityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed identity document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    kind: IdentityType,
    number: String,
}

impl IdentityDocument {
    /// Creates a document if `number` is valid for `kind`.
    #[must_use]
    pub fn new(kind: IdentityType, number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        kind.is_valid(&number).then_some(Self { kind, number })
    }

    /// Returns the document kind.
    #[must_use]
    pub const fn kind(&self) -> IdentityType {
        self.kind
    }

    /// Returns the document number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }
}
