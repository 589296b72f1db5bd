//! Field-level validation errors.

use std::fmt;

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum FormField {
    Identifier,
    FirstName,
    LastName,
    Phone,
    Password,
    ConfirmPassword,
    IdType,
    IdNumber,
    Department,
    Date,
    Time,
}

impl FormField {
    /// Returns the field label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Phone => "Phone number",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::IdType => "ID type",
            Self::IdNumber => "ID number",
            Self::Department => "Department",
            Self::Date => "Date",
            Self::Time => "Time",
        }
    }

    /// Standard "is required" message for this field.
    #[must_use]
    pub fn required_message(self) -> String {
        format!("{} is required", self.label())
    }
}

/// A single field error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the message belongs to.
    pub field: FormField,
    /// Text shown under the field.
    pub message: String,
}

impl FieldError {
    /// Error for `field` with a custom message.
    #[must_use]
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Creates the standard "is required" error.
    #[must_use]
    pub fn required(field: FormField) -> Self {
        Self::new(field, field.required_message())
    }
}

/// Ordered collection of field errors; at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// No errors.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records an error unless the field already has one.
    pub fn push(&mut self, error: FieldError) {
        if self.get(error.field).is_none() {
            self.errors.push(error);
        }
    }

    /// Returns the message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.get(field).is_some()
    }

    /// Error of the earliest failing field, for focusing it.
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Removes the error recorded for `field`.
    pub fn clear_field(&mut self, field: FormField) {
        self.errors.retain(|e| e.field != field);
    }

    /// Errors in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `Ok(value)` when no errors were recorded.
    ///
    /// # Errors
    /// Returns `self` when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.errors.iter().map(|e| e.field.label()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_error_per_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required(FormField::IdNumber));
        errors.push(FieldError::new(FormField::IdNumber, "second"));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::IdNumber), Some("ID number is required"));
    }

    #[test]
    fn test_clear_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required(FormField::Date));
        errors.clear_field(FormField::Date);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(5), Ok(5));

        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required(FormField::Time));
        assert!(errors.into_result(5).is_err());
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required(FormField::FirstName));
        errors.push(FieldError::required(FormField::Department));
        assert_eq!(errors.to_string(), "invalid fields: First name, Department");
    }
}
