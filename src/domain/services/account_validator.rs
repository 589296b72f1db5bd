//! Sign-in and registration form validation.

use crate::domain::entities::{IdentityType, Role, resolve_language};
use crate::domain::errors::{FieldError, FormField, ValidationErrors};
use crate::domain::ports::{Credentials, RegistrationRequest};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RegistrationForm {
    pub identifier_type: IdentityType,
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub language: String,
}

/// Validates sign-in and registration input.
pub struct AccountValidator;

impl AccountValidator {
    /// Checks that both sign-in fields are filled.
    ///
    /// # Errors
    /// Returns a required-field error for each blank field.
    pub fn credentials(identifier: &str, password: &str) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let identifier = identifier.trim();
        if identifier.is_empty() {
            errors.push(FieldError::required(FormField::Identifier));
        }
        if password.is_empty() {
            errors.push(FieldError::required(FormField::Password));
        }
        errors.into_result(Credentials::new(identifier, password))
    }

    /// Validates a patient registration.
    ///
    /// Checks run in order: identifier format, required profile fields,
    /// password confirmation, password length.
    ///
    /// # Errors
    /// Returns every failing field, in check order.
    pub fn registration(form: &RegistrationForm) -> Result<RegistrationRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let kind = form.identifier_type;

        let identifier = form.identifier.trim();
        if identifier.is_empty() {
            errors.push(FieldError::required(FormField::Identifier));
        } else if !kind.is_valid(identifier) {
            errors.push(FieldError::new(FormField::Identifier, kind.invalid_message()));
        }

        for (field, value) in [
            (FormField::FirstName, &form.first_name),
            (FormField::LastName, &form.last_name),
            (FormField::Phone, &form.phone),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::required(field));
            }
        }

        if form.password != form.confirm_password {
            errors.push(FieldError::new(
                FormField::ConfirmPassword,
                "Passwords do not match",
            ));
        }

        if form.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                FormField::Password,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
            ));
        }

        errors.into_result(RegistrationRequest {
            identifier: identifier.to_string(),
            identifier_type: kind,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            password: form.password.clone(),
            role: Role::Patient,
            language: resolve_language(&form.language).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn form() -> RegistrationForm {
        RegistrationForm {
            identifier_type: IdentityType::NationalId,
            identifier: "8001015009087".to_string(),
            first_name: "Thandi".to_string(),
            last_name: "Mokoena".to_string(),
            phone: "0821234567".to_string(),
            email: String::new(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            language: "isiZulu".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let request = AccountValidator::registration(&form()).unwrap();
        assert_eq!(request.identifier, "8001015009087");
        assert_eq!(request.role, Role::Patient);
        assert_eq!(request.language, "isiZulu");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let mut form = form();
        form.language = "Klingon".to_string();
        assert_eq!(AccountValidator::registration(&form).unwrap().language, "English");
    }

    #[test_case("800101500908" ; "twelve digits")]
    #[test_case("80010150090871" ; "fourteen digits")]
    #[test_case("800101500908A" ; "letter")]
    fn test_national_id_must_be_thirteen_digits(identifier: &str) {
        let mut form = form();
        form.identifier = identifier.to_string();
        let errors = AccountValidator::registration(&form).unwrap_err();
        assert_eq!(
            errors.get(FormField::Identifier),
            Some("Please enter a valid 13-digit South African ID number")
        );
    }

    #[test]
    fn test_passport_identifier() {
        let mut form = form();
        form.identifier_type = IdentityType::Passport;
        form.identifier = "A1234567".to_string();
        assert!(AccountValidator::registration(&form).is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        let mut form = form();
        form.confirm_password = "secret2".to_string();
        let errors = AccountValidator::registration(&form).unwrap_err();
        assert_eq!(
            errors.get(FormField::ConfirmPassword),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_short_password() {
        let mut form = form();
        form.password = "abc".to_string();
        form.confirm_password = "abc".to_string();
        let errors = AccountValidator::registration(&form).unwrap_err();
        assert_eq!(
            errors.get(FormField::Password),
            Some("Password must be at least 6 characters long")
        );
    }

    #[test]
    fn test_errors_reported_in_check_order() {
        let form = RegistrationForm {
            password: "a".to_string(),
            ..RegistrationForm::default()
        };
        let errors = AccountValidator::registration(&form).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                FormField::Identifier,
                FormField::FirstName,
                FormField::LastName,
                FormField::Phone,
                FormField::ConfirmPassword,
                FormField::Password,
            ]
        );
    }

    #[test_case("", "x", FormField::Identifier ; "blank identifier")]
    #[test_case("8001015009087", "", FormField::Password ; "blank password")]
    fn test_credentials_require_both_fields(identifier: &str, password: &str, field: FormField) {
        let errors = AccountValidator::credentials(identifier, password).unwrap_err();
        assert!(errors.contains(field));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_credentials_trim_identifier() {
        let creds = AccountValidator::credentials(" 8001015009087 ", "x").unwrap();
        assert_eq!(creds.identifier(), "8001015009087");
        assert_eq!(creds.password(), "x");
    }
}
