//! Appointment form validation.

use chrono::{Days, NaiveDate};

use crate::domain::entities::{Department, IdentityDocument, IdentityType, TimeSlot};
use crate::domain::errors::{FieldError, FormField, ValidationErrors};
use crate::domain::ports::{BookingRequest, RescheduleRequest};

/// Raw appointment form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct BookingForm {
    pub first_name: String,
    pub last_name: String,
    pub id_type: Option<IdentityType>,
    pub id_number: String,
    pub department: Option<Department>,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub slot: Option<TimeSlot>,
    pub reason: String,
}

impl BookingForm {
    /// Changes the identity type, clearing the number typed for the old one.
    pub fn set_id_type(&mut self, kind: IdentityType) {
        if self.id_type != Some(kind) {
            self.id_type = Some(kind);
            self.id_number.clear();
        }
    }

    /// Replaces the identity number, normalised for the selected type.
    pub fn set_id_number(&mut self, raw: &str) {
        self.id_number = match self.id_type {
            Some(kind) => kind.normalize(raw),
            None => raw.to_string(),
        };
    }
}

/// Turns a [`BookingForm`] into a [`BookingRequest`].
pub struct BookingValidator;

impl BookingValidator {
    /// Earliest bookable date relative to `today`.
    #[must_use]
    pub fn earliest_date(today: NaiveDate) -> NaiveDate {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }

    /// Validates every field and reports each failure against its field.
    ///
    /// # Errors
    /// Returns all field errors when any required field is missing or
    /// malformed.
    pub fn validate(form: &BookingForm, today: NaiveDate) -> Result<BookingRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = form.first_name.trim();
        if first_name.is_empty() {
            errors.push(FieldError::required(FormField::FirstName));
        }

        let last_name = form.last_name.trim();
        if last_name.is_empty() {
            errors.push(FieldError::required(FormField::LastName));
        }

        if form.id_type.is_none() {
            errors.push(FieldError::required(FormField::IdType));
        }

        let id_number = form.id_number.trim();
        let document = if id_number.is_empty() {
            errors.push(FieldError::required(FormField::IdNumber));
            None
        } else {
            form.id_type.and_then(|kind| {
                let document = IdentityDocument::new(kind, id_number);
                if document.is_none() {
                    errors.push(FieldError::new(FormField::IdNumber, kind.invalid_message()));
                }
                document
            })
        };

        if form.department.is_none() {
            errors.push(FieldError::required(FormField::Department));
        }

        let date = Self::check_date(&form.date, today, &mut errors);

        if form.slot.is_none() {
            errors.push(FieldError::required(FormField::Time));
        }

        match (document, form.department, date, form.slot) {
            (Some(document), Some(department), Some(date), Some(slot)) if errors.is_empty() => {
                Ok(BookingRequest {
                    patient_name: format!("{first_name} {last_name}"),
                    document,
                    department,
                    date,
                    slot,
                    reason: form.reason.trim().to_string(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Validates a move of an existing appointment.
    ///
    /// # Errors
    /// Returns the department, date and time errors.
    pub fn reschedule(
        department: Option<Department>,
        date: &str,
        slot: Option<TimeSlot>,
        today: NaiveDate,
    ) -> Result<RescheduleRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if department.is_none() {
            errors.push(FieldError::required(FormField::Department));
        }
        let date = Self::check_date(date, today, &mut errors);
        if slot.is_none() {
            errors.push(FieldError::required(FormField::Time));
        }
        match (department, date, slot) {
            (Some(department), Some(date), Some(slot)) => Ok(RescheduleRequest {
                department,
                date,
                slot,
            }),
            _ => Err(errors),
        }
    }

    fn check_date(raw: &str, today: NaiveDate, errors: &mut ValidationErrors) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            errors.push(FieldError::required(FormField::Date));
            return None;
        }

        let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
            errors.push(FieldError::new(
                FormField::Date,
                "Please enter the date as YYYY-MM-DD",
            ));
            return None;
        };

        let earliest = Self::earliest_date(today);
        if date < earliest {
            errors.push(FieldError::new(
                FormField::Date,
                format!("Please choose a date from {} onward", earliest.format("%Y-%m-%d")),
            ));
            return None;
        }

        Some(date)
    }
}
