//! Chat quick actions and their canned replies.

/// Shortcut offered beside the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    /// Opens the scheduler after its reply.
    BookAppointment,
    /// Guest health questions.
    GeneralAdvice,
    /// Goes to the login screen instead of replying.
    LoginSignUp,
    /// Past visits. Offered to signed-in patients, like the next two.
    MedicalHistory,
    /// Guided symptom questions.
    SymptomsCheck,
    /// Repeat prescriptions.
    Prescriptions,
}

impl QuickAction {
    /// Actions shown to guests.
    pub const GUEST: [Self; 3] = [Self::BookAppointment, Self::GeneralAdvice, Self::LoginSignUp];

    /// Actions shown to signed-in patients.
    pub const PATIENT: [Self; 4] = [
        Self::BookAppointment,
        Self::MedicalHistory,
        Self::SymptomsCheck,
        Self::Prescriptions,
    ];

    /// Returns the actions available with or without a session.
    #[must_use]
    pub const fn available(signed_in: bool) -> &'static [Self] {
        if signed_in { &Self::PATIENT } else { &Self::GUEST }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BookAppointment => "Book Appointment",
            Self::GeneralAdvice => "General Advice",
            Self::LoginSignUp => "Login / sign up",
            Self::MedicalHistory => "Medical History",
            Self::SymptomsCheck => "Symptoms Check",
            Self::Prescriptions => "Prescriptions",
        }
    }

    /// Text sent as the user's message; also the canned-reply key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BookAppointment => "book appointment",
            Self::GeneralAdvice => "general advice",
            Self::LoginSignUp => "login / sign up",
            Self::MedicalHistory => "medical history",
            Self::SymptomsCheck => "symptoms check",
            Self::Prescriptions => "prescriptions",
        }
    }

    /// Whether the action leaves the chat for the login screen instead of
    /// producing a reply.
    #[must_use]
    pub const fn navigates_to_login(self) -> bool {
        matches!(self, Self::LoginSignUp)
    }

    /// Whether the scheduler opens once the reply is shown.
    #[must_use]
    pub const fn opens_scheduler(self) -> bool {
        matches!(self, Self::BookAppointment)
    }
}

const CANNED_REPLIES: [(&str, &str); 6] = [
    (
        "book appointment",
        "I can help you schedule an appointment! Let me show you the appointment scheduler.",
    ),
    (
        "symptoms check",
        "Please describe your symptoms in detail. I'll help assess them and provide guidance.",
    ),
    (
        "general advice",
        "I'm here to provide general medical advice. What specific health questions do you have?",
    ),
    (
        "medical history",
        "Accessing your medical history... You have 3 visits in the past year.",
    ),
    (
        "prescriptions",
        "Your current prescriptions: Amoxicillin (500mg), Vitamin D (1000 IU)",
    ),
    (
        "create account",
        "Creating an account will give you access to medical records, prescription management, and personalized care.",
    ),
];

/// Returns the canned reply for an action key.
#[must_use]
pub fn canned_reply(key: &str) -> String {
    CANNED_REPLIES
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(
            || format!("I can help you with {key}. What would you like to know?"),
            |(_, reply)| (*reply).to_string(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_guest_and_patient_sets() {
        assert!(QuickAction::available(false).contains(&QuickAction::LoginSignUp));
        assert!(!QuickAction::available(true).contains(&QuickAction::LoginSignUp));
        assert_eq!(QuickAction::available(true).len(), 4);
    }

    #[test_case(QuickAction::BookAppointment ; "book")]
    #[test_case(QuickAction::GeneralAdvice ; "advice")]
    #[test_case(QuickAction::MedicalHistory ; "history")]
    #[test_case(QuickAction::SymptomsCheck ; "symptoms")]
    #[test_case(QuickAction::Prescriptions ; "prescriptions")]
    fn test_every_replying_action_has_canned_reply(action: QuickAction) {
        assert!(!canned_reply(action.key()).starts_with("I can help you with"));
    }

    #[test]
    fn test_unknown_key_fallback() {
        assert_eq!(
            canned_reply("lab results"),
            "I can help you with lab results. What would you like to know?"
        );
    }
}
