//! Screens and the navigation transition table.
//!
//! Navigation is a pure function of the current screen, the event, and
//! whether a session (with which role) exists. Protected screens are
//! additionally guarded at render time by [`guard`].

use super::entities::Role;

/// Top-level views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum Screen {
    #[default]
    Home,
    Login,
    Register,
    Kiosk,
    Chat,
    PatientDashboard,
    StaffDashboard,
    AdminDashboard,
}

impl Screen {
    /// Every screen, in menu order.
    pub const ALL: [Self; 8] = [
        Self::Home,
        Self::Login,
        Self::Register,
        Self::Kiosk,
        Self::Chat,
        Self::PatientDashboard,
        Self::StaffDashboard,
        Self::AdminDashboard,
    ];

    /// Screen shown when a protected screen may not be rendered.
    pub const PUBLIC_FALLBACK: Self = Self::Chat;

    /// Returns the stable identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Register => "register",
            Self::Kiosk => "kiosk",
            Self::Chat => "chat",
            Self::PatientDashboard => "patient-dashboard",
            Self::StaffDashboard => "staff-dashboard",
            Self::AdminDashboard => "admin-dashboard",
        }
    }

    /// Returns the title shown in the header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::Kiosk => "Kiosk",
            Self::Chat => "Assistant",
            Self::PatientDashboard => "Patient portal",
            Self::StaffDashboard => "Staff dashboard",
            Self::AdminDashboard => "Admin dashboard",
        }
    }

    /// Role required to render this screen, if any.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::PatientDashboard => Some(Role::Patient),
            Self::StaffDashboard => Some(Role::Staff),
            Self::AdminDashboard => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns whether this screen needs a session.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        self.required_role().is_some()
    }

    /// Dashboard owned by `role`.
    #[must_use]
    pub const fn dashboard_for(role: Role) -> Option<Self> {
        match role {
            Role::Patient => Some(Self::PatientDashboard),
            Role::Staff => Some(Self::StaffDashboard),
            Role::Admin => Some(Self::AdminDashboard),
            Role::None => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Screens anyone may open directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum PublicScreen {
    Home,
    Login,
    Register,
    Kiosk,
    Chat,
}

impl From<PublicScreen> for Screen {
    fn from(value: PublicScreen) -> Self {
        match value {
            PublicScreen::Home => Self::Home,
            PublicScreen::Login => Self::Login,
            PublicScreen::Register => Self::Register,
            PublicScreen::Kiosk => Self::Kiosk,
            PublicScreen::Chat => Self::Chat,
        }
    }
}

/// Navigation-relevant events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Authentication succeeded with the given role.
    LoginSucceeded(Role),
    /// Authentication failed; the error is surfaced elsewhere.
    LoginFailed,
    /// Registration succeeded for an account with the given role.
    RegisterSucceeded(Role),
    /// Registration failed.
    RegisterFailed,
    /// The user signed out.
    Logout,
    /// The backend rejected the credential.
    SessionExpired,
    /// Direct navigation to a public screen.
    Navigate(PublicScreen),
    /// Open the dashboard belonging to the current session.
    OpenDashboard,
    /// Leave the current public screen.
    Back,
}

/// Computes the next screen.
///
/// `has_session` and `role` describe the session in effect *after* the
/// event has been applied to it (a logout has already cleared it, a login
/// has already installed it).
#[must_use]
pub fn transition(current: Screen, event: NavEvent, has_session: bool, role: Role) -> Screen {
    match event {
        NavEvent::LoginSucceeded(role) => Screen::dashboard_for(role).unwrap_or(Screen::Home),
        NavEvent::RegisterSucceeded(Role::Patient) => Screen::PatientDashboard,
        NavEvent::RegisterSucceeded(_) => Screen::Login,
        NavEvent::LoginFailed | NavEvent::RegisterFailed => current,
        NavEvent::Logout => Screen::Chat,
        NavEvent::SessionExpired => Screen::Login,
        NavEvent::Navigate(target) => target.into(),
        NavEvent::OpenDashboard => {
            if has_session {
                Screen::dashboard_for(role).unwrap_or(Screen::Home)
            } else {
                Screen::PUBLIC_FALLBACK
            }
        }
        NavEvent::Back => match current {
            Screen::Login | Screen::Register | Screen::Kiosk | Screen::Chat => Screen::Home,
            other => other,
        },
    }
}

/// Returns the screen that may actually be rendered for `requested`.
///
/// Protected screens need a session whose role matches; otherwise the
/// public chat screen is substituted.
#[must_use]
pub fn guard(requested: Screen, session_role: Option<Role>) -> Screen {
    match (requested.required_role(), session_role) {
        (None, _) => requested,
        (Some(required), Some(role)) if required == role => requested,
        (Some(_), _) => Screen::PUBLIC_FALLBACK,
    }
}
