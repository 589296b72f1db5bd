//! View/session controller.
//!
//! Owns the session and the requested screen. Every screen change goes
//! through [`transition`], every render asks [`SessionController::visible_screen`],
//! which applies [`guard`].

use tracing::{debug, info, warn};

use crate::domain::entities::{AuthContext, Principal, Role, Session};
use crate::domain::errors::ClientError;
use crate::domain::navigation::{NavEvent, PublicScreen, Screen, guard, transition};

/// Session plus active screen, passed explicitly to the event loop and
/// render path.
#[derive(Debug, Clone)]
pub struct SessionController {
    session: Option<Session>,
    screen: Screen,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionController {
    /// Starts on the home screen.
    #[must_use]
    pub const fn new(session: Option<Session>) -> Self {
        Self {
            session,
            screen: Screen::Home,
        }
    }

    /// Screen most recently requested.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Screen that may be rendered now.
    #[must_use]
    pub fn visible_screen(&self) -> Screen {
        guard(self.screen, self.role())
    }

    /// Current session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Signed-in principal.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.session.as_ref().map(Session::principal)
    }

    /// Role of the current session, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(Session::role)
    }

    /// Whether anyone is signed in.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Credential context for backend calls.
    #[must_use]
    pub fn auth_context(&self) -> AuthContext {
        AuthContext::for_session(self.session.as_ref())
    }

    /// Applies a navigation event and returns the new screen.
    pub fn dispatch(&mut self, event: NavEvent) -> Screen {
        let next = transition(
            self.screen,
            event,
            self.has_session(),
            self.role().unwrap_or_default(),
        );
        if next != self.screen {
            debug!(from = %self.screen, to = %next, ?event, "Screen transition");
        }
        self.screen = next;
        next
    }

    /// Convenience for [`NavEvent::Navigate`].
    pub fn navigate(&mut self, target: PublicScreen) -> Screen {
        self.dispatch(NavEvent::Navigate(target))
    }

    /// Installs a session after login.
    pub fn sign_in(&mut self, session: Session) -> Screen {
        let role = session.role();
        info!(%role, "Session started");
        self.session = Some(session);
        self.dispatch(NavEvent::LoginSucceeded(role))
    }

    /// Records a failed login; the screen stays put.
    pub fn login_failed(&mut self) -> Screen {
        self.dispatch(NavEvent::LoginFailed)
    }

    /// Applies a successful registration.
    ///
    /// A patient without a session (the follow-up sign-in failed) is sent
    /// to login instead of a dashboard it cannot open.
    pub fn registered(&mut self, role: Role, session: Option<Session>) -> Screen {
        match session {
            Some(session) => {
                self.session = Some(session);
                self.dispatch(NavEvent::RegisterSucceeded(role))
            }
            None if role == Role::Patient => self.navigate(PublicScreen::Login),
            None => self.dispatch(NavEvent::RegisterSucceeded(role)),
        }
    }

    /// Records a failed registration; the screen stays put.
    pub fn register_failed(&mut self) -> Screen {
        self.dispatch(NavEvent::RegisterFailed)
    }

    /// Clears the session and returns to the public chat.
    pub fn sign_out(&mut self) -> Screen {
        self.session = None;
        info!("Session ended");
        self.dispatch(NavEvent::Logout)
    }

    /// Clears the session after the backend rejected its credential.
    pub fn expire(&mut self) -> Screen {
        self.session = None;
        warn!("Session expired");
        self.dispatch(NavEvent::SessionExpired)
    }

    /// Expires the session when `error` is a 401. Returns whether it did.
    pub fn observe(&mut self, error: &ClientError) -> bool {
        if error.is_unauthorized() {
            self.expire();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BearerToken;
    use test_case::test_case;

    fn session(role: Role) -> Session {
        Session::new(
            Principal::new("8001015009087", role),
            BearerToken::new_unchecked("mock_jwt"),
        )
    }

    #[test_case(Role::Patient, Screen::PatientDashboard ; "patient")]
    #[test_case(Role::Staff, Screen::StaffDashboard ; "staff")]
    #[test_case(Role::Admin, Screen::AdminDashboard ; "admin")]
    fn test_sign_in_renders_role_dashboard(role: Role, expected: Screen) {
        let mut controller = SessionController::default();
        controller.navigate(PublicScreen::Login);
        assert_eq!(controller.sign_in(session(role)), expected);
        assert_eq!(controller.visible_screen(), expected);
    }

    #[test]
    fn test_failed_login_keeps_screen() {
        let mut controller = SessionController::default();
        controller.navigate(PublicScreen::Login);
        assert_eq!(controller.login_failed(), Screen::Login);
        assert!(!controller.has_session());
    }

    #[test_case(NavEvent::OpenDashboard ; "from dashboard")]
    #[test_case(NavEvent::Navigate(PublicScreen::Kiosk) ; "from kiosk")]
    #[test_case(NavEvent::Navigate(PublicScreen::Home) ; "from home")]
    fn test_sign_out_returns_to_chat(to_start: NavEvent) {
        let mut controller = SessionController::new(Some(session(Role::Admin)));
        controller.dispatch(to_start);
        assert_eq!(controller.sign_out(), Screen::Chat);
        assert!(controller.session().is_none());
        assert!(controller.auth_context().is_guest());
    }

    #[test]
    fn test_dashboard_hidden_after_session_loss() {
        let mut controller = SessionController::new(Some(session(Role::Staff)));
        controller.dispatch(NavEvent::OpenDashboard);
        assert_eq!(controller.visible_screen(), Screen::StaffDashboard);

        controller.session = None;
        assert_eq!(controller.visible_screen(), Screen::Chat);
    }

    #[test]
    fn test_unauthorized_expires_session() {
        let mut controller = SessionController::new(Some(session(Role::Patient)));
        controller.dispatch(NavEvent::OpenDashboard);

        assert!(!controller.observe(&ClientError::server(500, "boom")));
        assert!(controller.has_session());

        assert!(controller.observe(&ClientError::unauthorized("")));
        assert!(!controller.has_session());
        assert_eq!(controller.screen(), Screen::Login);
    }

    #[test]
    fn test_patient_registration_with_session() {
        let mut controller = SessionController::default();
        controller.navigate(PublicScreen::Register);
        let screen = controller.registered(Role::Patient, Some(session(Role::Patient)));
        assert_eq!(screen, Screen::PatientDashboard);
    }

    #[test]
    fn test_patient_registration_without_session_goes_to_login() {
        let mut controller = SessionController::default();
        controller.navigate(PublicScreen::Register);
        assert_eq!(controller.registered(Role::Patient, None), Screen::Login);
    }

    #[test]
    fn test_staff_registration_goes_to_login() {
        let mut controller = SessionController::default();
        assert_eq!(controller.registered(Role::Staff, None), Screen::Login);
    }
}
