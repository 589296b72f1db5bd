//! Main application orchestrator.
//!
//! One task owns every screen and the [`SessionController`]. Terminal events
//! and the results of spawned backend calls are both funneled through a
//! `select!` loop, so screen state is only ever touched from here.

use std::future::Future;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::chat_screen::{ChatAction, ChatScreen};
use super::dashboard_screen::{DashboardAction, DashboardScreen};
use super::home_screen::{HomeItem, HomeScreen};
use super::kiosk_screen::{KioskAction, KioskScreen};
use super::login_screen::{LoginAction, LoginScreen};
use super::register_screen::{RegisterAction, RegisterScreen};
use crate::application::dto::{LoginResponse, RegisterResponse};
use crate::application::services::{
    ATTACHMENT_REPLY, BOOKING_REPLY, CONFIRMATION_DELAY, QuickAction, REPLY_DELAY,
    SCHEDULER_DELAY, SessionController,
};
use crate::application::use_cases::{
    BookAppointmentUseCase, BookingConfirmation, ChatReply, ChatUseCase, LoginUseCase,
    ManageAppointmentsUseCase, RegisterUseCase, RestoredSession,
};
use crate::domain::connection::BackendStatus;
use crate::domain::entities::{Appointment, AppointmentId, Principal, Role, TimeSlot};
use crate::domain::errors::ClientError;
use crate::domain::navigation::{NavEvent, PublicScreen, Screen};
use crate::domain::ports::{AppointmentPort, AuthPort, ChatPort, SessionStoragePort};
use crate::domain::services::BookingForm;
use crate::infrastructure::config::UiConfig;
use crate::presentation::events;
use crate::presentation::theme::Theme;
use crate::presentation::widgets::StatusBar;

/// Where a booking was submitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookingOrigin {
    /// Chat scheduler of the given chat generation.
    Chat(u64),
    Kiosk,
}

/// Results posted back by spawned tasks.
#[derive(Debug)]
enum Action {
    LoginFinished(Result<LoginResponse, ClientError>),
    RegisterFinished {
        role: Role,
        result: Result<RegisterResponse, ClientError>,
    },
    ChatReplied {
        generation: u64,
        reply: ChatReply,
    },
    CannedReply {
        generation: u64,
        action: QuickAction,
    },
    OpenScheduler {
        generation: u64,
    },
    AttachmentChecked {
        generation: u64,
        result: Result<String, ClientError>,
    },
    AssistantReply {
        generation: u64,
        text: &'static str,
    },
    Booked {
        origin: BookingOrigin,
        result: Result<BookingConfirmation, ClientError>,
    },
    SlotsLoaded(Result<Vec<TimeSlot>, ClientError>),
    AppointmentsLoaded(Result<Vec<Appointment>, ClientError>),
    AppointmentFetched(Result<Appointment, ClientError>),
    UsersLoaded(Result<Vec<Principal>, ClientError>),
    Rescheduled(Result<Appointment, ClientError>),
    Cancelled {
        id: AppointmentId,
        result: Result<(), ClientError>,
    },
    HealthChecked(bool),
    LogoutFinished(Result<(), ClientError>),
}

/// Backend ports the application is wired to.
#[derive(Clone)]
pub struct AppPorts {
    /// Login, registration, profile and health.
    pub auth: Arc<dyn AuthPort>,
    /// Assistant prompts.
    pub chat: Arc<dyn ChatPort>,
    /// Booking and dashboard calls.
    pub appointments: Arc<dyn AppointmentPort>,
    /// Saved session slots.
    pub storage: Arc<dyn SessionStoragePort>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Terminal client: owns the session controller, every screen and the
/// channel spawned backend calls report back on.
pub struct App {
    controller: SessionController,
    auth_port: Arc<dyn AuthPort>,
    login_use_case: LoginUseCase,
    register_use_case: RegisterUseCase,
    chat_use_case: ChatUseCase,
    booking_use_case: BookAppointmentUseCase,
    appointments_use_case: ManageAppointmentsUseCase,
    shown: Option<Screen>,
    home: HomeScreen,
    login: LoginScreen,
    register: RegisterScreen,
    chat: Option<ChatScreen>,
    chat_generation: u64,
    kiosk: KioskScreen,
    dashboard: Option<DashboardScreen>,
    status: Option<StatusBar>,
    backend: BackendStatus,
    theme: Theme,
    timestamp_format: String,
    persist: bool,
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Wires the use cases to `ports`. `persist` is the initial state of
    /// the login screen's remember toggle.
    #[must_use]
    pub fn new(ports: AppPorts, ui: &UiConfig, persist: bool) -> Self {
        let login_use_case = LoginUseCase::new(ports.auth.clone(), ports.storage);
        let register_use_case = RegisterUseCase::new(ports.auth.clone(), login_use_case.clone());
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            controller: SessionController::default(),
            auth_port: ports.auth,
            login_use_case,
            register_use_case,
            chat_use_case: ChatUseCase::new(ports.chat),
            booking_use_case: BookAppointmentUseCase::new(ports.appointments.clone()),
            appointments_use_case: ManageAppointmentsUseCase::new(ports.appointments),
            shown: None,
            home: HomeScreen::new(),
            login: LoginScreen::new(persist),
            register: RegisterScreen::new(),
            chat: None,
            chat_generation: 0,
            kiosk: KioskScreen::new(today()),
            dashboard: None,
            status: None,
            backend: BackendStatus::Unknown,
            theme: Theme::new(&ui.accent_color),
            timestamp_format: ui.effective_timestamp_format(),
            persist,
            running: true,
            action_tx,
            action_rx,
        }
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    /// Returns error if the terminal cannot be drawn or read.
    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        restored: Option<RestoredSession>,
    ) -> color_eyre::Result<()> {
        if let Some(restored) = restored {
            info!(source = %restored.source, "Resuming session");
            let name = restored.session.principal().display_name();
            self.controller.sign_in(restored.session);
            self.sync_screen();
            self.status = Some(StatusBar::info(format!("Welcome back, {name}")));
        } else {
            self.sync_screen();
        }
        self.check_health();

        let mut terminal_events = EventStream::new();
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                Some(event) = terminal_events.next() => match event {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Terminal event stream failed");
                        return Err(e.into());
                    }
                },
            }
            terminal.draw(|frame| self.render(frame))?;
        }

        info!("Application exiting normally");
        Ok(())
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if tx.send(task.await).is_err() {
                debug!("Event loop gone, dropping result");
            }
        });
    }

    fn after(&self, delay: std::time::Duration, action: Action) {
        self.spawn(async move {
            sleep(delay).await;
            action
        });
    }

    /// Brings per-screen state in line with the visible screen.
    fn sync_screen(&mut self) {
        let visible = self.controller.visible_screen();
        if self.shown == Some(visible) {
            return;
        }
        let previous = self.shown.replace(visible);
        debug!(from = ?previous, to = %visible, "Showing screen");

        if previous == Some(Screen::Chat) {
            self.chat = None;
            self.chat_generation += 1;
        }
        if previous.is_some_and(Screen::is_protected) {
            self.dashboard = None;
        }
        self.status = None;

        match visible {
            Screen::Home => self.home.reset(),
            Screen::Login => self.login.reset(),
            Screen::Register => self.register.reset(),
            Screen::Kiosk => {
                self.kiosk.reset(today());
                self.check_health();
                self.load_slots();
            }
            Screen::Chat => {
                self.chat = Some(ChatScreen::new(self.controller.principal()));
            }
            Screen::PatientDashboard | Screen::StaffDashboard | Screen::AdminDashboard => {
                if let Some(role) = visible.required_role() {
                    self.dashboard = Some(DashboardScreen::new(role, today()));
                    self.refresh_dashboard();
                }
            }
        }
    }

    fn navigate(&mut self, target: PublicScreen) {
        self.controller.navigate(target);
        self.sync_screen();
    }

    fn dispatch(&mut self, event: NavEvent) {
        self.controller.dispatch(event);
        self.sync_screen();
    }

    /// Shows `error`, ending the session first when it is a 401.
    fn report(&mut self, error: &ClientError) {
        if self.controller.observe(error) {
            self.clear_stored_session();
            self.sync_screen();
            self.status = Some(StatusBar::warning(
                "Your session has expired. Please sign in again.",
            ));
        } else {
            self.status = Some(StatusBar::from_error(error));
        }
    }

    fn sign_out(&mut self) {
        self.controller.sign_out();
        self.clear_stored_session();
        self.sync_screen();
        self.status = Some(StatusBar::info("Signed out"));
    }

    fn clear_stored_session(&self) {
        let use_case = self.login_use_case.clone();
        self.spawn(async move { Action::LogoutFinished(use_case.logout().await) });
    }

    fn check_health(&mut self) {
        self.backend = BackendStatus::Checking;
        let auth = self.auth_port.clone();
        self.spawn(async move { Action::HealthChecked(auth.health_check().await.is_ok()) });
    }

    fn load_slots(&self) {
        let use_case = self.appointments_use_case.clone();
        let auth = self.controller.auth_context();
        self.spawn(async move { Action::SlotsLoaded(use_case.available_slots(&auth).await) });
    }

    fn refresh_dashboard(&mut self) {
        let Some(dashboard) = &mut self.dashboard else {
            return;
        };
        dashboard.set_loading();
        let role = dashboard.role();

        let auth = self.controller.auth_context();
        let use_case = self.appointments_use_case.clone();
        let list_auth = auth.clone();
        self.spawn(async move { Action::AppointmentsLoaded(use_case.list(&list_auth).await) });

        if role == Role::Admin {
            let port = self.auth_port.clone();
            self.spawn(async move { Action::UsersLoaded(port.list_users(&auth).await) });
        }
    }

    fn submit_booking(&self, origin: BookingOrigin, form: BookingForm) {
        let use_case = self.booking_use_case.clone();
        let auth = self.controller.auth_context();
        self.spawn(async move {
            Action::Booked {
                origin,
                result: use_case.execute(&auth, &form, today()).await,
            }
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if !events::is_actionable(&key) {
            return;
        }
        if events::is_quit_event(&key) {
            self.running = false;
            return;
        }

        match self.controller.visible_screen() {
            Screen::Home => {
                if let Some(item) = self.home.handle_key(key, self.controller.has_session()) {
                    self.open_home_item(item);
                }
            }
            Screen::Login => self.handle_login_key(key),
            Screen::Register => self.handle_register_key(key),
            Screen::Chat => self.handle_chat_key(key),
            Screen::Kiosk => self.handle_kiosk_key(key),
            Screen::PatientDashboard | Screen::StaffDashboard | Screen::AdminDashboard => {
                self.handle_dashboard_key(key);
            }
        }
    }

    fn open_home_item(&mut self, item: HomeItem) {
        match item {
            HomeItem::Chat => self.navigate(PublicScreen::Chat),
            HomeItem::SignIn => self.navigate(PublicScreen::Login),
            HomeItem::Register => self.navigate(PublicScreen::Register),
            HomeItem::Kiosk => self.navigate(PublicScreen::Kiosk),
            HomeItem::Dashboard => self.dispatch(NavEvent::OpenDashboard),
            HomeItem::SignOut => self.sign_out(),
            HomeItem::Quit => self.running = false,
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match self.login.handle_key(key) {
            LoginAction::Submit(request) => {
                self.login.set_validating();
                let use_case = self.login_use_case.clone();
                self.spawn(async move { Action::LoginFinished(use_case.execute(request).await) });
            }
            LoginAction::Register => self.navigate(PublicScreen::Register),
            LoginAction::GuestChat => self.navigate(PublicScreen::Chat),
            LoginAction::Back => self.dispatch(NavEvent::Back),
            LoginAction::None => {}
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) {
        match self.register.handle_key(key) {
            RegisterAction::Submit(request) => {
                self.register.set_submitting();
                let use_case = self.register_use_case.clone();
                let persist = self.persist;
                let role = request.role;
                self.spawn(async move {
                    Action::RegisterFinished {
                        role,
                        result: use_case.execute(&request, persist).await,
                    }
                });
            }
            RegisterAction::Login => self.navigate(PublicScreen::Login),
            RegisterAction::Back => self.dispatch(NavEvent::Back),
            RegisterAction::None => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        let Some(chat) = &mut self.chat else {
            return;
        };
        let generation = self.chat_generation;
        match chat.handle_key(key) {
            ChatAction::Send(prompt) => {
                let use_case = self.chat_use_case.clone();
                let auth = self.controller.auth_context();
                self.spawn(async move {
                    Action::ChatReplied {
                        generation,
                        reply: use_case.send(&auth, &prompt).await,
                    }
                });
            }
            ChatAction::QuickAction(action) => {
                self.after(REPLY_DELAY, Action::CannedReply { generation, action });
            }
            ChatAction::Login => self.navigate(PublicScreen::Login),
            ChatAction::Attach(path) => {
                let use_case = self.chat_use_case.clone();
                self.spawn(async move {
                    Action::AttachmentChecked {
                        generation,
                        result: use_case.attachment_name(&path).await,
                    }
                });
            }
            ChatAction::SubmitBooking(form) => {
                self.submit_booking(BookingOrigin::Chat(generation), form);
            }
            ChatAction::Back => self.dispatch(NavEvent::Back),
            ChatAction::None => {}
        }
    }

    fn handle_kiosk_key(&mut self, key: KeyEvent) {
        match self.kiosk.handle_key(key) {
            KioskAction::Submit(form) => self.submit_booking(BookingOrigin::Kiosk, form),
            KioskAction::CheckHealth => self.check_health(),
            KioskAction::Back => self.dispatch(NavEvent::Back),
            KioskAction::None => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let Some(dashboard) = &mut self.dashboard else {
            return;
        };
        match dashboard.handle_key(key) {
            DashboardAction::Refresh => self.refresh_dashboard(),
            DashboardAction::OpenReschedule(id) => {
                self.load_slots();
                let use_case = self.appointments_use_case.clone();
                let auth = self.controller.auth_context();
                self.spawn(async move {
                    Action::AppointmentFetched(use_case.get(&auth, &id).await)
                });
            }
            DashboardAction::Reschedule(id, request) => {
                let use_case = self.appointments_use_case.clone();
                let auth = self.controller.auth_context();
                self.spawn(async move {
                    Action::Rescheduled(use_case.reschedule(&auth, &id, &request).await)
                });
            }
            DashboardAction::Cancel(id) => {
                let use_case = self.appointments_use_case.clone();
                let auth = self.controller.auth_context();
                self.spawn(async move {
                    let result = use_case.cancel(&auth, &id).await;
                    Action::Cancelled { id, result }
                });
            }
            DashboardAction::Home => self.navigate(PublicScreen::Home),
            DashboardAction::Chat => self.navigate(PublicScreen::Chat),
            DashboardAction::SignOut => self.sign_out(),
            DashboardAction::None => {}
        }
    }

    /// Chat screen of `generation`, if it is still the one shown.
    fn chat_for(&mut self, generation: u64) -> Option<&mut ChatScreen> {
        if generation == self.chat_generation {
            self.chat.as_mut()
        } else {
            debug!(generation, current = self.chat_generation, "Dropping stale chat result");
            None
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::LoginFinished(Ok(response)) => {
                let name = response.session.principal().display_name();
                if !response.persisted && self.login.should_persist() {
                    warn!("Session was not saved; it will end when the client exits");
                }
                self.controller.sign_in(response.session);
                self.sync_screen();
                self.status = Some(StatusBar::success(format!("Signed in as {name}")));
            }
            Action::LoginFinished(Err(e)) => {
                self.controller.login_failed();
                self.login.set_error(e.user_message());
            }
            Action::RegisterFinished {
                role,
                result: Ok(response),
            } => {
                let signed_in = response.session.is_some();
                self.controller.registered(role, response.session);
                self.sync_screen();
                self.status = Some(if signed_in {
                    StatusBar::success(response.message)
                } else {
                    StatusBar::success(format!("{} Please sign in.", response.message))
                });
            }
            Action::RegisterFinished { result: Err(e), .. } => {
                self.controller.register_failed();
                self.register.set_error(e.user_message());
            }
            Action::ChatReplied { generation, reply } => {
                if let Some(chat) = self.chat_for(generation) {
                    chat.conversation_mut().reply(reply.text);
                    if let Some(e) = reply.error {
                        self.report(&e);
                    }
                }
            }
            Action::CannedReply { generation, action } => {
                if let Some(chat) = self.chat_for(generation) {
                    chat.conversation_mut().finish_quick_action(action);
                    if action.opens_scheduler() {
                        self.after(SCHEDULER_DELAY, Action::OpenScheduler { generation });
                    }
                }
            }
            Action::OpenScheduler { generation } => {
                if generation == self.chat_generation
                    && let Some(chat) = &mut self.chat
                {
                    chat.open_scheduler(today(), self.controller.principal());
                    self.load_slots();
                }
            }
            Action::AttachmentChecked { generation, result } => match result {
                Ok(name) => {
                    if let Some(chat) = self.chat_for(generation) {
                        chat.conversation_mut().attach(&name);
                        self.after(
                            REPLY_DELAY,
                            Action::AssistantReply {
                                generation,
                                text: ATTACHMENT_REPLY,
                            },
                        );
                    }
                }
                Err(e) => {
                    if self.chat_for(generation).is_some() {
                        self.status = Some(StatusBar::from_error(&e));
                    }
                }
            },
            Action::AssistantReply { generation, text } => {
                if let Some(chat) = self.chat_for(generation) {
                    chat.conversation_mut().reply(text);
                }
            }
            Action::Booked { origin, result } => self.handle_booked(origin, result),
            Action::SlotsLoaded(Ok(slots)) => {
                if let Some(chat) = &mut self.chat {
                    chat.set_slots(slots.clone());
                }
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.set_slots(slots.clone());
                }
                if self.shown == Some(Screen::Kiosk) {
                    self.kiosk.set_slots(slots);
                }
            }
            Action::AppointmentFetched(Ok(appointment)) => {
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.refreshed(appointment);
                }
            }
            Action::SlotsLoaded(Err(e))
            | Action::AppointmentFetched(Err(e))
            | Action::UsersLoaded(Err(e))
            | Action::Cancelled { result: Err(e), .. } => self.report(&e),
            Action::AppointmentsLoaded(result) => {
                let Some(dashboard) = &mut self.dashboard else {
                    return;
                };
                match result {
                    Ok(appointments) => dashboard.set_appointments(appointments),
                    Err(e) => {
                        dashboard.load_failed();
                        self.report(&e);
                    }
                }
            }
            Action::UsersLoaded(Ok(users)) => {
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.set_users(users);
                }
            }
            Action::Rescheduled(Ok(appointment)) => {
                let when = appointment.clinic_start();
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.rescheduled(appointment);
                }
                self.status = Some(StatusBar::success(format!(
                    "Appointment moved to {}",
                    when.format("%Y-%m-%d %H:%M")
                )));
            }
            Action::Rescheduled(Err(e)) => {
                if e.is_unauthorized() {
                    self.report(&e);
                } else if let Some(dashboard) = &mut self.dashboard {
                    dashboard.reschedule_failed(e.user_message());
                }
            }
            Action::Cancelled { id, result: Ok(()) } => {
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.cancelled(&id);
                }
                self.status = Some(StatusBar::success("Appointment cancelled"));
            }
            Action::HealthChecked(online) => {
                self.backend = if online {
                    BackendStatus::Online
                } else {
                    BackendStatus::Offline
                };
            }
            Action::LogoutFinished(Ok(())) => {}
            Action::LogoutFinished(Err(e)) => {
                self.status = Some(StatusBar::warning(format!(
                    "Signed out, but the saved session could not be removed: {}",
                    e.user_message()
                )));
            }
        }
    }

    fn handle_booked(&mut self, origin: BookingOrigin, result: Result<BookingConfirmation, ClientError>) {
        match (origin, result) {
            (BookingOrigin::Chat(generation), Ok(confirmation)) => {
                if let Some(chat) = self.chat_for(generation) {
                    chat.booking_succeeded(confirmation.notice());
                    self.after(
                        CONFIRMATION_DELAY,
                        Action::AssistantReply {
                            generation,
                            text: BOOKING_REPLY,
                        },
                    );
                }
            }
            (BookingOrigin::Kiosk, Ok(confirmation)) => {
                if self.shown == Some(Screen::Kiosk) {
                    self.kiosk.booking_succeeded(confirmation.notice());
                }
            }
            (origin, Err(e)) => {
                if e.is_unauthorized() {
                    self.report(&e);
                    return;
                }
                match origin {
                    BookingOrigin::Chat(generation) => {
                        if let Some(chat) = self.chat_for(generation) {
                            match e.validation() {
                                Some(errors) => chat.booking_rejected(errors),
                                None => chat.booking_failed(e.user_message()),
                            }
                        }
                    }
                    BookingOrigin::Kiosk => {
                        if self.shown == Some(Screen::Kiosk) {
                            match e.validation() {
                                Some(errors) => self.kiosk.booking_rejected(errors),
                                None => self.kiosk.booking_failed(e.user_message()),
                            }
                        }
                    }
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let visible = self.controller.visible_screen();
        let identity = self.controller.principal().map_or_else(
            || "Guest".to_string(),
            |p| format!("{} ({})", p.display_name(), p.role().label()),
        );
        let header_bar = StatusBar::info(format!("VitalAI · {}", visible.title()))
            .right(format!("service {} · {identity}", self.backend.label()));
        frame.render_widget(&header_bar, header);

        let principal = self.controller.principal();
        match visible {
            Screen::Home => self.home.render(body, frame.buffer_mut(), &self.theme, principal),
            Screen::Login => frame.render_widget(&self.login, body),
            Screen::Register => frame.render_widget(&self.register, body),
            Screen::Chat => {
                if let Some(chat) = &self.chat {
                    chat.render(body, frame.buffer_mut(), &self.theme, &self.timestamp_format);
                }
            }
            Screen::Kiosk => {
                self.kiosk
                    .render(body, frame.buffer_mut(), &self.theme, self.backend);
            }
            Screen::PatientDashboard | Screen::StaffDashboard | Screen::AdminDashboard => {
                if let Some(dashboard) = &self.dashboard {
                    dashboard.render(
                        body,
                        frame.buffer_mut(),
                        &self.theme,
                        principal,
                        &self.timestamp_format,
                    );
                }
            }
        }

        if let Some(status) = &self.status {
            frame.render_widget(status, footer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::SessionSource;
    use crate::domain::entities::{BearerToken, MessageKind, Session};
    use crate::domain::ports::mocks::{
        MockAppointmentPort, MockAuthPort, MockChatPort, MockSessionStorage,
    };
    use chrono::TimeZone;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app_with(auth: MockAuthPort, chat: MockChatPort) -> App {
        let mut appointments = MockAppointmentPort::new();
        appointments.expect_list().returning(|_| Ok(Vec::new()));
        appointments
            .expect_available_slots()
            .returning(|_| Ok(Vec::new()));
        app_with_appointments(auth, chat, appointments)
    }

    fn app_with_appointments(
        auth: MockAuthPort,
        chat: MockChatPort,
        appointments: MockAppointmentPort,
    ) -> App {
        let ports = AppPorts {
            auth: Arc::new(auth),
            chat: Arc::new(chat),
            appointments: Arc::new(appointments),
            storage: Arc::new(MockSessionStorage::new()),
        };
        let mut app = App::new(ports, &UiConfig::default(), false);
        app.sync_screen();
        app
    }

    fn session(role: Role) -> Session {
        Session::new(
            Principal::new("8001015009087", role).with_name("Thandi", "Mokoena"),
            BearerToken::new_unchecked("mock_jwt"),
        )
    }

    async fn pump(app: &mut App) {
        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action);
    }

    #[tokio::test]
    async fn test_login_routes_to_role_dashboard() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.navigate(PublicScreen::Login);
        type_text(&mut app, "8001015009087");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "x");
        app.handle_key(key(KeyCode::Enter));

        pump(&mut app).await;
        assert_eq!(app.controller.visible_screen(), Screen::PatientDashboard);
        assert!(app.dashboard.is_some());
        assert_eq!(app.status.as_ref().unwrap().message(), "Signed in as Test User");
    }

    #[tokio::test]
    async fn test_login_error_keeps_screen() {
        let mut app = app_with(MockAuthPort::new(false, Role::Patient), MockChatPort::new());
        app.navigate(PublicScreen::Login);
        app.handle_action(Action::LoginFinished(Err(ClientError::unauthorized(
            "Invalid identifier or password",
        ))));
        assert_eq!(app.controller.visible_screen(), Screen::Login);
        assert!(!app.controller.has_session());
        assert_eq!(app.login.error_message(), Some("Invalid identifier or password"));
    }

    #[tokio::test]
    async fn test_stale_chat_reply_is_dropped() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.navigate(PublicScreen::Chat);
        let old_generation = app.chat_generation;

        app.navigate(PublicScreen::Home);
        app.navigate(PublicScreen::Chat);
        app.handle_action(Action::ChatReplied {
            generation: old_generation,
            reply: ChatReply {
                text: "late".to_string(),
                error: None,
            },
        });
        assert_eq!(app.chat.as_ref().unwrap().conversation().transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let mut chat = MockChatPort::new();
        chat.expect_send_prompt()
            .returning(|_, _| Ok("Rest and drink water.".to_string()));
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), chat);
        app.navigate(PublicScreen::Chat);

        type_text(&mut app, "I have a headache");
        app.handle_key(key(KeyCode::Enter));
        pump(&mut app).await;

        let conversation = app.chat.as_ref().unwrap().conversation();
        assert!(!conversation.is_pending());
        assert_eq!(
            conversation.transcript().last().unwrap().text(),
            "Rest and drink water."
        );
    }

    #[tokio::test]
    async fn test_unauthorized_chat_reply_expires_session() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.controller.sign_in(session(Role::Patient));
        app.navigate(PublicScreen::Chat);

        let generation = app.chat_generation;
        app.handle_action(Action::ChatReplied {
            generation,
            reply: ChatReply {
                text: "Sorry, I encountered an error. Please try again.".to_string(),
                error: Some(ClientError::unauthorized("Token expired")),
            },
        });

        assert_eq!(app.controller.visible_screen(), Screen::Login);
        assert!(!app.controller.has_session());
        assert!(app.chat.is_none());
    }

    #[tokio::test]
    async fn test_stale_attachment_error_is_ignored() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.navigate(PublicScreen::Chat);
        let old_generation = app.chat_generation;
        app.navigate(PublicScreen::Home);
        app.navigate(PublicScreen::Chat);

        app.handle_action(Action::AttachmentChecked {
            generation: old_generation,
            result: Err(ClientError::unexpected("Cannot attach scan.pdf: not found")),
        });
        assert!(app.status.is_none());

        app.handle_action(Action::AttachmentChecked {
            generation: app.chat_generation,
            result: Err(ClientError::unexpected("Cannot attach scan.pdf: not found")),
        });
        assert!(app.status.is_some());
    }

    #[tokio::test]
    async fn test_reschedule_dialog_fetches_current_record() {
        let booked = |hour, min| {
            Appointment::new(
                AppointmentId::new("a1"),
                "Thandi Mokoena",
                "Dental",
                chrono::Utc.with_ymd_and_hms(2099, 1, 5, hour, min, 0).unwrap(),
            )
        };
        let mut appointments = MockAppointmentPort::new();
        appointments
            .expect_list()
            .returning(move |_| Ok(vec![booked(9, 30)]));
        appointments
            .expect_available_slots()
            .returning(|_| Ok(TimeSlot::standard()));
        appointments
            .expect_get()
            .withf(|_, id| id.as_str() == "a1")
            .times(1)
            .returning(move |_, _| Ok(booked(15, 0)));
        let mut app = app_with_appointments(
            MockAuthPort::new(true, Role::Patient),
            MockChatPort::new(),
            appointments,
        );
        app.handle_action(Action::LoginFinished(Ok(LoginResponse::new(
            session(Role::Patient),
            SessionSource::UserInput,
            false,
        ))));
        pump(&mut app).await;
        assert_eq!(app.dashboard.as_ref().unwrap().appointments().len(), 1);

        app.handle_key(key(KeyCode::Char('e')));
        pump(&mut app).await;
        pump(&mut app).await;

        let dashboard = app.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.appointments()[0].slot(), TimeSlot::parse("15:00"));
    }

    #[tokio::test]
    async fn test_chat_booking_appends_notice() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.navigate(PublicScreen::Chat);
        let generation = app.chat_generation;
        app.handle_action(Action::OpenScheduler { generation });
        assert!(app.chat.as_ref().unwrap().scheduler_open());

        let request = tokio_test::assert_ok!(crate::domain::services::BookingValidator::validate(
            &BookingForm {
                first_name: "Thandi".into(),
                last_name: "Mokoena".into(),
                id_type: Some(crate::domain::entities::IdentityType::NationalId),
                id_number: "8001015009087".into(),
                department: Some(crate::domain::entities::Department::Dental),
                date: "2099-01-05".into(),
                slot: TimeSlot::parse("14:30"),
                reason: String::new(),
            },
            today(),
        ));
        app.handle_action(Action::Booked {
            origin: BookingOrigin::Chat(generation),
            result: Ok(BookingConfirmation {
                id: AppointmentId::new("a1"),
                request,
            }),
        });

        let chat = app.chat.as_ref().unwrap();
        assert!(!chat.scheduler_open());
        let last = chat.conversation().transcript().last().unwrap();
        assert_eq!(last.kind(), MessageKind::AppointmentNotice);
        assert_eq!(last.text(), "Appointment scheduled: Dental on 2099-01-05 at 14:30");
    }

    #[tokio::test]
    async fn test_restricted_dashboard_falls_back_to_chat() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.dispatch(NavEvent::OpenDashboard);
        assert_eq!(app.controller.visible_screen(), Screen::Chat);
        assert!(app.dashboard.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_chat() {
        let mut app = app_with(MockAuthPort::new(true, Role::Admin), MockChatPort::new());
        app.handle_action(Action::LoginFinished(Ok(LoginResponse::new(
            session(Role::Admin),
            SessionSource::UserInput,
            false,
        ))));
        assert_eq!(app.controller.visible_screen(), Screen::AdminDashboard);

        app.handle_key(key(KeyCode::Char('o')));
        assert_eq!(app.controller.visible_screen(), Screen::Chat);
        assert!(!app.controller.has_session());
        assert!(app.dashboard.is_none());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app_with(MockAuthPort::new(true, Role::Patient), MockChatPort::new());
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}
