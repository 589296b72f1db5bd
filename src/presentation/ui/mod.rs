//! UI screens.

mod app;
mod booking_form;
mod chat_screen;
mod dashboard_screen;
mod home_screen;
mod kiosk_screen;
mod layout;
mod login_screen;
mod register_screen;

pub use app::{App, AppPorts};
pub use booking_form::{BookingFormView, FormAction};
pub use chat_screen::{ChatAction, ChatScreen};
pub use dashboard_screen::{DashboardAction, DashboardScreen};
pub use home_screen::{HomeItem, HomeScreen};
pub use kiosk_screen::{KioskAction, KioskScreen};
pub use login_screen::{LoginAction, LoginScreen, LoginState};
pub use register_screen::{RegisterAction, RegisterScreen};
