/// Reachability of the backend as last observed through `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    /// Not checked yet.
    #[default]
    Unknown,
    /// Request in flight.
    Checking,
    /// Last check answered.
    Online,
    /// Last check failed.
    Offline,
}

impl BackendStatus {
    /// Text for the kiosk status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Checking => "checking...",
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}
