//! WebSocket close codes
//!
//! Codes the gateway sends when it ends a connection on its own initiative.

/// Gateway WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// A newer connection registered for the same user
    SessionReplaced = 4001,
    /// Outbound queue overflowed
    SlowConsumer = 4002,
    /// No inbound frame within the idle timeout
    IdleTimeout = 4003,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Close frame reason text
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SessionReplaced => "Session replaced by a newer connection",
            Self::SlowConsumer => "Outbound queue full",
            Self::IdleTimeout => "Idle timeout",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_u16(), self.description())
    }
}
