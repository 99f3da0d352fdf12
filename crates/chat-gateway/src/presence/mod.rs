//! Presence fan-out on connect and disconnect

mod notifier;

pub use notifier::PresenceNotifier;
