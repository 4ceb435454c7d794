//! Notification adapters: Twilio SMS and the demo-mode logger.

mod log;
mod twilio;

pub use log::LogNotifier;
pub use twilio::{TwilioSmsNotifier, TwilioSmsConfig};
