//! GreetCallHandler - call-open greeting and daytime routing.
//!
//! The restaurant line always greets and listens. The financial line checks
//! the configured weekday hours window first: during business hours the
//! caller is transferred straight to the staffed line, after hours the
//! intake greeting starts the collection flow.

use chrono::{DateTime, Datelike, Local, Timelike};

use crate::config::{BusinessConfig, FinancialConfig};
use crate::domain::dialogue::CallDomain;

use super::process_turn::TurnReply;

/// One inbound call-open event.
#[derive(Debug, Clone)]
pub struct GreetCallCommand {
    pub call_id: String,
    pub domain: CallDomain,
}

/// Handler for the first exchange of a call.
pub struct GreetCallHandler {
    business: BusinessConfig,
}

impl GreetCallHandler {
    pub fn new(business: BusinessConfig) -> Self {
        Self { business }
    }

    /// Produces the opening reply for a call.
    pub fn handle(&self, cmd: &GreetCallCommand) -> TurnReply {
        tracing::info!(call_id = %cmd.call_id, domain = %cmd.domain, "call opened");

        match cmd.domain {
            CallDomain::Restaurant => TurnReply::ask(format!(
                "Hello! Welcome to {}. I'm your virtual assistant. I can help you \
                 make a reservation, answer questions about our menu, or share \
                 information about the restaurant. How can I help you today?",
                self.business.restaurant.name
            )),
            CallDomain::Financial => {
                if is_business_hours(Local::now(), &self.business.financial) {
                    TurnReply::transfer(format!(
                        "Thank you for calling {}. Please hold while I connect you \
                         to our customer service team.",
                        self.business.financial.name
                    ))
                } else {
                    TurnReply::ask(format!(
                        "Thank you for calling {}. Our offices are currently closed, \
                         but I can collect your information so our team can assist \
                         you first thing tomorrow. This will just take a moment.",
                        self.business.financial.name
                    ))
                }
            }
        }
    }
}

/// True on weekdays inside the configured hours window.
fn is_business_hours(now: DateTime<Local>, config: &FinancialConfig) -> bool {
    let is_weekday = now.weekday().num_days_from_monday() < 5;
    let hour = now.hour() as u8;
    is_weekday && config.business_hours_start <= hour && hour < config.business_hours_end
}
