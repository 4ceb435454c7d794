//! Outbound SMS notification configuration.

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Twilio SMS configuration.
///
/// Without credentials the process runs in demo mode: every notification is
/// logged instead of sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsConfig {
    /// Twilio account SID
    pub twilio_account_sid: Option<String>,

    /// Twilio auth token
    pub twilio_auth_token: Option<Secret<String>>,

    /// Sending phone number in E.164 form
    pub twilio_from_number: Option<String>,
}

impl NotificationsConfig {
    /// True when a full Twilio credential set is present.
    pub fn has_twilio(&self) -> bool {
        self.twilio_account_sid.as_ref().is_some_and(|s| !s.is_empty())
            && self.twilio_auth_token.is_some()
            && self.twilio_from_number.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Validate notification configuration
    ///
    /// Either no Twilio value is set (demo mode) or all of them are.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let any_set = self.twilio_account_sid.is_some()
            || self.twilio_auth_token.is_some()
            || self.twilio_from_number.is_some();

        if any_set && !self.has_twilio() {
            if self.twilio_account_sid.as_ref().map_or(true, |s| s.is_empty()) {
                return Err(ValidationError::IncompleteTwilioConfig("twilio_account_sid"));
            }
            if self.twilio_auth_token.is_none() {
                return Err(ValidationError::IncompleteTwilioConfig("twilio_auth_token"));
            }
            return Err(ValidationError::IncompleteTwilioConfig("twilio_from_number"));
        }
        Ok(())
    }
}
