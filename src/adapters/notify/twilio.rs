//! Twilio SMS notifier.
//!
//! Sends the caller-facing reservation confirmation and pages on-call
//! staff for urgent/high inquiries. Fire-and-forget: every failure is
//! logged and swallowed so a notification problem can never fail a turn.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::domain::dialogue::Priority;
use crate::domain::records::{Inquiry, Record, Reservation};
use crate::ports::Notifier;

/// Configuration for the Twilio SMS notifier.
#[derive(Debug, Clone)]
pub struct TwilioSmsConfig {
    /// Twilio account SID.
    pub account_sid: String,
    /// Twilio auth token.
    auth_token: Secret<String>,
    /// Sending phone number in E.164 form.
    pub from_number: String,
    /// Restaurant name mentioned in confirmations.
    pub restaurant_name: String,
    /// Restaurant line mentioned for changes.
    pub restaurant_phone: String,
    /// On-call staff number paged for urgent/high inquiries.
    pub oncall_staff_phone: Option<String>,
    /// API base URL (overridable for tests).
    pub base_url: String,
}

impl TwilioSmsConfig {
    /// Creates a new configuration.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: Secret::new(auth_token.into()),
            from_number: from_number.into(),
            restaurant_name: String::new(),
            restaurant_phone: String::new(),
            oncall_staff_phone: None,
            base_url: "https://api.twilio.com".to_string(),
        }
    }

    /// Sets the business facts mentioned in message bodies.
    pub fn with_business_facts(
        mut self,
        restaurant_name: impl Into<String>,
        restaurant_phone: impl Into<String>,
        oncall_staff_phone: Option<String>,
    ) -> Self {
        self.restaurant_name = restaurant_name.into();
        self.restaurant_phone = restaurant_phone.into();
        self.oncall_staff_phone = oncall_staff_phone;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn auth_token(&self) -> &str {
        self.auth_token.expose_secret()
    }
}

/// SMS notifier backed by the Twilio REST API.
pub struct TwilioSmsNotifier {
    config: TwilioSmsConfig,
    client: Client,
}

impl TwilioSmsNotifier {
    /// Creates a new notifier with the given configuration.
    pub fn new(config: TwilioSmsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url, self.config.account_sid
        )
    }

    /// Caller-facing confirmation body for a reservation.
    fn reservation_body(&self, reservation: &Reservation) -> String {
        format!(
            "Hi {}! Your table for {} is confirmed for {} at {} at {}. Call {} for changes.",
            reservation.name,
            reservation.party_size,
            reservation.date,
            reservation.time,
            self.config.restaurant_name,
            self.config.restaurant_phone,
        )
    }

    /// Staff paging body for an urgent/high inquiry.
    fn staff_body(inquiry: &Inquiry) -> String {
        let mut reason = inquiry.reason.clone();
        if reason.len() > 100 {
            reason.truncate(100);
            reason.push_str("...");
        }
        format!(
            "New {} priority inquiry from {} ({}). Reason: {}",
            inquiry.priority, inquiry.name, inquiry.phone, reason
        )
    }

    async fn send_sms(&self, to: &str, body: &str) {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let result = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(self.config.auth_token()))
            .form(&params)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(to, "SMS sent");
            }
            Ok(response) => {
                tracing::error!(to, status = %response.status(), "Twilio rejected SMS");
            }
            Err(err) => {
                tracing::error!(to, error = %err, "Failed to send SMS");
            }
        }
    }
}

#[async_trait]
impl Notifier for TwilioSmsNotifier {
    async fn notify(&self, record: &Record) {
        match record {
            Record::Reservation(reservation) => {
                let body = self.reservation_body(reservation);
                self.send_sms(&reservation.phone, &body).await;
            }
            Record::Inquiry(inquiry) => {
                tracing::info!(
                    inquiry_id = %inquiry.id,
                    priority = %inquiry.priority,
                    "new inquiry recorded"
                );
                if inquiry.priority >= Priority::High {
                    match &self.config.oncall_staff_phone {
                        Some(staff_phone) => {
                            let body = Self::staff_body(inquiry);
                            self.send_sms(staff_phone, &body).await;
                        }
                        None => tracing::warn!(
                            inquiry_id = %inquiry.id,
                            "urgent inquiry but no on-call staff phone configured"
                        ),
                    }
                }
            }
        }
    }
}
