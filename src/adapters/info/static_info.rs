//! Static business facts served from configuration.
//!
//! Menu queries do naive dish-name matching against the caller's words and
//! fall back to a category summary when nothing matches.

use crate::config::RestaurantConfig;
use crate::ports::{BusinessInfo, InfoTopic};

/// BusinessInfo implementation over the injected restaurant configuration.
#[derive(Debug, Clone)]
pub struct StaticBusinessInfo {
    restaurant: RestaurantConfig,
}

impl StaticBusinessInfo {
    /// Creates a new info adapter from restaurant configuration.
    pub fn new(restaurant: RestaurantConfig) -> Self {
        Self { restaurant }
    }

    fn menu_reply(&self, query: &str) -> String {
        let query_lower = query.to_lowercase();

        // Closest match: any word of a dish name appearing in the query.
        let matched = self.restaurant.menu.iter().find(|item| {
            item.name
                .to_lowercase()
                .split_whitespace()
                .any(|word| word.len() > 3 && query_lower.contains(word))
        });

        if let Some(item) = matched {
            return format!(
                "Our {} is {} It's {}. Would you like to hear about anything else?",
                item.name,
                ensure_period(&item.description),
                item.price
            );
        }

        let categories: Vec<&str> = {
            let mut seen = Vec::new();
            for item in &self.restaurant.menu {
                if !seen.contains(&item.category.as_str()) {
                    seen.push(item.category.as_str());
                }
            }
            seen
        };

        if categories.is_empty() {
            "I can help you with information about our menu. What would you like to know about our dishes?".to_string()
        } else {
            format!(
                "Our menu features {} selections. What would you like to know about our dishes?",
                categories.join(", ").to_lowercase()
            )
        }
    }

    fn hours_location_reply(&self) -> String {
        format!(
            "{} You can find us at {}. Is there anything else I can help you with?",
            self.restaurant.hours_text, self.restaurant.address
        )
    }
}

impl BusinessInfo for StaticBusinessInfo {
    fn lookup(&self, topic: InfoTopic, query: &str) -> String {
        match topic {
            InfoTopic::Menu => self.menu_reply(query),
            InfoTopic::HoursLocation => self.hours_location_reply(),
        }
    }
}

fn ensure_period(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}
