//! Per-deployment business facts.
//!
//! Everything a caller can hear about the business lives here: names,
//! phone lines, the hours window, the address, and the menu seed. The
//! defaults describe a neutral demo deployment.

use serde::Deserialize;

use super::error::ValidationError;

/// Business facts for both served lines.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessConfig {
    /// Restaurant line facts
    #[serde(default)]
    pub restaurant: RestaurantConfig,

    /// Financial (credit union) line facts
    #[serde(default)]
    pub financial: FinancialConfig,
}

impl BusinessConfig {
    /// Validate business configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.financial.validate()
    }
}

/// Restaurant business facts.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantConfig {
    /// Restaurant name spoken in greetings
    #[serde(default = "default_restaurant_name")]
    pub name: String,

    /// Staffed line callers are connected to on errors
    #[serde(default)]
    pub phone: String,

    /// Street address read back for location questions
    #[serde(default = "default_address")]
    pub address: String,

    /// Operating-hours sentence read back for hours questions
    #[serde(default = "default_hours_text")]
    pub hours_text: String,

    /// Menu facts served for menu questions
    #[serde(default = "default_menu")]
    pub menu: Vec<MenuItemConfig>,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: default_restaurant_name(),
            phone: String::new(),
            address: default_address(),
            hours_text: default_hours_text(),
            menu: default_menu(),
        }
    }
}

/// One menu entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemConfig {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
}

/// Financial line business facts.
#[derive(Debug, Clone, Deserialize)]
pub struct FinancialConfig {
    /// Institution name spoken in greetings
    #[serde(default = "default_financial_name")]
    pub name: String,

    /// Staffed line used for daytime transfers
    #[serde(default)]
    pub daytime_line: String,

    /// On-call staff phone paged for urgent/high inquiries
    pub oncall_staff_phone: Option<String>,

    /// Weekday business hours window, 24-hour clock
    #[serde(default = "default_hours_start")]
    pub business_hours_start: u8,

    #[serde(default = "default_hours_end")]
    pub business_hours_end: u8,
}

impl FinancialConfig {
    /// Validate the hours window
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.business_hours_start >= self.business_hours_end || self.business_hours_end > 24 {
            return Err(ValidationError::InvalidBusinessHours);
        }
        Ok(())
    }
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            name: default_financial_name(),
            daytime_line: String::new(),
            oncall_staff_phone: None,
            business_hours_start: default_hours_start(),
            business_hours_end: default_hours_end(),
        }
    }
}

fn default_restaurant_name() -> String {
    "our restaurant".to_string()
}

fn default_financial_name() -> String {
    "our credit union".to_string()
}

fn default_address() -> String {
    "123 Main Street".to_string()
}

fn default_hours_text() -> String {
    "We're open daily from 11 AM to 10 PM.".to_string()
}

fn default_hours_start() -> u8 {
    9
}

fn default_hours_end() -> u8 {
    17
}

fn default_menu() -> Vec<MenuItemConfig> {
    vec![
        MenuItemConfig {
            name: "Grilled Salmon".to_string(),
            description: "Fresh Atlantic salmon with lemon herb butter".to_string(),
            price: "$24.99".to_string(),
            category: "Main Course".to_string(),
        },
        MenuItemConfig {
            name: "Caesar Salad".to_string(),
            description: "Romaine lettuce, parmesan cheese, croutons, Caesar dressing".to_string(),
            price: "$12.99".to_string(),
            category: "Appetizer".to_string(),
        },
        MenuItemConfig {
            name: "Chocolate Cake".to_string(),
            description: "Rich chocolate cake with vanilla ice cream".to_string(),
            price: "$8.99".to_string(),
            category: "Dessert".to_string(),
        },
    ]
}
