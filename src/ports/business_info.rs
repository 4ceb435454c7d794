//! Informational content port (menu and hours/location facts).

/// Topic of an informational lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoTopic {
    /// Menu items, dishes, prices.
    Menu,
    /// Operating hours and address.
    HoursLocation,
}

/// Port for static business facts served back to callers.
///
/// The content is deployment configuration, not code; the query text lets
/// an implementation pick the closest matching fact for a topic.
pub trait BusinessInfo: Send + Sync {
    /// Returns the reply text for a topic, optionally narrowed by the
    /// caller's own words.
    fn lookup(&self, topic: InfoTopic, query: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_info_is_object_safe() {
        fn _accepts_dyn(_info: &dyn BusinessInfo) {}
    }
}
