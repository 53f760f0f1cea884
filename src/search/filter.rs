use crate::settings::Settings;

/// The search scope toggles: which snippet fields a query is matched
/// against, plus case sensitivity. Backed by the persisted settings; the
/// "at least one scope enabled" rule is enforced by the command layer, not
/// here. With all four scopes off a search matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilter {
    pub in_name: bool,
    pub in_tags: bool,
    pub in_code: bool,
    pub in_comment: bool,
    pub case_sensitive: bool,
}

impl SearchFilter {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            in_name: settings.search_in_name,
            in_tags: settings.search_in_tags,
            in_code: settings.search_in_code,
            in_comment: settings.search_in_comment,
            case_sensitive: settings.search_case_sensitive,
        }
    }

    /// Writes the toggles back into the settings they are backed by.
    pub fn apply(&self, settings: &mut Settings) {
        settings.search_in_name = self.in_name;
        settings.search_in_tags = self.in_tags;
        settings.search_in_code = self.in_code;
        settings.search_in_comment = self.in_comment;
        settings.search_case_sensitive = self.case_sensitive;
    }

    /// How many of the four scope toggles are on, 0..=4. Case sensitivity
    /// is not a scope and does not count.
    pub fn count_enabled(&self) -> u32 {
        [self.in_name, self.in_tags, self.in_code, self.in_comment]
            .iter()
            .filter(|enabled| **enabled)
            .count() as u32
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_enabled_covers_the_full_range() {
        let mut filter = SearchFilter {
            in_name: false,
            in_tags: false,
            in_code: false,
            in_comment: false,
            case_sensitive: true,
        };
        assert_eq!(filter.count_enabled(), 0);

        filter.in_tags = true;
        assert_eq!(filter.count_enabled(), 1);

        filter.in_name = true;
        filter.in_code = true;
        filter.in_comment = true;
        assert_eq!(filter.count_enabled(), 4);
    }

    #[test]
    fn round_trips_through_settings() {
        let mut filter = SearchFilter::default();
        filter.in_code = false;
        filter.case_sensitive = true;

        let mut settings = Settings::default();
        filter.apply(&mut settings);

        assert_eq!(SearchFilter::from_settings(&settings), filter);
        assert!(!settings.search_in_code);
        assert!(settings.search_case_sensitive);
    }
}
