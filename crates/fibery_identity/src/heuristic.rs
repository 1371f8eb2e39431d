//! Identity field heuristic.
//!
//! Only the reserved pair of field names is guaranteed to mean what it says;
//! everything else is matched by naming convention. Exact matches are
//! case-sensitive, convention matches are not.

use fibery_core::Database;

/// Reserved email field
pub const EMAIL_FIELD: &str = "fibery/email";
/// Reserved display-name field
pub const NAME_FIELD: &str = "fibery/name";

/// Pick the email field of a database, if any
///
/// The reserved field wins; otherwise the first field, in catalogue order,
/// whose name contains `email` in any case. That covers every `.../Email`
/// suffix too.
#[must_use]
pub fn find_email_field<'a>(field_names: &[&'a str]) -> Option<&'a str> {
    if field_names.contains(&EMAIL_FIELD) {
        return Some(EMAIL_FIELD);
    }

    field_names
        .iter()
        .copied()
        .find(|name| name.to_lowercase().contains("email"))
}

/// Pick the display-name field of a database, if any
///
/// The reserved field wins; otherwise the first field whose name ends with
/// `/name` in any case. Substrings are not matched, unlike email.
#[must_use]
pub fn find_name_field<'a>(field_names: &[&'a str]) -> Option<&'a str> {
    if field_names.contains(&NAME_FIELD) {
        return Some(NAME_FIELD);
    }

    field_names
        .iter()
        .copied()
        .find(|name| name.to_lowercase().ends_with("/name"))
}

/// Detected identity fields of one database
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityFields<'a> {
    /// Email field
    pub email: Option<&'a str>,
    /// Display-name field
    pub name: Option<&'a str>,
}

impl<'a> IdentityFields<'a> {
    /// Classify an ordered list of field names
    #[must_use]
    pub fn classify(field_names: &[&'a str]) -> Self {
        Self {
            email: find_email_field(field_names),
            name: find_name_field(field_names),
        }
    }

    /// Classify the fields of a database
    #[must_use]
    pub fn of(database: &'a Database) -> Self {
        let names: Vec<&str> = database.field_names().collect();
        Self::classify(&names)
    }

    /// Whether either field was found
    #[must_use]
    pub fn any(&self) -> bool {
        self.email.is_some() || self.name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibery_core::Field;

    #[test]
    fn test_reserved_email_wins() {
        let fields = ["People/Work Email", "fibery/email"];
        assert_eq!(find_email_field(&fields), Some("fibery/email"));
    }

    #[test]
    fn test_email_suffix() {
        let fields = ["fibery/id", "Directory/Email"];
        assert_eq!(find_email_field(&fields), Some("Directory/Email"));
    }

    #[test]
    fn test_email_substring_first_in_order() {
        let fields = ["fibery/id", "CRM/Primary EMAIL Address", "CRM/Email"];
        assert_eq!(find_email_field(&fields), Some("CRM/Primary EMAIL Address"));
    }

    #[test]
    fn test_email_exact_match_is_case_sensitive() {
        let fields = ["Fibery/Email"];
        // Not the reserved field, but still caught by the convention.
        assert_eq!(find_email_field(&fields), Some("Fibery/Email"));
        assert_eq!(find_email_field(&["fibery/id"]), None);
    }

    #[test]
    fn test_reserved_name_wins() {
        let fields = ["People/Name", "fibery/name"];
        assert_eq!(find_name_field(&fields), Some("fibery/name"));
    }

    #[test]
    fn test_name_suffix_case_insensitive() {
        let fields = ["fibery/id", "People/NAME"];
        assert_eq!(find_name_field(&fields), Some("People/NAME"));
    }

    #[test]
    fn test_name_ignores_substring() {
        let fields = ["People/Display Name History", "People/Nickname"];
        assert_eq!(find_name_field(&fields), None);
    }

    #[test]
    fn test_classify_database() {
        let db = Database::new(
            "People/User Profile",
            [
                Field {
                    name: "fibery/id".to_string(),
                    field_type: None,
                },
                Field {
                    name: "People/Name".to_string(),
                    field_type: None,
                },
            ],
        );
        let fields = IdentityFields::of(&db);
        assert_eq!(fields.email, None);
        assert_eq!(fields.name, Some("People/Name"));
        assert!(fields.any());
        assert!(!IdentityFields::default().any());
    }
}
