//! Item classification.
//!
//! Maps a [`Record`] to the [`Category`] shown in the Type column. The mapping
//! is a pure function of the record's fields and is recomputed wherever it is
//! needed rather than stored.

use crate::domain::Record;
use std::fmt;

const PERSONAL_INFO_KEYS: [&str; 4] = ["firstName", "lastName", "birthDate", "gender"];
const ADDRESS_KEYS: [&str; 4] = ["address1", "city", "zipCode", "country"];
const CARD_KEYS: [&str; 2] = ["cardHolderName", "cardNumber"];
const ID_DOCUMENT_KEYS: [&str; 2] = ["licenseNumber", "stateOfIssue"];

/// Display category of a vault item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Login,
    SecureNote,
    PersonalInfo,
    Address,
    CreditCard,
    IdDocument,
    WebsiteOnly,
    Other,
}

impl Category {
    /// Human-readable label, also used as the Type column sort key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::SecureNote => "Secure Note",
            Self::PersonalInfo => "Personal Info",
            Self::Address => "Address",
            Self::CreditCard => "Credit Card",
            Self::IdDocument => "ID",
            Self::WebsiteOnly => "Website Only",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a record. First match wins:
///
/// 1. truthy `password` → [`Category::Login`]
/// 2. non-empty `note` → [`Category::SecureNote`]
/// 3. any personal-info key present → [`Category::PersonalInfo`]
/// 4. any address key present → [`Category::Address`]
/// 5. any card key present → [`Category::CreditCard`]
/// 6. any licence key present → [`Category::IdDocument`]
/// 7. truthy `website` → [`Category::WebsiteOnly`]
/// 8. otherwise [`Category::Other`]
///
/// # Examples
///
/// ```
/// use dashview::domain::{classify, Category, Record};
///
/// let note: Record = serde_json::from_str(r#"{"title":"N1","note":"hi"}"#).unwrap();
/// assert_eq!(classify(&note), Category::SecureNote);
/// ```
#[must_use]
pub fn classify(record: &Record) -> Category {
    let any_key = |keys: &[&str]| keys.iter().any(|k| record.has_key(k));

    if record.is_truthy("password") {
        Category::Login
    } else if record.has_non_empty("note") {
        Category::SecureNote
    } else if any_key(&PERSONAL_INFO_KEYS) {
        Category::PersonalInfo
    } else if any_key(&ADDRESS_KEYS) {
        Category::Address
    } else if any_key(&CARD_KEYS) {
        Category::CreditCard
    } else if any_key(&ID_DOCUMENT_KEYS) {
        Category::IdDocument
    } else if record.is_truthy("website") {
        Category::WebsiteOnly
    } else {
        Category::Other
    }
}

/// Explains why a record has nothing to copy as a password.
#[must_use]
pub fn missing_password_message(record: &Record) -> String {
    let title = record.title();
    match classify(record) {
        Category::SecureNote => format!("'{title}' is a Secure Note. No password to display."),
        Category::PersonalInfo => {
            format!("'{title}' is a Personal Info entry. No password to display.")
        }
        Category::Address => format!("'{title}' is an Address entry. No password to display."),
        Category::CreditCard => {
            format!("'{title}' is a Credit Card entry. No password to display.")
        }
        Category::IdDocument => format!("'{title}' is an ID entry. No password to display."),
        Category::WebsiteOnly => {
            format!("'{title}' is a website link without a password. No password to display.")
        }
        Category::Login | Category::Other => {
            format!("No password found for '{title}'. This item might be of an unsupported type.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn password_wins_over_everything() {
        let r = record(json!({
            "password": "p", "note": "n", "firstName": "A", "cardNumber": "1", "website": "w"
        }));
        assert_eq!(classify(&r), Category::Login);
    }

    #[test]
    fn empty_password_falls_through() {
        assert_eq!(classify(&record(json!({ "password": "", "note": "n" }))), Category::SecureNote);
        assert_eq!(classify(&record(json!({ "password": null }))), Category::Other);
    }

    #[test]
    fn grouped_fields_match_on_key_presence() {
        assert_eq!(classify(&record(json!({ "gender": null }))), Category::PersonalInfo);
        assert_eq!(classify(&record(json!({ "city": "" }))), Category::Address);
        assert_eq!(classify(&record(json!({ "cardHolderName": "X" }))), Category::CreditCard);
        assert_eq!(classify(&record(json!({ "stateOfIssue": "CA" }))), Category::IdDocument);
    }

    #[test]
    fn website_needs_a_value() {
        assert_eq!(classify(&record(json!({ "website": "x.com" }))), Category::WebsiteOnly);
        assert_eq!(classify(&record(json!({ "website": "" }))), Category::Other);
    }

    #[test]
    fn classification_is_deterministic() {
        let r = record(json!({ "title": "T", "address1": "Main St", "note": "" }));
        assert_eq!(classify(&r), classify(&r.clone()));
        assert_eq!(classify(&r), Category::Address);
    }

    #[test]
    fn missing_password_message_names_the_category() {
        let note = record(json!({ "title": "X", "note": "secret" }));
        assert_eq!(
            missing_password_message(&note),
            "'X' is a Secure Note. No password to display."
        );
    }
}
