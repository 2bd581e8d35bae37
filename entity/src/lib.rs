use uuid::Uuid;

pub mod application_status;
pub mod applications;
pub mod chat_messages;
pub mod connection_status;
pub mod connections;
pub mod goals;
pub mod matching_preferences;
pub mod notification_type;
pub mod notifications;
pub mod profiles;
pub mod roles;
pub mod session_status;
pub mod sessions;
pub mod string_list;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;

/// Users are issued by the external identity provider and referenced by its
/// opaque, stable identifier.
pub type UserId = String;

/// Orders a pair of user ids so that `(a, b)` and `(b, a)` share one key.
pub fn canonical_pair(a: &str, b: &str) -> (UserId, UserId) {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        assert_eq!(canonical_pair("mentor", "mentee"), canonical_pair("mentee", "mentor"));
        assert_eq!(
            canonical_pair("b", "a"),
            ("a".to_string(), "b".to_string())
        );
    }
}
