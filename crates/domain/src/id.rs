//! ID generation utilities.

use uuid::Uuid;

/// Generates a new request correlation id as a string.
///
/// UUID v7 includes timestamp information and is sortable, which keeps
/// request logs in emission order.
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_format() {
        let id = generate_request_id();
        // UUID format: 8-4-4-4-12 = 36 chars
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_request_id_uniqueness() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
