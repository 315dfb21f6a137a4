use uuid::Uuid;

/// Generate an order identifier for the payment widget.
///
/// Must be unique and unpredictable across all users and time: the IPN
/// callback resolves orders by this value alone, so a guessable id would
/// let one payment activate somebody else's upgrade.
pub fn generate_order_id() -> String {
    format!("ord_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_format() {
        let id = generate_order_id();
        assert!(id.starts_with("ord_"));
        assert_eq!(id.len(), 4 + 32);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_order_ids_are_unique() {
        let a = generate_order_id();
        let b = generate_order_id();
        assert_ne!(a, b);
    }
}
