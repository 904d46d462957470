//! Migration checksum computation

use sha2::{Digest, Sha256};

/// Compute the SHA-256 checksum of a migration body
pub fn compute_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_deterministic() {
        assert_eq!(compute_checksum("CREATE TABLE t (id)"), compute_checksum("CREATE TABLE t (id)"));
    }

    #[test]
    fn test_checksum_differs_for_different_sql() {
        assert_ne!(compute_checksum("a"), compute_checksum("b"));
    }
}
