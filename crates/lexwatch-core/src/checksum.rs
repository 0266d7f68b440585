//! Content fingerprints for fast equality checks between snapshots.

use ring::digest::{SHA256, digest};

/// Lowercase hex SHA-256 of a document body.
pub fn content_checksum(content: &str) -> String {
    let hash = digest(&SHA256, content.as_bytes());
    hash.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_known_digest() {
        assert_eq!(
            content_checksum(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn differs_on_single_character() {
        assert_ne!(content_checksum("Section 1"), content_checksum("Section 2"));
    }

    #[test]
    fn is_64_hex_chars() {
        let sum = content_checksum("Line A\nLine B");
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
