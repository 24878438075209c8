//! Reversible credential obfuscation.
//!
//! This is obfuscation against casual inspection of the store files, not a
//! security boundary: the transform is deterministic, reversible, and uses no
//! key material. Real confidentiality needs an OS secret store instead.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode a secret into its stored token form.
pub fn obfuscate(secret: &str) -> String {
    let reversed: Vec<u8> = secret.as_bytes().iter().rev().copied().collect();
    STANDARD.encode(reversed)
}

/// Decode a stored token back into the secret.
///
/// Fails soft: malformed input yields an empty string, which callers treat
/// as "no usable credential".
pub fn reveal(token: &str) -> String {
    let Ok(reversed) = STANDARD.decode(token.trim()) else {
        return String::new();
    };
    let bytes: Vec<u8> = reversed.into_iter().rev().collect();
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{obfuscate, reveal};
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_printable_secrets() {
        for secret in ["sk-abc123", "", "spaces and punctuation!?", "한국어 비밀", "🔑"] {
            assert_eq!(reveal(&obfuscate(secret)), secret);
        }
    }

    #[test]
    fn token_is_not_the_plain_secret() {
        let secret = "sk-abc123";
        assert_ne!(obfuscate(secret), secret);
    }

    #[test]
    fn malformed_token_reveals_empty() {
        assert_eq!(reveal("not base64 at all!"), "");
        assert_eq!(reveal("@@@@"), "");
    }

    #[test]
    fn invalid_utf8_reveals_empty() {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;
        let token = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert_eq!(reveal(&token), "");
    }
}
