//! Password hashing, session cookies and the authenticated-user extractors

pub mod extract;
pub mod password;
pub mod session;

pub use extract::{AuthUser, MaybeUser};
pub use password::{hash_password, verify_password};
pub use session::{
    clear_session_cookie, session_id_from_headers, start_session, SESSION_COOKIE,
};

/// Lowercase hex encoding
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Inverse of [`to_hex`]; `None` on odd length or non-hex input
pub(crate) fn from_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(&[0x00, 0xab, 0x7f]), "00ab7f");
        assert_eq!(from_hex("00ab7f"), Some(vec![0x00, 0xab, 0x7f]));
        assert_eq!(from_hex("abc"), None);
        assert_eq!(from_hex("zz"), None);
    }
}
