//! Device fingerprint derivation.

use sha2::{Digest, Sha256};

use worklane_entity::device::SessionAttributes;

/// Derives a stable device token from connection attributes.
///
/// Used when the client supplies no explicit device token. Best-effort
/// identification only: two devices behind the same NAT with the same
/// User-Agent collapse into one session row, which is acceptable for an
/// advisory listing.
pub fn derive_fingerprint(attributes: &SessionAttributes) -> String {
    let mut hasher = Sha256::new();
    hasher.update(attributes.ip_address.as_deref().unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(attributes.user_agent.as_deref().unwrap_or("").as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(ip: &str, ua: &str) -> SessionAttributes {
        SessionAttributes {
            ip_address: Some(ip.to_string()),
            user_agent: Some(ua.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = derive_fingerprint(&attrs("10.0.0.1", "Mozilla/5.0"));
        let b = derive_fingerprint(&attrs("10.0.0.1", "Mozilla/5.0"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_with_inputs() {
        let a = derive_fingerprint(&attrs("10.0.0.1", "Mozilla/5.0"));
        let b = derive_fingerprint(&attrs("10.0.0.2", "Mozilla/5.0"));
        let c = derive_fingerprint(&attrs("10.0.0.1", "curl/8.0"));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_missing_attributes_still_fingerprint() {
        let fp = derive_fingerprint(&SessionAttributes::default());
        assert_eq!(fp.len(), 64);
    }
}
