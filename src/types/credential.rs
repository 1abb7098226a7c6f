//! Cached upstream secrets
//!
//! Defines the credential (combined cookie string) and the derived streaming
//! token, each stamped with the time it was acquired.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Combined `Set-Cookie` values handed out by the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// All `Set-Cookie` values joined with `"; "`
    pub value: String,
    /// When the credential was fetched
    pub acquired_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential from its raw header values
    pub fn from_set_cookie_headers(headers: &[String], acquired_at: DateTime<Utc>) -> Self {
        Self {
            value: headers.join("; "),
            acquired_at,
        }
    }

    /// Whether the credential is still inside its TTL at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.acquired_at < ttl
    }
}

/// Normalized streaming token `in=<hex32>::<hex32>::<epoch>::ni`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token string including the `in=` prefix
    pub value: String,
    /// When the token was derived
    pub acquired_at: DateTime<Utc>,
    /// Acquisition time of the credential used to derive it
    pub credential_acquired_at: DateTime<Utc>,
}

impl Token {
    /// Whether both the token and its source credential are inside their TTLs
    pub fn is_fresh(
        &self,
        now: DateTime<Utc>,
        token_ttl: Duration,
        credential_ttl: Duration,
    ) -> bool {
        now - self.acquired_at < token_ttl && now - self.credential_acquired_at < credential_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_joins_all_headers() {
        let now = Utc::now();
        let headers = vec![
            "t_hash=abc; Path=/".to_string(),
            "t_hash_t=def; Path=/".to_string(),
        ];
        let credential = Credential::from_set_cookie_headers(&headers, now);
        assert_eq!(credential.value, "t_hash=abc; Path=/; t_hash_t=def; Path=/");
    }

    #[test]
    fn test_credential_ttl_boundary() {
        let t0 = Utc::now();
        let ttl = Duration::seconds(3600);
        let credential = Credential::from_set_cookie_headers(&["a=b".to_string()], t0);

        assert!(credential.is_fresh(t0 + Duration::seconds(3599), ttl));
        assert!(!credential.is_fresh(t0 + Duration::seconds(3600), ttl));
        assert!(!credential.is_fresh(t0 + Duration::seconds(3601), ttl));
    }

    #[test]
    fn test_token_capped_by_credential_ttl() {
        let t0 = Utc::now();
        let ttl = Duration::seconds(3600);
        let token = Token {
            value: "in=x::y::1::ni".to_string(),
            acquired_at: t0 + Duration::seconds(1800),
            credential_acquired_at: t0,
        };

        assert!(token.is_fresh(t0 + Duration::seconds(3000), ttl, ttl));
        // Token itself is only 30 minutes old here, but its credential has expired
        assert!(!token.is_fresh(t0 + Duration::seconds(3700), ttl, ttl));
    }
}
