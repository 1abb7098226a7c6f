//! Upstream authentication
//!
//! The credential cache and the token deriver, plus the injectable clock
//! both use to evaluate their TTLs.

pub mod clock;
pub mod credential;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{CredentialCache, DEFAULT_CREDENTIAL_TTL_SECS};
pub use token::{DEFAULT_TOKEN_TTL_SECS, TokenDeriver, extract_token};
