//! Access-token verification for the identified variant

mod session_token;

pub use session_token::{SessionClaims, SessionTokenVerifier};
