//! Access/refresh token secrets and the unverified access-token payload decoder.

pub mod jwt;
pub mod secret;
