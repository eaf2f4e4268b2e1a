//! Session state, identifiers, token secrets, and refresh-token callbacks.

pub mod callback;
pub mod id;
pub mod session;
pub mod token;

pub use callback::*;
pub use id::*;
pub use session::*;
pub use token::{jwt::*, secret::*};
