pub mod jwks;
pub mod middleware;
pub mod verifier;

pub use verifier::{IdentityResolver, Principal, ResolveError};
