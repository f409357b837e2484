//! `garrison-auth` — signed access tokens and the access gate built on them.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod codec;
pub mod error;
pub mod gate;
pub mod principal;
pub mod roles;
pub mod secret;
pub mod ttl;

pub use claims::ClaimSet;
pub use codec::{ExpiryPolicy, TokenCodec};
pub use error::TokenError;
pub use gate::{AccessGate, AuthFailure, GateError, require_role};
pub use principal::Principal;
pub use roles::Role;
pub use secret::Secret;
pub use ttl::{Ttl, TtlUnit};
