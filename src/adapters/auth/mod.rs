//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port. The engine trusts an
//! upstream identity service to issue tokens; these adapters only verify
//! and decode them.

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
