//! Authentication module
//!
//! Access tokens are issued by the identity service; this backend only
//! verifies them and extracts the user id.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
