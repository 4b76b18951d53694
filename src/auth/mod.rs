//! Authentication and authorization for Helix
//!
//! Provides:
//! - JWT token generation and validation
//! - Role allow-lists for operation authorization
//! - Password hashing with Argon2

pub mod jwt;
pub mod password;
pub mod roles;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenValidationResult};
pub use password::{hash_password, verify_password};
pub use roles::{is_allowed, Role, ADMIN_ONLY, ANY_ROLE, ASSOCIATE_ONLY, SUPERVISION};
