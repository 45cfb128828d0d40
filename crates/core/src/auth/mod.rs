//! Password hashing and credential rules.

mod credentials;
mod password;

pub use credentials::{DEFAULT_CURRENCY, Registration, normalize_email, validate_new_password};
pub use password::{PasswordError, hash_password, verify_password};
