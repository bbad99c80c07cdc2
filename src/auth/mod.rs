pub mod jwt;
pub mod password;

pub use jwt::{create_access_token, verify_jwt};
pub use password::{hash_password, verify_password};
