mod password;
mod signing;

pub use password::{ hash_password, verify_password };
pub use signing::SessionSigner;
