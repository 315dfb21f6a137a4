pub mod jwt;
pub mod order_id;
pub mod password;
pub mod signature;

pub use jwt::*;
pub use order_id::*;
pub use password::*;
pub use signature::*;
