pub mod draft;
pub mod generation;
pub mod pagination;
pub mod plan;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use draft::*;
pub use generation::*;
pub use pagination::*;
pub use plan::*;
pub use subscription::*;
pub use transaction::*;
pub use user::*;
