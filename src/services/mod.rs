pub mod auth_service;
pub mod draft_service;
pub mod notary_service;
pub mod subscription_service;
pub mod usage_service;
pub mod user_service;

pub use auth_service::*;
pub use draft_service::*;
pub use notary_service::*;
pub use subscription_service::*;
pub use usage_service::*;
pub use user_service::*;
