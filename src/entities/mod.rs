pub mod chain_transactions;
pub mod drafts;
pub mod users;

pub use chain_transactions as chain_transaction_entity;
pub use drafts as draft_entity;
pub use users as user_entity;

pub use drafts::ContentCategory;
pub use users::PlanId;
