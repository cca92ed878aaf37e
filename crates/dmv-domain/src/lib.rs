//! DMV domain: vehicles, registrants, facilities and the rules between them

pub mod model;
pub mod policy;
pub mod service;

pub use model::*;
pub use policy::RulePolicy;
pub use service::Refusal;
