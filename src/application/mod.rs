pub mod auth_service;
pub mod catalog_service;
pub mod errors;
pub mod loan_service;
pub mod member_service;

pub use errors::{ApplicationError, Result};
pub use loan_service::{MAX_OPEN_LOANS, ServiceDependencies};
