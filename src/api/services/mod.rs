//! Services module - contains request-facing business logic.

pub mod jwt_service;
pub mod validation;

pub use jwt_service::{Claims, JwtService, SharedJwtService};
pub use validation::FieldError;
