//! Request/response data-shape validation for a user-management API.
//!
//! Untrusted decoded records are checked against declarative schema tables
//! (field presence, type, and format rules) and either bound to typed
//! records or rejected with an ordered list of field-level errors. All
//! validation is synchronous, pure, and free of shared state.

pub mod error;
pub mod models;
pub mod schema;
pub mod validation;

pub use error::{Error, FieldError, Result, ValidationErrors, Violation};
pub use models::users::{
    LoginRequest, UserBase, UserCreate, UserListResponse, UserResponse, UserRole, UserUpdate,
    Validated, validate,
};
pub use schema::{FieldKind, FieldRule, Schema, SchemaVariant};
