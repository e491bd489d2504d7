//! Data Transfer Objects for REST request/response serialization.
//!
//! All wire field names are camelCase to match the web client; request
//! fields are lenient `Option`s so the handlers own validation and its
//! error messages.

pub mod generate_dto;
pub mod refine_dto;
pub mod trip_dto;

pub use generate_dto::*;
pub use refine_dto::*;
pub use trip_dto::*;
