//! Service layer module
//!
//! Contains the authenticated transport, request encoding, response
//! decoding and field validation

pub mod decoder;
pub mod encoder;
pub mod session;
pub mod validator;

pub use decoder::Repair;
pub use encoder::{Mutation, Query, ToQuery};
pub use session::Session;
pub use validator::{Validate, ValidationError};
