//! RFC 5545 document generation and structural validation.

pub mod builder;
pub mod validate;
