//! JSON Schema to Gemini `ParameterSchema` conversion.
//!
//! Only the practical subset is modelled: type, description, properties,
//! items, required and enum. Every other keyword is dropped silently.

mod convert;
mod union;

pub use convert::convert_schema;
