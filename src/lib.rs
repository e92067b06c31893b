//! schemadoc - An interactive, strict data source schema configurator
//!
//! An operator describes a data source and its tables at a prompt; every
//! attribute is validated by the schema engine and the result is exported
//! as JSON documents that round-trip back through the builders.

pub mod cli;
pub mod configurator;
pub mod export;
pub mod observability;
pub mod schema;
