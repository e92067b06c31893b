//! Schema engine: type registry, bound resolution, constraint validation
//!
//! Pure and synchronous: every operation is a function over its inputs
//! with no shared state and no I/O.

pub mod bounds;
pub mod errors;
pub mod types;
pub mod validator;

pub use bounds::{Bound, ResolvedRange};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails, ValidationErrors};
pub use types::{
    auto_generate, DataSourceDescriptor, Factory, FieldDescriptor, FieldType, SourceKind,
    TableDescriptor, FACTORY_CHOICES, SOURCE_KIND_CHOICES, TYPE_CHOICES,
};
pub use validator::{resolve_value, Resolution};
