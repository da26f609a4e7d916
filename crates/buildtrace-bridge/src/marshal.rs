//! Host fields to borrowed engine views.
//!
//! The produced views point into the host's strings. They live no longer than
//! the borrowed `&[Field]`, so they cannot outlive the call that hands them to
//! the engine.

use buildtrace_engine::FfiField;
use buildtrace_kernel::Field;

pub fn marshal_field(field: &Field) -> FfiField<'_> {
    match field {
        Field::Int(i) => FfiField::num(*i),
        Field::String(s) => FfiField::string(s),
        // a field type this bridge predates; the engine drops it
        _ => FfiField::unknown(),
    }
}

/// One view per field, in order.
pub fn marshal_fields(fields: &[Field]) -> Vec<FfiField<'_>> {
    fields.iter().map(marshal_field).collect()
}
