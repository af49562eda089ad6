//! Tool metadata: the declarative parameter descriptors a command line
//! subcommand is generated from.

mod annotation;
mod spec;

pub use annotation::{flag_shape, Annotation, FlagShape, ScalarType};
pub use spec::{FlagRole, FlagSpec, ParamSpec, ResultRoutine, ToolSpec, NO_HELP};
