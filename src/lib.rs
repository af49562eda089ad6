//! simplevc
//!
//! Several dated implementations of one logical function live side by side
//! in a module; callers pick one explicitly or through the module's active
//! version, and the same functions are exposed as shell subcommands
//! generated from declared parameter metadata.
//!
//! # Model
//!
//! - **Version keys** are `yyyymmdd` labels ordered by (year, month, day).
//! - **Resolution** is as-of: the latest registered version not newer than
//!   the requested one. Requests older than every version fail.
//! - **Active version** is per module, seeded from a process-wide default
//!   (today's date unless overridden).
//! - **Tools** are functions with command line metadata; a tool appears on
//!   the command line only once a version of it resolves.
//!
//! This is not a version control system: it stores no history and computes
//! no diffs. It only dispatches among implementations that already coexist.
//!
//! ```no_run
//! use simplevc::registry::{CallArgs, VersionedModule};
//! use serde_json::Value;
//!
//! let module = VersionedModule::new("pipeline");
//! module.register_fn("greet", "20200601", "Say hi", |_| Ok(Value::from("hi")))?;
//! module.register_fn("greet", "20200721", "Say hello", |_| Ok(Value::from("hello")))?;
//!
//! module.set_version("20200801")?;
//! assert_eq!(module.call("greet", CallArgs::new(), None)?, Value::from("hello"));
//! assert_eq!(module.call("greet", CallArgs::new(), Some("20200615"))?, Value::from("hi"));
//! # Ok::<(), simplevc::VcError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod pm;
pub mod registry;
pub mod telemetry;
pub mod tool;
pub mod version;

pub use error::{BoxError, VcError};
pub use registry::{CallArgs, DispatchProxy, Implementation, ProxyInfo, VersionedModule};
pub use tool::{Annotation, ParamSpec, ResultRoutine, ScalarType, ToolSpec};
pub use version::{default_version, resolve, set_default_version, VersionKey};
