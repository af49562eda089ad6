//! Versioned function registry.
//!
//! A [`VersionedModule`] owns, per function base name, a table of dated
//! implementations and a parallel table of command line metadata. Calls go
//! through [`VersionedModule::call`] or a [`DispatchProxy`] handle, which
//! resolve the implementation in effect at the active (or an explicit)
//! version and forward the arguments unchanged.

mod args;
mod module;
mod proxy;

pub use args::{ArgError, CallArgs};
pub use module::{split_symbol, Implementation, ToolStatus, VersionedModule, WeakModule};
pub use proxy::{DispatchProxy, ProxyInfo};
