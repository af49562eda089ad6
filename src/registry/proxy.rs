//! Dispatch handles and their introspectable view.

use serde_json::Value;

use super::args::CallArgs;
use super::module::{Implementation, VersionedModule};
use crate::error::VcError;
use crate::version::{VersionKey, VersionTable};

/// Display name and documentation of a versioned function as of the
/// module's active version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyInfo {
    pub name: String,
    pub doc: String,
    /// Version that would answer a call right now, if any.
    pub resolved: Option<VersionKey>,
}

impl ProxyInfo {
    pub(crate) fn compute(
        name: &str,
        table: &VersionTable<Implementation>,
        active: &VersionKey,
    ) -> Self {
        match table.resolve(active) {
            Some((version, implementation)) => Self {
                name: name.to_string(),
                doc: implementation.doc().to_string(),
                resolved: Some(version),
            },
            None => {
                let first = table
                    .first_version()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                Self {
                    name: name.to_string(),
                    doc: format!(
                        "The method {name} is not available at version {active}.\nThe first available version is {first}."
                    ),
                    resolved: None,
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Callable handle for one function base name of a module.
///
/// Holds no state beyond the module reference and the name; every call
/// resolves again, so it follows later version changes and registrations.
#[derive(Clone)]
pub struct DispatchProxy {
    module: VersionedModule,
    name: String,
}

impl DispatchProxy {
    pub(crate) fn new(module: VersionedModule, name: String) -> Self {
        Self { module, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the implementation in effect at the module's active version.
    pub fn call(&self, args: CallArgs) -> Result<Value, VcError> {
        self.module.call(&self.name, args, None)
    }

    /// Call the implementation in effect at an explicit version.
    pub fn call_at(&self, version: &str, args: CallArgs) -> Result<Value, VcError> {
        self.module.call(&self.name, args, Some(version))
    }

    pub fn info(&self) -> ProxyInfo {
        self.module
            .proxy_info(&self.name)
            .unwrap_or_else(|| ProxyInfo {
                name: self.name.clone(),
                doc: String::new(),
                resolved: None,
            })
    }

    pub fn doc(&self) -> String {
        self.info().doc
    }
}

impl std::fmt::Debug for DispatchProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchProxy")
            .field("module", &self.module.name())
            .field("name", &self.name)
            .finish()
    }
}
