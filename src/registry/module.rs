//! Per-module version registry and active version state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use super::args::CallArgs;
use super::proxy::{DispatchProxy, ProxyInfo};
use crate::error::{BoxError, VcError};
use crate::tool::ToolSpec;
use crate::version::{default_version, VersionKey, VersionTable};

type ImplFn = dyn Fn(CallArgs) -> Result<Value, BoxError> + Send + Sync;

/// One registered version of a function.
#[derive(Clone)]
pub struct Implementation {
    func: Arc<ImplFn>,
    doc: String,
}

impl Implementation {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(CallArgs) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            doc: String::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn invoke(&self, args: CallArgs) -> Result<Value, BoxError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Availability of a tool at the module's active version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Available {
        version: VersionKey,
        params: Vec<String>,
        description: Option<String>,
    },
    Unavailable {
        requested: VersionKey,
        first_available: VersionKey,
    },
}

struct ModuleState {
    active_version: VersionKey,
    display_version: Option<String>,
    implementations: BTreeMap<String, VersionTable<Implementation>>,
    tools: BTreeMap<String, VersionTable<ToolSpec>>,
    proxies: BTreeMap<String, ProxyInfo>,
}

impl ModuleState {
    fn refresh_proxy(&mut self, name: &str) {
        if let Some(table) = self.implementations.get(name) {
            let info = ProxyInfo::compute(name, table, &self.active_version);
            self.proxies.insert(name.to_string(), info);
        }
    }

    fn refresh_all(&mut self) {
        let active = self.active_version;
        for (name, table) in &self.implementations {
            self.proxies
                .insert(name.clone(), ProxyInfo::compute(name, table, &active));
        }
    }
}

struct ModuleInner {
    name: String,
    state: RwLock<ModuleState>,
}

/// A module whose functions exist in several dated versions.
///
/// Cloning yields another handle to the same registry. The active version
/// is shared mutable state: changing it while calls are in flight on other
/// threads is unsupported. Callers needing concurrency should serialize
/// version changes or pass an explicit version to every call, which only
/// reads registry contents.
#[derive(Clone)]
pub struct VersionedModule {
    inner: Arc<ModuleInner>,
}

impl VersionedModule {
    /// Create a module seeded with the process-wide default version.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let active_version = default_version();
        debug!(module = %name, version = %active_version, "module registered");
        Self {
            inner: Arc::new(ModuleInner {
                name,
                state: RwLock::new(ModuleState {
                    active_version,
                    display_version: None,
                    implementations: BTreeMap::new(),
                    tools: BTreeMap::new(),
                    proxies: BTreeMap::new(),
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Non-owning handle, for implementations that call sibling functions
    /// of their own module.
    pub fn downgrade(&self) -> WeakModule {
        WeakModule {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Label shown in the top-level command line description.
    pub fn set_display_version(&self, display: impl Into<String>) {
        self.inner.state.write().display_version = Some(display.into());
    }

    pub fn display_version(&self) -> Option<String> {
        self.inner.state.read().display_version.clone()
    }

    /// Register `implementation` as version `version` of `name`.
    ///
    /// Registering the same pair again replaces the earlier implementation.
    pub fn register(
        &self,
        name: &str,
        version: &str,
        implementation: Implementation,
    ) -> Result<(), VcError> {
        let version = VersionKey::parse(version)?;
        let mut state = self.inner.state.write();
        let replaced = state
            .implementations
            .entry(name.to_string())
            .or_default()
            .insert(version, implementation)
            .is_some();
        if replaced {
            warn!(module = %self.inner.name, function = name, %version, "implementation replaced");
        } else {
            debug!(module = %self.inner.name, function = name, %version, "implementation registered");
        }
        state.refresh_proxy(name);
        Ok(())
    }

    /// Register a closure with its documentation.
    pub fn register_fn<F>(&self, name: &str, version: &str, doc: &str, func: F) -> Result<(), VcError>
    where
        F: Fn(CallArgs) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.register(name, version, Implementation::new(func).with_doc(doc))
    }

    /// Register under a `_<name>_<yyyymmdd>` symbol.
    pub fn register_symbol(&self, symbol: &str, implementation: Implementation) -> Result<(), VcError> {
        let (name, version) = split_symbol(symbol)?;
        self.register(name, version, implementation)
    }

    /// Register command line metadata for version `version` of `name`.
    ///
    /// Independent of implementation registration; metadata for a version
    /// without an implementation only fails when invoked.
    pub fn register_tool(&self, name: &str, version: &str, spec: ToolSpec) -> Result<(), VcError> {
        let version = VersionKey::parse(version)?;
        let replaced = self
            .inner
            .state
            .write()
            .tools
            .entry(name.to_string())
            .or_default()
            .insert(version, spec)
            .is_some();
        if replaced {
            warn!(module = %self.inner.name, tool = name, %version, "tool metadata replaced");
        } else {
            debug!(module = %self.inner.name, tool = name, %version, "tool registered");
        }
        Ok(())
    }

    pub fn register_tool_symbol(&self, symbol: &str, spec: ToolSpec) -> Result<(), VcError> {
        let (name, version) = split_symbol(symbol)?;
        self.register_tool(name, version, spec)
    }

    /// Implementation of `name` in effect as of `requested`.
    pub fn lookup(&self, name: &str, requested: &VersionKey) -> Result<(VersionKey, Implementation), VcError> {
        let state = self.inner.state.read();
        let table = state
            .implementations
            .get(name)
            .ok_or_else(|| VcError::UnknownFunction {
                name: name.to_string(),
            })?;
        match table.resolve(requested) {
            Some((version, implementation)) => Ok((version, implementation.clone())),
            None => Err(VcError::VersionUnavailable {
                name: name.to_string(),
                requested: *requested,
                first_available: table.first_version().unwrap_or(*requested),
            }),
        }
    }

    /// Dispatch a call to `name`, at `version` if given, else at the active
    /// version. Errors from the implementation are returned unchanged.
    pub fn call(&self, name: &str, args: CallArgs, version: Option<&str>) -> Result<Value, VcError> {
        let requested = match version {
            Some(v) => VersionKey::parse(v)?,
            None => self.version(),
        };
        let (resolved, implementation) = self.lookup(name, &requested)?;
        debug!(module = %self.inner.name, function = name, %requested, %resolved, "dispatching");
        implementation.invoke(args).map_err(VcError::Implementation)
    }

    /// Callable handle for `name`, if any version of it is registered.
    pub fn proxy(&self, name: &str) -> Option<DispatchProxy> {
        self.inner
            .state
            .read()
            .implementations
            .contains_key(name)
            .then(|| DispatchProxy::new(self.clone(), name.to_string()))
    }

    pub fn proxy_info(&self, name: &str) -> Option<ProxyInfo> {
        self.inner.state.read().proxies.get(name).cloned()
    }

    pub fn function_names(&self) -> Vec<String> {
        self.inner.state.read().implementations.keys().cloned().collect()
    }

    /// Change the active version and refresh every proxy's metadata.
    pub fn set_version(&self, version: &str) -> Result<(), VcError> {
        self.set_version_key(VersionKey::parse(version)?);
        Ok(())
    }

    pub fn set_version_key(&self, version: VersionKey) {
        let mut state = self.inner.state.write();
        state.active_version = version;
        state.refresh_all();
        debug!(module = %self.inner.name, %version, "active version changed");
    }

    /// The active version.
    pub fn version(&self) -> VersionKey {
        self.inner.state.read().active_version
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.inner.state.read().tools.keys().cloned().collect()
    }

    /// Every tool that resolves at `version`, in name order.
    pub fn tools_at(&self, version: &VersionKey) -> Vec<(String, VersionKey, ToolSpec)> {
        let state = self.inner.state.read();
        state
            .tools
            .iter()
            .filter_map(|(name, table)| {
                table
                    .resolve(version)
                    .map(|(resolved, spec)| (name.clone(), resolved, spec.clone()))
            })
            .collect()
    }

    /// Whether the tool `name` exists at the active version.
    pub fn tool_status(&self, name: &str) -> Option<ToolStatus> {
        let state = self.inner.state.read();
        let table = state.tools.get(name)?;
        let active = state.active_version;
        Some(match table.resolve(&active) {
            Some((version, spec)) => ToolStatus::Available {
                version,
                params: spec.param_names().into_iter().map(String::from).collect(),
                description: spec.description.clone(),
            },
            None => ToolStatus::Unavailable {
                requested: active,
                first_available: table.first_version().unwrap_or(active),
            },
        })
    }

    /// Whether an implementation of `name` resolves at `version`.
    pub fn has_implementation_at(&self, name: &str, version: &VersionKey) -> bool {
        self.inner
            .state
            .read()
            .implementations
            .get(name)
            .and_then(|table| table.resolve(version))
            .is_some()
    }
}

/// Weak reference to a [`VersionedModule`].
#[derive(Clone)]
pub struct WeakModule {
    inner: Weak<ModuleInner>,
}

impl WeakModule {
    pub fn upgrade(&self) -> Option<VersionedModule> {
        self.inner.upgrade().map(|inner| VersionedModule { inner })
    }
}

impl fmt::Debug for VersionedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("VersionedModule")
            .field("name", &self.inner.name)
            .field("active_version", &state.active_version)
            .field("functions", &state.implementations.keys().collect::<Vec<_>>())
            .field("tools", &state.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Split `_<name>_<yyyymmdd>` into base name and version token.
pub fn split_symbol(symbol: &str) -> Result<(&str, &str), VcError> {
    let malformed = || VcError::MalformedSymbol {
        symbol: symbol.to_string(),
    };
    let stripped = symbol.strip_prefix('_').ok_or_else(malformed)?;
    let (name, version) = stripped.rsplit_once('_').ok_or_else(malformed)?;
    if name.is_empty() {
        return Err(malformed());
    }
    VersionKey::parse(version)?;
    Ok((name, version))
}
