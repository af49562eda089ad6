//! Process-wide fallback version that seeds newly created modules.

use parking_lot::RwLock;

use super::VersionKey;

static DEFAULT_VERSION: RwLock<Option<VersionKey>> = parking_lot::const_rwlock(None);

/// The default version: today's date at first use unless overridden.
pub fn default_version() -> VersionKey {
    if let Some(version) = *DEFAULT_VERSION.read() {
        return version;
    }
    *DEFAULT_VERSION.write().get_or_insert_with(VersionKey::today)
}

/// Override the default version. Only modules created afterwards see it.
pub fn set_default_version(version: VersionKey) {
    tracing::debug!(%version, "default version overridden");
    *DEFAULT_VERSION.write() = Some(version);
}
