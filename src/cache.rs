//! Latest parsed log per build identity
//!
//! The component driving builds owns one [`BuildLogCache`] and stores each
//! freshly parsed log under its [`BuildKey`], replacing the previous build of
//! the same identity. Logs are shared as `Arc<BuildLog>` so readers can query
//! them without holding the lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::buildlog::BuildLog;

/// Identity of one build: project, package, architecture and distribution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildKey {
    pub project: String,
    pub package: String,
    pub arch: String,
    pub distro: String,
}

impl BuildKey {
    pub fn new(
        project: impl Into<String>,
        package: impl Into<String>,
        arch: impl Into<String>,
        distro: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            package: package.into(),
            arch: arch.into(),
            distro: distro.into(),
        }
    }

    /// Key for the identity a parsed log reports about itself
    pub fn from_log(log: &BuildLog) -> Self {
        Self::new(log.project(), log.name(), log.arch(), log.distro())
    }
}

impl fmt::Display for BuildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}:{}",
            self.project, self.package, self.arch, self.distro
        )
    }
}

#[derive(Debug, Default)]
struct Inner {
    logs: HashMap<BuildKey, Arc<BuildLog>>,
    last: Option<BuildKey>,
}

/// Thread-safe map from [`BuildKey`] to the most recent [`BuildLog`]
#[derive(Debug, Default)]
pub struct BuildLogCache {
    inner: RwLock<Inner>,
}

impl BuildLogCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers never leave `Inner` half-updated; poisoning is ignored.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `log` under `key`, returning the log it replaced
    pub fn insert(&self, key: BuildKey, log: BuildLog) -> Option<Arc<BuildLog>> {
        let log = Arc::new(log);
        let mut inner = self.write();
        debug!(key = %key, segments = log.segments().len(), "Caching build log");
        inner.last = Some(key.clone());
        inner.logs.insert(key, log)
    }

    pub fn get(&self, key: &BuildKey) -> Option<Arc<BuildLog>> {
        self.read().logs.get(key).cloned()
    }

    /// The most recently inserted log, if still cached
    pub fn last(&self) -> Option<Arc<BuildLog>> {
        let inner = self.read();
        inner.last.as_ref().and_then(|key| inner.logs.get(key).cloned())
    }

    pub fn last_key(&self) -> Option<BuildKey> {
        self.read().last.clone()
    }

    pub fn remove(&self, key: &BuildKey) -> Option<Arc<BuildLog>> {
        let mut inner = self.write();
        if inner.last.as_ref() == Some(key) {
            inner.last = None;
        }
        inner.logs.remove(key)
    }

    pub fn len(&self) -> usize {
        self.read().logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().logs.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.write();
        inner.logs.clear();
        inner.last = None;
    }
}
