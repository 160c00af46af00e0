//! Shared, swappable registry snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

use super::registry::Registry;

/// Read-only handle on the current registry.
///
/// Readers take an `Arc` snapshot and work on it without holding the lock;
/// a reload swaps in a fully built registry in one step, so a caller sees
/// either the old or the new registry, never a mix.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    current: Arc<RwLock<Arc<Registry>>>,
}

impl SourceHandle {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// The registry in effect right now.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.current.read().clone()
    }

    /// Replaces the registry, returning the previous one.
    pub fn replace(&self, registry: Registry) -> Arc<Registry> {
        std::mem::replace(&mut *self.current.write(), Arc::new(registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::registry::SourceMap;

    fn registry(names: &[&str]) -> Registry {
        names.iter().map(|n| SourceMap::new(*n, None, None)).collect()
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let handle = SourceHandle::new(registry(&["old"]));
        let before = handle.snapshot();

        let previous = handle.replace(registry(&["new", "newer"]));

        assert_eq!(previous.maps()[0].name, "old");
        assert_eq!(before.len(), 1);
        assert_eq!(before.maps()[0].name, "old");
        assert_eq!(handle.snapshot().len(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = SourceHandle::new(registry(&["a"]));
        let other = handle.clone();
        other.replace(registry(&["b"]));
        assert_eq!(handle.snapshot().maps()[0].name, "b");
    }

    #[test]
    fn test_concurrent_readers_see_whole_registries() {
        let handle = SourceHandle::new(registry(&["a"]));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let len = handle.snapshot().len();
                        assert!(len == 1 || len == 3);
                    }
                })
            })
            .collect();

        for _ in 0..100 {
            handle.replace(registry(&["x", "y", "z"]));
            handle.replace(registry(&["a"]));
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
