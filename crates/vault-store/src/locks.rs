//! Per-template serialization of mutating operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use vault_model::TemplateId;

/// Registry of one mutex per template.
///
/// Mutations of the same template run one at a time; different templates
/// never block each other.
///
/// Entries are created on first use and never removed, so the registry holds
/// one small mutex for every template the vault has mutated since it was
/// opened. Deleting a template's files does not release its entry.
#[derive(Debug, Default)]
pub struct TemplateLocks {
    locks: Mutex<HashMap<TemplateId, Arc<Mutex<()>>>>,
}

impl TemplateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The template's mutex, registering it on first use.
    fn lock_for(&self, template: &TemplateId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(template.clone()).or_default())
    }

    /// Run `f` while holding the template's lock.
    ///
    /// The lock guards no data of its own, so a poisoned lock is taken over.
    pub fn with_lock<T>(&self, template: &TemplateId, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(template);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::trace!(template = %template, "acquired template lock");
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn same_template_runs_exclusively() {
        let locks = Arc::new(TemplateLocks::new());
        let template = TemplateId::new("landing").unwrap();
        let inside = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let template = template.clone();
                let inside = Arc::clone(&inside);
                let overlaps = Arc::clone(&overlaps);
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock(&template, || {
                            if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                                overlaps.fetch_add(1, Ordering::SeqCst);
                            }
                            thread::yield_now();
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn different_templates_get_different_locks() {
        let locks = TemplateLocks::new();
        let a = TemplateId::new("a").unwrap();
        let b = TemplateId::new("b").unwrap();
        locks.with_lock(&a, || {
            // Would deadlock if both ids shared one mutex.
            locks.with_lock(&b, || {});
        });
        assert!(Arc::ptr_eq(&locks.lock_for(&a), &locks.lock_for(&a)));
        assert!(!Arc::ptr_eq(&locks.lock_for(&a), &locks.lock_for(&b)));
    }

    #[test]
    fn registry_keeps_one_entry_per_template() {
        let locks = TemplateLocks::new();
        for name in ["a", "b", "a", "b", "a"] {
            locks.with_lock(&TemplateId::new(name).unwrap(), || {});
        }
        assert_eq!(locks.locks.lock().unwrap().len(), 2);
    }
}
