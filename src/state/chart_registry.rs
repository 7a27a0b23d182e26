// src/state/chart_registry.rs
use std::collections::HashMap;

/// A live chart that holds resources until it is explicitly destroyed.
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Live charts keyed by surface id; at most one handle per key.
#[derive(Debug)]
pub struct ChartRegistry<H: ChartHandle> {
    live: HashMap<String, H>,
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self { live: HashMap::new() }
    }
}

impl<H: ChartHandle> ChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy whatever is registered under `key`, then build and store a new handle.
    pub fn set<F>(&mut self, key: impl Into<String>, factory: F) -> &mut H
    where
        F: FnOnce() -> H,
    {
        let key = key.into();
        if let Some(mut previous) = self.live.remove(&key) {
            log::debug!("Destroying chart '{}' before replacement", key);
            previous.destroy();
        }
        self.live.entry(key).or_insert_with(factory)
    }

    pub fn clear(&mut self, key: &str) -> bool {
        match self.live.remove(key) {
            Some(mut handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        for (_, mut handle) in self.live.drain() {
            handle.destroy();
        }
    }

    pub fn get(&self, key: &str) -> Option<&H> {
        self.live.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.live.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<H: ChartHandle> Drop for ChartRegistry<H> {
    fn drop(&mut self) {
        self.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Probe {
        id: usize,
        destroyed: Rc<RefCell<Vec<usize>>>,
    }

    impl ChartHandle for Probe {
        fn destroy(&mut self) {
            self.destroyed.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn test_replacing_destroys_each_previous_handle_once() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartRegistry::new();

        for id in 0..5 {
            let log = Rc::clone(&destroyed);
            registry.set("sector-chart", move || {
                // previous handle is already destroyed when the factory runs
                assert_eq!(log.borrow().len(), id);
                Probe { id, destroyed: log }
            });
            assert_eq!(registry.len(), 1);
            assert_eq!(registry.get("sector-chart").unwrap().id, id);
        }

        assert_eq!(*destroyed.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_clear_and_clear_all() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartRegistry::new();
        for (id, key) in ["a", "b", "c"].iter().enumerate() {
            let log = Rc::clone(&destroyed);
            registry.set(*key, move || Probe { id, destroyed: log });
        }

        assert!(registry.clear("b"));
        assert!(!registry.clear("b"));
        assert_eq!(*destroyed.borrow(), vec![1]);

        registry.clear_all();
        assert!(registry.is_empty());
        let mut all = destroyed.borrow().clone();
        all.sort();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn test_drop_destroys_remaining_handles() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        {
            let mut registry = ChartRegistry::new();
            let log = Rc::clone(&destroyed);
            registry.set("adhoc", move || Probe { id: 7, destroyed: log });
        }
        assert_eq!(*destroyed.borrow(), vec![7]);
    }
}
