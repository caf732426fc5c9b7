use alloc::collections::BTreeMap;

/// A running repeating task that can be stopped.
pub trait Cancel {
    fn cancel(self);
}

/// Repeating tasks keyed by owner, none of which may outlive the board that started them.
#[derive(Debug)]
pub struct TaskSet<K: Ord, H: Cancel> {
    tasks: BTreeMap<K, H>,
}

impl<K: Ord, H: Cancel> Default for TaskSet<K, H> {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy + core::fmt::Debug, H: Cancel> TaskSet<K, H> {
    /// Starts tracking `handle`, cancelling any task already registered under `key`.
    pub fn insert(&mut self, key: K, handle: H) {
        if let Some(previous) = self.tasks.insert(key, handle) {
            log::trace!("replacing repeating task {:?}", key);
            previous.cancel();
        }
    }

    pub fn cancel(&mut self, key: K) -> bool {
        match self.tasks.remove(&key) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        let tasks = core::mem::take(&mut self.tasks);
        if !tasks.is_empty() {
            log::debug!("cancelling {} repeating tasks", tasks.len());
        }
        for handle in tasks.into_values() {
            handle.cancel();
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.tasks.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<K: Ord, H: Cancel> Drop for TaskSet<K, H> {
    fn drop(&mut self) {
        for handle in core::mem::take(&mut self.tasks).into_values() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    struct CountingTask(Rc<Cell<u32>>);

    impl Cancel for CountingTask {
        fn cancel(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn replacing_a_task_cancels_the_old_one() {
        let cancelled = Rc::new(Cell::new(0));
        let mut tasks = TaskSet::default();

        tasks.insert(3usize, CountingTask(cancelled.clone()));
        tasks.insert(3usize, CountingTask(cancelled.clone()));

        assert_eq!(cancelled.get(), 1);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn cancel_all_leaves_nothing_running() {
        let cancelled = Rc::new(Cell::new(0));
        let mut tasks = TaskSet::default();
        for segment in 0..8usize {
            tasks.insert(segment, CountingTask(cancelled.clone()));
        }

        tasks.cancel_all();
        assert_eq!(cancelled.get(), 8);
        assert!(tasks.is_empty());

        tasks.cancel_all();
        assert_eq!(cancelled.get(), 8);
        assert!(!tasks.cancel(0));
    }

    #[test]
    fn dropping_the_set_cancels_outstanding_tasks() {
        let cancelled = Rc::new(Cell::new(0));
        {
            let mut tasks = TaskSet::default();
            tasks.insert(0usize, CountingTask(cancelled.clone()));
            tasks.insert(1usize, CountingTask(cancelled.clone()));
        }
        assert_eq!(cancelled.get(), 2);
    }
}
