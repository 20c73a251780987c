//! Host state record
//!
//! The host record is the only shared mutable resource: views read it with
//! [`HostRecord::get`], stage writes with [`HostRecord::set`], push them with
//! [`HostRecord::commit`] and observe keys with [`HostRecord::on_change`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

/// Callback invoked with the new value of a key
pub type ChangeCallback = Rc<dyn Fn(&Value)>;

/// Handle for removing a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Interface to the externally synchronized record backing a view
pub trait HostRecord {
    fn get(&self, key: &str) -> Option<Value>;

    /// Stage a write; subscribers of `key` are notified if the value changed
    fn set(&self, key: &str, value: Value);

    /// Push all staged writes, returning how many were pushed
    fn commit(&self) -> usize;

    fn on_change(&self, key: &str, callback: ChangeCallback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Read a string attribute, treating anything else as empty
pub fn get_string(record: &dyn HostRecord, key: &str) -> String {
    record
        .get(key)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Read an optional boolean attribute (`null` and absence are `None`)
pub fn get_flag(record: &dyn HostRecord, key: &str) -> Option<bool> {
    record.get(key).and_then(|v| v.as_bool())
}

/// An in-process record, used by tests and the CLI
#[derive(Default)]
pub struct MemoryRecord {
    values: RefCell<BTreeMap<String, Value>>,
    pending: RefCell<Vec<(String, Value)>>,
    commits: RefCell<Vec<Vec<(String, Value)>>>,
    subscribers: RefCell<Vec<(SubscriptionId, String, ChangeCallback)>>,
    next_id: Cell<u64>,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let record = Self::default();
        record
            .values
            .borrow_mut()
            .extend(values.into_iter().map(|(k, v)| (k.into(), v)));
        record
    }

    /// Apply a change originating from the host side of the record
    pub fn apply_remote(&self, key: &str, value: Value) {
        if self.store(key, value.clone()) {
            self.notify(key, &value);
        }
    }

    /// Every commit so far, oldest first
    pub fn commits(&self) -> Vec<Vec<(String, Value)>> {
        self.commits.borrow().clone()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn store(&self, key: &str, value: Value) -> bool {
        let mut values = self.values.borrow_mut();
        if values.get(key) == Some(&value) {
            return false;
        }
        values.insert(key.to_string(), value);
        true
    }

    fn notify(&self, key: &str, value: &Value) {
        // Callbacks may read the record, so release the borrow first
        let callbacks: Vec<ChangeCallback> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == key)
            .map(|(_, _, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

impl HostRecord for MemoryRecord {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        if self.store(key, value.clone()) {
            self.pending
                .borrow_mut()
                .push((key.to_string(), value.clone()));
            self.notify(key, &value);
        }
    }

    fn commit(&self) -> usize {
        let batch: Vec<(String, Value)> = self.pending.borrow_mut().drain(..).collect();
        let count = batch.len();
        if count > 0 {
            tracing::trace!(count, "committing staged writes");
            self.commits.borrow_mut().push(batch);
        }
        count
    }

    fn on_change(&self, key: &str, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers
            .borrow_mut()
            .push((id, key.to_string(), callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|(sid, _, _)| *sid != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_stages_until_commit() {
        let record = MemoryRecord::new();
        record.set("value", json!(["1,2"]));
        assert_eq!(record.get("value"), Some(json!(["1,2"])));
        assert_eq!(record.pending_len(), 1);
        assert_eq!(record.commit(), 1);
        assert_eq!(record.pending_len(), 0);
        assert_eq!(record.commits(), vec![vec![("value".to_string(), json!(["1,2"]))]]);
    }

    #[test]
    fn test_unchanged_set_is_not_staged() {
        let record = MemoryRecord::with_values([("value", json!([]))]);
        record.set("value", json!([]));
        assert_eq!(record.commit(), 0);
        assert!(record.commits().is_empty());
    }

    #[test]
    fn test_subscribers_see_local_and_remote_changes() {
        let record = MemoryRecord::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        record.on_change("_score", Rc::new(move |v: &Value| sink.borrow_mut().push(v.clone())));

        record.set("_score", json!("1/2"));
        record.apply_remote("_score", json!("2/2"));
        record.set("other", json!(1));

        assert_eq!(*seen.borrow(), vec![json!("1/2"), json!("2/2")]);
        // Remote changes are not staged for commit
        assert_eq!(record.pending_len(), 2);
    }

    #[test]
    fn test_callbacks_may_read_the_record() {
        let record = Rc::new(MemoryRecord::new());
        let reader = Rc::clone(&record);
        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        record.on_change(
            "value",
            Rc::new(move |_| flag.set(reader.get("value").is_some())),
        );
        record.set("value", json!([]));
        assert!(seen.get());
    }

    #[test]
    fn test_unsubscribe() {
        let record = MemoryRecord::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let id = record.on_change("k", Rc::new(move |_| counter.set(counter.get() + 1)));
        record.set("k", json!(1));
        record.unsubscribe(id);
        record.set("k", json!(2));
        assert_eq!(count.get(), 1);
    }
}
