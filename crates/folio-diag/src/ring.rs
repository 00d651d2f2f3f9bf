//! Bounded buffer with synchronous listeners.

use std::{
  collections::VecDeque,
  panic::{AssertUnwindSafe, catch_unwind},
};

pub type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) struct Ring<T> {
  capacity:                     usize,
  entries:                      VecDeque<T>,
  listeners:                    Vec<(SubscriptionId, Listener<T>)>,
  next_id:                      u64,
  /// Entries ever recorded, including evicted ones.
  pub(crate) recorded:          u64,
  pub(crate) listener_failures: u64,
}

impl<T> Ring<T> {
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      capacity,
      entries: VecDeque::with_capacity(capacity),
      listeners: Vec::new(),
      next_id: 0,
      recorded: 0,
      listener_failures: 0,
    }
  }

  pub fn capacity(&self) -> usize { self.capacity }

  /// Append, evicting the oldest entry when full, then notify listeners.
  /// A panicking listener is counted and skipped; the entry is kept.
  pub fn push(&mut self, entry: T) {
    if self.entries.len() == self.capacity {
      self.entries.pop_front();
    }
    self.entries.push_back(entry);
    self.recorded += 1;

    if let Some(entry) = self.entries.back() {
      for (_, listener) in &self.listeners {
        if catch_unwind(AssertUnwindSafe(|| listener(entry))).is_err() {
          self.listener_failures += 1;
        }
      }
    }
  }

  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> { self.entries.iter() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn subscribe(&mut self, listener: Listener<T>) -> SubscriptionId {
    let id = SubscriptionId(self.next_id);
    self.next_id += 1;
    self.listeners.push((id, listener));
    id
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(sid, _)| *sid != id);
    self.listeners.len() != before
  }

  /// Drop entries and counters; listeners stay subscribed.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.recorded = 0;
    self.listener_failures = 0;
  }
}
