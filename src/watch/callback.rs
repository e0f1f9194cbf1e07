// src/watch/callback.rs

//! Change callbacks.
//!
//! A callback declares how much context it wants: nothing, the changed item,
//! or the changed item plus the watcher that owns it. The detector passes
//! exactly what the variant declares and never more.

use std::fmt;
use std::sync::Arc;

use crate::watch::item::WatchedItem;
use crate::watch::watcher::Watcher;

type BareFn = dyn Fn() + Send + Sync;
type ItemFn = dyn Fn(&WatchedItem) + Send + Sync;
type ItemAndWatcherFn = dyn Fn(&WatchedItem, &Watcher) + Send + Sync;

/// Deferred code run when a watched file changes.
///
/// Cloning is cheap and keeps identity: a clone compares equal to the
/// callback it was cloned from, and to nothing else.
#[derive(Clone)]
pub enum Callback {
    Bare(Arc<BareFn>),
    Item(Arc<ItemFn>),
    ItemAndWatcher(Arc<ItemAndWatcherFn>),
}

impl Callback {
    /// A callback that takes no arguments.
    pub fn bare<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Callback::Bare(Arc::new(f))
    }

    /// A callback that receives the changed item.
    pub fn item<F>(f: F) -> Self
    where
        F: Fn(&WatchedItem) + Send + Sync + 'static,
    {
        Callback::Item(Arc::new(f))
    }

    /// A callback that receives the changed item and a read-only view of the
    /// watcher.
    pub fn item_and_watcher<F>(f: F) -> Self
    where
        F: Fn(&WatchedItem, &Watcher) + Send + Sync + 'static,
    {
        Callback::ItemAndWatcher(Arc::new(f))
    }

    /// Number of positional values this callback accepts.
    pub fn arity(&self) -> usize {
        match self {
            Callback::Bare(_) => 0,
            Callback::Item(_) => 1,
            Callback::ItemAndWatcher(_) => 2,
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    fn data_ptr(&self) -> *const () {
        match self {
            Callback::Bare(f) => Arc::as_ptr(f) as *const (),
            Callback::Item(f) => Arc::as_ptr(f) as *const (),
            Callback::ItemAndWatcher(f) => Arc::as_ptr(f) as *const (),
        }
    }

    pub(crate) fn invoke(&self, item: &WatchedItem, watcher: &Watcher) {
        match self {
            Callback::Bare(f) => f(),
            Callback::Item(f) => f(item),
            Callback::ItemAndWatcher(f) => f(item, watcher),
        }
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}
