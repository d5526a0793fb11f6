//! Store: observable state container
//!
//! A `Store<T>` owns one state record. Consumers read snapshots, subscribe to
//! changes, or open a channel watcher. Only the owning manager mutates it.
//!
//! Single-threaded: state lives behind `Rc<RefCell<..>>`, so a store is
//! cheap to clone and never shared across threads.

use futures::channel::mpsc;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    watchers: RefCell<Vec<mpsc::UnboundedSender<T>>>,
    next_id: Cell<u64>,
}

/// Observable state container
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + 'static> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                watchers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Replace the whole value and notify
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate in place and notify
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Register a listener. It is called once immediately with the current
    /// value, then after every change until the subscription is cancelled.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        listener(&self.get());
        self.on_change(listener)
    }

    /// Register a listener for subsequent changes only
    pub fn on_change(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Channel receiving a copy of every subsequent value
    pub fn watch(&self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded();
        self.inner.watchers.borrow_mut().push(tx);
        rx
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        let value = self.get();
        // Clone the list first: a listener may subscribe or unsubscribe.
        let listeners: Vec<Listener<T>> = self.inner.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(&value);
        }
        self.inner.watchers.borrow_mut().retain(|tx| tx.unbounded_send(value.clone()).is_ok());
    }
}

/// Deregistration handle. Dropping it does NOT cancel; call `unsubscribe`.
#[must_use = "listeners stay registered until `unsubscribe` is called"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn subscribe_sees_current_then_changes() {
        let store = Store::new(1u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.subscribe(move |v| sink.borrow_mut().push(*v));

        store.set(2);
        store.update(|v| *v += 1);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);

        sub.unsubscribe();
        store.set(10);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn on_change_skips_current_value() {
        let store = Store::new(5u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.on_change(move |v| sink.borrow_mut().push(*v));
        assert!(seen.borrow().is_empty());
        store.set(6);
        assert_eq!(*seen.borrow(), vec![6]);
        sub.unsubscribe();
    }

    #[test]
    fn unsubscribe_only_removes_own_listener() {
        let store = Store::new(0u8);
        let a = store.subscribe(|_| {});
        let _b = store.subscribe(|_| {});
        assert_eq!(store.listener_count(), 2);
        a.unsubscribe();
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn dropping_subscription_keeps_listener() {
        let store = Store::new(0u8);
        drop(store.subscribe(|_| {}));
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn watch_receives_updates() {
        let store = Store::new(String::from("a"));
        let mut rx = store.watch();
        store.set("b".into());
        store.set("c".into());
        let got: Vec<String> = futures::executor::block_on(async {
            vec![rx.next().await.unwrap_or_default(), rx.next().await.unwrap_or_default()]
        });
        assert_eq!(got, vec!["b", "c"]);
    }
}
