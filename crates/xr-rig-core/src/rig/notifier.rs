//! Synchronous observer list for anchor updates

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

struct Subscriptions<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<T>)>,
}

/// Callbacks invoked in registration order with a reference to the subject.
///
/// Subscribing and unsubscribing take `&self`, so a callback may do either
/// while a notification is being dispatched:
/// - a callback removed before its turn is skipped for the rest of that dispatch;
/// - a callback added during a dispatch first runs on the next one.
pub struct ChangeNotifier<T> {
    subscriptions: RefCell<Subscriptions<T>>,
}

impl<T> ChangeNotifier<T> {
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(Subscriptions {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let mut subs = self.subscriptions.borrow_mut();
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.entries.push((id, Rc::new(callback)));
        id
    }

    /// Returns false if the handle was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        let before = subs.entries.len();
        subs.entries.retain(|(entry, _)| *entry != id);
        subs.entries.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions
            .borrow()
            .entries
            .iter()
            .any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every subscriber; returns how many ran.
    pub fn notify(&self, subject: &T) -> usize {
        let snapshot: Vec<(SubscriptionId, Callback<T>)> = self
            .subscriptions
            .borrow()
            .entries
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        let mut invoked = 0;
        for (id, callback) in snapshot {
            if self.is_subscribed(id) {
                callback(subject);
                invoked += 1;
            }
        }
        invoked
    }
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_registration_order() {
        let notifier = ChangeNotifier::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            notifier.subscribe(move |value: &u32| log.borrow_mut().push(format!("{tag}{value}")));
        }

        assert_eq!(notifier.notify(&7), 3);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn test_unsubscribe() {
        let notifier = ChangeNotifier::<()>::new();
        let id = notifier.subscribe(|_| {});
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert_eq!(notifier.notify(&()), 0);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_skips_later_callback() {
        let notifier = Rc::new(ChangeNotifier::<()>::new());
        let calls = Rc::new(Cell::new(0));
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        {
            let notifier_ref = Rc::downgrade(&notifier);
            let victim = Rc::clone(&victim);
            notifier.subscribe(move |_| {
                if let (Some(n), Some(id)) = (notifier_ref.upgrade(), victim.get()) {
                    n.unsubscribe(id);
                }
            });
        }
        let later = {
            let calls = Rc::clone(&calls);
            notifier.subscribe(move |_| calls.set(calls.get() + 1))
        };
        victim.set(Some(later));

        assert_eq!(notifier.notify(&()), 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next() {
        let notifier = Rc::new(ChangeNotifier::<()>::new());
        let late_calls = Rc::new(Cell::new(0));

        {
            let notifier_ref = Rc::downgrade(&notifier);
            let late_calls = Rc::clone(&late_calls);
            let added = Cell::new(false);
            notifier.subscribe(move |_| {
                if added.replace(true) {
                    return;
                }
                if let Some(n) = notifier_ref.upgrade() {
                    let late_calls = Rc::clone(&late_calls);
                    n.subscribe(move |_| late_calls.set(late_calls.get() + 1));
                }
            });
        }

        assert_eq!(notifier.notify(&()), 1);
        assert_eq!(late_calls.get(), 0);
        assert_eq!(notifier.notify(&()), 2);
        assert_eq!(late_calls.get(), 1);
    }
}
