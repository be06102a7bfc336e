//! Observable state container.

use tokio::sync::watch;

/// Single-writer, many-reader state container.
///
/// Each store owns one `StateCell` and funnels every mutation through
/// [`StateCell::update`]. Readers either take snapshots with [`StateCell::get`]
/// or subscribe to change notifications with [`StateCell::subscribe`].
///
/// Every call to `update` publishes exactly one new version, so several field
/// changes made inside one closure are observed together or not at all.
#[derive(Debug)]
pub struct StateCell<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self { sender }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Applies `f` to the value and notifies subscribers once.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Returns a receiver that is notified on every published version.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
