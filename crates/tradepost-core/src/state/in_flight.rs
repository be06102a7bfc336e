//! Loading-flag bookkeeping and request sequencing.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::cell::StateCell;

/// Counts in-flight invocations of one store operation family.
///
/// The published loading flag is `true` while the count is non-zero, so two
/// overlapping requests never lower the flag before the second one finishes.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises `flag` in `cell` and returns a guard that lowers it on drop.
    ///
    /// The guard is released on every exit path of the calling operation,
    /// including early `?` returns and a dropped future.
    pub fn begin<'a, T: Clone>(
        &'a self,
        cell: &'a StateCell<T>,
        flag: fn(&mut T) -> &mut bool,
    ) -> LoadingGuard<'a, T> {
        self.count.fetch_add(1, Ordering::SeqCst);
        cell.update(|state| *flag(state) = true);
        LoadingGuard {
            in_flight: self,
            cell,
            flag,
        }
    }

    /// Number of operations currently holding a guard.
    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Scoped loading flag. See [`InFlight::begin`].
#[must_use = "the loading flag drops back to false as soon as the guard is dropped"]
pub struct LoadingGuard<'a, T: Clone> {
    in_flight: &'a InFlight,
    cell: &'a StateCell<T>,
    flag: fn(&mut T) -> &mut bool,
}

impl<T: Clone> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        self.in_flight.count.fetch_sub(1, Ordering::SeqCst);
        let flag = self.flag;
        let in_flight = self.in_flight;
        self.cell
            .update(|state| *flag(state) = in_flight.count.load(Ordering::SeqCst) > 0);
    }
}

/// Ticket handed out by [`RequestSequencer::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic request numbering for last-request-wins semantics.
///
/// A response may only be applied to state while its ticket is still the
/// latest one issued; anything older is stale and gets dropped.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket newer than every ticket issued before.
    pub fn next(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer ticket has been issued since `ticket`.
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Flags {
        loading: bool,
    }

    fn loading(flags: &mut Flags) -> &mut bool {
        &mut flags.loading
    }

    #[test]
    fn test_guard_raises_and_lowers_flag() {
        let cell = StateCell::new(Flags::default());
        let in_flight = InFlight::new();

        {
            let _guard = in_flight.begin(&cell, loading);
            assert!(cell.get().loading);
            assert_eq!(in_flight.count(), 1);
        }

        assert!(!cell.get().loading);
        assert_eq!(in_flight.count(), 0);
    }

    #[test]
    fn test_overlapping_guards_keep_flag_raised() {
        let cell = StateCell::new(Flags::default());
        let in_flight = InFlight::new();

        let first = in_flight.begin(&cell, loading);
        let second = in_flight.begin(&cell, loading);
        drop(first);
        assert!(cell.get().loading, "second request is still in flight");

        drop(second);
        assert!(!cell.get().loading);
    }

    #[test]
    fn test_guard_released_on_error_path() {
        fn failing(cell: &StateCell<Flags>, in_flight: &InFlight) -> Result<(), String> {
            let _guard = in_flight.begin(cell, loading);
            let parsed: Result<u32, String> = Err("boom".to_string());
            parsed?;
            Ok(())
        }

        let cell = StateCell::new(Flags::default());
        let in_flight = InFlight::new();
        assert!(failing(&cell, &in_flight).is_err());
        assert!(!cell.get().loading);
    }

    #[test]
    fn test_sequencer_marks_older_tickets_stale() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.next();
        assert!(sequencer.is_latest(first));

        let second = sequencer.next();
        assert!(second > first);
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
    }
}
