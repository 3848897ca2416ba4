use std::sync::Arc;

use ow_pidl::{codec, IdList};
use ow_types::{IdAllocator, ShellError, ShellResult};
use tracing::{trace, warn};

use crate::snapshot::Snapshot;

/// Whether a fetch or skip covered the full request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Complete,
    /// The snapshot ran out first. Not an error.
    Partial,
}

/// Identifiers produced by one [`SnapshotEnumerator::next_batch`] call.
#[derive(Debug)]
pub struct Fetched {
    pub items: Vec<IdList>,
    pub status: FetchStatus,
}

/// Forward cursor over a [`Snapshot`], encoding identifiers on demand.
///
/// Clones share the snapshot and start from the same offset, then advance
/// independently.
#[derive(Clone, Debug)]
pub struct SnapshotEnumerator {
    snapshot: Option<Snapshot>,
    cursor: usize,
    alloc: Arc<dyn IdAllocator>,
}

impl SnapshotEnumerator {
    /// Enumerator positioned at the start of `snapshot`.
    pub fn new(snapshot: Snapshot, alloc: Arc<dyn IdAllocator>) -> Self {
        Self {
            snapshot: Some(snapshot),
            cursor: 0,
            alloc,
        }
    }

    /// Enumerator with no snapshot; every operation but cloning reports
    /// `NotReady`.
    pub fn unbound(alloc: Arc<dyn IdAllocator>) -> Self {
        Self {
            snapshot: None,
            cursor: 0,
            alloc,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Current cursor offset.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Records left before the snapshot is exhausted.
    pub fn remaining(&self) -> usize {
        self.snapshot
            .as_ref()
            .map_or(0, |s| s.len().saturating_sub(self.cursor))
    }

    fn bound(&self) -> ShellResult<&Snapshot> {
        self.snapshot.as_ref().ok_or(ShellError::NotReady)
    }

    /// Encode up to `requested` identifiers starting at the cursor.
    ///
    /// If any encode fails, everything produced by this call is released and
    /// the cursor stays where it was, so the call can simply be retried.
    pub fn next_batch(&mut self, requested: usize) -> ShellResult<Fetched> {
        let snapshot = self.bound()?;
        let start = self.cursor;
        let end = start.saturating_add(requested).min(snapshot.len());

        let mut items = Vec::with_capacity(end - start);
        for record in &snapshot.records()[start..end] {
            match codec::encode(record, self.alloc.as_ref()) {
                Ok(id) => items.push(id),
                Err(err) => {
                    warn!(
                        offset = start + items.len(),
                        released = items.len(),
                        error = %err,
                        "encode failed mid-batch, rolling back"
                    );
                    return Err(err);
                }
            }
        }

        self.cursor = end;
        let status = if items.len() < requested {
            FetchStatus::Partial
        } else {
            FetchStatus::Complete
        };
        trace!(requested, produced = items.len(), cursor = self.cursor, "next");
        Ok(Fetched { items, status })
    }

    /// Host-shaped variant of [`next_batch`](Self::next_batch).
    ///
    /// Produced identifiers are appended to `out` and their number stored in
    /// `fetched`. Asking for anything other than exactly one item without a
    /// place to report the count is a usage error.
    pub fn next_into(
        &mut self,
        out: &mut Vec<IdList>,
        requested: usize,
        fetched: Option<&mut usize>,
    ) -> ShellResult<FetchStatus> {
        if requested != 1 && fetched.is_none() {
            return Err(ShellError::invalid(
                "a fetched-count slot is required unless exactly one item is requested",
            ));
        }
        match self.next_batch(requested) {
            Ok(Fetched { items, status }) => {
                if let Some(count) = fetched {
                    *count = items.len();
                }
                out.extend(items);
                Ok(status)
            }
            Err(err) => {
                if let Some(count) = fetched {
                    *count = 0;
                }
                Err(err)
            }
        }
    }

    /// Advance by up to `count` without encoding anything.
    pub fn skip(&mut self, count: usize) -> ShellResult<FetchStatus> {
        let len = self.bound()?.len();
        let available = len - self.cursor;
        let status = if count > available {
            self.cursor = len;
            FetchStatus::Partial
        } else {
            self.cursor += count;
            FetchStatus::Complete
        };
        trace!(count, cursor = self.cursor, "skip");
        Ok(status)
    }

    /// Move the cursor back to the first record.
    pub fn reset(&mut self) -> ShellResult<()> {
        self.bound()?;
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ow_types::{HeapAllocator, Record};
    use proptest::prelude::*;

    /// Succeeds for the first `budget` allocations, then reports exhaustion.
    #[derive(Debug)]
    struct FailAfter {
        budget: AtomicUsize,
    }

    impl FailAfter {
        fn new(budget: usize) -> Arc<Self> {
            Arc::new(Self {
                budget: AtomicUsize::new(budget),
            })
        }

        fn refill(&self, budget: usize) {
            self.budget.store(budget, Ordering::SeqCst);
        }
    }

    impl IdAllocator for FailAfter {
        fn allocate(&self, len: usize) -> ShellResult<Vec<u8>> {
            let left = self.budget.load(Ordering::SeqCst);
            if left == 0 {
                return Err(ShellError::OutOfMemory { requested: len });
            }
            self.budget.store(left - 1, Ordering::SeqCst);
            HeapAllocator.allocate(len)
        }
    }

    fn snapshot(n: u16) -> Snapshot {
        (0..n)
            .map(|i| Record::new(format!("item-{i}"), format!("C:\\item-{i}"), i))
            .collect()
    }

    fn heap() -> Arc<dyn IdAllocator> {
        Arc::new(HeapAllocator)
    }

    fn ranks(items: &[IdList]) -> Vec<u16> {
        items
            .iter()
            .map(|id| codec::rank(&id.as_chain()).unwrap())
            .collect()
    }

    #[test]
    fn batches_cover_snapshot_in_order() {
        let mut e = SnapshotEnumerator::new(snapshot(5), heap());

        let first = e.next_batch(2).unwrap();
        assert_eq!(first.status, FetchStatus::Complete);
        assert_eq!(ranks(&first.items), vec![0, 1]);

        let second = e.next_batch(3).unwrap();
        assert_eq!(second.status, FetchStatus::Complete);
        assert_eq!(ranks(&second.items), vec![2, 3, 4]);

        let done = e.next_batch(1).unwrap();
        assert!(done.items.is_empty());
        assert_eq!(done.status, FetchStatus::Partial);
    }

    #[test]
    fn short_read_is_partial() {
        let mut e = SnapshotEnumerator::new(snapshot(2), heap());
        let fetched = e.next_batch(10).unwrap();
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.status, FetchStatus::Partial);
        assert_eq!(e.remaining(), 0);
    }

    #[test]
    fn mid_batch_failure_rolls_back() {
        let alloc = FailAfter::new(2);
        let mut e = SnapshotEnumerator::new(snapshot(4), alloc.clone());

        let err = e.next_batch(4).unwrap_err();
        assert!(matches!(err, ShellError::OutOfMemory { .. }));
        assert_eq!(e.position(), 0);

        alloc.refill(usize::MAX);
        let retry = e.next_batch(4).unwrap();
        assert_eq!(ranks(&retry.items), vec![0, 1, 2, 3]);
    }

    #[test]
    fn next_into_reports_count() {
        let mut e = SnapshotEnumerator::new(snapshot(3), heap());
        let mut out = Vec::new();
        let mut fetched = 0;
        let status = e.next_into(&mut out, 5, Some(&mut fetched)).unwrap();
        assert_eq!(status, FetchStatus::Partial);
        assert_eq!(fetched, 3);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn next_into_single_without_count_slot() {
        let mut e = SnapshotEnumerator::new(snapshot(3), heap());
        let mut out = Vec::new();
        assert_eq!(e.next_into(&mut out, 1, None).unwrap(), FetchStatus::Complete);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn next_into_requires_count_slot() {
        let mut e = SnapshotEnumerator::new(snapshot(3), heap());
        let mut out = Vec::new();
        let err = e.next_into(&mut out, 0, None).unwrap_err();
        assert!(err.is_invalid_argument());
        let err = e.next_into(&mut out, 2, None).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(e.position(), 0);
    }

    #[test]
    fn next_into_failure_zeroes_count() {
        let mut e = SnapshotEnumerator::new(snapshot(3), FailAfter::new(1));
        let mut out = Vec::new();
        let mut fetched = 99;
        assert!(e.next_into(&mut out, 3, Some(&mut fetched)).is_err());
        assert_eq!(fetched, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn skip_advances_and_saturates() {
        let mut e = SnapshotEnumerator::new(snapshot(5), heap());
        assert_eq!(e.skip(3).unwrap(), FetchStatus::Complete);
        assert_eq!(ranks(&e.next_batch(1).unwrap().items), vec![3]);
        assert_eq!(e.skip(10).unwrap(), FetchStatus::Partial);
        assert_eq!(e.position(), 5);
    }

    #[test]
    fn reset_rewinds() {
        let mut e = SnapshotEnumerator::new(snapshot(3), heap());
        e.skip(3).unwrap();
        e.reset().unwrap();
        assert_eq!(ranks(&e.next_batch(1).unwrap().items), vec![0]);
    }

    #[test]
    fn unbound_is_not_ready() {
        let mut e = SnapshotEnumerator::unbound(heap());
        assert_eq!(e.next_batch(1).unwrap_err(), ShellError::NotReady);
        assert_eq!(e.skip(1).unwrap_err(), ShellError::NotReady);
        assert_eq!(e.reset().unwrap_err(), ShellError::NotReady);

        let clone = e.clone();
        assert!(!clone.is_bound());
    }

    #[test]
    fn clone_keeps_offset_independently() {
        let mut original = SnapshotEnumerator::new(snapshot(6), heap());
        original.skip(2).unwrap();

        let mut clone = original.clone();
        original.next_batch(3).unwrap();

        assert_eq!(clone.position(), 2);
        assert_eq!(ranks(&clone.next_batch(1).unwrap().items), vec![2]);
        assert_eq!(original.position(), 5);
    }

    /// Snapshot size `n` with `k + m <= n`, drawn so no case is rejected.
    fn skip_then_next_inputs() -> impl Strategy<Value = (u16, usize, usize)> {
        (0u16..20)
            .prop_flat_map(|n| (Just(n), 0..=n as usize))
            .prop_flat_map(|(n, k)| (Just(n), Just(k), 0..=(n as usize - k)))
    }

    #[test]
    fn skip_then_next_covers_exact_fit() {
        let snap = snapshot(6);
        let mut skipping = SnapshotEnumerator::new(snap.clone(), heap());
        skipping.skip(2).unwrap();
        let tail = skipping.next_batch(4).unwrap();
        assert_eq!(tail.status, FetchStatus::Complete);
        assert_eq!(ranks(&tail.items), vec![2, 3, 4, 5]);

        let mut plain = SnapshotEnumerator::new(snap, heap());
        assert_eq!(plain.next_batch(6).unwrap().items[2..], tail.items[..]);
    }

    proptest! {
        #[test]
        fn skip_then_next_matches_next_tail((n, k, m) in skip_then_next_inputs()) {
            let snap = snapshot(n);

            let mut skipping = SnapshotEnumerator::new(snap.clone(), heap());
            skipping.skip(k).unwrap();
            let tail = skipping.next_batch(m).unwrap().items;

            let mut plain = SnapshotEnumerator::new(snap, heap());
            let all = plain.next_batch(k + m).unwrap().items;

            prop_assert_eq!(tail, all[k..].to_vec());
        }

        #[test]
        fn batches_summing_to_n_yield_everything(
            sizes in proptest::collection::vec(1usize..5, 0..8)
        ) {
            let n: usize = sizes.iter().sum();
            let mut e = SnapshotEnumerator::new(snapshot(n as u16), heap());
            let mut seen = Vec::new();
            for size in &sizes {
                let fetched = e.next_batch(*size).unwrap();
                prop_assert_eq!(fetched.status, FetchStatus::Complete);
                seen.extend(ranks(&fetched.items));
            }
            prop_assert_eq!(seen, (0..n as u16).collect::<Vec<_>>());
            let after = e.next_batch(1).unwrap();
            prop_assert!(after.items.is_empty());
            prop_assert_eq!(after.status, FetchStatus::Partial);
        }
    }
}
