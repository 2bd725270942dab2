//! Single source of truth for the latest normalized snapshot.

use crate::view::ViewModel;
use std::sync::{Arc, Mutex};

/// Handle returned by [`TelemetryStore::subscribe`]; pass it back to
/// [`TelemetryStore::unsubscribe`] to stop receiving snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ViewModel) + Send>;

struct StoreState {
    model: ViewModel,
    version: u64,
    last_applied_seq: u64,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    notifying: bool,
    pending_unsubscribes: Vec<u64>,
}

impl StoreState {
    fn new() -> Self {
        Self {
            model: ViewModel::default(),
            version: 0,
            last_applied_seq: 0,
            listeners: Vec::new(),
            next_listener_id: 0,
            notifying: false,
            pending_unsubscribes: Vec::new(),
        }
    }
}

/// Holds exactly one [`ViewModel`] plus a version counter and the staleness
/// guard for poll completions.
///
/// The fetch pipeline is the only writer; panels are read-only. A publish
/// replaces the model atomically and notifies subscribers synchronously in
/// subscription order, so no listener ever observes two versions at once.
/// A publish issued from inside a listener is dropped rather than recursed.
#[derive(Clone)]
pub struct TelemetryStore {
    state: Arc<Mutex<StoreState>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::new())),
        }
    }

    /// Latest model; the all-defaults view model before the first publish.
    pub fn latest(&self) -> ViewModel {
        self.state
            .lock()
            .map(|state| state.model.clone())
            .unwrap_or_default()
    }

    /// Changed token: increments on every publish.
    pub fn version(&self) -> u64 {
        self.state.lock().map(|state| state.version).unwrap_or(0)
    }

    /// Registers a listener, delivering the current model immediately and
    /// every future publish until unsubscribed.
    pub fn subscribe(
        &self,
        mut listener: impl FnMut(&ViewModel) + Send + 'static,
    ) -> SubscriptionId {
        let current = self.latest();
        listener(&current);
        match self.state.lock() {
            Ok(mut state) => {
                let id = state.next_listener_id;
                state.next_listener_id += 1;
                state.listeners.push((id, Box::new(listener)));
                SubscriptionId(id)
            }
            Err(_) => SubscriptionId(u64::MAX),
        }
    }

    /// Removes a listener. Idempotent: unknown or already-removed ids are
    /// ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut state) = self.state.lock() {
            if state.notifying {
                state.pending_unsubscribes.push(id.0);
            } else {
                state.listeners.retain(|(lid, _)| *lid != id.0);
            }
        }
    }

    /// Replaces the model unconditionally and notifies subscribers.
    pub fn publish(&self, next: ViewModel) {
        let (model, mut active) = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return,
            };
            if state.notifying {
                log::warn!("reentrant publish from a listener dropped");
                return;
            }
            state.model = next;
            state.version += 1;
            state.notifying = true;
            (state.model.clone(), std::mem::take(&mut state.listeners))
        };

        // Listeners run without the lock held so they may read the store.
        for (_, listener) in active.iter_mut() {
            listener(&model);
        }

        if let Ok(mut state) = self.state.lock() {
            let added = std::mem::take(&mut state.listeners);
            state.listeners = active;
            state.listeners.extend(added);
            let removed = std::mem::take(&mut state.pending_unsubscribes);
            state
                .listeners
                .retain(|(lid, _)| !removed.contains(lid));
            state.notifying = false;
        }
    }

    /// Guarded publish for poll completions: last-writer-wins by completion
    /// time. Returns false and leaves the store untouched when `seq` is not
    /// newer than the last applied sequence number.
    pub fn apply(&self, seq: u64, next: ViewModel) -> bool {
        {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return false,
            };
            if seq <= state.last_applied_seq {
                log::debug!(
                    "discarding stale snapshot seq {} (last applied {})",
                    seq,
                    state.last_applied_seq
                );
                return false;
            }
            state.last_applied_seq = seq;
        }
        self.publish(next);
        true
    }

    /// Job-switch teardown: restores the all-defaults model and raises the
    /// staleness guard to `barrier_seq`, so the eventual completion of any
    /// request issued at or below the barrier is discarded by [`apply`].
    pub fn reset(&self, barrier_seq: u64) {
        if let Ok(mut state) = self.state.lock() {
            state.last_applied_seq = barrier_seq;
        }
        self.publish(ViewModel::default());
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_stats::JobStatus;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn model_with_progress(progress: f64) -> ViewModel {
        ViewModel {
            progress,
            ..Default::default()
        }
    }

    #[test]
    fn subscribe_delivers_current_then_future_models() {
        let store = TelemetryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |model| sink.lock().unwrap().push(model.progress));

        store.publish(model_with_progress(0.5));
        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![0.0, 0.5]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let store = TelemetryStore::new();
        let count = Arc::new(AtomicU64::new(0));
        let sink = count.clone();
        let id = store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        store.unsubscribe(id);
        store.unsubscribe(id);
        store.publish(model_with_progress(0.5));
        // only the initial delivery on subscribe
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publishing_identical_model_changes_nothing_visible() {
        let store = TelemetryStore::new();
        let model = model_with_progress(0.3);
        store.publish(model.clone());
        let first = store.latest();
        store.publish(model);
        assert_eq!(store.latest(), first);
    }

    #[test]
    fn out_of_order_completion_is_discarded() {
        let store = TelemetryStore::new();
        assert!(store.apply(3, model_with_progress(0.3)));
        assert!(!store.apply(2, model_with_progress(0.2)));
        assert_eq!(store.latest().progress, 0.3);
    }

    #[test]
    fn reset_barrier_discards_old_job_responses() {
        let store = TelemetryStore::new();
        // seqs 1..=5 issued against the old job; 3 applied so far
        assert!(store.apply(3, model_with_progress(0.3)));

        // switch jobs with 5 issued in total
        store.reset(5);
        assert_eq!(store.latest(), ViewModel::default());
        let version_after_reset = store.version();

        // stragglers from the old job resolve late
        assert!(!store.apply(4, model_with_progress(0.4)));
        assert!(!store.apply(5, model_with_progress(0.5)));
        assert_eq!(store.latest(), ViewModel::default());
        assert_eq!(store.version(), version_after_reset);

        // the new job's first response applies
        assert!(store.apply(6, model_with_progress(0.1)));
        assert_eq!(store.latest().progress, 0.1);
    }

    #[test]
    fn listener_can_read_store_during_notification() {
        let store = TelemetryStore::new();
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |model| {
            // latest() must not deadlock inside a notification
            assert_eq!(reader.latest(), *model);
            sink.lock().unwrap().push(model.status);
        });

        store.publish(ViewModel {
            status: JobStatus::Completed,
            ..Default::default()
        });
        assert_eq!(
            *seen.lock().unwrap(),
            vec![JobStatus::Processing, JobStatus::Completed]
        );
    }

    #[test]
    fn reentrant_publish_is_dropped() {
        let store = TelemetryStore::new();
        let inner = store.clone();
        store.subscribe(move |model| {
            if model.progress > 0.0 {
                inner.publish(model_with_progress(9.9));
            }
        });

        store.publish(model_with_progress(0.5));
        assert_eq!(store.latest().progress, 0.5);
    }

    #[test]
    fn unsubscribe_during_notification_takes_effect() {
        let store = TelemetryStore::new();
        let count = Arc::new(AtomicU64::new(0));
        let sink = count.clone();
        let id_slot = Arc::new(Mutex::new(None::<SubscriptionId>));
        let slot = id_slot.clone();
        let remover = store.clone();
        let id = store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *slot.lock().unwrap() {
                remover.unsubscribe(id);
            }
        });
        *id_slot.lock().unwrap() = Some(id);

        store.publish(model_with_progress(0.1));
        store.publish(model_with_progress(0.2));
        // subscribe delivery + first publish, then removed
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
