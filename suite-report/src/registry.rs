// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One [`RunTracker`] per run identifier, shared between call sites.
//!
//! A host constructs a single [`TrackerRegistry`] and passes it to everything
//! that reports into a run. Call sites asking for the same run identifier get
//! the same tracker. Entries live until they are explicitly
//! [disposed](TrackerRegistry::dispose).

use crate::{errors::SinkError, sink::SinkFactory, tracker::RunTracker};
use debug_ignore::DebugIgnore;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, warn};

/// A tracker shared between call sites.
pub type SharedTracker = Arc<Mutex<RunTracker>>;

/// Maps run identifiers to their trackers.
///
/// Creation is serialized: concurrent calls to
/// [`get_or_create`](Self::get_or_create) for the same identifier construct
/// exactly one tracker and all receive it.
#[derive(Debug)]
pub struct TrackerRegistry {
    factory: DebugIgnore<Box<dyn SinkFactory>>,
    trackers: Mutex<HashMap<String, SharedTracker>>,
}

impl TrackerRegistry {
    /// Creates an empty registry. New trackers write through sinks made by `factory`.
    pub fn new(factory: impl SinkFactory + 'static) -> Self {
        Self {
            factory: DebugIgnore(Box::new(factory)),
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the tracker for `run_id`, creating and registering it if there
    /// isn't one yet.
    ///
    /// The sink factory runs while the registry lock is held. A slow factory,
    /// such as a [`FolderSinkFactory`](crate::sink::FolderSinkFactory) copying
    /// assets to slow storage, delays lookups and disposals for every run until
    /// it returns.
    pub fn get_or_create(&self, run_id: &str) -> Result<SharedTracker, SinkError> {
        let mut trackers = self.lock();
        if let Some(tracker) = trackers.get(run_id) {
            return Ok(tracker.clone());
        }

        let sink = self.factory.make_sink(run_id)?;
        let tracker = Arc::new(Mutex::new(RunTracker::new(run_id, sink)));
        trackers.insert(run_id.to_owned(), tracker.clone());
        debug!("registered tracker for run `{run_id}`");
        Ok(tracker)
    }

    /// Returns the tracker for `run_id` if one is registered.
    pub fn get(&self, run_id: &str) -> Option<SharedTracker> {
        self.lock().get(run_id).cloned()
    }

    /// Removes the tracker for `run_id` from the registry and returns it.
    ///
    /// The tracker's sink isn't closed: finish the run before disposing of it.
    /// Holders of the returned tracker (or of earlier clones) can keep using it,
    /// but later lookups of `run_id` create a fresh tracker.
    pub fn dispose(&self, run_id: &str) -> Option<SharedTracker> {
        let tracker = self.lock().remove(run_id)?;

        if let Ok(guard) = tracker.try_lock()
            && let Some(open) = guard.open_artifact()
        {
            warn!("disposing of run `{run_id}` while artifact `{open}` is still open");
        }
        debug!("disposed of tracker for run `{run_id}`");
        Some(tracker)
    }

    /// Returns the identifiers of all registered runs, sorted.
    pub fn run_ids(&self) -> Vec<String> {
        let mut run_ids: Vec<_> = self.lock().keys().cloned().collect();
        run_ids.sort_unstable();
        run_ids
    }

    /// Returns the number of registered runs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no runs are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SharedTracker>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.trackers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{TestPage, Timing},
        sink::{MemorySink, ResultSink},
        summary::TestSummary,
    };
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn same_run_id_returns_same_tracker() {
        let registry = TrackerRegistry::new(MemorySink::new().factory());
        let first = registry.get_or_create("Run").unwrap();
        let second = registry.get_or_create("Run").unwrap();
        let other = registry.get_or_create("Other").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.run_ids(), vec!["Other".to_owned(), "Run".to_owned()]);
        assert_eq!(first.lock().unwrap().run_id(), "Run");
    }

    #[test]
    fn concurrent_creation_constructs_once() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let factory = {
            let constructed = constructed.clone();
            move |_run_id: &str| -> Result<Box<dyn ResultSink>, SinkError> {
                constructed.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(MemorySink::new()))
            }
        };
        let registry = TrackerRegistry::new(factory);

        let trackers: Vec<SharedTracker> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || {
                        let run_id = if i % 2 == 0 { "Even" } else { "Odd" };
                        registry.get_or_create(run_id).unwrap()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(constructed.load(Ordering::SeqCst), 2);
        assert_eq!(registry.len(), 2);
        for (i, tracker) in trackers.iter().enumerate() {
            let expected = &trackers[i % 2];
            assert!(Arc::ptr_eq(tracker, expected), "tracker {i} is shared");
        }
    }

    #[test]
    fn dispose_then_recreate_is_fresh() {
        let registry = TrackerRegistry::new(MemorySink::new().factory());
        let original = registry.get_or_create("Run").unwrap();
        {
            let mut tracker = original.lock().unwrap();
            let page = TestPage::new("Run.Page");
            tracker.test_started(&page, &Timing::now()).unwrap();
            tracker
                .test_complete(&page, &TestSummary::new(3, 1, 0, 0), &Timing::now())
                .unwrap();
        }

        let disposed = registry.dispose("Run").expect("run was registered");
        assert!(Arc::ptr_eq(&original, &disposed));
        assert!(registry.get("Run").is_none());
        assert!(registry.is_empty());

        let fresh = registry.get_or_create("Run").unwrap();
        assert!(!Arc::ptr_eq(&original, &fresh));
        let fresh = fresh.lock().unwrap();
        assert!(fresh.tests_executed().is_empty());
        assert_eq!(*fresh.total_summary(), TestSummary::default());
        assert!(fresh.is_suite());
    }

    #[test]
    fn dispose_unknown_run() {
        let registry = TrackerRegistry::new(MemorySink::new().factory());
        assert!(registry.dispose("Missing").is_none());
    }

    #[test]
    fn factory_failure_registers_nothing() {
        let registry = TrackerRegistry::new(
            |_run_id: &str| -> Result<Box<dyn ResultSink>, SinkError> {
                Err(SinkError::Fs {
                    file: "out/report.css".into(),
                    error: std::io::Error::other("no space"),
                })
            },
        );
        registry.get_or_create("Run").unwrap_err();
        assert!(registry.is_empty());
    }
}
