// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ResultSink, SinkFactory};
use crate::errors::{ProtocolViolation, SinkError};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A [`ResultSink`] that keeps artifacts in memory.
///
/// Closed artifacts are stored in the order they were closed, behind a shared
/// handle: clones of a `MemorySink` see the same artifacts, so a caller can
/// keep a clone after handing the sink to a tracker. Chunks are stored
/// verbatim, without the page framing or image rewriting of a
/// [`FolderResultSink`](super::FolderResultSink).
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    artifacts: Arc<Mutex<IndexMap<String, String>>>,
    current: Option<(String, String)>,
}

impl MemorySink {
    /// Creates a new, empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of the closed artifact with the given name.
    ///
    /// If an artifact was written more than once, the last one is returned.
    pub fn artifact(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    /// Returns the names of all closed artifacts, in the order they were first closed.
    pub fn artifact_names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Returns a factory that hands out clones of this sink.
    ///
    /// Every tracker created through the factory writes into the same store.
    pub fn factory(&self) -> impl SinkFactory + use<> {
        let sink = self.clone();
        move |_run_id: &str| -> Result<Box<dyn ResultSink>, SinkError> {
            Ok(Box::new(MemorySink {
                artifacts: sink.artifacts.clone(),
                current: None,
            }))
        }
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, String>> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultSink for MemorySink {
    fn open(&mut self, name: &str) -> Result<(), SinkError> {
        if let Some((current, _)) = &self.current {
            return Err(ProtocolViolation::AlreadyOpen {
                current: current.clone(),
                requested: name.to_owned(),
            }
            .into());
        }
        self.current = Some((name.to_owned(), String::new()));
        Ok(())
    }

    fn write(&mut self, chunk: &str) -> Result<(), SinkError> {
        let (_, contents) = self
            .current
            .as_mut()
            .ok_or(ProtocolViolation::WriteWithoutOpen)?;
        contents.push_str(chunk);
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let (name, contents) = self
            .current
            .take()
            .ok_or(ProtocolViolation::CloseWithoutOpen)?;
        self.lock().insert(name, contents);
        Ok(())
    }

    fn open_artifact(&self) -> Option<&str> {
        self.current.as_ref().map(|(name, _)| name.as_str())
    }
}
