// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-run reporting state machine.
//!
//! A [`RunTracker`] is driven through one page at a time:
//!
//! ```text
//! test_started ──► test_output_chunk* ──► test_complete ─┐
//!      ▲                                                 │
//!      └─────────────────────────────────────────────────┘
//!                                   all_testing_complete (once, at the end)
//! ```
//!
//! Each page's output is streamed into an artifact named after the page. When
//! the run is a suite, `all_testing_complete` also writes a summary artifact
//! named after the run.

use crate::{
    errors::{DisplayErrorChain, ProtocolViolation, ReportError, SinkError},
    events::{RunEvent, TestPage, Timing},
    forwarder::EventForwarder,
    sink::ResultSink,
    summary::TestSummary,
    summary_writer::write_summary,
};
use debug_ignore::DebugIgnore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Tracks the results of one run and writes them through a [`ResultSink`].
///
/// Within one tracker, calls are expected to arrive sequentially from a single
/// driver. Trackers shared across threads live behind the mutex a
/// [`TrackerRegistry`](crate::registry::TrackerRegistry) hands out.
#[derive(Debug)]
pub struct RunTracker {
    record: RunRecord,
    sink: DebugIgnore<Box<dyn ResultSink>>,
    forwarder: DebugIgnore<Option<Box<dyn EventForwarder>>>,
}

/// Bookkeeping for a run, kept apart from the sink so the summary can be
/// written while the sink is borrowed mutably.
#[derive(Clone, Debug)]
pub(crate) struct RunRecord {
    pub(crate) run_id: String,
    /// Completed pages in completion order, duplicates included.
    pub(crate) tests_executed: Vec<String>,
    pub(crate) summaries: HashMap<String, TestSummary>,
    pub(crate) timings: HashMap<String, Timing>,
    pub(crate) total: TestSummary,
    /// Starts out true; cleared for good once a page named after the run completes.
    pub(crate) is_suite: bool,
}

impl RunRecord {
    pub(crate) fn new(run_id: String) -> Self {
        Self {
            run_id,
            tests_executed: Vec::new(),
            summaries: HashMap::new(),
            timings: HashMap::new(),
            total: TestSummary::default(),
            is_suite: true,
        }
    }

    pub(crate) fn record(&mut self, full_path: &str, summary: &TestSummary) {
        self.tests_executed.push(full_path.to_owned());
        self.total += summary;
        self.summaries.insert(full_path.to_owned(), *summary);

        if self.is_suite && self.run_id == full_path {
            debug!("run `{}` is a single page, not a suite", self.run_id);
            self.is_suite = false;
        }
    }
}

impl RunTracker {
    /// Creates a tracker for the run with the given identifier, writing through `sink`.
    pub fn new(run_id: impl Into<String>, sink: Box<dyn ResultSink>) -> Self {
        Self {
            record: RunRecord::new(run_id.into()),
            sink: DebugIgnore(sink),
            forwarder: DebugIgnore(None),
        }
    }

    /// Returns the identifier of this run.
    pub fn run_id(&self) -> &str {
        &self.record.run_id
    }

    /// A test page started: opens an artifact named after the page.
    pub fn test_started(&mut self, test: &TestPage, timing: &Timing) -> Result<(), ReportError> {
        self.sink.open(test.full_path())?;
        if let Some(forwarder) = &mut *self.forwarder {
            forwarder.test_started(test, timing).inspect_err(|error| {
                warn!(
                    "forwarder failed on start of `{test}`: {}",
                    DisplayErrorChain::new(error)
                );
            })?;
        }
        Ok(())
    }

    /// A fragment of output from the page that is running.
    pub fn test_output_chunk(&mut self, content: &str) -> Result<(), ReportError> {
        self.sink.write(content)?;
        Ok(())
    }

    /// A test page completed: records its summary and closes its artifact.
    ///
    /// Fails with [`ProtocolViolation::CloseWithoutOpen`] and records nothing
    /// if no artifact is open.
    pub fn test_complete(
        &mut self,
        test: &TestPage,
        summary: &TestSummary,
        timing: &Timing,
    ) -> Result<(), ReportError> {
        let full_path = test.full_path();
        match self.sink.open_artifact() {
            None => {
                return Err(SinkError::from(ProtocolViolation::CloseWithoutOpen).into());
            }
            Some(open) if open != full_path => {
                warn!("completing `{full_path}`, but the open artifact is `{open}`");
            }
            Some(_) => {}
        }

        self.record.record(full_path, summary);
        self.record.timings.insert(full_path.to_owned(), *timing);
        self.sink.close()?;

        if let Some(forwarder) = &mut *self.forwarder {
            forwarder
                .test_complete(test, summary, timing)
                .inspect_err(|error| {
                    warn!(
                        "forwarder failed on completion of `{test}`: {}",
                        DisplayErrorChain::new(error)
                    );
                })?;
        }
        Ok(())
    }

    /// Every page in the run completed: writes the summary if this run is a suite.
    pub fn all_testing_complete(&mut self, timing: &Timing) -> Result<(), ReportError> {
        if self.record.is_suite {
            let run_id = self.record.run_id.clone();
            self.write_summary(&run_id)?;
        }
        if let Some(forwarder) = &mut *self.forwarder {
            forwarder.all_complete(timing).inspect_err(|error| {
                warn!(
                    "forwarder failed on completion of run `{}`: {}",
                    self.record.run_id,
                    DisplayErrorChain::new(error)
                );
            })?;
        }
        Ok(())
    }

    /// Dispatches a driver event to the matching lifecycle method.
    pub fn handle_event(&mut self, event: RunEvent<'_>) -> Result<(), ReportError> {
        match event {
            RunEvent::TestStarted { test, timing } => self.test_started(test, &timing),
            RunEvent::OutputChunk { content } => self.test_output_chunk(content),
            RunEvent::TestFinished {
                test,
                summary,
                timing,
            } => self.test_complete(test, summary, &timing),
            RunEvent::RunFinished { timing } => self.all_testing_complete(&timing),
        }
    }

    /// Writes the summary table as an artifact named `name`, whether or not
    /// this run is a suite.
    pub fn write_summary(&mut self, name: &str) -> Result<(), ReportError> {
        write_summary(&self.record, name, &mut **self.sink)?;
        Ok(())
    }

    /// Returns the sum of every completed page's summary, or the value last
    /// passed to [`set_total_summary`](Self::set_total_summary) plus what has
    /// completed since.
    pub fn total_summary(&self) -> &TestSummary {
        &self.record.total
    }

    /// Replaces the running total.
    pub fn set_total_summary(&mut self, total: TestSummary) {
        self.record.total = total;
    }

    /// Returns the summary recorded for a completed page, or `None` if no page
    /// with that full path has completed.
    pub fn test_summary(&self, full_path: &str) -> Option<&TestSummary> {
        self.record.summaries.get(full_path)
    }

    /// Returns the timing recorded for a completed page.
    pub fn test_timing(&self, full_path: &str) -> Option<&Timing> {
        self.record.timings.get(full_path)
    }

    /// Returns the full paths of completed pages, in completion order.
    ///
    /// A page that completed more than once appears once per completion.
    pub fn tests_executed(&self) -> &[String] {
        &self.record.tests_executed
    }

    /// Returns true unless a page named after the run itself has completed.
    pub fn is_suite(&self) -> bool {
        self.record.is_suite
    }

    /// Returns the name of the artifact currently open, if any.
    pub fn open_artifact(&self) -> Option<&str> {
        self.sink.open_artifact()
    }

    /// Replaces the sink, returning the previous one.
    pub fn set_sink(&mut self, sink: Box<dyn ResultSink>) -> Box<dyn ResultSink> {
        std::mem::replace(&mut *self.sink, sink)
    }

    /// Attaches a forwarder, replacing any forwarder already attached.
    pub fn set_forwarder(&mut self, forwarder: impl EventForwarder + 'static) {
        *self.forwarder = Some(Box::new(forwarder));
    }

    /// Detaches and returns the current forwarder.
    pub fn clear_forwarder(&mut self) -> Option<Box<dyn EventForwarder>> {
        self.forwarder.take()
    }

    /// Returns a serializable snapshot of this run's results.
    pub fn results_snapshot(&self) -> RunResults {
        RunResults {
            run_id: self.record.run_id.clone(),
            is_suite: self.record.is_suite,
            total: self.record.total,
            tests: self
                .record
                .tests_executed
                .iter()
                .map(|name| TestResult {
                    name: name.clone(),
                    summary: self
                        .record
                        .summaries
                        .get(name)
                        .copied()
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// The results of a run, as returned by [`RunTracker::results_snapshot`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunResults {
    /// The run identifier.
    pub run_id: String,

    /// Whether the run is a suite.
    pub is_suite: bool,

    /// The running total.
    pub total: TestSummary,

    /// Completed pages in completion order.
    pub tests: Vec<TestResult>,
}

/// One completed page within [`RunResults`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The page's full path.
    pub name: String,

    /// The page's summary.
    pub summary: TestSummary,
}
