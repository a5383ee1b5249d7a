// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events emitted by a test driver.

use crate::summary::TestSummary;
use chrono::{DateTime, FixedOffset, Local};
use itertools::Itertools;
use std::{fmt, time::Duration};

/// The identity of an executed test page.
///
/// The full path is the page's test identifier: it names the page's artifact
/// and is the key under which its summary is stored.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TestPage {
    full_path: String,
}

impl TestPage {
    /// Creates a page from its full path, taken verbatim.
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
        }
    }

    /// Creates a page from the segments of its path, e.g. `["Suite", "TestLogin"]`
    /// becomes `Suite.TestLogin`.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Self {
            full_path: segments.into_iter().join("."),
        }
    }

    /// Returns the full path of this page.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

impl fmt::Display for TestPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

/// When something started, and how long it took if it has finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timing {
    /// The time at which the measured work began, including the offset from UTC.
    pub start: DateTime<FixedOffset>,

    /// The time taken, once the work has finished.
    pub elapsed: Option<Duration>,
}

impl Timing {
    /// Starts a measurement at the current local time.
    pub fn now() -> Self {
        Self::started_at(Local::now().fixed_offset())
    }

    /// Starts a measurement at the given time.
    pub fn started_at(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            elapsed: None,
        }
    }

    /// Returns this measurement with the elapsed time filled in.
    pub fn finished(self, elapsed: Duration) -> Self {
        Self {
            elapsed: Some(elapsed),
            ..self
        }
    }
}

/// An event produced by a test driver and consumed by a
/// [`RunTracker`](crate::tracker::RunTracker).
#[derive(Clone, Debug)]
pub enum RunEvent<'a> {
    /// A test page started executing.
    TestStarted {
        /// The page that started.
        test: &'a TestPage,

        /// When the page started.
        timing: Timing,
    },

    /// A page produced a fragment of output.
    OutputChunk {
        /// The raw output.
        content: &'a str,
    },

    /// A test page finished executing.
    TestFinished {
        /// The page that finished.
        test: &'a TestPage,

        /// The page's assertion counts.
        summary: &'a TestSummary,

        /// When the page started and how long it took.
        timing: Timing,
    },

    /// Every page in the run has finished.
    RunFinished {
        /// When the run started and how long it took.
        timing: Timing,
    },
}
