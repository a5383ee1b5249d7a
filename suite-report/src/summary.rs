// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assertion counts for a single test page, and for a run as a whole.

use serde::{Deserialize, Serialize};
use std::{fmt, ops::AddAssign};

/// Counts of assertion outcomes produced by one test page.
///
/// The same type is used for the running total of a run: the total is the
/// element-wise sum of every per-page summary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "kebab-case")]
pub struct TestSummary {
    /// Assertions that passed.
    #[cfg_attr(test, strategy(0u64..1_000_000))]
    pub right: u64,

    /// Assertions that failed.
    #[cfg_attr(test, strategy(0u64..1_000_000))]
    pub wrong: u64,

    /// Assertions that were not evaluated.
    #[serde(default)]
    #[cfg_attr(test, strategy(0u64..1_000_000))]
    pub ignores: u64,

    /// Assertions that raised an exception instead of producing a result.
    #[cfg_attr(test, strategy(0u64..1_000_000))]
    pub exceptions: u64,
}

impl TestSummary {
    /// Creates a new summary from its four counts.
    pub fn new(right: u64, wrong: u64, ignores: u64, exceptions: u64) -> Self {
        Self {
            right,
            wrong,
            ignores,
            exceptions,
        }
    }

    /// Adds the counts in `other` to this summary.
    pub fn add(&mut self, other: &TestSummary) -> &mut Self {
        self.right += other.right;
        self.wrong += other.wrong;
        self.ignores += other.ignores;
        self.exceptions += other.exceptions;
        self
    }

    /// Returns the number of assertions of any outcome.
    pub fn total(&self) -> u64 {
        self.right + self.wrong + self.ignores + self.exceptions
    }

    /// Classifies this summary for display in a summary table.
    pub fn status(&self) -> SummaryStatus {
        if self.exceptions > 0 {
            SummaryStatus::Error
        } else if self.wrong > 0 {
            SummaryStatus::Fail
        } else if self.right > 0 {
            SummaryStatus::Pass
        } else {
            SummaryStatus::Plain
        }
    }
}

impl AddAssign<&TestSummary> for TestSummary {
    fn add_assign(&mut self, rhs: &TestSummary) {
        self.add(rhs);
    }
}

impl<'a> std::iter::Sum<&'a TestSummary> for TestSummary {
    fn sum<I: Iterator<Item = &'a TestSummary>>(iter: I) -> Self {
        iter.fold(TestSummary::default(), |mut acc, summary| {
            acc += summary;
            acc
        })
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} right, {} wrong, {} ignored, {} exceptions",
            self.right, self.wrong, self.ignores, self.exceptions
        )
    }
}

/// How a page's row is classified in the summary table.
///
/// Exceptions take priority over wrong assertions, which take priority over
/// right ones. A page with no counts at all is `Plain`, never `Pass`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SummaryStatus {
    /// At least one exception.
    Error,
    /// No exceptions, at least one wrong assertion.
    Fail,
    /// Only right (and possibly ignored) assertions.
    Pass,
    /// Nothing right, wrong or exceptional.
    Plain,
}

impl SummaryStatus {
    /// The CSS class used for a summary row with this status.
    pub fn css_class(self) -> &'static str {
        match self {
            SummaryStatus::Error => "error",
            SummaryStatus::Fail => "fail",
            SummaryStatus::Pass => "pass",
            SummaryStatus::Plain => "plain",
        }
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}
