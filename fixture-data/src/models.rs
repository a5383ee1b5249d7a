// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data models for fixture information.

use iddqd::{IdOrdItem, id_upcast};

/// A canned run: the pages a driver executes, in completion order.
#[derive(Clone, Debug)]
pub struct RunFixture {
    pub run_id: &'static str,
    pub pages: Vec<PageFixture>,
    /// Whether the run should be treated as a suite and produce a summary artifact.
    pub expect_summary: bool,
}

impl RunFixture {
    pub fn new(run_id: &'static str, expect_summary: bool, pages: Vec<PageFixture>) -> Self {
        Self {
            run_id,
            pages,
            expect_summary,
        }
    }

    /// Sums the counts of every page in the run.
    pub fn expected_total(&self) -> FixtureCounts {
        self.pages
            .iter()
            .fold(FixtureCounts::default(), |acc, page| acc.plus(page.counts))
    }
}

impl IdOrdItem for RunFixture {
    type Key<'a> = &'a str;
    fn key(&self) -> Self::Key<'_> {
        self.run_id
    }
    id_upcast!();
}

#[derive(Clone, Debug)]
pub struct PageFixture {
    pub name: &'static str,
    pub chunks: &'static [&'static str],
    pub counts: FixtureCounts,
    pub status: FixtureStatus,
}

impl PageFixture {
    pub fn new(
        name: &'static str,
        chunks: &'static [&'static str],
        counts: FixtureCounts,
        status: FixtureStatus,
    ) -> Self {
        Self {
            name,
            chunks,
            counts,
            status,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FixtureCounts {
    pub right: u64,
    pub wrong: u64,
    pub ignores: u64,
    pub exceptions: u64,
}

impl FixtureCounts {
    pub const fn new(right: u64, wrong: u64, ignores: u64, exceptions: u64) -> Self {
        Self {
            right,
            wrong,
            ignores,
            exceptions,
        }
    }

    pub const fn plus(self, other: Self) -> Self {
        Self {
            right: self.right + other.right,
            wrong: self.wrong + other.wrong,
            ignores: self.ignores + other.ignores,
            exceptions: self.exceptions + other.exceptions,
        }
    }
}

/// The row classification a page is expected to receive in the summary.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FixtureStatus {
    Error,
    Fail,
    Pass,
    Plain,
}

impl FixtureStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            FixtureStatus::Error => "error",
            FixtureStatus::Fail => "fail",
            FixtureStatus::Pass => "pass",
            FixtureStatus::Plain => "plain",
        }
    }
}
