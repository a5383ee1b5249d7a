// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secondary observers of a run's lifecycle.
//!
//! An [`EventForwarder`] attached to a [`RunTracker`](crate::tracker::RunTracker)
//! receives the same lifecycle calls the tracker does, after the tracker has
//! handled them. Output chunks aren't forwarded.

use crate::{
    errors::ForwardError,
    events::{TestPage, Timing},
    summary::TestSummary,
};

/// Receives lifecycle events alongside a [`RunTracker`](crate::tracker::RunTracker).
///
/// Every method defaults to doing nothing, so implementors only handle the
/// events they care about.
pub trait EventForwarder: Send {
    /// Called after a test page has started.
    fn test_started(&mut self, test: &TestPage, timing: &Timing) -> Result<(), ForwardError> {
        let _ = (test, timing);
        Ok(())
    }

    /// Called after a test page has completed and been recorded.
    fn test_complete(
        &mut self,
        test: &TestPage,
        summary: &TestSummary,
        timing: &Timing,
    ) -> Result<(), ForwardError> {
        let _ = (test, summary, timing);
        Ok(())
    }

    /// Called after the whole run has completed.
    fn all_complete(&mut self, timing: &Timing) -> Result<(), ForwardError> {
        let _ = timing;
        Ok(())
    }
}

impl<F: EventForwarder + ?Sized> EventForwarder for Box<F> {
    fn test_started(&mut self, test: &TestPage, timing: &Timing) -> Result<(), ForwardError> {
        (**self).test_started(test, timing)
    }

    fn test_complete(
        &mut self,
        test: &TestPage,
        summary: &TestSummary,
        timing: &Timing,
    ) -> Result<(), ForwardError> {
        (**self).test_complete(test, summary, timing)
    }

    fn all_complete(&mut self, timing: &Timing) -> Result<(), ForwardError> {
        (**self).all_complete(timing)
    }
}

/// Fans events out to several forwarders, in the order they were added.
///
/// Delivery stops at the first forwarder that fails.
#[derive(Default)]
pub struct ForwarderSet {
    forwarders: Vec<Box<dyn EventForwarder>>,
}

impl ForwarderSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a forwarder to the end of the set.
    pub fn push(&mut self, forwarder: impl EventForwarder + 'static) -> &mut Self {
        self.forwarders.push(Box::new(forwarder));
        self
    }

    /// Returns the number of forwarders in the set.
    pub fn len(&self) -> usize {
        self.forwarders.len()
    }

    /// Returns true if the set has no forwarders.
    pub fn is_empty(&self) -> bool {
        self.forwarders.is_empty()
    }
}

impl std::fmt::Debug for ForwarderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwarderSet")
            .field("len", &self.forwarders.len())
            .finish()
    }
}

impl EventForwarder for ForwarderSet {
    fn test_started(&mut self, test: &TestPage, timing: &Timing) -> Result<(), ForwardError> {
        self.forwarders
            .iter_mut()
            .try_for_each(|forwarder| forwarder.test_started(test, timing))
    }

    fn test_complete(
        &mut self,
        test: &TestPage,
        summary: &TestSummary,
        timing: &Timing,
    ) -> Result<(), ForwardError> {
        self.forwarders
            .iter_mut()
            .try_for_each(|forwarder| forwarder.test_complete(test, summary, timing))
    }

    fn all_complete(&mut self, timing: &Timing) -> Result<(), ForwardError> {
        self.forwarders
            .iter_mut()
            .try_for_each(|forwarder| forwarder.all_complete(timing))
    }
}
