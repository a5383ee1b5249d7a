// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::SinkError;

/// A target that one artifact at a time is streamed into.
///
/// An artifact is begun with [`open`](Self::open), receives any number of
/// [`write`](Self::write) calls, and is finalized with [`close`](Self::close).
/// Only one artifact may be open at a time: opening a second artifact, or
/// writing or closing with nothing open, fails with a
/// [`ProtocolViolation`](crate::errors::ProtocolViolation).
pub trait ResultSink: Send {
    /// Begins a new artifact with the given name.
    fn open(&mut self, name: &str) -> Result<(), SinkError>;

    /// Appends a chunk of content to the open artifact.
    fn write(&mut self, chunk: &str) -> Result<(), SinkError>;

    /// Finalizes and releases the open artifact.
    fn close(&mut self) -> Result<(), SinkError>;

    /// Returns the name of the artifact that is currently open, if any.
    fn open_artifact(&self) -> Option<&str>;
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn open(&mut self, name: &str) -> Result<(), SinkError> {
        (**self).open(name)
    }

    fn write(&mut self, chunk: &str) -> Result<(), SinkError> {
        (**self).write(chunk)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }

    fn open_artifact(&self) -> Option<&str> {
        (**self).open_artifact()
    }
}

/// Creates the sink a new [`RunTracker`](crate::tracker::RunTracker) writes through.
///
/// A [`TrackerRegistry`](crate::registry::TrackerRegistry) calls this once per
/// run identifier. Any `Fn(&str) -> Result<Box<dyn ResultSink>, SinkError>`
/// closure is a factory.
pub trait SinkFactory: Send + Sync {
    /// Makes a sink for the run with the given identifier.
    fn make_sink(&self, run_id: &str) -> Result<Box<dyn ResultSink>, SinkError>;
}

impl<F> SinkFactory for F
where
    F: Fn(&str) -> Result<Box<dyn ResultSink>, SinkError> + Send + Sync,
{
    fn make_sink(&self, run_id: &str) -> Result<Box<dyn ResultSink>, SinkError> {
        self(run_id)
    }
}
