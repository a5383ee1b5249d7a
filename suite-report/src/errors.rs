// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by suite-report.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::error;
use thiserror::Error;

pub use display_error_chain::DisplayErrorChain;

/// An error that occurred while writing an artifact through a
/// [`ResultSink`](crate::sink::ResultSink).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    /// An error occurred while operating on the file system.
    #[error("error operating on path {file}")]
    Fs {
        /// The file being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// A static asset could not be provisioned into the output directory.
    #[error("error copying static asset `{asset}` to {file}")]
    Asset {
        /// The packaged asset being copied.
        asset: &'static str,

        /// The destination path.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An artifact name would place the artifact outside the output directory.
    #[error("artifact name `{name}` escapes output directory {output_dir}")]
    NameEscapesOutputDir {
        /// The requested artifact name.
        name: String,

        /// The directory artifacts must stay within.
        output_dir: Utf8PathBuf,
    },

    /// The sink was driven out of order.
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),
}

/// A sink was used in a way its open/write/close protocol doesn't allow.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ProtocolViolation {
    /// A chunk was written while no artifact was open.
    #[error("cannot write output: no artifact is open")]
    WriteWithoutOpen,

    /// `close` was called while no artifact was open.
    #[error("cannot close artifact: no artifact is open")]
    CloseWithoutOpen,

    /// `open` was called while another artifact was still open.
    #[error("cannot open artifact `{requested}`: artifact `{current}` is still open")]
    AlreadyOpen {
        /// The artifact that is currently open.
        current: String,

        /// The artifact that was requested.
        requested: String,
    },
}

/// An error returned by an attached [`EventForwarder`](crate::forwarder::EventForwarder).
#[derive(Debug, Error)]
#[error("event forwarder failed")]
pub struct ForwardError {
    #[source]
    inner: Box<dyn error::Error + Send + Sync>,
}

impl ForwardError {
    /// Wraps an arbitrary error raised by a forwarder.
    pub fn new(inner: impl Into<Box<dyn error::Error + Send + Sync>>) -> Self {
        Self {
            inner: inner.into(),
        }
    }
}

/// An error that occurred while reporting a lifecycle event to a
/// [`RunTracker`](crate::tracker::RunTracker).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// Writing an artifact failed.
    #[error("error writing test results")]
    Sink(#[from] SinkError),

    /// The attached forwarder failed.
    #[error("error forwarding event")]
    Forward(#[from] ForwardError),
}

impl ReportError {
    /// Returns the protocol violation behind this error, if that is what it was.
    pub fn protocol_violation(&self) -> Option<&ProtocolViolation> {
        match self {
            ReportError::Sink(SinkError::Protocol(violation)) => Some(violation),
            _ => None,
        }
    }
}

/// An error that occurred while loading the report configuration.
#[derive(Debug, Error)]
#[error("failed to parse suite-report config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}
