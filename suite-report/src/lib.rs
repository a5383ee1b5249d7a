// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Stream the results of a test page run into standalone HTML artifacts.
//!
//! A driver obtains a [`RunTracker`](tracker::RunTracker) from a
//! [`TrackerRegistry`](registry::TrackerRegistry), then reports each page
//! through the `test_started` → `test_output_chunk`* → `test_complete`
//! sequence, and finally calls `all_testing_complete`. Each page is written
//! through a [`ResultSink`](sink::ResultSink) as it streams in. Runs made of
//! more than one page also get a summary artifact linking to every page.

pub mod config;
pub mod errors;
pub mod events;
pub mod forwarder;
mod page;
pub mod registry;
pub mod sink;
pub mod summary;
mod summary_writer;
pub mod tracker;

pub use page::{ImageRewrite, SUMMARY_FOOTER, SUMMARY_HEADER, summary_row};
