// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write targets for result artifacts.
//!
//! The main type here is the [`ResultSink`] trait. [`FolderResultSink`] writes
//! each artifact to an HTML file in an output directory, and [`MemorySink`]
//! keeps artifacts in memory.

mod assets;
mod folder;
mod imp;
mod memory;

pub use folder::*;
pub use imp::*;
pub use memory::*;
