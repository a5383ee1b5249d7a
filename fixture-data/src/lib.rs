// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned test runs shared by the suite-report integration tests.

pub mod models;
pub mod runs;
