// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes the summary artifact for a suite run.

use crate::{
    errors::SinkError,
    page::{SUMMARY_FOOTER, SUMMARY_HEADER, summary_row},
    sink::ResultSink,
    tracker::RunRecord,
};
use tracing::info;

/// Writes the summary table for `record` through `sink`, as an artifact named
/// `name`.
///
/// The table has one row per completed page, in completion order. Nothing is
/// rolled back on failure: a partially written summary stays partial.
pub(crate) fn write_summary(
    record: &RunRecord,
    name: &str,
    sink: &mut dyn ResultSink,
) -> Result<(), SinkError> {
    sink.open(name)?;
    sink.write(SUMMARY_HEADER)?;
    for test in &record.tests_executed {
        let summary = record.summaries.get(test).copied().unwrap_or_default();
        sink.write(&summary_row(test, &summary))?;
    }
    sink.write(SUMMARY_FOOTER)?;
    sink.close()?;

    info!(
        "wrote summary `{name}` for run `{}` ({} rows)",
        record.run_id,
        record.tests_executed.len()
    );
    Ok(())
}
