// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use camino_tempfile::tempdir;
use fixture_data::{
    models::{FixtureCounts, RunFixture},
    runs::{EXPECTED_RUNS, SERVED_IMAGE_SRC},
};
use pretty_assertions::assert_eq;
use suite_report::{
    SUMMARY_HEADER,
    config::ReportConfig,
    events::{RunEvent, TestPage, Timing},
    registry::{SharedTracker, TrackerRegistry},
    sink::MemorySink,
    summary::TestSummary,
    tracker::RunResults,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn summary_for(counts: FixtureCounts) -> TestSummary {
    TestSummary::new(counts.right, counts.wrong, counts.ignores, counts.exceptions)
}

fn drive(tracker: &SharedTracker, run: &RunFixture) {
    let mut tracker = tracker.lock().unwrap();
    for page in &run.pages {
        let test = TestPage::new(page.name);
        let timing = Timing::now();
        tracker
            .handle_event(RunEvent::TestStarted {
                test: &test,
                timing,
            })
            .unwrap();
        for chunk in page.chunks {
            tracker
                .handle_event(RunEvent::OutputChunk { content: chunk })
                .unwrap();
        }
        let summary = summary_for(page.counts);
        tracker
            .handle_event(RunEvent::TestFinished {
                test: &test,
                summary: &summary,
                timing,
            })
            .unwrap();
    }
    tracker
        .handle_event(RunEvent::RunFinished {
            timing: Timing::now(),
        })
        .unwrap();
}

fn read_page(output_dir: &Utf8Path, name: &str) -> String {
    fs_err::read_to_string(output_dir.join(format!("{name}.html"))).unwrap()
}

fn check_run(output_dir: &Utf8Path, tracker: &SharedTracker, run: &RunFixture) {
    let tracker = tracker.lock().unwrap();
    assert_eq!(
        *tracker.total_summary(),
        summary_for(run.expected_total()),
        "total for {}",
        run.run_id
    );
    assert_eq!(
        tracker.tests_executed(),
        run.pages.iter().map(|page| page.name).collect::<Vec<_>>(),
    );
    assert_eq!(tracker.is_suite(), run.expect_summary, "suite flag for {}", run.run_id);

    for page in &run.pages {
        let contents = read_page(output_dir, page.name);
        assert!(
            contents.starts_with(&format!("<html><head><title>{}</title>", page.name)),
            "page {} has a header",
            page.name
        );
        assert!(contents.ends_with("</body></html>"));
        assert!(
            !contents.contains(SERVED_IMAGE_SRC),
            "served image paths in {} were rewritten",
            page.name
        );
        for chunk in page.chunks {
            let persisted = chunk.replace(SERVED_IMAGE_SRC, r#"src="images/"#);
            assert!(contents.contains(&persisted), "{} contains {chunk}", page.name);
        }
    }

    let summary = read_page(output_dir, run.run_id);
    if !run.expect_summary {
        assert!(
            !summary.contains(SUMMARY_HEADER),
            "{} has no summary table",
            run.run_id
        );
        return;
    }

    assert!(summary.contains(SUMMARY_HEADER));
    assert_eq!(summary.matches("<tr class=").count(), run.pages.len());
    let mut last_row = 0;
    for page in &run.pages {
        let row = format!(
            r#"<tr class="{}"><td><a href="{}.html">{}</a></td>"#,
            page.status.css_class(),
            page.name,
            page.name
        );
        let position = summary
            .find(&row)
            .unwrap_or_else(|| panic!("summary for {} has row {row}", run.run_id));
        assert!(position > last_row, "rows are in completion order");
        last_row = position;
    }
}

#[test]
fn fixture_runs_write_pages_and_summaries() {
    init_tracing();
    let root = tempdir().unwrap();
    let config = ReportConfig::from_sources(root.path(), None).unwrap();
    let output_dir = config.output_dir().to_owned();
    let registry = TrackerRegistry::new(config.folder_sink_factory());

    for run in &*EXPECTED_RUNS {
        let tracker = registry.get_or_create(run.run_id).unwrap();
        drive(&tracker, run);
        check_run(&output_dir, &tracker, run);
        registry.dispose(run.run_id).expect("run was registered");
    }

    assert!(registry.is_empty());
    for asset in ["report.css", "report.js", "images/collapsible_open.png"] {
        assert!(output_dir.join(asset).is_file(), "{asset} was provisioned");
    }
}

#[test]
fn runs_can_be_driven_from_parallel_threads() {
    init_tracing();
    let root = tempdir().unwrap();
    let config = ReportConfig::from_sources(root.path(), None).unwrap();
    let output_dir = config.output_dir().to_owned();
    let registry = TrackerRegistry::new(config.folder_sink_factory());

    std::thread::scope(|scope| {
        for run in &*EXPECTED_RUNS {
            let registry = &registry;
            scope.spawn(move || {
                let tracker = registry.get_or_create(run.run_id).unwrap();
                drive(&tracker, run);
            });
        }
    });

    assert_eq!(registry.len(), EXPECTED_RUNS.len());
    for run in &*EXPECTED_RUNS {
        let tracker = registry.get(run.run_id).expect("run was registered");
        check_run(&output_dir, &tracker, run);
    }
}

#[test]
fn memory_sink_snapshot() {
    init_tracing();
    let store = MemorySink::new();
    let registry = TrackerRegistry::new(store.factory());
    let run = EXPECTED_RUNS
        .get("SuiteAcceptance")
        .expect("fixture run exists");

    let tracker = registry.get_or_create(run.run_id).unwrap();
    drive(&tracker, run);

    let mut expected_names: Vec<_> = run.pages.iter().map(|page| page.name.to_owned()).collect();
    expected_names.push(run.run_id.to_owned());
    assert_eq!(store.artifact_names(), expected_names);

    // Memory sinks store chunks verbatim.
    let login = store.artifact("SuiteAcceptance.TestLogin").unwrap();
    assert!(login.contains(SERVED_IMAGE_SRC));

    let snapshot = tracker.lock().unwrap().results_snapshot();
    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    let back: RunResults = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
    assert_eq!(back.tests.len(), run.pages.len());
    assert_eq!(back.total, summary_for(run.expected_total()));
}
