// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The runs exercised by the integration tests.

use crate::models::{FixtureCounts, FixtureStatus, PageFixture, RunFixture};
use iddqd::{IdOrdMap, id_ord_map};
use std::sync::LazyLock;

/// Marker the live server uses for images; rewritten in persisted pages.
pub static SERVED_IMAGE_SRC: &str = r#"src="/files/images/"#;

pub static EXPECTED_RUNS: LazyLock<IdOrdMap<RunFixture>> = LazyLock::new(|| {
    id_ord_map! {
        RunFixture::new(
            "SuiteAcceptance",
            true,
            vec![
                PageFixture::new(
                    "SuiteAcceptance.TestLogin",
                    &[
                        "<table><tr><td>login</td></tr>",
                        r#"<img src="/files/images/collapsibleOpen.png"/>"#,
                        "</table>",
                    ],
                    FixtureCounts::new(3, 0, 0, 0),
                    FixtureStatus::Pass,
                ),
                PageFixture::new(
                    "SuiteAcceptance.TestCheckout",
                    &["<p>checkout</p>", "<p class=\"fail\">expected 2</p>"],
                    FixtureCounts::new(2, 1, 0, 0),
                    FixtureStatus::Fail,
                ),
                PageFixture::new(
                    "SuiteAcceptance.TestBroken",
                    &["<p class=\"error\">fixture not found</p>"],
                    FixtureCounts::new(1, 1, 0, 1),
                    FixtureStatus::Error,
                ),
                PageFixture::new(
                    "SuiteAcceptance.TestEmpty",
                    &[],
                    FixtureCounts::new(0, 0, 2, 0),
                    FixtureStatus::Plain,
                ),
            ],
        ),
        RunFixture::new(
            "TestStandalone",
            false,
            vec![PageFixture::new(
                "TestStandalone",
                &["<p>only page</p>"],
                FixtureCounts::new(5, 0, 0, 0),
                FixtureStatus::Pass,
            )],
        ),
        RunFixture::new(
            "NestedRun",
            true,
            vec![PageFixture::new(
                "nested/area/TestDeep",
                &["<p>deep</p>"],
                FixtureCounts::new(0, 2, 0, 0),
                FixtureStatus::Fail,
            )],
        ),
    }
});
