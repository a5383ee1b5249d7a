// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed markup that frames persisted artifacts.

use crate::summary::TestSummary;
use std::borrow::Cow;
use swrite::{SWrite, swrite};

/// The stylesheet linked from every page, relative to the output directory.
pub(crate) static STYLESHEET_FILE: &str = "report.css";
/// The script linked from every page, relative to the output directory.
pub(crate) static SCRIPT_FILE: &str = "report.js";

static PAGE_FOOTER: &str = "</body></html>";

/// The opening of the summary table, including its header row.
pub static SUMMARY_HEADER: &str =
    "<table><tr><td>Name</td><td>Right</td><td>Wrong</td><td>Exceptions</td></tr>";
/// The closing of the summary table.
pub static SUMMARY_FOOTER: &str = "</table>";

static SERVED_IMAGE_SRC: &str = r#"src="/files/images/"#;
static LOCAL_IMAGE_SRC: &str = r#"src="images/"#;

/// Returns the head of a page artifact: title, stylesheet and script links, and heading.
pub(crate) fn page_header(name: &str) -> String {
    let mut out = String::new();
    swrite!(
        out,
        "<html><head><title>{name}</title>\
         <meta http-equiv='Content-Type' content='text/html;charset=utf-8'/>\
         <link rel='stylesheet' type='text/css' href='{STYLESHEET_FILE}'/>\
         <script src='{SCRIPT_FILE}' type='text/javascript'></script>\
         </head><body><h2>{name}</h2>"
    );
    out
}

pub(crate) fn page_footer() -> &'static str {
    PAGE_FOOTER
}

/// Renders the summary table row for one completed page.
///
/// The name links to the page's own artifact, `<name>.html`.
pub fn summary_row(name: &str, summary: &TestSummary) -> String {
    let mut out = String::new();
    swrite!(
        out,
        "<tr class=\"{}\"><td><a href=\"{name}.html\">{name}</a></td>\
         <td>{}</td><td>{}</td><td>{}</td></tr>",
        summary.status().css_class(),
        summary.right,
        summary.wrong,
        summary.exceptions,
    );
    out
}

/// Rewrites image references in streamed output.
///
/// While a test runs, its output points at images served from a shared path.
/// Persisted pages are standalone, so those references are redirected to the
/// `images/` directory provisioned next to them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageRewrite {
    from: String,
    to: String,
}

impl ImageRewrite {
    /// Creates a rewrite replacing every occurrence of `from` with `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// A rewrite that leaves chunks untouched.
    pub fn disabled() -> Self {
        Self::new("", "")
    }

    /// The pattern being replaced.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The replacement.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Applies the rewrite to a chunk of output.
    pub fn apply<'a>(&self, chunk: &'a str) -> Cow<'a, str> {
        if self.from.is_empty() || !chunk.contains(self.from.as_str()) {
            Cow::Borrowed(chunk)
        } else {
            Cow::Owned(chunk.replace(self.from.as_str(), &self.to))
        }
    }
}

impl Default for ImageRewrite {
    fn default() -> Self {
        Self::new(SERVED_IMAGE_SRC, LOCAL_IMAGE_SRC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_uses_name_as_title_and_heading() {
        insta::assert_snapshot!(
            page_header("SuiteA.TestB"),
            @r#"<html><head><title>SuiteA.TestB</title><meta http-equiv='Content-Type' content='text/html;charset=utf-8'/><link rel='stylesheet' type='text/css' href='report.css'/><script src='report.js' type='text/javascript'></script></head><body><h2>SuiteA.TestB</h2>"#
        );
    }

    #[test]
    fn summary_row_markup() {
        insta::assert_snapshot!(
            summary_row("SuiteA.TestB", &TestSummary::new(3, 1, 7, 0)),
            @r#"<tr class="fail"><td><a href="SuiteA.TestB.html">SuiteA.TestB</a></td><td>3</td><td>1</td><td>0</td></tr>"#
        );
    }

    #[test]
    fn image_rewrite_replaces_only_the_marker() {
        let rewrite = ImageRewrite::default();
        let chunk = r#"<p>src="/files/x"</p><img src="/files/images/a.png"/><img src="/files/images/b.png"/>"#;
        assert_eq!(
            rewrite.apply(chunk),
            r#"<p>src="/files/x"</p><img src="images/a.png"/><img src="images/b.png"/>"#,
        );
    }

    #[test]
    fn image_rewrite_borrows_when_nothing_matches() {
        let rewrite = ImageRewrite::default();
        assert!(matches!(rewrite.apply("<p>plain</p>"), Cow::Borrowed(_)));
        assert!(matches!(
            ImageRewrite::disabled().apply(r#"src="/files/images/a.png""#),
            Cow::Borrowed(_)
        ));
    }
}
