// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ResultSink, SinkFactory, assets::provision_assets};
use crate::{
    errors::{ProtocolViolation, SinkError},
    page::{ImageRewrite, page_footer, page_header},
};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::{
    fs::File,
    io::{BufWriter, Write},
};
use tracing::{debug, warn};

/// Options controlling how a [`FolderResultSink`] writes pages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FolderSinkOptions {
    /// The rewrite applied to every streamed chunk.
    pub image_rewrite: ImageRewrite,

    /// Whether static assets are copied into the output directory on construction.
    pub provision_assets: bool,
}

impl Default for FolderSinkOptions {
    fn default() -> Self {
        Self {
            image_rewrite: ImageRewrite::default(),
            provision_assets: true,
        }
    }
}

/// A [`ResultSink`] that writes each artifact to `<name>.html` in a directory.
///
/// A name containing `/` produces nested directories beneath the output
/// directory. Names that are absolute or contain `..` are rejected with
/// [`SinkError::NameEscapesOutputDir`].
#[derive(Debug)]
pub struct FolderResultSink {
    output_dir: Utf8PathBuf,
    image_rewrite: ImageRewrite,
    current: Option<OpenPage>,
}

#[derive(Debug)]
struct OpenPage {
    name: String,
    path: Utf8PathBuf,
    writer: BufWriter<File>,
}

impl FolderResultSink {
    /// Creates a sink writing to `output_dir` with the default options, copying
    /// the static assets into it.
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Result<Self, SinkError> {
        Self::with_options(output_dir, FolderSinkOptions::default())
    }

    /// Creates a sink writing to `output_dir` with the given options.
    pub fn with_options(
        output_dir: impl Into<Utf8PathBuf>,
        options: FolderSinkOptions,
    ) -> Result<Self, SinkError> {
        let output_dir = output_dir.into();
        if options.provision_assets {
            provision_assets(&output_dir)?;
        }
        Ok(Self {
            output_dir,
            image_rewrite: options.image_rewrite,
            current: None,
        })
    }

    /// Returns the directory artifacts are written to.
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Returns the path the artifact with the given name is written to.
    pub fn artifact_path(&self, name: &str) -> Utf8PathBuf {
        self.output_dir.join(format!("{name}.html"))
    }
}

impl ResultSink for FolderResultSink {
    fn open(&mut self, name: &str) -> Result<(), SinkError> {
        if let Some(current) = &self.current {
            return Err(ProtocolViolation::AlreadyOpen {
                current: current.name.clone(),
                requested: name.to_owned(),
            }
            .into());
        }

        if !stays_within_output_dir(name) {
            return Err(SinkError::NameEscapesOutputDir {
                name: name.to_owned(),
                output_dir: self.output_dir.clone(),
            });
        }

        let path = self.artifact_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| SinkError::Fs {
                file: parent.to_owned(),
                error,
            })?;
        }
        let file = File::create(&path).map_err(|error| SinkError::Fs {
            file: path.clone(),
            error,
        })?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(page_header(name).as_bytes())
            .map_err(|error| SinkError::Fs {
                file: path.clone(),
                error,
            })?;

        debug!("opened result page {path}");
        self.current = Some(OpenPage {
            name: name.to_owned(),
            path,
            writer,
        });
        Ok(())
    }

    fn write(&mut self, chunk: &str) -> Result<(), SinkError> {
        let current = self
            .current
            .as_mut()
            .ok_or(ProtocolViolation::WriteWithoutOpen)?;
        let chunk = self.image_rewrite.apply(chunk);
        current
            .writer
            .write_all(chunk.as_bytes())
            .map_err(|error| SinkError::Fs {
                file: current.path.clone(),
                error,
            })
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let OpenPage {
            path, mut writer, ..
        } = self
            .current
            .take()
            .ok_or(ProtocolViolation::CloseWithoutOpen)?;

        writer
            .write_all(page_footer().as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|error| SinkError::Fs {
                file: path.clone(),
                error,
            })?;

        debug!("closed result page {path}");
        Ok(())
    }

    fn open_artifact(&self) -> Option<&str> {
        self.current.as_ref().map(|page| page.name.as_str())
    }
}

fn stays_within_output_dir(name: &str) -> bool {
    Utf8Path::new(name).components().all(|component| {
        matches!(component, Utf8Component::Normal(_) | Utf8Component::CurDir)
    })
}

impl Drop for FolderResultSink {
    fn drop(&mut self) {
        // The writer is flushed and the file closed as the page is dropped, but
        // the page never receives its footer.
        if let Some(page) = &self.current {
            warn!(
                "result sink dropped while page `{}` was still open ({})",
                page.name, page.path
            );
        }
    }
}

/// Makes a [`FolderResultSink`] for every run, all sharing one output directory.
#[derive(Clone, Debug)]
pub struct FolderSinkFactory {
    output_dir: Utf8PathBuf,
    options: FolderSinkOptions,
}

impl FolderSinkFactory {
    /// Creates a new factory.
    pub fn new(output_dir: impl Into<Utf8PathBuf>, options: FolderSinkOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
        }
    }

    /// Returns the directory sinks made by this factory write to.
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }
}

impl SinkFactory for FolderSinkFactory {
    fn make_sink(&self, run_id: &str) -> Result<Box<dyn ResultSink>, SinkError> {
        debug!("creating result sink in {} for run `{run_id}`", self.output_dir);
        let sink = FolderResultSink::with_options(&self.output_dir, self.options.clone())?;
        Ok(Box::new(sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use camino_tempfile_ext::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn construction_provisions_assets() {
        let dir = tempdir().unwrap();
        let sink = FolderResultSink::new(dir.path()).unwrap();
        assert_eq!(sink.output_dir(), dir.path());

        for asset in [
            "report.css",
            "report.js",
            "images/collapsible_open.png",
            "images/collapsible_closed.png",
        ] {
            assert!(dir.path().join(asset).is_file(), "asset {asset} was provisioned");
        }
    }

    #[test]
    fn provisioning_can_be_disabled() {
        let dir = tempdir().unwrap();
        let options = FolderSinkOptions {
            provision_assets: false,
            ..Default::default()
        };
        FolderResultSink::with_options(dir.path(), options).unwrap();
        assert!(!dir.path().join("report.css").exists());
    }

    #[test]
    fn asset_copy_failure_is_fatal() {
        let dir = tempdir().unwrap();
        // A file where the output directory should be.
        dir.child("blocked").write_str("not a directory").unwrap();

        let error = FolderResultSink::new(dir.path().join("blocked")).unwrap_err();
        assert!(
            matches!(error, SinkError::Asset { .. }),
            "expected asset error, found {error:?}"
        );
    }

    #[test]
    fn page_is_framed_and_rewritten() {
        let dir = tempdir().unwrap();
        let mut sink = FolderResultSink::new(dir.path()).unwrap();

        sink.open("SuiteA.TestB").unwrap();
        assert_eq!(sink.open_artifact(), Some("SuiteA.TestB"));
        sink.write("<p>one</p>").unwrap();
        sink.write(r#"<img src="/files/images/x.png"/>"#).unwrap();
        sink.close().unwrap();
        assert_eq!(sink.open_artifact(), None);

        let contents = std::fs::read_to_string(dir.path().join("SuiteA.TestB.html")).unwrap();
        assert!(contents.starts_with("<html><head><title>SuiteA.TestB</title>"));
        assert!(contents.contains("<h2>SuiteA.TestB</h2><p>one</p>"));
        assert!(contents.ends_with(r#"<img src="images/x.png"/></body></html>"#));
    }

    #[test]
    fn slash_in_name_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let mut sink = FolderResultSink::new(dir.path()).unwrap();

        sink.open("nested/area/TestDeep").unwrap();
        sink.close().unwrap();

        assert!(dir.path().join("nested/area/TestDeep.html").is_file());
    }

    #[test]
    fn names_escaping_the_output_dir_are_rejected() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("out");
        let mut sink = FolderResultSink::new(&output_dir).unwrap();

        let absolute = dir.path().join("escaped/Abs");
        for name in [absolute.as_str(), "../Parent", "nested/../../Sneaky"] {
            let error = sink.open(name).unwrap_err();
            match error {
                SinkError::NameEscapesOutputDir {
                    name: rejected,
                    output_dir: reported,
                } => {
                    assert_eq!(rejected, name);
                    assert_eq!(reported, output_dir);
                }
                other => panic!("expected NameEscapesOutputDir for {name}, found {other:?}"),
            }
            assert_eq!(sink.open_artifact(), None, "{name} was not opened");
        }

        assert!(!dir.path().join("escaped").exists());
        assert!(!dir.path().join("Parent.html").exists());
        assert!(!dir.path().join("Sneaky.html").exists());

        // Nested names inside the output directory still work afterwards.
        sink.open("area/./TestInside").unwrap();
        sink.close().unwrap();
        assert!(output_dir.join("area/TestInside.html").is_file());
    }

    #[test]
    fn protocol_violations() {
        let dir = tempdir().unwrap();
        let mut sink = FolderResultSink::new(dir.path()).unwrap();

        let error = sink.write("orphan").unwrap_err();
        assert!(matches!(
            error,
            SinkError::Protocol(ProtocolViolation::WriteWithoutOpen)
        ));
        let error = sink.close().unwrap_err();
        assert!(matches!(
            error,
            SinkError::Protocol(ProtocolViolation::CloseWithoutOpen)
        ));

        sink.open("First").unwrap();
        let error = sink.open("Second").unwrap_err();
        match error {
            SinkError::Protocol(ProtocolViolation::AlreadyOpen { current, requested }) => {
                assert_eq!(current, "First");
                assert_eq!(requested, "Second");
            }
            other => panic!("expected AlreadyOpen, found {other:?}"),
        }

        // The first page is unaffected and can still be finished.
        sink.write("<p>still here</p>").unwrap();
        sink.close().unwrap();
        assert!(!dir.path().join("Second.html").exists());
        let contents = std::fs::read_to_string(dir.path().join("First.html")).unwrap();
        assert!(contents.ends_with("<p>still here</p></body></html>"));
    }
}
