// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for where and how result pages are written.
//!
//! The embedded default config is layered beneath an optional user config,
//! by default `.config/suite-report.toml` under a root directory.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    page::ImageRewrite,
    sink::{FolderSinkFactory, FolderSinkOptions},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigError, File, FileFormat};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Report configuration, resolved against a root directory.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    output_dir: Utf8PathBuf,
    provision_assets: bool,
    image_rewrite: ImageRewrite,
    unknown_keys: BTreeSet<String>,
}

impl ReportConfig {
    /// The user config file, relative to the root directory.
    pub const CONFIG_PATH: &'static str = ".config/suite-report.toml";

    /// The contents of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the default config and, if present, the user config.
    ///
    /// If `config_file` is `None`, [`CONFIG_PATH`](Self::CONFIG_PATH) under
    /// `root` is read if it exists. If `config_file` is given, it must exist.
    /// Relative paths in the config are resolved against `root`.
    pub fn from_sources(
        root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let root = root.into();
        let builder = Config::builder()
            .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml));

        let (config_file, builder) = match config_file {
            Some(file) => (
                file.to_owned(),
                builder.add_source(File::new(file.as_str(), FileFormat::Toml)),
            ),
            None => {
                let file = root.join(Self::CONFIG_PATH);
                let source = File::new(file.as_str(), FileFormat::Toml).required(false);
                (file, builder.add_source(source))
            }
        };

        let config = builder.build().map_err(|error| {
            ConfigParseError::new(
                &config_file,
                ConfigParseErrorKind::BuildError(Box::new(error)),
            )
        })?;

        let mut unknown = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            unknown.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let deserialized: ReportConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // The config crate may also report the key; drop it in favor of
                // the path tracked by serde_path_to_error.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseError::new(
                    &config_file,
                    ConfigParseErrorKind::DeserializeError(Box::new(
                        serde_path_to_error::Error::new(path, error),
                    )),
                )
            })?;

        if !unknown.is_empty() {
            warn!(
                "ignoring unknown configuration keys in {config_file}: {}",
                unknown.iter().join(", ")
            );
        }

        let ReportImpl {
            output_dir,
            provision_assets,
            image_rewrite,
        } = deserialized.report;

        Ok(Self {
            output_dir: root.join(output_dir),
            provision_assets,
            image_rewrite: ImageRewrite::new(image_rewrite.from, image_rewrite.to),
            unknown_keys: unknown,
        })
    }

    /// Returns the directory result pages are written to.
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Returns true if static assets are copied when a sink is created.
    pub fn provision_assets(&self) -> bool {
        self.provision_assets
    }

    /// Returns the rewrite applied to streamed output.
    pub fn image_rewrite(&self) -> &ImageRewrite {
        &self.image_rewrite
    }

    /// Returns the keys in the user config that weren't recognized.
    pub fn unknown_keys(&self) -> &BTreeSet<String> {
        &self.unknown_keys
    }

    /// Returns the options for a [`FolderResultSink`](crate::sink::FolderResultSink).
    pub fn folder_sink_options(&self) -> FolderSinkOptions {
        FolderSinkOptions {
            image_rewrite: self.image_rewrite.clone(),
            provision_assets: self.provision_assets,
        }
    }

    /// Returns a sink factory writing to the configured output directory.
    pub fn folder_sink_factory(&self) -> FolderSinkFactory {
        FolderSinkFactory::new(&self.output_dir, self.folder_sink_options())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigDeserialize {
    report: ReportImpl,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportImpl {
    output_dir: Utf8PathBuf,
    provision_assets: bool,
    image_rewrite: ImageRewriteImpl,
}

#[derive(Debug, Deserialize)]
struct ImageRewriteImpl {
    from: String,
    to: String,
}
