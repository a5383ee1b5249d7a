// Copyright (c) The suite-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static files that persisted pages link to.

use crate::errors::SinkError;
use camino::Utf8Path;
use tracing::debug;

pub(super) struct StaticAsset {
    /// Destination relative to the output directory.
    pub(super) relative_path: &'static str,
    pub(super) contents: &'static [u8],
}

pub(super) static STATIC_ASSETS: &[StaticAsset] = &[
    StaticAsset {
        relative_path: "report.css",
        contents: include_bytes!("../../assets/report.css"),
    },
    StaticAsset {
        relative_path: "report.js",
        contents: include_bytes!("../../assets/report.js"),
    },
    StaticAsset {
        relative_path: "images/collapsible_open.png",
        contents: include_bytes!("../../assets/images/collapsible_open.png"),
    },
    StaticAsset {
        relative_path: "images/collapsible_closed.png",
        contents: include_bytes!("../../assets/images/collapsible_closed.png"),
    },
];

/// Copies every static asset into `output_dir`, creating directories as needed.
///
/// Any failure is returned: pages without their assets are broken output.
pub(super) fn provision_assets(output_dir: &Utf8Path) -> Result<(), SinkError> {
    for asset in STATIC_ASSETS {
        let dest = output_dir.join(asset.relative_path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|error| SinkError::Asset {
                asset: asset.relative_path,
                file: parent.to_owned(),
                error,
            })?;
        }
        std::fs::write(&dest, asset.contents).map_err(|error| SinkError::Asset {
            asset: asset.relative_path,
            file: dest.clone(),
            error,
        })?;
    }

    debug!(
        "provisioned {} static assets into {output_dir}",
        STATIC_ASSETS.len()
    );
    Ok(())
}
