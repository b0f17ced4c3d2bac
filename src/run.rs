//! The fetch pass: scan, resolve, download, convert, report.
//!
//! Authors are handled one at a time in name order. Only a missing quotes
//! root aborts the pass; everything else is recorded per author.
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::catalog::{missing_avatars, AVATAR_STEM};
use crate::fetch::ImageSource;
use crate::normalize::{Converter, CONVERT_COMMAND_ENV};
use crate::report::{status_line, NeedsInput, Outcome, Report};
use crate::titles::{resolve_title, TitleLookup};

/// Run the whole pass over `root`, printing progress and the summary.
///
/// `converter` is `None` when no image tool is installed; every author that
/// reaches the download step then fails.
pub fn run_fetch(
    root: &Path,
    source: &dyn ImageSource,
    converter: Option<&Converter>,
) -> Result<Report> {
    let missing = missing_avatars(root)?;
    let mut report = Report::default();
    if missing.is_empty() {
        println!("All authors have avatars!");
        return Ok(report);
    }

    println!("{} authors missing avatars:\n", missing.len());
    for id in &missing {
        let outcome = process_author(&root.join(id), id, source, converter);
        println!("{}", status_line(id, &outcome));
        report.record(id, outcome);
    }
    print!("{}", report.summary());
    Ok(report)
}

fn process_author(
    dir: &Path,
    id: &str,
    source: &dyn ImageSource,
    converter: Option<&Converter>,
) -> Outcome {
    let title = match resolve_title(id) {
        TitleLookup::Unknown => return Outcome::NeedsInput(NeedsInput::Unknown),
        TitleLookup::Manual => return Outcome::NeedsInput(NeedsInput::Manual),
        TitleLookup::Title(title) => title,
    };

    let url = match source.image_url(title) {
        Ok(Some(url)) => url,
        Ok(None) => {
            return Outcome::NeedsInput(NeedsInput::NoImage {
                title: title.to_string(),
            })
        }
        Err(err) => return Outcome::Failed(err.context(format!("look up image for {title}"))),
    };
    tracing::debug!(id, title, url = %url, "image resolved");

    match download_avatar(dir, &url, source, converter) {
        Ok(()) => Outcome::Fetched,
        Err(err) => Outcome::Failed(err),
    }
}

/// Download `url` next to the avatar and convert it into `avatar.png`.
///
/// Both the download and the converted image live in a staging directory
/// inside `dir`; only a fully converted image is renamed to `avatar.png`, and
/// the staging directory is removed on every path out of this function.
fn download_avatar(
    dir: &Path,
    url: &str,
    source: &dyn ImageSource,
    converter: Option<&Converter>,
) -> Result<()> {
    let converter = converter.ok_or_else(|| {
        anyhow!(
            "no image converter found on PATH (sips, magick, convert); set {CONVERT_COMMAND_ENV}"
        )
    })?;
    let staging = tempfile::Builder::new()
        .prefix(&format!("{AVATAR_STEM}-"))
        .suffix(".tmp")
        .tempdir_in(dir)
        .with_context(|| format!("create staging directory in {}", dir.display()))?;

    let download_path = staging.path().join("download");
    let mut download = File::create(&download_path)
        .with_context(|| format!("create {}", download_path.display()))?;
    source.download(url, &mut download)?;
    download
        .flush()
        .with_context(|| format!("flush {}", download_path.display()))?;
    drop(download);

    let staged = staging.path().join(format!("{AVATAR_STEM}.png"));
    let dest = dir.join(format!("{AVATAR_STEM}.png"));
    let published = converter
        .convert(&download_path, &staged)
        .and_then(|()| {
            fs::rename(&staged, &dest)
                .with_context(|| format!("move converted avatar to {}", dest.display()))
        });
    let removed = staging.close();
    published?;
    removed.context("remove staging directory")?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
