//! Directory traversal: one subdirectory per locale, one framed PNG per raw screenshot.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::foundation::error::{FrameError, FrameResult};
use crate::render::cpu::FrameRenderer;

/// Suffix appended to the stem of every framed output.
pub const FRAMED_SUFFIX: &str = "_framed";

/// Extension of inputs and outputs.
pub const PNG_EXTENSION: &str = "png";

/// Return `true` when `name` is a raw screenshot that should be framed.
///
/// Only `.png` files qualify; earlier outputs (`_framed`) and background plates (`background`,
/// any case) are skipped.
pub fn is_frame_candidate(name: &str) -> bool {
    let is_png = Path::new(name)
        .extension()
        .is_some_and(|ext| ext == PNG_EXTENSION);
    is_png && !name.contains(FRAMED_SUFFIX) && !name.to_lowercase().contains("background")
}

/// Output path for an input screenshot: `<stem>_framed.png` in the same directory.
pub fn framed_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{FRAMED_SUFFIX}.{PNG_EXTENSION}"))
}

/// A screenshot that could not be framed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFile {
    /// Locale directory name.
    pub locale: String,
    /// Input path.
    pub path: PathBuf,
    /// Rendered error message.
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Screenshots framed and written.
    pub processed: usize,
    /// Screenshots that failed; the batch continued past each of them.
    pub skipped: Vec<SkippedFile>,
    /// Locale directories visited, in order.
    pub locales: Vec<String>,
}

impl BatchReport {
    /// Number of failed screenshots.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Progress callbacks for a batch run. All methods default to no-ops.
pub trait BatchObserver {
    /// A locale directory is about to be processed.
    fn locale_started(&mut self, _locale: &str) {}
    /// `input` was framed into `output`.
    fn file_framed(&mut self, _input: &Path, _output: &Path) {}
    /// `input` failed and was skipped.
    fn file_skipped(&mut self, _input: &Path, _error: &FrameError) {}
    /// The batch finished.
    fn finished(&mut self, _report: &BatchReport) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Options for [`process_screenshots`].
#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    /// Only visit these locale directories; empty means all.
    pub locales: BTreeSet<String>,
}

impl BatchOpts {
    fn wants(&self, locale: &str) -> bool {
        self.locales.is_empty() || self.locales.contains(locale)
    }
}

/// Frame every raw screenshot under `dir/<locale>/`.
///
/// Fails only when `dir` cannot be listed. Per-file failures are recorded in the report and
/// reported to `observer`; the batch continues.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn process_screenshots(
    dir: &Path,
    opts: &BatchOpts,
    renderer: &mut FrameRenderer,
    observer: &mut dyn BatchObserver,
) -> FrameResult<BatchReport> {
    if !dir.is_dir() {
        return Err(FrameError::validation(format!(
            "screenshots directory not found: {}",
            dir.display()
        )));
    }

    let mut report = BatchReport::default();

    for locale_dir in sorted_entries(dir)? {
        if !locale_dir.is_dir() {
            continue;
        }
        let Some(locale) = locale_dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if !opts.wants(&locale) {
            tracing::debug!(%locale, "locale filtered out");
            continue;
        }

        observer.locale_started(&locale);
        report.locales.push(locale.clone());

        let files = match sorted_entries(&locale_dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(%locale, error = %e, "cannot list locale directory");
                continue;
            }
        };

        for input in files {
            let Some(name) = input.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if !input.is_file() || !is_frame_candidate(&name) {
                continue;
            }

            let output = framed_output_path(&input);
            match renderer.frame_screenshot(&input, &output, &locale) {
                Ok(()) => {
                    report.processed += 1;
                    observer.file_framed(&input, &output);
                }
                Err(e) => {
                    tracing::warn!(%locale, file = %name, error = %e, "skipping screenshot");
                    observer.file_skipped(&input, &e);
                    report.skipped.push(SkippedFile {
                        locale: locale.clone(),
                        path: input.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        skipped = report.skipped_count(),
        "batch finished"
    );
    observer.finished(&report);
    Ok(report)
}

fn sorted_entries(dir: &Path) -> FrameResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| FrameError::io(dir, e))? {
        let entry = entry.map_err(|e| FrameError::io(dir, e))?;
        out.push(entry.path());
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
