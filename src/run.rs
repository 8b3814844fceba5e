//! # Batch Runs
//!
//! A [`RunContext`] owns the configuration, the resolvers and the run
//! counters. Rows are processed independently: a row's cards are all saved,
//! or none of them are left on disk.
//!
//! ## Failure handling
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Missing font, logo or template | Fallback, logged at `warn` |
//! | Unparseable amount or date | `N/A`, no log |
//! | Card type fails (corrupt template) | Logged at `error`, counted; other types still render |
//! | Any card or save fails | Row counted as failed, its outputs removed |
//! | Output dir cannot be created | Run stops with an error |
//!
//! Distinct row ids can sanitise to the same file id (`a/b` and `a_b`). The
//! later row overwrites the earlier one's files with a warning, and a failing
//! row never deletes files that an earlier row in the same run saved.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, info_span, warn};

use crate::card::{CardRenderer, output_path, save_png};
use crate::config::CardConfig;
use crate::error::CardError;
use crate::layout::CardKind;
use crate::resolve::{
    BackgroundProvider, FontResolver, FsFontResolver, FsImageResolver, ImageResolver, TemplateBackgrounds,
};
use crate::row::CustomerRow;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Individual card types that failed to render, across all rows.
    pub card_failures: usize,
}

/// Configuration, resolvers and counters for one batch run.
pub struct RunContext {
    config: CardConfig,
    fonts: Box<dyn FontResolver>,
    images: Box<dyn ImageResolver>,
    backgrounds: Box<dyn BackgroundProvider>,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    card_failures: AtomicUsize,
    /// Files saved by successful rows during the current run.
    written: Mutex<HashSet<PathBuf>>,
}

impl RunContext {
    /// Context with filesystem resolvers rooted at `config.paths`.
    pub fn new(config: CardConfig) -> Self {
        let fonts = FsFontResolver::new(&config.paths.fonts, config.system_fonts.clone());
        let images = FsImageResolver::new(&config.paths.logos);
        let backgrounds = TemplateBackgrounds::new(&config.paths.templates, config.canvas, config.blank_background);
        Self::with_resolvers(config, Box::new(fonts), Box::new(images), Box::new(backgrounds))
    }

    pub fn with_resolvers(
        config: CardConfig,
        fonts: Box<dyn FontResolver>,
        images: Box<dyn ImageResolver>,
        backgrounds: Box<dyn BackgroundProvider>,
    ) -> Self {
        Self {
            config,
            fonts,
            images,
            backgrounds,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            card_failures: AtomicUsize::new(0),
            written: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn renderer(&self) -> CardRenderer<'_> {
        CardRenderer::new(
            &self.config,
            self.fonts.as_ref(),
            self.images.as_ref(),
            self.backgrounds.as_ref(),
        )
    }

    /// Render and save every card for `row`. Returns whether the row succeeded.
    pub fn process_row(&self, row: &CustomerRow) -> bool {
        let span = info_span!("row", id = %row.id);
        let _enter = span.enter();

        let renderer = self.renderer();
        let mut rendered = Vec::with_capacity(CardKind::ALL.len());
        let mut card_failed = false;

        for kind in CardKind::ALL {
            match renderer.render(kind, row) {
                Ok(card) => rendered.push((kind, card)),
                Err(e) => {
                    error!(id = %row.id, kind = %kind, error = %e, "card failed");
                    self.card_failures.fetch_add(1, Ordering::Relaxed);
                    card_failed = true;
                }
            }
        }

        if card_failed {
            self.remove_outputs(row, &[]);
            self.failed.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let dir = &self.config.paths.generated;
        let mut saved = Vec::with_capacity(rendered.len());
        for (kind, card) in &rendered {
            let path = output_path(dir, row, *kind);
            if self.was_written(&path) {
                warn!(id = %row.id, path = %path.display(), "file id collides with an earlier row, overwriting");
            }
            if let Err(e) = save_png(card, &path) {
                error!(id = %row.id, kind = %kind, path = %path.display(), error = %e, "save failed");
                self.remove_outputs(row, &saved);
                self.failed.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            info!(kind = %kind, path = %path.display(), "saved card");
            saved.push(path);
        }

        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(saved);
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn was_written(&self, path: &Path) -> bool {
        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }

    /// Delete the output files for a failed `row`: the ones it saved itself,
    /// and stale ones from earlier runs. Files another row saved during this
    /// run are kept.
    fn remove_outputs(&self, row: &CustomerRow, saved: &[PathBuf]) {
        for kind in CardKind::ALL {
            let path = output_path(&self.config.paths.generated, row, kind);
            if !saved.contains(&path) && self.was_written(&path) {
                warn!(id = %row.id, path = %path.display(), "keeping output saved by an earlier row with the same file id");
                continue;
            }
            if path.exists()
                && let Err(e) = fs::remove_file(&path)
            {
                error!(path = %path.display(), error = %e, "failed to remove output");
            }
        }
    }

    /// Process all rows, on `jobs` threads when `jobs > 1`.
    pub fn run(&self, rows: &[CustomerRow], jobs: usize) -> Result<RunSummary, CardError> {
        if rows.is_empty() {
            return Err(CardError::NoRows);
        }
        fs::create_dir_all(&self.config.paths.generated)?;

        self.succeeded.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.card_failures.store(0, Ordering::Relaxed);
        self.written.lock().unwrap_or_else(|e| e.into_inner()).clear();

        if jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| CardError::Config(format!("Failed to start {} workers: {}", jobs, e)))?;
            pool.install(|| {
                rows.par_iter().for_each(|row| {
                    self.process_row(row);
                })
            });
        } else {
            for row in rows {
                self.process_row(row);
            }
        }

        let summary = self.summary(rows.len());
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            card_failures = summary.card_failures,
            "run finished"
        );
        Ok(summary)
    }

    pub fn summary(&self, total: usize) -> RunSummary {
        RunSummary {
            total,
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            card_failures: self.card_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetPaths;
    use crate::layout::Canvas;
    use crate::resolve::{BuiltinFonts, NoImages, blank_canvas};
    use image::RgbaImage;
    use pretty_assertions::assert_eq;

    /// Fails only the bank card.
    struct BankBroken(Canvas);

    impl BackgroundProvider for BankBroken {
        fn get(&self, kind: CardKind) -> Result<RgbaImage, CardError> {
            match kind {
                CardKind::Bank => Err(CardError::Template("corrupt".to_string())),
                _ => Ok(blank_canvas(self.0, [0, 0, 0, 255])),
            }
        }
    }

    fn context(root: &std::path::Path, backgrounds: Box<dyn BackgroundProvider>) -> RunContext {
        let config = CardConfig {
            paths: AssetPaths::under(root),
            system_fonts: vec![],
            ..CardConfig::default()
        };
        RunContext::with_resolvers(config, Box::new(BuiltinFonts), Box::new(NoImages), backgrounds)
    }

    /// Fails the bank card from its second request on.
    struct BankBreaksLater {
        canvas: Canvas,
        bank_calls: AtomicUsize,
    }

    impl BackgroundProvider for BankBreaksLater {
        fn get(&self, kind: CardKind) -> Result<RgbaImage, CardError> {
            if kind == CardKind::Bank && self.bank_calls.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(CardError::Template("corrupt".to_string()));
            }
            Ok(blank_canvas(self.canvas, [0, 0, 0, 255]))
        }
    }

    fn row(id: &str) -> CustomerRow {
        CustomerRow::from_fields([("id", id), ("name", "Ravi"), ("loan_amount", "1000")])
    }

    #[test]
    fn test_one_failed_card_fails_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Box::new(BankBroken(Canvas::HD_720P)));
        let summary = ctx.run(&[row("1")], 1).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                total: 1,
                succeeded: 0,
                failed: 1,
                card_failures: 1
            }
        );
        let generated = dir.path().join("generated");
        assert!(!generated.join("1_loan.png").exists());
        assert!(!generated.join("1_emi.png").exists());
    }

    #[test]
    fn test_failed_row_removes_stale_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("generated");
        fs::create_dir_all(&generated).unwrap();
        fs::write(generated.join("9_loan.png"), b"old").unwrap();

        let ctx = context(dir.path(), Box::new(BankBroken(Canvas::HD_720P)));
        assert!(!ctx.process_row(&row("9")));
        assert!(!generated.join("9_loan.png").exists());
    }

    #[test]
    fn test_empty_rows_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Box::new(BankBroken(Canvas::HD_720P)));
        assert!(matches!(ctx.run(&[], 1), Err(CardError::NoRows)));
    }

    #[test]
    fn test_uncreatable_output_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let config = CardConfig {
            paths: AssetPaths {
                generated: blocker.join("generated"),
                ..AssetPaths::under(dir.path())
            },
            system_fonts: vec![],
            ..CardConfig::default()
        };
        let ctx = RunContext::with_resolvers(
            config,
            Box::new(BuiltinFonts),
            Box::new(NoImages),
            Box::new(BankBroken(Canvas::HD_720P)),
        );
        assert!(matches!(ctx.run(&[row("1")], 1), Err(CardError::Io(_))));
    }

    #[test]
    fn test_failed_row_keeps_colliding_outputs_of_earlier_row() {
        let dir = tempfile::tempdir().unwrap();
        let backgrounds = BankBreaksLater {
            canvas: Canvas::HD_720P,
            bank_calls: AtomicUsize::new(0),
        };
        let ctx = context(dir.path(), Box::new(backgrounds));

        // Both ids sanitise to "a_b"; the second row fails on its bank card.
        let summary = ctx.run(&[row("a/b"), row("a_b")], 1).unwrap();
        assert_eq!((summary.succeeded, summary.failed), (1, 1));

        let generated = dir.path().join("generated");
        for kind in CardKind::ALL {
            assert!(generated.join(format!("a_b_{}.png", kind)).is_file(), "{} removed", kind);
        }
    }

    #[test]
    fn test_written_set_resets_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let backgrounds = BankBreaksLater {
            canvas: Canvas::HD_720P,
            bank_calls: AtomicUsize::new(0),
        };
        let ctx = context(dir.path(), Box::new(backgrounds));
        assert_eq!(ctx.run(&[row("7")], 1).unwrap().succeeded, 1);

        // Outputs from the previous run are stale now and go with the failure.
        assert_eq!(ctx.run(&[row("7")], 1).unwrap().failed, 1);
        assert!(!dir.path().join("generated/7_loan.png").exists());
    }

    #[test]
    fn test_summary_serialises_to_json() {
        let summary = RunSummary {
            total: 3,
            succeeded: 2,
            failed: 1,
            card_failures: 1,
        };
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            serde_json::json!({"total": 3, "succeeded": 2, "failed": 1, "card_failures": 1})
        );
    }
}
