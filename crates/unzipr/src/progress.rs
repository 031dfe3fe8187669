//! Progress reporting for recursive extraction

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// A trait for reporting progress during recursive extraction
///
/// `depth` is zero for the top-level archive and grows by one for every level
/// of nesting.
pub trait ProgressReporter {
    /// Called when an archive has been opened and its members are about to be extracted
    fn on_archive_start(&self, archive: &Path, depth: usize);

    /// Called after a member has been written to disk
    fn on_entry(&self, path: &Path);

    /// Called when all members of an archive have been processed
    fn on_archive_finish(&self, archive: &Path, depth: usize);
}

/// A no-op progress reporter
#[derive(Default)]
pub struct NoProgressReporter;

impl ProgressReporter for NoProgressReporter {
    fn on_archive_start(&self, _archive: &Path, _depth: usize) {}
    fn on_entry(&self, _path: &Path) {}
    fn on_archive_finish(&self, _archive: &Path, _depth: usize) {}
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &P {
    fn on_archive_start(&self, archive: &Path, depth: usize) {
        (**self).on_archive_start(archive, depth)
    }

    fn on_entry(&self, path: &Path) {
        (**self).on_entry(path)
    }

    fn on_archive_finish(&self, archive: &Path, depth: usize) {
        (**self).on_archive_finish(archive, depth)
    }
}

/// Progress reporter using indicatif
///
/// Prints a notice for every archive above a spinner that counts extracted
/// members.
#[cfg(feature = "progress")]
pub struct IndicatifProgressReporter {
    progress_bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgressReporter {
    /// Create a new indicatif progress reporter
    pub fn new(progress_bar: ProgressBar) -> Self {
        Self { progress_bar }
    }

    /// Create a new indicatif spinner with default styling
    pub fn with_default_style() -> Self {
        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} entries {wide_msg:.dim}")
                .unwrap(),
        );
        progress_bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { progress_bar }
    }

    /// The underlying progress bar
    pub fn progress_bar(&self) -> &ProgressBar {
        &self.progress_bar
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgressReporter {
    fn on_archive_start(&self, archive: &Path, depth: usize) {
        let line = format!(
            "{}{} {}",
            "  ".repeat(depth),
            console::style("Extracting").for_stderr().green().bold(),
            archive.display()
        );
        // A hidden bar swallows `println`, the notice is still wanted
        if self.progress_bar.is_hidden() {
            eprintln!("{line}");
        } else {
            self.progress_bar.println(line);
        }
    }

    fn on_entry(&self, path: &Path) {
        self.progress_bar.inc(1);
        self.progress_bar.set_message(path.display().to_string());
    }

    fn on_archive_finish(&self, _archive: &Path, depth: usize) {
        if depth == 0 {
            let entries = self.progress_bar.position();
            self.progress_bar
                .finish_with_message(format!("extracted {entries} entries"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl ProgressReporter for Recorder {
        fn on_archive_start(&self, archive: &Path, depth: usize) {
            self.events
                .borrow_mut()
                .push(format!("start {} {depth}", archive.display()));
        }

        fn on_entry(&self, path: &Path) {
            self.events
                .borrow_mut()
                .push(format!("entry {}", path.display()));
        }

        fn on_archive_finish(&self, archive: &Path, depth: usize) {
            self.events
                .borrow_mut()
                .push(format!("finish {} {depth}", archive.display()));
        }
    }

    fn drive<R: ProgressReporter>(reporter: R) {
        reporter.on_archive_start(Path::new("a.zip"), 0);
        reporter.on_entry(Path::new("a.txt"));
        reporter.on_archive_finish(Path::new("a.zip"), 0);
    }

    #[test]
    fn test_reference_forwards_events() {
        let recorder = Recorder::default();
        drive(&recorder);

        assert_eq!(
            *recorder.events.borrow(),
            vec!["start a.zip 0", "entry a.txt", "finish a.zip 0"]
        );
    }

    #[cfg(feature = "progress")]
    #[test]
    fn test_indicatif_counts_entries() {
        let reporter = IndicatifProgressReporter::new(ProgressBar::hidden());
        reporter.on_archive_start(Path::new("outer.zip"), 0);
        reporter.on_entry(Path::new("readme.txt"));
        reporter.on_archive_start(Path::new("inner.zip"), 1);
        reporter.on_entry(Path::new("data.csv"));
        reporter.on_archive_finish(Path::new("inner.zip"), 1);
        assert!(!reporter.progress_bar().is_finished());

        reporter.on_archive_finish(Path::new("outer.zip"), 0);
        assert_eq!(reporter.progress_bar().position(), 2);
        assert!(reporter.progress_bar().is_finished());
    }
}
