//! The dual-sink reporter.
//!
//! A [`Reporter`] owns the report log file and writes every fragment to it
//! and, when asked, to the console. Both sinks sit behind one lock, so a
//! fragment is written and flushed everywhere before another caller can
//! start.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, instrument};

use catchlog_shared::{CatchlogError, Catchword, ClusterSummary, Result};

use crate::render::{render_catchwords, render_cluster_summary, render_eigen_spectrum};

/// Writes report fragments to a log file and mirrors them on the console.
pub struct Reporter {
    path: PathBuf,
    sinks: Mutex<Sinks>,
}

struct Sinks {
    log: File,
    console: Box<dyn Write + Send>,
}

impl Reporter {
    /// Open (create or truncate) the report log at `path`, echoing to stdout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_console(path, io::stdout())
    }

    /// Open the report log at `path` with a custom console writer.
    pub fn with_console(
        path: impl AsRef<Path>,
        console: impl Write + Send + 'static,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let log = File::create(&path).map_err(|e| CatchlogError::io(&path, e))?;

        info!(path = %path.display(), "opened report log");

        Ok(Self {
            path,
            sinks: Mutex::new(Sinks {
                log,
                console: Box::new(console),
            }),
        })
    }

    /// Append `text` verbatim to the log and optionally echo it.
    pub fn write_text(&self, text: &str, echo: bool) -> Result<()> {
        self.write_buffer(text.as_bytes(), echo)
    }

    /// Commit a pre-assembled buffer as one flushed unit.
    ///
    /// The log is written and flushed before the console; nothing from
    /// another call can land in between.
    pub fn write_buffer(&self, buffer: &[u8], echo: bool) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        let mut sinks = self.lock();
        let Sinks { log, console } = &mut *sinks;
        log.write_all(buffer)
            .and_then(|()| log.flush())
            .map_err(|e| CatchlogError::io(&self.path, e))?;

        if echo {
            console
                .write_all(buffer)
                .and_then(|()| console.flush())
                .map_err(CatchlogError::Console)?;
        }

        debug!(bytes = buffer.len(), echo, "committed report fragment");
        Ok(())
    }

    /// Report the catchwords of one topic.
    ///
    /// `thresholds` is the topic's threshold table, indexed by vocabulary
    /// index.
    #[instrument(skip_all, fields(topic = topic, catchwords = catchword_indices.len()))]
    pub fn report_catchwords(
        &self,
        topic: usize,
        thresholds: &[f64],
        catchword_indices: &[usize],
        vocabulary: &[String],
        echo: bool,
    ) -> Result<()> {
        let words = Catchword::resolve(thresholds, catchword_indices, vocabulary)?;
        self.write_buffer(render_catchwords(&words).as_bytes(), echo)
    }

    /// Report per-cluster statistics, smallest cluster first.
    #[instrument(skip_all, fields(topics = clusters.len()))]
    pub fn report_cluster_summary(&self, clusters: &[ClusterSummary], echo: bool) -> Result<()> {
        self.write_buffer(render_cluster_summary(clusters).as_bytes(), echo)
    }

    /// Report the spectrum of the first `num_topics` squared eigenvalues.
    #[instrument(skip_all, fields(num_topics = num_topics))]
    pub fn report_eigen_spectrum(
        &self,
        eigenvalues: &[f64],
        num_topics: usize,
        echo: bool,
    ) -> Result<()> {
        let out = render_eigen_spectrum(eigenvalues, num_topics)?;
        self.write_buffer(out.as_bytes(), echo)
    }

    /// Flush and release the log.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        let mut sinks = self
            .sinks
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sinks.log.flush().map_err(|e| CatchlogError::io(&path, e))?;
        sinks.log.sync_all().map_err(|e| CatchlogError::io(&path, e))?;

        info!(path = %path.display(), "closed report log");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Sinks> {
        // A panic mid-write leaves nothing half-updated in `Sinks` itself.
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").field("path", &self.path).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;

    /// Console stand-in that keeps everything written to it.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn temp_log() -> PathBuf {
        std::env::temp_dir().join(format!("catchlog_test_{}.log", Uuid::now_v7()))
    }

    fn open_captured() -> (Reporter, Captured, PathBuf) {
        let path = temp_log();
        let console = Captured::default();
        let reporter = Reporter::with_console(&path, console.clone()).unwrap();
        (reporter, console, path)
    }

    #[test]
    fn log_and_console_receive_same_bytes() {
        let (reporter, console, path) = open_captured();

        reporter.write_text("hello\n", true).unwrap();
        let vocabulary: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        reporter
            .report_catchwords(0, &[0.1, 0.2, 0.3], &[2, 0], &vocabulary, true)
            .unwrap();

        let log = std::fs::read_to_string(&path).unwrap();
        assert_eq!(log, "hello\nCatchwords:\nc:2(0.3) a:0(0.1) \n");
        assert_eq!(console.text(), log);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn fragments_are_flushed_before_return() {
        let (reporter, _console, path) = open_captured();

        reporter.write_text("first\n", false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");

        reporter.write_text("second\n", false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn echo_off_keeps_console_quiet() {
        let (reporter, console, path) = open_captured();

        reporter.report_eigen_spectrum(&[4.0, 9.0, 16.0], 3, false).unwrap();

        assert!(console.text().is_empty());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Eigvals:  (0): 2\t(1): 3\t(2): 4\t\n"
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_fragment_is_a_no_op() {
        let (reporter, console, path) = open_captured();

        reporter.write_text("kept\n", true).unwrap();
        let before = std::fs::read(&path).unwrap();
        reporter.write_text("", true).unwrap();
        reporter.write_buffer(&[], true).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(console.text(), "kept\n");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn cluster_summary_committed_as_one_fragment() {
        let (reporter, console, path) = open_captured();
        let catchwords: Vec<Vec<usize>> = vec![vec![], vec![5, 6]];
        let closest: Vec<Vec<usize>> = vec![vec![1, 2, 3], (0..7).collect()];
        let clusters = ClusterSummary::from_parallel(
            2,
            &[1.0, 2.0],
            &catchwords,
            &closest,
            &[0.5, 0.6],
            &[0.1, 0.2],
        )
        .unwrap();

        reporter.report_cluster_summary(&clusters, true).unwrap();

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Cluster     0  size:     3"));
        assert!(lines[1].starts_with("Cluster     1  size:     7"));
        assert_eq!(lines[2], "#Topics with no catchwords: 1(2)");
        assert_eq!(console.text(), log);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let (reporter, console, path) = open_captured();

        assert!(reporter.report_eigen_spectrum(&[1.0, -4.0], 2, true).is_err());
        assert!(reporter.report_catchwords(1, &[0.5], &[3], &["x".into()], true).is_err());

        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
        assert!(console.text().is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_truncates_existing_log() {
        let path = temp_log();
        std::fs::write(&path, "stale run\n").unwrap();

        let reporter = Reporter::with_console(&path, Captured::default()).unwrap();
        reporter.write_text("fresh\n", false).unwrap();
        reporter.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_fails_for_unreachable_path() {
        let path = std::env::temp_dir()
            .join(format!("catchlog_missing_{}", Uuid::now_v7()))
            .join("run.log");

        let err = Reporter::open(&path).unwrap_err();
        assert!(matches!(err, CatchlogError::Io { .. }));
    }

    #[test]
    fn concurrent_fragments_never_interleave() {
        let (reporter, _console, path) = open_captured();
        let fragment = |id: usize| format!("writer-{id}\n").repeat(50);

        std::thread::scope(|scope| {
            for id in 0..8 {
                let reporter = &reporter;
                scope.spawn(move || {
                    for _ in 0..20 {
                        reporter.write_text(&fragment(id), false).unwrap();
                    }
                });
            }
        });

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 8 * 20 * 50);
        for block in lines.chunks(50) {
            assert!(block.iter().all(|line| *line == block[0]), "interleaved fragment");
        }

        let _ = std::fs::remove_file(&path);
    }
}
