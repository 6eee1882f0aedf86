//! Frame record reader
//!
//! Reads newline-delimited frame records from a file or stdin on a dedicated
//! thread and forwards them to the frame loop.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::record::{parse_line, FrameRecord};

/// Where frame records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "stdin"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors that can occur in the frame source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("frame source is already running")]
    AlreadyRunning,

    #[error("failed to open frame input {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to read frame input: {0}")]
    Read(#[from] io::Error),

    #[error("failed to spawn reader thread: {0}")]
    ThreadSpawn(String),
}

/// Background reader delivering [`FrameRecord`]s in input order
pub struct FrameSource {
    input: InputSource,
    interval: Duration,
    frame_tx: mpsc::Sender<FrameRecord>,
    running: Arc<AtomicBool>,
}

impl FrameSource {
    pub fn new(input: InputSource, interval: Duration, frame_tx: mpsc::Sender<FrameRecord>) -> Self {
        Self {
            input,
            interval,
            frame_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open the input and start reading on a dedicated thread
    ///
    /// The thread exits at end of input, when the receiver is dropped, or
    /// after `stop()`. Dropping the sender on exit closes the frame channel.
    pub fn start(&self) -> Result<(), SourceError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SourceError::AlreadyRunning);
        }

        let reader: Box<dyn BufRead + Send> = match &self.input {
            InputSource::Stdin => Box::new(BufReader::new(io::stdin())),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|source| {
                    self.running.store(false, Ordering::SeqCst);
                    SourceError::Open {
                        path: path.clone(),
                        source,
                    }
                })?;
                Box::new(BufReader::new(file))
            }
        };

        let frame_tx = self.frame_tx.clone();
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        let input = self.input.to_string();

        thread::Builder::new()
            .name("frame-source".to_string())
            .spawn(move || {
                info!(%input, "frame source thread started");

                match read_frames(reader, &frame_tx, &running, interval) {
                    Ok(count) => info!(frames = count, "frame input finished"),
                    Err(e) => error!(?e, "frame source error"),
                }

                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                SourceError::ThreadSpawn(e.to_string())
            })?;

        Ok(())
    }

    /// Ask the reader thread to stop after the current line
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Forward every record in `reader`, returning how many were sent
///
/// Lines that are not valid records are logged and skipped.
fn read_frames<R: BufRead>(
    reader: R,
    frame_tx: &mpsc::Sender<FrameRecord>,
    running: &AtomicBool,
    interval: Duration,
) -> Result<usize, SourceError> {
    let mut sent = 0;

    for (index, line) in reader.lines().enumerate() {
        if !running.load(Ordering::SeqCst) {
            debug!("frame source stopped");
            break;
        }

        let line = line?;
        let record = match parse_line(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping unparseable frame record");
                continue;
            }
        };

        if frame_tx.blocking_send(record).is_err() {
            warn!("failed to send frame - channel closed?");
            break;
        }
        sent += 1;

        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_source_creation() {
        let (tx, _rx) = mpsc::channel(8);
        let source = FrameSource::new(InputSource::Stdin, Duration::ZERO, tx);
        assert!(!source.is_running());
    }

    #[test]
    fn test_missing_file() {
        let (tx, _rx) = mpsc::channel(8);
        let source = FrameSource::new(
            InputSource::File(PathBuf::from("/nonexistent/frames.jsonl")),
            Duration::ZERO,
            tx,
        );
        assert!(matches!(source.start(), Err(SourceError::Open { .. })));
        assert!(!source.is_running());
    }

    #[test]
    fn test_read_frames_skips_bad_lines() {
        let input = "{\"width\":320}\n\nnot json\n{\"height\":200}\n";
        let (tx, mut rx) = mpsc::channel(8);
        let running = AtomicBool::new(true);

        let sent = read_frames(Cursor::new(input), &tx, &running, Duration::ZERO).unwrap();
        assert_eq!(sent, 2);

        let first = tokio_test::block_on(rx.recv()).unwrap();
        assert_eq!(first.width, Some(320));
        let second = tokio_test::block_on(rx.recv()).unwrap();
        assert_eq!(second.height, Some(200));
    }

    #[test]
    fn test_read_frames_honours_stop() {
        let (tx, _rx) = mpsc::channel(8);
        let running = AtomicBool::new(false);
        let sent = read_frames(Cursor::new("{}\n{}\n"), &tx, &running, Duration::ZERO).unwrap();
        assert_eq!(sent, 0);
    }

    #[test]
    fn test_read_frames_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let running = AtomicBool::new(true);
        let sent = read_frames(Cursor::new("{}\n{}\n"), &tx, &running, Duration::ZERO).unwrap();
        assert_eq!(sent, 0);
    }
}
