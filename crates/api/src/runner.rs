//! Frame loop over a JSON-lines detection stream

use dms::{DetectionFrame, MonitoringEngine};
use std::future::Future;
use std::io::{self, BufRead};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::routes::alerts::AlertRecord;
use crate::SharedState;

/// Counters for one run of the frame loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub alerts_raised: usize,
}

/// Lines buffered between a reader and the frame loop
const LINE_BUFFER: usize = 256;

/// Stream of raw detection lines; a read error is sent once, then the stream ends
pub type LineSource = mpsc::Receiver<io::Result<String>>;

/// Read lines from an async reader on a background task
pub fn spawn_reader<R>(reader: R) -> LineSource
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    tokio::spawn(async move {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.transpose() {
            let failed = line.is_err();
            if tx.send(line).await.is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Read stdin lines on a detached OS thread.
///
/// Blocking stdin reads cannot be cancelled and stay off the runtime.
pub fn spawn_stdin() -> io::Result<LineSource> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Feed every detection line to the engine until the source ends or
/// `shutdown` resolves.
///
/// Lines that fail to parse or carry malformed landmarks are skipped.
/// A read error ends the loop like end of input does.
pub async fn run<F>(
    mut lines: LineSource,
    engine: &mut MonitoringEngine,
    state: &SharedState,
    shutdown: F,
) -> RunSummary
where
    F: Future<Output = ()>,
{
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Stop requested, leaving frame loop");
                break;
            }
            line = lines.recv() => line,
        };

        let line = match line {
            Some(Ok(line)) => line,
            None => {
                info!("Frame source exhausted");
                break;
            }
            Some(Err(e)) => {
                error!("Frame acquisition failed: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let frame: DetectionFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping unparseable frame: {}", e);
                summary.frames_skipped += 1;
                state.write().await.status.frames_skipped += 1;
                continue;
            }
        };

        match engine.process(&frame) {
            Ok(analysis) => {
                summary.frames_processed += 1;
                for tone in &analysis.tones {
                    debug!(
                        frequency_hz = tone.frequency_hz,
                        duration_ms = tone.duration_ms,
                        "Tone requested"
                    );
                }
                for label in &analysis.overlay {
                    debug!(x = label.position.0, y = label.position.1, "Overlay: {}", label.text);
                }

                let mut shared = state.write().await;
                shared.status.record(&analysis, engine.active_alerts());
                shared.alerts = AlertRecord::snapshot(engine.alerts());
            }
            Err(e) => {
                warn!("Skipping frame at {:.3}s: {}", frame.timestamp, e);
                summary.frames_skipped += 1;
                state.write().await.status.frames_skipped += 1;
            }
        }
    }

    summary.alerts_raised = engine.alerts().total_raised();
    info!(
        "Frame loop finished: {} processed, {} skipped, {} alerts",
        summary.frames_processed, summary.frames_skipped, summary.alerts_raised
    );
    summary
}
