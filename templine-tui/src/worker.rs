//! Background worker thread — the blocking fetch runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels, so the
//! event loop keeps drawing the loading state while the request is in flight.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use templine_core::data::{LoadError, SeriesSource};
use templine_core::domain::HistoricalSeries;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Load { source: SeriesSource },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Loaded {
        source: SeriesSource,
        result: Result<HistoricalSeries, LoadError>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("templine-worker".into())
        .spawn(move || worker_loop(rx, tx))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Load { source }) => {
                let result = load(&source);
                if tx.send(WorkerResponse::Loaded { source, result }).is_err() {
                    break;
                }
            }
        }
    }
    debug!("worker stopped");
}

fn load(source: &SeriesSource) -> Result<HistoricalSeries, LoadError> {
    info!(source = %source.describe(), "loading series");
    let provider = source.provider()?;
    provider.fetch()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_reports_load_failure() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx).unwrap();

        let source = SeriesSource::Csv {
            path: "/nonexistent/gistemp.csv".into(),
        };
        cmd_tx.send(WorkerCommand::Load { source: source.clone() }).unwrap();

        let WorkerResponse::Loaded { source: seen, result } =
            resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(seen, source);
        assert!(matches!(result, Err(LoadError::Io { .. })));

        drop(cmd_tx);
        handle.join().unwrap();
    }
}
