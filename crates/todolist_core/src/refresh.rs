use crate::store::TodoStore;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use time::OffsetDateTime;

/// Periodic due-flag recomputation with an explicit lifecycle. The worker
/// ticks until `stop` is called or the scheduler is dropped; both join the
/// thread, so no tick can outlive the owner of the store.
pub struct RefreshScheduler {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn start(store: Arc<Mutex<TodoStore>>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {
                        let now = OffsetDateTime::now_utc();
                        if let Ok(mut store) = store.lock() {
                            store.recompute_due_flags(now);
                        }
                    }
                }
            }
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
