//! Background lister — runs [`list_entries`] on a dedicated thread.
//!
//! Requests never block the caller. The newest request sits in a single
//! slot that each new request overwrites, and a `bounded(1)` wake channel
//! tells the thread there is something to pick up; a wake that is already
//! queued covers any later request. Every request carries a generation
//! number, published in a shared atomic so the thread can skip a request
//! that is already superseded when it is picked up.
//!
//! A listing that was in flight when a newer request arrived is still
//! delivered, so the receiving side must compare generations.
use super::list_entries;
use crate::config::ListOptions;
use crate::error::ListingError;
use crate::fs::FileSystem;
use crate::model::{Entry, Location};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Maximum number of finished listings waiting to be drained.
pub const RESULT_CHANNEL_CAPACITY: usize = 64;

/// A request to list one location.
#[derive(Debug, Clone)]
pub struct ListRequest {
    pub generation: u64,
    pub location: Location,
}

/// Messages sent from the lister thread to the owner.
#[derive(Debug)]
pub enum ListingMessage {
    /// A listing finished, successfully or not.
    Complete {
        generation: u64,
        location: Location,
        result: Result<Vec<Entry>, ListingError>,
        duration: Duration,
    },
}

/// The newest request not yet picked up by the lister thread.
type PendingSlot = Arc<Mutex<Option<ListRequest>>>;

/// Handle to the background lister thread.
///
/// Dropping the handle closes the wake channel, which ends the thread
/// once it finishes the listing it is working on.
pub struct ListingWorker {
    pending: PendingSlot,
    wake_tx: Sender<()>,
    /// Receiver for finished listings.
    pub result_rx: Receiver<ListingMessage>,
    /// Newest generation requested so far.
    latest: Arc<AtomicU64>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl ListingWorker {
    /// Start the lister thread.
    pub fn spawn(fs: Arc<dyn FileSystem>, options: ListOptions) -> io::Result<Self> {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded::<()>(1);
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<ListingMessage>(RESULT_CHANNEL_CAPACITY);
        let pending: PendingSlot = Arc::new(Mutex::new(None));
        let latest = Arc::new(AtomicU64::new(0));

        let worker_pending = pending.clone();
        let worker_latest = latest.clone();
        let thread = thread::Builder::new()
            .name("dirnav-lister".into())
            .spawn(move || {
                run_worker(fs, options, worker_pending, wake_rx, result_tx, worker_latest)
            })?;

        Ok(Self {
            pending,
            wake_tx,
            result_rx,
            latest,
            _thread: Some(thread),
        })
    }

    /// Queue a listing of `location` tagged with `generation`, replacing any
    /// request the thread has not picked up yet. Never blocks.
    ///
    /// Generations must increase monotonically across calls.
    pub fn request(&self, generation: u64, location: Location) -> Result<(), ListingError> {
        self.latest.fetch_max(generation, Ordering::AcqRel);
        *self.pending.lock() = Some(ListRequest {
            generation,
            location,
        });
        match self.wake_tx.try_send(()) {
            // A full wake channel means the thread will look at the slot anyway.
            Ok(()) | Err(TrySendError::Full(())) => Ok(()),
            Err(TrySendError::Disconnected(())) => Err(ListingError::WorkerDisconnected),
        }
    }

    /// The newest generation requested so far.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

// ─── Background thread ──────────────────────────────────────────────────────

fn run_worker(
    fs: Arc<dyn FileSystem>,
    options: ListOptions,
    pending: PendingSlot,
    wake_rx: Receiver<()>,
    result_tx: Sender<ListingMessage>,
    latest: Arc<AtomicU64>,
) {
    info!("Lister thread started");

    while wake_rx.recv().is_ok() {
        let Some(request) = pending.lock().take() else {
            continue;
        };

        if request.generation < latest.load(Ordering::Acquire) {
            debug!(
                "Skipping superseded listing #{} of {:?}",
                request.generation, request.location
            );
            continue;
        }

        let started = Instant::now();
        let result = list_entries(fs.as_ref(), &request.location, &options);
        let message = ListingMessage::Complete {
            generation: request.generation,
            location: request.location,
            result,
            duration: started.elapsed(),
        };
        if result_tx.send(message).is_err() {
            break;
        }
    }

    info!("Lister thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DirEntryInfo, MemoryFileSystem};
    use crate::platform::DriveInfo;
    use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};
    use std::sync::atomic::AtomicBool;

    /// Filesystem whose `read_dir` stalls until `release` is called.
    struct StalledFs {
        inner: MemoryFileSystem,
        entered: AtomicBool,
        released: AtomicBool,
    }

    impl StalledFs {
        fn release(&self) {
            self.released.store(true, Ordering::Release);
        }
    }

    impl FileSystem for StalledFs {
        fn drives(&self) -> io::Result<Vec<DriveInfo>> {
            self.inner.drives()
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.inner.is_dir(path)
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
            self.entered.store(true, Ordering::Release);
            while !self.released.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
            }
            self.inner.read_dir(path)
        }
    }

    fn recv(worker: &ListingWorker) -> ListingMessage {
        worker
            .result_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("lister did not answer within 10 seconds")
    }

    #[test]
    fn test_worker_lists_and_tags_generation() {
        let root = PathBuf::from(MAIN_SEPARATOR_STR);
        let fs = Arc::new(MemoryFileSystem::new().with_drive(&root));
        let worker = ListingWorker::spawn(fs, ListOptions::default()).unwrap();

        worker.request(1, Location::Drives).unwrap();
        let ListingMessage::Complete {
            generation,
            location,
            result,
            ..
        } = recv(&worker);
        assert_eq!(generation, 1);
        assert_eq!(location, Location::Drives);
        assert_eq!(result.unwrap().len(), 1);
        assert_eq!(worker.latest_generation(), 1);
    }

    #[test]
    fn test_worker_reports_errors() {
        let fs = Arc::new(MemoryFileSystem::new());
        let worker = ListingWorker::spawn(fs, ListOptions::default()).unwrap();

        worker
            .request(1, Location::from(PathBuf::from(MAIN_SEPARATOR_STR).join("nope")))
            .unwrap();
        let ListingMessage::Complete { result, .. } = recv(&worker);
        assert!(matches!(result, Err(ListingError::Missing { .. })));
    }

    #[test]
    fn test_worker_last_result_is_newest_generation() {
        let root = PathBuf::from(MAIN_SEPARATOR_STR);
        let fs = Arc::new(MemoryFileSystem::new().with_drive(&root));
        let worker = ListingWorker::spawn(fs, ListOptions::default()).unwrap();

        for generation in 1..=10 {
            worker.request(generation, Location::Drives).unwrap();
        }

        // Older requests may or may not have been listed before the newer
        // ones arrived, but the newest one is always answered.
        loop {
            let ListingMessage::Complete { generation, .. } = recv(&worker);
            if generation == 10 {
                break;
            }
            assert!(generation < 10);
        }
    }

    #[test]
    fn test_requests_never_block_while_listing_stalls() {
        let root = PathBuf::from(MAIN_SEPARATOR_STR);
        let fs = Arc::new(StalledFs {
            inner: MemoryFileSystem::new().with_drive(&root),
            entered: AtomicBool::new(false),
            released: AtomicBool::new(false),
        });
        let worker = ListingWorker::spawn(fs.clone(), ListOptions::default()).unwrap();

        // Releases the stall even if `request` blocks, so a regression
        // fails on the timing assertion instead of hanging.
        let watchdog_fs = fs.clone();
        let _watchdog = thread::spawn(move || {
            thread::sleep(Duration::from_secs(10));
            watchdog_fs.release();
        });

        worker.request(1, Location::Directory(root.clone())).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !fs.entered.load(Ordering::Acquire) {
            assert!(Instant::now() < deadline, "listing never started");
            thread::sleep(Duration::from_millis(1));
        }

        let started = Instant::now();
        for generation in 2..=1000 {
            worker.request(generation, Location::Drives).unwrap();
        }
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "request blocked while a listing was stalled"
        );

        fs.release();
        let mut answered = Vec::new();
        loop {
            let ListingMessage::Complete { generation, .. } = recv(&worker);
            answered.push(generation);
            if generation == 1000 {
                break;
            }
        }
        // The stalled listing, then straight to the newest request.
        assert_eq!(answered, vec![1, 1000]);
    }
}
