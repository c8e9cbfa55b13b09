use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::http_client::ApiError;

const CANCEL_POLL: Duration = Duration::from_millis(100);

/// Cancellation handle for a periodic fetch loop. Dropping it cancels
/// the loop, so screen teardown cannot leak a poller.
pub struct SyncHandle {
    cancelled: Arc<AtomicBool>,
}

impl SyncHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Periodically runs `fetch` and hands each result to `on_update`.
/// One thread per loop, so fetches never overlap: a slow response
/// delays the next tick instead of stacking requests. A result that
/// lands after cancellation is discarded, never delivered.
pub fn start<T, F, U>(interval: Duration, mut fetch: F, mut on_update: U) -> SyncHandle
where
    T: Send + 'static,
    F: FnMut() -> Result<T, ApiError> + Send + 'static,
    U: FnMut(Result<T, ApiError>) + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();

    thread::spawn(move || {
        loop {
            if flag.load(Ordering::SeqCst) {
                return;
            }
            let result = fetch();
            if flag.load(Ordering::SeqCst) {
                return;
            }
            on_update(result);

            let mut slept = Duration::ZERO;
            while slept < interval {
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                let step = CANCEL_POLL.min(interval - slept);
                thread::sleep(step);
                slept += step;
            }
        }
    });

    SyncHandle { cancelled }
}
