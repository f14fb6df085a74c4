use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The search timer: one auxiliary thread per `get_move` call that sleeps the
/// think budget and then raises the shared stop flag.
///
/// The search thread polls the flag at node entry rather than being
/// preempted, so a deep iteration may overrun the nominal budget by the cost
/// of finishing its current node chain. The flag is the only state the timer
/// thread ever writes, so no locking is needed around the search internals.
pub struct Clock {
    handle: JoinHandle<()>,
}

impl Clock {
    /// Spawns the timer thread.
    pub fn start(flag: Arc<AtomicBool>, budget: Duration) -> Self {
        let handle = thread::spawn(move || {
            thread::sleep(budget);
            flag.store(true, Ordering::Relaxed);
        });

        Self { handle }
    }

    /// Blocks until the timer thread has finished. Called before `get_move`
    /// returns so no timer outlives its search.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_flag_fires_after_budget() {
        let flag = Arc::new(AtomicBool::new(false));
        let clock = Clock::start(flag.clone(), Duration::from_millis(100));

        assert!(!flag.load(Ordering::Relaxed));

        let start = Instant::now();
        clock.join();

        assert!(flag.load(Ordering::Relaxed));
        assert!(start.elapsed() <= Duration::from_secs(5));
    }
}
