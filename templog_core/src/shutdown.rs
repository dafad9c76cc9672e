//! Cooperative stop request shared between the interrupt handler and the loop.
//!
//! The handler only flips a flag and pokes a channel; the sampling loop looks
//! at the flag between steps and wakes from its inter-cycle sleep on the
//! channel, so a log row is never cut in half.
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
    tx: xch::Sender<()>,
    rx: xch::Receiver<()>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = xch::bounded(1);
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Request a stop. Safe to call repeatedly and from any thread.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // A full channel already holds a wake-up.
        let _ = self.tx.try_send(());
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep up to `d`. Returns true as soon as a stop was requested.
    pub fn wait(&self, d: Duration) -> bool {
        if self.is_triggered() {
            return true;
        }
        match self.rx.recv_timeout(d) {
            Ok(()) => true,
            Err(_) => self.is_triggered(),
        }
    }

    /// Predicate form for probes that poll between blocking reads.
    pub fn checker(&self) -> impl Fn() -> bool + Send + Sync + 'static {
        let flag = self.flag.clone();
        move || flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn wait_times_out_when_untriggered() {
        let s = Shutdown::new();
        assert!(!s.wait(Duration::from_millis(5)));
        assert!(!s.is_triggered());
    }

    #[test]
    fn trigger_wakes_a_waiter_early() {
        let s = Shutdown::new();
        let remote = s.clone();
        let t0 = Instant::now();
        let h = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.trigger();
        });
        assert!(s.wait(Duration::from_secs(30)));
        assert!(t0.elapsed() < Duration::from_secs(10));
        h.join().unwrap();
    }

    #[test]
    fn stays_triggered_after_wake() {
        let s = Shutdown::new();
        let check = s.checker();
        s.trigger();
        s.trigger();
        assert!(s.wait(Duration::from_millis(1)));
        assert!(s.wait(Duration::from_millis(1)));
        assert!(check());
    }
}
