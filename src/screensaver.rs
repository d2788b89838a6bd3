// src/screensaver.rs
//! Suppression of the operating system's screen saver.
//!
//! The platform supplies an `OsScreenSaverImpl`; the manager counts
//! outstanding inhibitors so nested callers can each hold one.

use log::debug;
use std::sync::{Arc, Mutex, PoisonError};

/// Platform hook that actually suppresses the screen saver.
pub trait OsScreenSaverImpl: Send {
    fn inhibit(&mut self);
    fn uninhibit(&mut self);
}

struct Inner {
    imp: Box<dyn OsScreenSaverImpl>,
    inhibitors: usize,
}

/// Reference-counted front end over an `OsScreenSaverImpl`.
pub struct OsScreenSaverManager {
    inner: Arc<Mutex<Inner>>,
}

impl OsScreenSaverManager {
    pub fn new(imp: Box<dyn OsScreenSaverImpl>) -> Self {
        OsScreenSaverManager {
            inner: Arc::new(Mutex::new(Inner { imp, inhibitors: 0 })),
        }
    }

    /// Keeps the screen saver suppressed for as long as the returned guard
    /// lives.
    pub fn inhibit(&self) -> OsScreenSaverInhibitor {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.inhibitors += 1;
        if inner.inhibitors == 1 {
            debug!("Inhibiting OS screen saver");
            inner.imp.inhibit();
        }
        OsScreenSaverInhibitor {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn is_inhibited(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .inhibitors
            > 0
    }
}

/// Guard returned by [`OsScreenSaverManager::inhibit`].
pub struct OsScreenSaverInhibitor {
    inner: Arc<Mutex<Inner>>,
}

impl Drop for OsScreenSaverInhibitor {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.inhibitors -= 1;
        if inner.inhibitors == 0 {
            debug!("Releasing OS screen saver");
            inner.imp.uninhibit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls {
        inhibit: AtomicUsize,
        uninhibit: AtomicUsize,
    }

    struct CountingImpl(Arc<Calls>);

    impl OsScreenSaverImpl for CountingImpl {
        fn inhibit(&mut self) {
            self.0.inhibit.fetch_add(1, Ordering::SeqCst);
        }
        fn uninhibit(&mut self) {
            self.0.uninhibit.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test_log::test]
    fn nested_inhibitors_reach_the_platform_once() {
        let calls = Arc::new(Calls::default());
        let manager = OsScreenSaverManager::new(Box::new(CountingImpl(Arc::clone(&calls))));

        let outer = manager.inhibit();
        let inner = manager.inhibit();
        assert!(manager.is_inhibited());
        assert_eq!(calls.inhibit.load(Ordering::SeqCst), 1);

        drop(inner);
        assert!(manager.is_inhibited());
        assert_eq!(calls.uninhibit.load(Ordering::SeqCst), 0);

        drop(outer);
        assert!(!manager.is_inhibited());
        assert_eq!(calls.uninhibit.load(Ordering::SeqCst), 1);
    }
}
