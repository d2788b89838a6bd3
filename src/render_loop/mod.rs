// src/render_loop/mod.rs
//! Per-frame notification of registered render-loop clients.
//!
//! ## Threading Model
//! - One render thread calls `notify_frame` once per tick
//! - Any thread may register or unregister clients
//! - A single mutex serialises all three; it is held for the whole
//!   notification pass
//!
//! Clients must not register or unregister from inside `frame_move`: the
//! lock is not reentrant and the call deadlocks.


use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A client driven once per rendered frame.
pub trait RenderLoop: Send + Sync {
    fn frame_move(&self);
}

/// Token identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderLoopHandle(u64);

struct Registration {
    handle: RenderLoopHandle,
    client: Weak<dyn RenderLoop>,
}

/// Ordered set of render-loop registrations.
///
/// The dispatcher never owns a client: registrations hold weak references
/// and are pruned once their client has been dropped.
pub struct RenderLoopDispatcher {
    clients: Mutex<Vec<Registration>>,
    next_handle: AtomicU64,
}

impl Default for RenderLoopDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoopDispatcher {
    pub fn new() -> Self {
        RenderLoopDispatcher {
            clients: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        // A client that panicked mid-frame leaves the list itself intact.
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `client` to the notification order.
    ///
    /// Registering the same client twice yields two handles and two
    /// notifications per frame.
    pub fn register<C: RenderLoop + 'static>(&self, client: &Arc<C>) -> RenderLoopHandle {
        let client: Weak<C> = Arc::downgrade(client);
        self.insert(client)
    }

    /// Like [`register`](Self::register), for clients already held as trait
    /// objects.
    pub fn register_dyn(&self, client: &Arc<dyn RenderLoop>) -> RenderLoopHandle {
        self.insert(Arc::downgrade(client))
    }

    fn insert(&self, client: Weak<dyn RenderLoop>) -> RenderLoopHandle {
        let handle = RenderLoopHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Registration { handle, client });
        trace!("Registered render loop {:?}", handle);
        handle
    }

    /// Removes the registration behind `handle`. Unknown handles are ignored.
    pub fn unregister(&self, handle: RenderLoopHandle) {
        let mut clients = self.lock();
        if let Some(pos) = clients.iter().position(|r| r.handle == handle) {
            clients.remove(pos);
            trace!("Unregistered render loop {:?}", handle);
        }
    }

    /// Calls `frame_move` on every live client in registration order.
    ///
    /// Clients stay alive until the lock is released, so a client dropped
    /// elsewhere during the pass runs its `Drop` (which may unregister)
    /// after the pass.
    pub fn notify_frame(&self) {
        let mut live = Vec::new();
        let mut clients = self.lock();
        clients.retain(|registration| match registration.client.upgrade() {
            Some(client) => {
                client.frame_move();
                live.push(client);
                true
            }
            None => {
                trace!("Dropping render loop {:?}: client gone", registration.handle);
                false
            }
        });
        drop(clients);
        drop(live);
    }

    /// Number of registrations, including ones whose client was dropped
    /// since the last frame.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
