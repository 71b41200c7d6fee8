/// Pending-event latches shared with asynchronous contexts.
///
/// The signal thread and the tick alarm thread may only raise one of these
/// flags. Raising rings an optional bell so the blocked reader wakes up. The
/// game loop is the sole reader and clears a flag when it handles it.
/// Nothing else crosses this boundary.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use signal_hook::consts::{SIGCONT, SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

use crate::error::GameError;

type Bell = Box<dyn Fn() + Send>;

#[derive(Clone, Default)]
pub struct PendingFlags {
    tick: Arc<AtomicBool>,
    resize: Arc<AtomicBool>,
    terminate: Arc<AtomicBool>,
    /// Rung after every raise so a blocked reader wakes up.
    bell: Arc<Mutex<Option<Bell>>>,
}

impl fmt::Debug for PendingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFlags")
            .field("tick", &self.tick)
            .field("resize", &self.resize)
            .field("terminate", &self.terminate)
            .finish_non_exhaustive()
    }
}

impl PendingFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the wake-up hook. Replaces any previous one.
    pub fn set_bell(&self, bell: impl Fn() + Send + 'static) {
        if let Ok(mut slot) = self.bell.lock() {
            *slot = Some(Box::new(bell));
        }
    }

    pub fn raise_tick(&self) {
        self.raise(&self.tick);
    }

    pub fn raise_resize(&self) {
        self.raise(&self.resize);
    }

    pub fn raise_terminate(&self) {
        self.raise(&self.terminate);
    }

    fn raise(&self, flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
        if let Ok(slot) = self.bell.lock() {
            if let Some(ring) = slot.as_ref() {
                ring();
            }
        }
    }

    /// Read and clear.
    pub fn take_tick(&self) -> bool {
        self.tick.swap(false, Ordering::SeqCst)
    }

    pub fn take_resize(&self) -> bool {
        self.resize.swap(false, Ordering::SeqCst)
    }

    pub fn take_terminate(&self) -> bool {
        self.terminate.swap(false, Ordering::SeqCst)
    }

    pub fn any(&self) -> bool {
        self.tick.load(Ordering::SeqCst)
            || self.resize.load(Ordering::SeqCst)
            || self.terminate.load(Ordering::SeqCst)
    }

    /// Start forwarding OS signals: SIGTERM and SIGINT request termination,
    /// SIGCONT requests a resize. Forwarding stops when the bridge is dropped.
    pub fn install(&self) -> Result<SignalBridge, GameError> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGCONT])
            .map_err(|e| GameError::resource("installing signal handler", e))?;
        let handle = signals.handle();
        let flags = self.clone();

        let thread = thread::Builder::new()
            .name("signals".into())
            .spawn(move || {
                for sig in signals.forever() {
                    log::debug!("signal {sig}");
                    match sig {
                        SIGCONT => flags.raise_resize(),
                        _ => flags.raise_terminate(),
                    }
                }
            })
            .map_err(|e| GameError::resource("installing signal handler", e))?;

        log::debug!("signal handlers installed");
        Ok(SignalBridge { handle, thread: Some(thread) })
    }
}

/// Keeps the signal forwarding thread alive.
pub struct SignalBridge {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
