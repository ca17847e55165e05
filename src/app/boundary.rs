//! Root error boundary
//!
//! [`ErrorBoundary`] swaps in a panic hook for as long as it lives and puts
//! the previous hook back on drop. Every panic is logged and recorded in
//! the shared [`Faults`]; only panics that escape a guarded scope on the
//! installing thread are passed on to the previous hook.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

/// Shared record of the last intercepted panic
#[derive(Debug, Clone, Default)]
pub struct Faults {
    message: Arc<Mutex<Option<String>>>,
}

impl Faults {
    /// Message of the recorded fault, if any
    pub fn current(&self) -> Option<String> {
        self.message.lock().ok().and_then(|m| m.clone())
    }

    pub fn is_faulted(&self) -> bool {
        self.current().is_some()
    }

    /// Clear the fault so normal rendering resumes
    pub fn reset(&self) {
        if let Ok(mut message) = self.message.lock() {
            *message = None;
        }
    }

    fn record(&self, message: String) {
        if let Ok(mut slot) = self.message.lock() {
            *slot = Some(message);
        }
    }

    /// Run `f`, turning a panic into a recorded fault
    pub fn guard<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let was_guarded = GUARDED.with(|g| g.replace(true));
        let result = panic::catch_unwind(AssertUnwindSafe(f));
        GUARDED.with(|g| g.set(was_guarded));

        match result {
            Ok(value) => Some(value),
            Err(payload) => {
                self.record(panic_message(payload.as_ref()));
                None
            }
        }
    }
}

type PanicHook = Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Scoped panic hook installation
pub struct ErrorBoundary {
    previous: Arc<PanicHook>,
}

impl ErrorBoundary {
    /// Install the hook. Returns None when panics abort, since nothing
    /// could be caught.
    pub fn install(faults: Faults) -> Option<Self> {
        if !cfg!(panic = "unwind") {
            tracing::warn!("Built with panic=abort, running without error boundary");
            return None;
        }

        let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
        let chained = Arc::clone(&previous);
        let owner: ThreadId = thread::current().id();

        panic::set_hook(Box::new(move |info| {
            let message = panic_message(info.payload());
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_default();
            tracing::error!(panic = %message, location = %location, "Panic intercepted");
            faults.record(message);

            let guarded = GUARDED.with(|g| g.get());
            if !guarded && thread::current().id() == owner {
                chained(info);
            }
        }));

        tracing::debug!("Error boundary installed");
        Some(Self { previous })
    }
}

impl Drop for ErrorBoundary {
    fn drop(&mut self) {
        let previous = Arc::clone(&self.previous);
        // Drop our hook before putting the previous one back
        let _ = panic::take_hook();
        panic::set_hook(Box::new(move |info| previous(info)));
        tracing::debug!("Error boundary removed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Serializes tests that swap the process-wide panic hook
#[cfg(test)]
pub(crate) static HOOK_LOCK: Mutex<()> = Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        HOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_guard_records_panic_message() {
        let _lock = lock();
        let faults = Faults::default();
        let result: Option<()> = faults.guard(|| panic!("render exploded"));
        assert!(result.is_none());
        assert_eq!(faults.current().as_deref(), Some("render exploded"));

        faults.reset();
        assert!(!faults.is_faulted());
        assert_eq!(faults.guard(|| 7), Some(7));
    }

    #[test]
    fn test_formatted_and_opaque_payloads() {
        let _lock = lock();
        let faults = Faults::default();
        faults.guard(|| panic!("index {} out of range", 9));
        assert_eq!(faults.current().as_deref(), Some("index 9 out of range"));

        faults.guard(|| std::panic::panic_any(42_u32));
        assert_eq!(faults.current().as_deref(), Some(UNKNOWN_ERROR));
    }

    #[test]
    fn test_hook_records_background_panics() {
        let _lock = lock();
        let faults = Faults::default();
        let boundary = ErrorBoundary::install(faults.clone()).expect("unwind build");

        let handle = thread::spawn(|| panic!("worker failed"));
        assert!(handle.join().is_err());
        assert_eq!(faults.current().as_deref(), Some("worker failed"));

        drop(boundary);
        faults.reset();
        let handle = thread::spawn(|| panic!("after restore"));
        assert!(handle.join().is_err());
        assert!(!faults.is_faulted());
    }
}
