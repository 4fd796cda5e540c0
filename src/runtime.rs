//! Async runtime management for FFI
//!
//! This module provides a global Tokio runtime that allows FFI functions
//! to drive the async send pipeline synchronously from the C perspective.

use std::future::Future;
use std::sync::Mutex;
use tokio::runtime::{Handle, Runtime};

use crate::error::{Error, ErrorCode, Result};

lazy_static::lazy_static! {
    /// Global Tokio runtime for async operations
    static ref RUNTIME: Mutex<Option<Runtime>> = Mutex::new(None);
}

/// Initialize the async runtime
///
/// This should be called during library initialization.
/// It's safe to call multiple times - subsequent calls are no-ops.
pub fn init_runtime() -> Result<()> {
    let mut runtime_guard = RUNTIME
        .lock()
        .map_err(|_| Error::new(ErrorCode::Unknown, "Failed to acquire runtime lock"))?;

    if runtime_guard.is_none() {
        let runtime = Runtime::new().map_err(|e| {
            Error::new(ErrorCode::Unknown, format!("Failed to create Tokio runtime: {e}"))
        })?;
        *runtime_guard = Some(runtime);
    }

    Ok(())
}

/// Shutdown the async runtime
///
/// In-flight sends are given a few seconds to finish.
pub fn shutdown_runtime() {
    if let Ok(mut runtime_guard) = RUNTIME.lock() {
        if let Some(runtime) = runtime_guard.take() {
            runtime.shutdown_timeout(std::time::Duration::from_secs(5));
        }
    }
}

/// Get a handle to the runtime
///
/// Returns None if the runtime is not initialized
pub fn runtime_handle() -> Option<Handle> {
    RUNTIME
        .lock()
        .ok()?
        .as_ref()
        .map(|rt| rt.handle().clone())
}

/// Execute an async future synchronously
///
/// Blocks the current thread until the future completes. The runtime lock is
/// released before blocking, so several threads can send at once.
pub fn block_on<F>(future: F) -> Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    let handle = runtime_handle()
        .ok_or_else(|| Error::new(ErrorCode::InvalidState, "Runtime not initialized"))?;
    Ok(handle.block_on(future))
}
