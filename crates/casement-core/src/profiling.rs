//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros expand to nothing,
//! so call sites never need their own `cfg` guards.

#[cfg(feature = "profiling")]
use std::sync::OnceLock;

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
pub use crate::{noop_profile_function as profile_function, noop_profile_scope as profile_scope};

#[doc(hidden)]
#[macro_export]
macro_rules! noop_profile_function {
    ($($arg:tt)*) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! noop_profile_scope {
    ($($arg:tt)*) => {};
}

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Send profiling data to puffin_viewer via HTTP.
    PuffinHttp,
}

/// Address the puffin HTTP server listens on.
pub const PUFFIN_ADDR: &str = "0.0.0.0:8585";

#[cfg(feature = "profiling")]
static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Initialize profiling with the specified backend.
///
/// # Example
/// ```no_run
/// use casement_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
#[cfg(feature = "profiling")]
pub fn init_profiling(backend: ProfilingBackend) {
    match backend {
        ProfilingBackend::PuffinHttp => {
            puffin::set_scopes_on(true);

            match puffin_http::Server::new(PUFFIN_ADDR) {
                Ok(server) => {
                    tracing::info!("Puffin profiler server started on http://{}", PUFFIN_ADDR);
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server: {}", e);
                }
            }
        }
    }
}

/// Profiling is compiled out; logs once so the caller knows why nothing shows up.
#[cfg(not(feature = "profiling"))]
pub fn init_profiling(backend: ProfilingBackend) {
    tracing::warn!("profiling requested ({:?}) but the `profiling` feature is disabled", backend);
}

/// Mark the start of a new profiling frame.
///
/// Hosts call this once per iteration of their event loop.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}
