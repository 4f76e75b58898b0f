//! A [`Platform`] wrapper that records calls for verification in tests.

use std::sync::Arc;
use std::time::Duration;

use casement_core::geometry::Size;
use casement_video::platform::{NativeWindowSpec, WindowSnapshot};
use casement_video::{
    Display, FlashOperation, GrabKind, HeadlessPlatform, Platform, PlatformCapabilities, PlatformEvent, Request,
    RequestTicket, VideoError, VideoResult, WindowFlags, WindowId,
};
use parking_lot::Mutex;

/// One call made by the video subsystem into its platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    EnumerateDisplays,
    CreateWindow {
        id: WindowId,
        flags: WindowFlags,
        size: Size<u32>,
        parent: Option<WindowId>,
    },
    DestroyWindow {
        id: WindowId,
    },
    Submit {
        id: WindowId,
        request: Request,
    },
    Sync {
        id: WindowId,
    },
    SetTitle {
        id: WindowId,
        title: String,
    },
    SetOpacity {
        id: WindowId,
        opacity: f32,
    },
    SetSizeLimits {
        id: WindowId,
        min: Size<u32>,
        max: Size<u32>,
    },
    SetParent {
        id: WindowId,
        parent: Option<WindowId>,
    },
    SetModal {
        id: WindowId,
        modal: bool,
    },
    SetGrab {
        id: WindowId,
        kind: GrabKind,
        grabbed: bool,
    },
    Flash {
        id: WindowId,
        operation: FlashOperation,
    },
    SetScreenSaver {
        enabled: bool,
    },
}

/// Shared handle to the calls a [`RecordingPlatform`] has seen.
///
/// Stays usable after the platform moved into a subsystem.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<PlatformCall>>>,
}

impl CallLog {
    fn record(&self, call: PlatformCall) {
        self.calls.lock().push(call);
    }

    /// Copy of every recorded call, oldest first.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&PlatformCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Requests submitted for `id`, in order.
    pub fn requests_for(&self, id: WindowId) -> Vec<Request> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::Submit { id: window, request } if *window == id => Some(*request),
                _ => None,
            })
            .collect()
    }

    /// Windows destroyed, in order.
    pub fn destroyed(&self) -> Vec<WindowId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::DestroyWindow { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

type FailurePredicate = Box<dyn Fn(&PlatformCall) -> bool>;

/// Forwards to a [`HeadlessPlatform`] and records each call.
pub struct RecordingPlatform {
    inner: HeadlessPlatform,
    log: CallLog,
    failing: Option<FailurePredicate>,
}

impl RecordingPlatform {
    pub fn new(inner: HeadlessPlatform) -> Self {
        Self {
            inner,
            log: CallLog::default(),
            failing: None,
        }
    }

    /// Make fallible calls matching `predicate` return a platform error.
    /// They are still recorded and never reach the inner platform.
    pub fn fail_when(&mut self, predicate: impl Fn(&PlatformCall) -> bool + 'static) {
        self.failing = Some(Box::new(predicate));
    }

    pub fn stop_failing(&mut self) {
        self.failing = None;
    }

    fn record_fallible(&mut self, call: PlatformCall) -> VideoResult<()> {
        let fails = self.failing.as_ref().is_some_and(|predicate| predicate(&call));
        self.log.record(call);
        if fails {
            return Err(VideoError::Platform {
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn inner(&self) -> &HeadlessPlatform {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut HeadlessPlatform {
        &mut self.inner
    }
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new(HeadlessPlatform::new())
    }
}

impl Platform for RecordingPlatform {
    fn name(&self) -> &str {
        "recording"
    }

    fn capabilities(&self) -> PlatformCapabilities {
        self.inner.capabilities()
    }

    fn enumerate_displays(&mut self) -> VideoResult<Vec<Display>> {
        self.log.record(PlatformCall::EnumerateDisplays);
        self.inner.enumerate_displays()
    }

    fn create_window(&mut self, id: WindowId, spec: &NativeWindowSpec) -> VideoResult<WindowSnapshot> {
        self.log.record(PlatformCall::CreateWindow {
            id,
            flags: spec.flags,
            size: spec.size,
            parent: spec.parent,
        });
        self.inner.create_window(id, spec)
    }

    fn destroy_window(&mut self, id: WindowId) {
        self.log.record(PlatformCall::DestroyWindow { id });
        self.inner.destroy_window(id);
    }

    fn submit(&mut self, id: WindowId, ticket: RequestTicket, request: &Request) -> VideoResult<()> {
        self.record_fallible(PlatformCall::Submit { id, request: *request })?;
        self.inner.submit(id, ticket, request)
    }

    fn pump(&mut self) -> Vec<PlatformEvent> {
        self.inner.pump()
    }

    fn sync(&mut self, id: WindowId, timeout: Duration) -> Vec<PlatformEvent> {
        self.log.record(PlatformCall::Sync { id });
        self.inner.sync(id, timeout)
    }

    fn set_title(&mut self, id: WindowId, title: &str) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetTitle {
            id,
            title: title.to_string(),
        })?;
        self.inner.set_title(id, title)
    }

    fn set_opacity(&mut self, id: WindowId, opacity: f32) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetOpacity { id, opacity })?;
        self.inner.set_opacity(id, opacity)
    }

    fn set_size_limits(&mut self, id: WindowId, min: Size<u32>, max: Size<u32>) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetSizeLimits { id, min, max })?;
        self.inner.set_size_limits(id, min, max)
    }

    fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetParent { id, parent })?;
        self.inner.set_parent(id, parent)
    }

    fn set_modal(&mut self, id: WindowId, modal: bool) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetModal { id, modal })?;
        self.inner.set_modal(id, modal)
    }

    fn set_grab(&mut self, id: WindowId, kind: GrabKind, grabbed: bool) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetGrab { id, kind, grabbed })?;
        self.inner.set_grab(id, kind, grabbed)
    }

    fn flash(&mut self, id: WindowId, operation: FlashOperation) -> VideoResult<()> {
        self.record_fallible(PlatformCall::Flash { id, operation })?;
        self.inner.flash(id, operation)
    }

    fn set_screen_saver_enabled(&mut self, enabled: bool) -> VideoResult<()> {
        self.record_fallible(PlatformCall::SetScreenSaver { enabled })?;
        self.inner.set_screen_saver_enabled(enabled)
    }
}
