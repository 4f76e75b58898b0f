use casement_core::alloc::HashMap;
use casement_core::geometry::{Point, Size};
use casement_video::{Notification, Platform, VideoSubsystem, WindowId};
pub use winit::event::WindowEvent as WinitEvent;

/// Notifications a winit window event commits, in delivery order.
///
/// Positions and sizes are converted to logical units with `scale_factor`.
/// Input events produce nothing.
pub fn translate_event(event: &WinitEvent, scale_factor: f64) -> Vec<Notification> {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    match event {
        WinitEvent::Moved(position) => vec![Notification::Moved(Point::new(
            (position.x as f64 / scale).round() as i32,
            (position.y as f64 / scale).round() as i32,
        ))],
        WinitEvent::Resized(size) => vec![
            Notification::Resized(Size::new(
                (size.width as f64 / scale).round() as u32,
                (size.height as f64 / scale).round() as u32,
            )),
            Notification::PixelSizeChanged(Size::new(size.width, size.height)),
        ],
        WinitEvent::Focused(true) => vec![Notification::FocusGained],
        WinitEvent::Focused(false) => vec![Notification::FocusLost],
        WinitEvent::CloseRequested => vec![Notification::CloseRequested],
        WinitEvent::Destroyed => vec![Notification::Destroyed],
        // A scale change is followed by a Resized carrying the new pixels.
        WinitEvent::ScaleFactorChanged { .. } | WinitEvent::Occluded(_) | WinitEvent::RedrawRequested => Vec::new(),
        WinitEvent::KeyboardInput { .. }
        | WinitEvent::ModifiersChanged(_)
        | WinitEvent::Ime(_)
        | WinitEvent::CursorMoved { .. }
        | WinitEvent::CursorEntered { .. }
        | WinitEvent::CursorLeft { .. }
        | WinitEvent::MouseWheel { .. }
        | WinitEvent::MouseInput { .. }
        | WinitEvent::PinchGesture { .. }
        | WinitEvent::PanGesture { .. }
        | WinitEvent::DoubleTapGesture { .. }
        | WinitEvent::RotationGesture { .. }
        | WinitEvent::TouchpadPressure { .. }
        | WinitEvent::AxisMotion { .. }
        | WinitEvent::Touch(_) => Vec::new(),
        unknown => {
            tracing::warn!("unhandled window event: {:?}", unknown);
            Vec::new()
        }
    }
}

/// Two-way mapping between winit window ids and Casement window ids.
#[derive(Debug, Default)]
pub struct WindowIdMap {
    to_casement: HashMap<winit::window::WindowId, WindowId>,
    to_native: HashMap<WindowId, winit::window::WindowId>,
}

impl WindowIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `native` to `id`, replacing any earlier link of either side.
    pub fn insert(&mut self, native: winit::window::WindowId, id: WindowId) -> Option<WindowId> {
        if let Some(old_native) = self.to_native.insert(id, native) {
            if old_native != native {
                self.to_casement.remove(&old_native);
            }
        }
        let previous = self.to_casement.insert(native, id);
        if let Some(previous) = previous.filter(|p| *p != id) {
            self.to_native.remove(&previous);
        }
        previous
    }

    pub fn remove_native(&mut self, native: winit::window::WindowId) -> Option<WindowId> {
        let id = self.to_casement.remove(&native)?;
        self.to_native.remove(&id);
        Some(id)
    }

    pub fn get(&self, native: winit::window::WindowId) -> Option<WindowId> {
        self.to_casement.get(&native).copied()
    }

    pub fn native(&self, id: WindowId) -> Option<winit::window::WindowId> {
        self.to_native.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.to_casement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_casement.is_empty()
    }
}

/// Feeds winit window events into a [`VideoSubsystem`].
#[derive(Debug, Default)]
pub struct WinitBridge {
    ids: WindowIdMap,
    scale_factors: HashMap<WindowId, f64>,
}

impl WinitBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, native: winit::window::WindowId, id: WindowId, scale_factor: f64) {
        self.ids.insert(native, id);
        self.scale_factors.insert(id, scale_factor);
    }

    pub fn unregister(&mut self, native: winit::window::WindowId) -> Option<WindowId> {
        let id = self.ids.remove_native(native)?;
        self.scale_factors.remove(&id);
        Some(id)
    }

    pub fn ids(&self) -> &WindowIdMap {
        &self.ids
    }

    /// Translate `event` and commit it to `video`.
    ///
    /// Returns how many notifications were handed over. Events for unknown
    /// windows are dropped.
    pub fn forward<P: Platform>(
        &mut self,
        video: &mut VideoSubsystem<P>,
        native: winit::window::WindowId,
        event: &WinitEvent,
    ) -> usize {
        let Some(id) = self.ids.get(native) else {
            tracing::trace!("Event for unregistered window {:?}", native);
            return 0;
        };
        if let WinitEvent::ScaleFactorChanged { scale_factor, .. } = event {
            self.scale_factors.insert(id, *scale_factor);
        }
        let scale = self.scale_factors.get(&id).copied().unwrap_or(1.0);

        let notifications = translate_event(event, scale);
        for notification in &notifications {
            video.handle_notification(id, *notification);
        }
        if matches!(event, WinitEvent::Destroyed) {
            self.unregister(native);
        }
        notifications.len()
    }
}
