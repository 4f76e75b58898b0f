use crate::window::{WindowFlags, WindowId};

/// Input devices a window can grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrabKind {
    Keyboard,
    Mouse,
}

impl GrabKind {
    /// Window flag that mirrors the grab.
    pub const fn flag(self) -> WindowFlags {
        match self {
            GrabKind::Keyboard => WindowFlags::KEYBOARD_GRABBED,
            GrabKind::Mouse => WindowFlags::MOUSE_GRABBED,
        }
    }
}

/// Single holder per grab kind.
#[derive(Debug, Default)]
pub struct GrabRegistry {
    keyboard: Option<WindowId>,
    mouse: Option<WindowId>,
}

impl GrabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: GrabKind) -> &mut Option<WindowId> {
        match kind {
            GrabKind::Keyboard => &mut self.keyboard,
            GrabKind::Mouse => &mut self.mouse,
        }
    }

    /// Give the grab to `window`, returning the window it was taken from.
    pub fn grant(&mut self, kind: GrabKind, window: WindowId) -> Option<WindowId> {
        self.slot(kind).replace(window).filter(|previous| *previous != window)
    }

    /// Release the grab if `window` holds it. Returns whether it did.
    pub fn release(&mut self, kind: GrabKind, window: WindowId) -> bool {
        let slot = self.slot(kind);
        if *slot == Some(window) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Release every grab `window` holds, returning the kinds released.
    pub fn release_all(&mut self, window: WindowId) -> Vec<GrabKind> {
        [GrabKind::Keyboard, GrabKind::Mouse]
            .into_iter()
            .filter(|kind| self.release(*kind, window))
            .collect()
    }

    pub fn holder(&self, kind: GrabKind) -> Option<WindowId> {
        match kind {
            GrabKind::Keyboard => self.keyboard,
            GrabKind::Mouse => self.mouse,
        }
    }

    pub fn holds(&self, kind: GrabKind, window: WindowId) -> bool {
        self.holder(kind) == Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> WindowId {
        WindowId::from_raw(raw).unwrap()
    }

    #[test]
    fn test_grant_moves_grab() {
        let mut grabs = GrabRegistry::new();
        assert_eq!(grabs.grant(GrabKind::Keyboard, id(1)), None);
        assert_eq!(grabs.grant(GrabKind::Keyboard, id(2)), Some(id(1)));
        assert!(grabs.holds(GrabKind::Keyboard, id(2)));
        assert!(!grabs.holds(GrabKind::Keyboard, id(1)));

        // Re-granting to the holder takes nothing from anyone.
        assert_eq!(grabs.grant(GrabKind::Keyboard, id(2)), None);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut grabs = GrabRegistry::new();
        grabs.grant(GrabKind::Keyboard, id(1));
        grabs.grant(GrabKind::Mouse, id(2));

        assert!(!grabs.release(GrabKind::Mouse, id(1)));
        assert_eq!(grabs.release_all(id(1)), vec![GrabKind::Keyboard]);
        assert_eq!(grabs.holder(GrabKind::Mouse), Some(id(2)));
        assert_eq!(grabs.holder(GrabKind::Keyboard), None);
    }
}
