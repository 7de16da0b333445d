//! Header dropdown panels and outside-click dismissal.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Notifications,
    ProfileMenu,
}

/// At most one dropdown is open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    open: Option<Panel>,
}

impl PanelState {
    pub fn open_panel(&self) -> Option<Panel> {
        self.open
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        self.open == Some(panel)
    }

    pub fn toggle(&mut self, panel: Panel) {
        self.open = if self.is_open(panel) { None } else { Some(panel) };
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// Pointer-down anywhere; `hit` is the panel containing the target, if any.
    /// Closes the open panel unless the interaction happened inside it.
    pub fn pointer_down(&mut self, hit: Option<Panel>) {
        if self.open.is_some() && self.open != hit {
            self.open = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Panel, PanelState};

    #[test]
    fn outside_click_dismisses_inside_click_keeps() {
        let mut panels = PanelState::default();
        panels.toggle(Panel::Notifications);

        panels.pointer_down(Some(Panel::Notifications));
        assert!(panels.is_open(Panel::Notifications));

        panels.pointer_down(Some(Panel::ProfileMenu));
        assert_eq!(panels.open_panel(), None);

        panels.toggle(Panel::ProfileMenu);
        panels.pointer_down(None);
        assert_eq!(panels.open_panel(), None);
    }

    #[test]
    fn toggle_switches_between_panels() {
        let mut panels = PanelState::default();
        panels.toggle(Panel::Notifications);
        panels.toggle(Panel::ProfileMenu);
        assert!(panels.is_open(Panel::ProfileMenu));
        panels.toggle(Panel::ProfileMenu);
        assert_eq!(panels.open_panel(), None);
    }
}
