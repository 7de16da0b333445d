//! Screen navigation with a back-stack and the deal stage drill-down filter.
//!
//! # Invariants
//! - Navigating to the active view changes nothing.
//! - `back()` on an empty stack lands on the dashboard.
//! - Selecting the deals tab manually always clears the stage filter.

use crate::model::deal::DealStage;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Contacts,
    Deals,
    Tasks,
    Audit,
    Profile,
}

impl View {
    /// Sidebar entries in display order. Profile is reached from the header menu.
    pub const NAV_ITEMS: [View; 5] = [
        View::Dashboard,
        View::Contacts,
        View::Deals,
        View::Tasks,
        View::Audit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Contacts => "contacts",
            Self::Deals => "deals",
            Self::Tasks => "tasks",
            Self::Audit => "audit",
            Self::Profile => "profile",
        }
    }

    /// Header title for the view.
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Contacts => "Contacts",
            Self::Deals => "Deals",
            Self::Tasks => "Tasks",
            Self::Audit => "Audit Log",
            Self::Profile => "My Profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    active: View,
    back_stack: Vec<View>,
    stage_filter: Option<DealStage>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            active: View::Dashboard,
            back_stack: Vec::new(),
            stage_filter: None,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn back_stack(&self) -> &[View] {
        &self.back_stack
    }

    pub fn stage_filter(&self) -> Option<DealStage> {
        self.stage_filter
    }

    /// Pushes the current view and switches. Returns whether the view changed.
    pub fn navigate_to(&mut self, view: View) -> bool {
        if self.active == view {
            return false;
        }
        self.back_stack.push(self.active);
        debug!(
            "event=navigate module=view from={} to={} depth={}",
            self.active.as_str(),
            view.as_str(),
            self.back_stack.len()
        );
        self.active = view;
        true
    }

    /// Pops one view, or falls back to the dashboard when the stack is empty.
    pub fn back(&mut self) -> View {
        self.active = self.back_stack.pop().unwrap_or(View::Dashboard);
        self.active
    }

    /// Manual tab selection from the sidebar.
    pub fn select_tab(&mut self, view: View) -> bool {
        if view == View::Deals {
            self.stage_filter = None;
        }
        self.navigate_to(view)
    }

    /// Dashboard stage metric click: filter the pipeline and open it.
    pub fn drill_down(&mut self, stage: DealStage) {
        self.stage_filter = Some(stage);
        self.navigate_to(View::Deals);
    }

    pub fn clear_stage_filter(&mut self) {
        self.stage_filter = None;
    }
}
