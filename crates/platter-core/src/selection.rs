//! Selection state machine: grid (`Collapsed`) vs detail (`Expanded`)
//!
//! The machine only holds logical state. Changes are instantaneous and are
//! reported as a [`SelectionChange`], which the UI turns into a transition
//! animation, a scene bind, and a rotation reset.

use tracing::{debug, info};

use crate::catalog::{AssetRef, CatalogEntry};

/// Current view state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Grid of thumbnails, nothing selected
    #[default]
    Collapsed,
    /// Detail view for one entry
    Expanded(CatalogEntry),
}

impl ViewState {
    pub fn is_expanded(&self) -> bool {
        matches!(self, ViewState::Expanded(_))
    }

    pub fn selected(&self) -> Option<&CatalogEntry> {
        match self {
            ViewState::Collapsed => None,
            ViewState::Expanded(entry) => Some(entry),
        }
    }
}

/// A state change that actually happened
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    /// Moved from `Collapsed` to `Expanded(entry)`
    Expanded(CatalogEntry),
    /// Moved from `Expanded(previous)` to `Collapsed`
    Collapsed { previous: CatalogEntry },
}

impl SelectionChange {
    /// Scene that should be bound after this change; `None` means unbind
    pub fn scene_binding(&self) -> Option<&AssetRef> {
        match self {
            SelectionChange::Expanded(entry) => entry.asset.as_ref(),
            SelectionChange::Collapsed { .. } => None,
        }
    }

    /// The entry whose elements are shared between the two layouts
    pub fn entry(&self) -> &CatalogEntry {
        match self {
            SelectionChange::Expanded(entry) => entry,
            SelectionChange::Collapsed { previous } => previous,
        }
    }
}

/// Holds zero or one selected entry
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: ViewState,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Select an entry; ignored unless currently `Collapsed`
    pub fn select(&mut self, entry: &CatalogEntry) -> Option<SelectionChange> {
        match self.state {
            ViewState::Collapsed => {
                info!(identifier = %entry.identifier, "Selected entry");
                self.state = ViewState::Expanded(entry.clone());
                Some(SelectionChange::Expanded(entry.clone()))
            }
            ViewState::Expanded(ref current) => {
                debug!(
                    current = %current.identifier,
                    requested = %entry.identifier,
                    "Ignoring select while expanded"
                );
                None
            }
        }
    }

    /// Clear the selection; ignored unless currently `Expanded`
    pub fn deselect(&mut self) -> Option<SelectionChange> {
        match std::mem::take(&mut self.state) {
            ViewState::Expanded(previous) => {
                info!(identifier = %previous.identifier, "Closed detail view");
                Some(SelectionChange::Collapsed { previous })
            }
            ViewState::Collapsed => {
                debug!("Ignoring deselect while collapsed");
                None
            }
        }
    }
}
