//! Platter Core - Catalog, view state, rotation and transition logic
//!
//! This crate holds everything about the food model gallery that does not
//! need a window:
//! - The fixed model catalog and correlation keys
//! - The grid/detail selection state machine
//! - Drag-to-rotate mapping
//! - Spring and easing curves plus the shared-element transition engine
//! - Grid and detail layouts
//! - TOML settings

pub mod animation;
pub mod catalog;
pub mod layout;
pub mod rotation;
pub mod selection;
pub mod settings;
pub mod transition;

pub use animation::{Easing, Spring, TimedAnimation, Tween};
pub use catalog::{AssetLayout, AssetRef, Catalog, CatalogEntry, CorrelationKey, ElementRole, EntryId};
pub use layout::{DetailMetrics, ElementId, GridMetrics, LayoutElement, Rect};
pub use rotation::{Axis, RotationCommand, RotationController};
pub use selection::{SelectionChange, SelectionMachine, ViewState};
pub use settings::{Settings, SettingsError};
pub use transition::{FrameElement, Phase, Transition};
