//! DirNav Navigator — the path-driven entry-listing state machine.
//!
//! Holds the browsed [`Location`](dirnav_core::Location), relists it on every
//! change, and turns entry selections into location transitions. Rendering
//! is injected through [`EntryViewFactory`]; this crate never draws.
pub mod error;
pub mod location;
pub mod navigator;
pub mod transition;
pub mod view;

pub use error::NavigatorError;
pub use location::{LocationHandle, LocationState, SubscriptionId};
pub use navigator::{Navigator, NavigatorBuilder};
pub use transition::{transition_for, BrowseState, Transition};
pub use view::{EntryViewFactory, SelectHandle};
