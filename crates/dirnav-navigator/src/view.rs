//! The entry view capability — how a renderer plugs into the navigator.
//!
//! The navigator never draws anything. After every successful listing it
//! asks the injected [`EntryViewFactory`] for one view per entry and hands
//! the complete, ordered set to [`EntryViewFactory::attach`], which replaces
//! whatever was mounted before. When the user picks a view, the renderer
//! passes that view's [`SelectHandle`] back to
//! [`Navigator::select`](crate::Navigator::select).
use dirnav_core::model::EntryKind;

/// Opaque reference to one entry of one listing.
///
/// Handles from an older listing are rejected by the navigator, so a
/// renderer may hold on to them without risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectHandle {
    generation: u64,
    index: u32,
}

impl SelectHandle {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "SelectHandle index overflow");
        Self {
            generation,
            index: index as u32,
        }
    }

    /// The listing generation this handle belongs to.
    pub fn generation(self) -> u64 {
        self.generation
    }

    /// Position of the entry within its listing.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// Renderer-side capability injected into the navigator.
pub trait EntryViewFactory {
    /// Whatever the renderer uses to represent one entry.
    type View;

    /// Build the view for one entry.
    fn create_view(&mut self, kind: EntryKind, display_name: &str, handle: SelectHandle)
        -> Self::View;

    /// Mount a fresh ordered set of views, replacing the previous set.
    fn attach(&mut self, views: Vec<Self::View>);
}

/// Headless factory for hosts that read entries straight from the navigator.
impl EntryViewFactory for () {
    type View = ();

    fn create_view(&mut self, _kind: EntryKind, _display_name: &str, _handle: SelectHandle) {}

    fn attach(&mut self, _views: Vec<()>) {}
}
