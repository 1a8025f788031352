//! The navigator — owns the location, the current listing, and the rules
//! that turn entry selections into location changes.
//!
//! Every location change lists the new location and replaces the displayed
//! entries wholesale. In background mode the listing runs on the lister
//! thread and is applied by [`Navigator::process_messages`], which the host
//! calls once per frame; results for a location that has since changed
//! again are dropped.
//!
//! A failed listing never clears the screen: the previous entries stay
//! attached and the error goes to the caller, [`Navigator::last_error`],
//! and the `on_error` hook.
use crate::error::NavigatorError;
use crate::location::{LocationHandle, LocationState, SubscriptionId};
use crate::transition::{transition_for, BrowseState, Transition};
use crate::view::{EntryViewFactory, SelectHandle};

use crossbeam_channel::TryRecvError;
use dirnav_core::config::{ListingMode, NavigatorConfig};
use dirnav_core::fs::{FileSystem, HostFileSystem};
use dirnav_core::lister::worker::{ListingMessage, ListingWorker};
use dirnav_core::lister::list_entries;
use dirnav_core::model::{Entry, Listing, Location};
use dirnav_core::platform::paths;
use dirnav_core::ListingError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

type ErrorHook = Box<dyn FnMut(&NavigatorError)>;
type FileHook = Box<dyn FnMut(&Path)>;
type Subscriber = Box<dyn FnMut(&Location)>;

/// Who asked for a location change. Decides how a missing directory is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeOrigin {
    /// Set by the owner, a location handle, or at construction.
    External,
    /// Reached by selecting an entry.
    Selection,
}

/// Builder for [`Navigator`].
pub struct NavigatorBuilder {
    location: Location,
    config: NavigatorConfig,
    fs: Option<Arc<dyn FileSystem>>,
    on_error: Option<ErrorHook>,
    on_file_selected: Option<FileHook>,
    subscribers: Vec<Subscriber>,
}

impl NavigatorBuilder {
    /// Start from `location`; pass `Location::Drives` (or `""`) to open on
    /// drive selection.
    pub fn new(location: impl Into<Location>) -> Self {
        Self {
            location: location.into(),
            config: NavigatorConfig::default(),
            fs: None,
            on_error: None,
            on_file_selected: None,
            subscribers: Vec::new(),
        }
    }

    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `fs` instead of the host filesystem.
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn on_error(mut self, hook: impl FnMut(&NavigatorError) + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Called with the full path whenever a file entry is selected.
    pub fn on_file_selected(mut self, hook: impl FnMut(&Path) + 'static) -> Self {
        self.on_file_selected = Some(Box::new(hook));
        self
    }

    /// Subscribe to location changes, including the initial one.
    pub fn subscribe(mut self, subscriber: impl FnMut(&Location) + 'static) -> Self {
        self.subscribers.push(Box::new(subscriber));
        self
    }

    /// Create the navigator and run the first listing.
    ///
    /// Never fails: a bad initial location is reported like any other
    /// listing failure.
    pub fn build<V: EntryViewFactory>(self, views: V) -> Navigator<V> {
        let fs = self.fs.unwrap_or_else(|| Arc::new(HostFileSystem));

        let mut location = LocationState::new(Location::Drives);
        for subscriber in self.subscribers {
            location.subscribe(subscriber);
        }

        let mut navigator = Navigator {
            config: self.config,
            fs,
            location,
            views,
            listing: None,
            requested: 0,
            completed: 0,
            pending_origin: ChangeOrigin::External,
            worker: None,
            last_error: None,
            on_error: self.on_error,
            on_file_selected: self.on_file_selected,
        };

        if navigator.config.listing_mode == ListingMode::Background {
            match ListingWorker::spawn(navigator.fs.clone(), navigator.config.listing.clone()) {
                Ok(worker) => {
                    info!("Background listing enabled");
                    navigator.worker = Some(worker);
                }
                Err(e) => {
                    warn!("Could not start lister thread: {e} -- listing inline");
                    navigator.report(NavigatorError::WorkerSpawn(Arc::new(e)));
                }
            }
        }

        let _ = navigator.change_location(self.location, ChangeOrigin::External);
        navigator.drain_location_requests();
        navigator
    }
}

/// A drive and directory navigator driving an injected view factory.
pub struct Navigator<V: EntryViewFactory> {
    config: NavigatorConfig,
    fs: Arc<dyn FileSystem>,
    location: LocationState,
    views: V,
    /// The listing currently attached to the views.
    listing: Option<Listing>,
    /// Newest listing generation requested.
    requested: u64,
    /// Newest listing generation that finished, successfully or not.
    completed: u64,
    /// Origin of the change behind the newest request.
    pending_origin: ChangeOrigin,
    worker: Option<ListingWorker>,
    last_error: Option<NavigatorError>,
    on_error: Option<ErrorHook>,
    on_file_selected: Option<FileHook>,
}

impl<V: EntryViewFactory> Navigator<V> {
    /// Navigator on the host filesystem with default configuration.
    pub fn new(location: impl Into<Location>, views: V) -> Self {
        NavigatorBuilder::new(location).build(views)
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn location(&self) -> &Location {
        self.location.get()
    }

    /// A handle other components (and other threads) can use to read the
    /// location or queue a jump to a new one.
    pub fn location_handle(&self) -> LocationHandle {
        self.location.handle()
    }

    pub fn state(&self) -> BrowseState<'_> {
        BrowseState::from(self.location.get())
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// The listing currently attached to the views.
    pub fn listing(&self) -> Option<&Listing> {
        self.listing.as_ref()
    }

    /// Attached entries with the handles that select them.
    pub fn entries(&self) -> impl Iterator<Item = (SelectHandle, &Entry)> + '_ {
        self.listing.iter().flat_map(|listing| {
            listing
                .entries
                .iter()
                .enumerate()
                .map(move |(i, e)| (SelectHandle::new(listing.generation, i), e))
        })
    }

    /// Handle of the attached entry with this display name.
    pub fn handle_for(&self, display_name: &str) -> Option<SelectHandle> {
        self.entries()
            .find(|(_, e)| e.display_name == display_name)
            .map(|(h, _)| h)
    }

    /// Generation of the attached listing (0 before the first success).
    pub fn generation(&self) -> u64 {
        self.listing.as_ref().map_or(0, |l| l.generation)
    }

    /// `true` while a background listing for the newest location is in flight.
    pub fn is_listing_pending(&self) -> bool {
        self.completed < self.requested
    }

    /// The most recent error, cleared by the next successful listing.
    pub fn last_error(&self) -> Option<&NavigatorError> {
        self.last_error.as_ref()
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut V {
        &mut self.views
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Location) + 'static) -> SubscriptionId {
        self.location.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.location.unsubscribe(id)
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Jump to `location` and list it.
    ///
    /// A directory that does not exist is reported as
    /// [`NavigatorError::InvalidLocation`]. In background mode the listing
    /// outcome arrives through [`process_messages`](Self::process_messages).
    pub fn set_location(&mut self, location: impl Into<Location>) -> Result<(), NavigatorError> {
        let result = self.change_location(location.into(), ChangeOrigin::External);
        self.drain_location_requests();
        result
    }

    /// Set the location to its current value, listing it again.
    pub fn refresh(&mut self) -> Result<(), NavigatorError> {
        let current = self.location.get().clone();
        self.set_location(current)
    }

    /// Act on the user selecting the entry behind `handle`.
    ///
    /// The transition is computed from the location the entry was listed
    /// for. Handles from a listing that is no longer attached are ignored.
    pub fn select(&mut self, handle: SelectHandle) -> Result<Transition, NavigatorError> {
        let transition = match &self.listing {
            Some(listing) if listing.generation == handle.generation() => {
                match listing.entries.get(handle.index()) {
                    Some(entry) => transition_for(&listing.location, entry),
                    None => Transition::Ignored,
                }
            }
            _ => {
                debug!(
                    "Ignoring selection from stale listing #{}",
                    handle.generation()
                );
                return Ok(Transition::Ignored);
            }
        };

        let result = match &transition {
            Transition::ShowDrives => self.change_location(Location::Drives, ChangeOrigin::Selection),
            // The parent of a relative drive root is the empty path, i.e. drives.
            Transition::Browse(path) => {
                self.change_location(Location::from(path.clone()), ChangeOrigin::Selection)
            }
            Transition::FileSelected(path) => {
                debug!("File selected: {}", path.display());
                if let Some(hook) = self.on_file_selected.as_mut() {
                    hook(path.as_path());
                }
                Ok(())
            }
            Transition::Ignored => {
                debug!("Selection of entry {} has no transition", handle.index());
                Ok(())
            }
        };
        self.drain_location_requests();
        result.map(|()| transition)
    }

    /// Apply queued location requests and finished background listings.
    ///
    /// Call once per frame. Returns `true` if the location or the attached
    /// entries changed.
    pub fn process_messages(&mut self) -> bool {
        let mut changed = self.drain_location_requests();

        let mut messages = Vec::new();
        let mut disconnected = false;
        if let Some(worker) = &self.worker {
            while messages.len() < self.config.max_messages_per_pump {
                match worker.result_rx.try_recv() {
                    Ok(m) => messages.push(m),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for message in messages {
            match message {
                ListingMessage::Complete {
                    generation,
                    location,
                    result,
                    duration,
                } => {
                    if generation != self.requested {
                        debug!(
                            "Discarding stale listing #{} of {:?} (newest is #{})",
                            generation, location, self.requested
                        );
                        continue;
                    }
                    debug!("Listing #{} finished in {:?}", generation, duration);
                    let _ = self.apply(generation, location, result, self.pending_origin);
                    changed = true;
                }
            }
        }

        if disconnected {
            warn!("Lister thread disconnected -- listing inline from now on");
            self.worker = None;
            self.report(NavigatorError::Listing(ListingError::WorkerDisconnected));
            if self.is_listing_pending() {
                let location = self.location.get().clone();
                let origin = self.pending_origin;
                let _ = self.relist(location, origin);
            }
            changed = true;
        }

        changed
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Set the location (notifying subscribers) and list it.
    fn change_location(
        &mut self,
        location: Location,
        origin: ChangeOrigin,
    ) -> Result<(), NavigatorError> {
        let location = match (origin, location) {
            // Relative external paths resolve against the working directory.
            (ChangeOrigin::External, Location::Directory(p)) if !p.has_root() => {
                Location::Directory(paths::absolute(&p).unwrap_or(p))
            }
            (_, Location::Directory(p)) => Location::Directory(paths::normalize(&p)),
            (_, other) => other,
        };

        self.location.set(location.clone());
        self.relist(location, origin)
    }

    fn relist(&mut self, location: Location, origin: ChangeOrigin) -> Result<(), NavigatorError> {
        self.requested += 1;
        let generation = self.requested;
        self.pending_origin = origin;

        if let Some(worker) = &self.worker {
            debug!("Requesting background listing #{} of {:?}", generation, location);
            if let Err(e) = worker.request(generation, location) {
                self.completed = generation;
                let err = NavigatorError::Listing(e);
                self.report(err.clone());
                return Err(err);
            }
            return Ok(());
        }

        let result = list_entries(self.fs.as_ref(), &location, &self.config.listing);
        self.apply(generation, location, result, origin)
    }

    /// Attach a finished listing, or report why it failed.
    fn apply(
        &mut self,
        generation: u64,
        location: Location,
        result: Result<Vec<Entry>, ListingError>,
        origin: ChangeOrigin,
    ) -> Result<(), NavigatorError> {
        self.completed = generation;
        match result {
            Ok(entries) => {
                let listing = Listing::new(generation, location, entries);
                let views = listing
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        self.views.create_view(
                            e.kind,
                            &e.display_name,
                            SelectHandle::new(generation, i),
                        )
                    })
                    .collect();
                self.views.attach(views);

                debug!(
                    "Attached listing #{} of {:?} ({} entries)",
                    generation,
                    listing.location,
                    listing.len()
                );
                self.listing = Some(listing);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                let err = match (origin, e) {
                    (ChangeOrigin::External, ListingError::Missing { location }) => {
                        NavigatorError::InvalidLocation { location }
                    }
                    (_, e) => NavigatorError::Listing(e),
                };
                self.report(err.clone());
                Err(err)
            }
        }
    }

    /// Apply queued location requests, newest first, up to the chain cap.
    fn drain_location_requests(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..self.config.max_chained_changes {
            let Some(next) = self.location.take_pending() else {
                return changed;
            };
            debug!("Applying queued location change to {:?}", next);
            let _ = self.change_location(next, ChangeOrigin::External);
            changed = true;
        }
        if self.location.has_pending() {
            warn!(
                "More than {} chained location changes -- deferring the rest",
                self.config.max_chained_changes
            );
        }
        changed
    }

    fn report(&mut self, err: NavigatorError) {
        warn!("{err}");
        if let Some(hook) = self.on_error.as_mut() {
            hook(&err);
        }
        self.last_error = Some(err);
    }
}
