//! The finder: navigation, listings and drop-to-upload in one place.

use crate::{
    HistorySync, HostRouter, LibraryApi, NavigationState, Selection, UploadCoordinator,
    UploadHandle, UploadSource,
};
use folio_core::{FolderKey, FolderSummary, MediaFile, UploadItem};
use folio_error::FolioResult;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One row of a folder listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingEntry {
    /// A file the server has persisted
    Persisted(MediaFile),
    /// A placeholder for an upload still in flight
    Uploading(UploadItem),
}

impl ListingEntry {
    /// Content hash of the entry.
    pub fn hash(&self) -> &str {
        match self {
            ListingEntry::Persisted(file) => &file.hash,
            ListingEntry::Uploading(item) => &item.hash,
        }
    }

    /// Display name of the entry.
    pub fn name(&self) -> &str {
        match self {
            ListingEntry::Persisted(file) => &file.name,
            ListingEntry::Uploading(item) => &item.name,
        }
    }
}

/// Contents of the current folder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    /// Child folders
    pub folders: Vec<FolderSummary>,
    /// Persisted files followed by in-flight placeholders
    pub entries: Vec<ListingEntry>,
}

/// Drives one finder view.
pub struct Finder<R> {
    api: Arc<dyn LibraryApi>,
    coordinator: UploadCoordinator,
    navigation: NavigationState,
    selection: Selection,
    sync: HistorySync<R>,
}

impl<R: HostRouter> Finder<R> {
    /// Create a finder with empty history.
    pub fn new(api: Arc<dyn LibraryApi>, coordinator: UploadCoordinator, router: R) -> Self {
        Self {
            api,
            coordinator,
            navigation: NavigationState::new(),
            selection: Selection::new(),
            sync: HistorySync::new(router),
        }
    }

    /// The folder being shown; the root before any navigation.
    pub fn current_folder(&self) -> FolderKey {
        self.navigation.current().clone().unwrap_or_default()
    }

    /// Navigation history.
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Selected item ids.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable selection.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// The upload coordinator.
    pub fn coordinator(&self) -> &UploadCoordinator {
        &self.coordinator
    }

    /// The host router.
    pub fn router(&self) -> &R {
        self.sync.router()
    }

    /// Open a folder from within the finder.
    pub fn open_folder(&mut self, folder: FolderKey) {
        self.navigation.push_state(folder.clone());
        self.selection.clear();
        self.sync.drive(&folder);
    }

    /// Handle our own back control.
    pub fn back(&mut self) -> Option<FolderKey> {
        let place = self.navigation.go_back()?.clone();
        self.selection.clear();
        self.sync.drive(&place);
        Some(place)
    }

    /// Handle our own forward control.
    pub fn forward(&mut self) -> Option<FolderKey> {
        let place = self.navigation.go_forward()?.clone();
        self.selection.clear();
        self.sync.drive(&place);
        Some(place)
    }

    /// Handle a route change reported by the host router.
    ///
    /// Returns whether the finder moved.
    pub fn on_route_changed(&mut self, place: FolderKey) -> bool {
        if !self.sync.accept_external(&place) {
            debug!(place = %place, "Ignoring echo of own navigation");
            return false;
        }
        if self.navigation.current().as_ref() == Some(&place) {
            return false;
        }
        self.navigation.push_state(place);
        self.selection.clear();
        true
    }

    /// Start uploading dropped files into the current folder.
    pub fn drop_files(&self, sources: Vec<UploadSource>) -> Vec<UploadHandle> {
        let folder = self.current_folder();
        sources
            .into_iter()
            .map(|source| self.coordinator.start_upload(source, folder.clone()))
            .collect()
    }

    /// Fetch the current folder and merge in-flight uploads.
    #[instrument(skip(self), fields(folder = %self.current_folder()))]
    pub async fn refresh(&self) -> FolioResult<Listing> {
        let folder = self.current_folder();
        let files = self.api.list_files(&folder).await?;
        let folders = self.api.list_folders(&folder).await?;

        self.coordinator.reconcile(&folder, &files);

        let mut entries: Vec<ListingEntry> =
            files.into_iter().map(ListingEntry::Persisted).collect();
        entries.extend(
            self.coordinator
                .items(&folder)
                .into_iter()
                .map(ListingEntry::Uploading),
        );
        Ok(Listing { folders, entries })
    }
}
