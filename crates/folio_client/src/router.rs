//! Keeping navigation history in step with a host router.

use folio_core::FolderKey;

/// The host environment's own URL history.
pub trait HostRouter: Send {
    /// Move the host to `place`.
    fn navigate(&mut self, place: &FolderKey);
}

/// Bridges programmatic navigation and host route changes.
///
/// Navigation we initiate drives the host router, which reports the same
/// place back as a route change. The first report matching a place we just
/// drove to is swallowed so it does not re-enter history.
#[derive(Debug)]
pub struct HistorySync<R> {
    router: R,
    suppress_next_external: Option<FolderKey>,
}

impl<R: HostRouter> HistorySync<R> {
    /// Wrap a host router.
    pub fn new(router: R) -> Self {
        Self {
            router,
            suppress_next_external: None,
        }
    }

    /// Drive the host router to a place we navigated to ourselves.
    pub fn drive(&mut self, place: &FolderKey) {
        self.suppress_next_external = Some(place.clone());
        self.router.navigate(place);
    }

    /// Whether a host route change should be applied to our history.
    ///
    /// Consumes the pending suppression either way.
    pub fn accept_external(&mut self, place: &FolderKey) -> bool {
        match self.suppress_next_external.take() {
            Some(expected) => expected != *place,
            None => true,
        }
    }

    /// Whether an echo of our own navigation is pending.
    pub fn is_suppressing(&self) -> bool {
        self.suppress_next_external.is_some()
    }

    /// The wrapped router.
    pub fn router(&self) -> &R {
        &self.router
    }
}
