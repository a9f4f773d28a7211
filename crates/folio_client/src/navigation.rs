//! Back/forward history and the selection set of the finder.

use folio_core::FolderKey;

/// Linear visit history with a 1-based cursor.
///
/// An index of 0 means nothing has been visited yet.
///
/// # Examples
///
/// ```
/// use folio_client::NavigationState;
/// use folio_core::FolderKey;
///
/// let mut nav = NavigationState::new();
/// nav.push_state(FolderKey::new("a"));
/// nav.push_state(FolderKey::new("b"));
/// nav.push_state(FolderKey::new("c"));
/// nav.go_back();
/// nav.go_back();
/// nav.push_state(FolderKey::new("d"));
///
/// assert_eq!(nav.history(), &[FolderKey::new("a"), FolderKey::new("d")]);
/// assert!(nav.can_go_back());
/// assert!(!nav.can_go_forward());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct NavigationState {
    history: Vec<FolderKey>,
    index: usize,
    current: Option<FolderKey>,
    #[getter(skip)]
    can_go_back: bool,
    #[getter(skip)]
    can_go_forward: bool,
}

impl NavigationState {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit `place`, discarding any forward history.
    pub fn push_state(&mut self, place: FolderKey) {
        if self.index < self.history.len() {
            self.history.truncate(self.index);
        }
        self.history.push(place.clone());
        self.current = Some(place);
        self.index += 1;
        self.recompute_navigability();
    }

    /// Step back one entry. Returns the new current place, or `None` when
    /// already at the first entry.
    pub fn go_back(&mut self) -> Option<&FolderKey> {
        if !self.can_go_back {
            return None;
        }
        self.index -= 1;
        self.current = self.history.get(self.index - 1).cloned();
        self.recompute_navigability();
        self.current.as_ref()
    }

    /// Step forward one entry. Returns the new current place, or `None` when
    /// already at the last entry.
    pub fn go_forward(&mut self) -> Option<&FolderKey> {
        if !self.can_go_forward {
            return None;
        }
        self.index += 1;
        self.current = self.history.get(self.index - 1).cloned();
        self.recompute_navigability();
        self.current.as_ref()
    }

    /// Whether [`go_back`](Self::go_back) would move.
    pub fn can_go_back(&self) -> bool {
        self.can_go_back
    }

    /// Whether [`go_forward`](Self::go_forward) would move.
    pub fn can_go_forward(&self) -> bool {
        self.can_go_forward
    }

    fn recompute_navigability(&mut self) {
        let len = self.history.len();
        self.can_go_back = self.index > 1 && len > 1;
        self.can_go_forward = self.index < len && len > 1;
    }
}

/// Ordered set of selected item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<String>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id if it is not selected yet.
    pub fn add(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.items.contains(&id) {
            self.items.push(id);
        }
    }

    /// Replace the selection with a single id, or clear it.
    pub fn replace(&mut self, id: Option<String>) {
        self.items.clear();
        if let Some(id) = id {
            self.items.push(id);
        }
    }

    /// Deselect an id.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item != id);
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether an id is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item == id)
    }

    /// Selected ids in selection order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
