//! In-memory rendered tree: named mount points patched by the server.
//!
//! # What is a mount point? (for beginners)
//!
//! The server renders most of the UI itself.  Whenever the registers, the
//! memory view, or the file list change, it pushes a complete replacement for
//! that panel's markup.  The client never diffs: each update swaps the whole
//! subtree of one uniquely identified node, the *mount point*.
//!
//! Because the subtree is replaced wholesale, local state inside it (which
//! element has focus, how far it is scrolled, what text is selected) is lost.
//! Callers that care take a [`RenderTree::snapshot_transient`] before the
//! replacement and hand it back with [`RenderTree::restore_transient`].

use std::collections::BTreeMap;

use tracing::debug;

/// Mount points that exist from startup.
pub const DEFAULT_MOUNT_IDS: [&str; 7] = [
    "execution",
    "filesystem",
    "registers",
    "memory",
    "memory-panel",
    "display",
    "console",
];

/// Local state that a full replacement discards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransientState {
    pub focused: bool,
    pub scroll_offset: u32,
    /// Selected range as `(start, end)` character offsets.
    pub selection: Option<(usize, usize)>,
}

/// One uniquely identified, fully replaceable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    id: String,
    outer_markup: String,
    attributes: BTreeMap<String, String>,
    transient: TransientState,
}

impl MountPoint {
    fn empty(id: &str) -> Self {
        Self {
            id: id.to_string(),
            outer_markup: String::new(),
            attributes: BTreeMap::new(),
            transient: TransientState::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn outer_markup(&self) -> &str {
        &self.outer_markup
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn transient(&self) -> TransientState {
        self.transient
    }
}

/// Result of a patch against the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// No mount point with the requested id exists; nothing changed.
    MissingMountPoint,
}

/// The set of mount points, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    mounts: BTreeMap<String, MountPoint>,
}

impl RenderTree {
    /// Creates a tree with no mount points.
    pub fn empty() -> Self {
        Self {
            mounts: BTreeMap::new(),
        }
    }

    /// Adds an empty mount point.  Returns `false` if `id` already exists.
    pub fn register(&mut self, id: &str) -> bool {
        if self.mounts.contains_key(id) {
            return false;
        }
        self.mounts.insert(id.to_string(), MountPoint::empty(id));
        true
    }

    /// Find-or-absent lookup.
    pub fn find(&self, id: &str) -> Option<&MountPoint> {
        self.mounts.get(id)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Replaces the whole subtree of `id` with `markup`.
    ///
    /// Attributes and transient state belong to the old subtree and are
    /// discarded with it.
    pub fn replace_outer(&mut self, id: &str, markup: impl Into<String>) -> PatchOutcome {
        let Some(mount) = self.mounts.get_mut(id) else {
            debug!(mount = id, "replace skipped: no such mount point");
            return PatchOutcome::MissingMountPoint;
        };
        mount.outer_markup = markup.into();
        mount.attributes.clear();
        mount.transient = TransientState::default();
        PatchOutcome::Applied
    }

    /// Sets one attribute on `id`, leaving markup and transient state alone.
    pub fn set_attribute(
        &mut self,
        id: &str,
        name: &str,
        value: impl Into<String>,
    ) -> PatchOutcome {
        let Some(mount) = self.mounts.get_mut(id) else {
            debug!(mount = id, attribute = name, "attribute skipped: no such mount point");
            return PatchOutcome::MissingMountPoint;
        };
        mount.attributes.insert(name.to_string(), value.into());
        PatchOutcome::Applied
    }

    /// Copies the transient state of `id`, if it exists.
    pub fn snapshot_transient(&self, id: &str) -> Option<TransientState> {
        self.find(id).map(MountPoint::transient)
    }

    /// Overwrites the transient state of `id`.
    pub fn restore_transient(&mut self, id: &str, state: TransientState) -> PatchOutcome {
        match self.mounts.get_mut(id) {
            Some(mount) => {
                mount.transient = state;
                PatchOutcome::Applied
            }
            None => PatchOutcome::MissingMountPoint,
        }
    }

    /// Gives focus to `id` and removes it from every other mount point.
    pub fn focus(&mut self, id: &str) -> PatchOutcome {
        if !self.mounts.contains_key(id) {
            return PatchOutcome::MissingMountPoint;
        }
        for (key, mount) in self.mounts.iter_mut() {
            mount.transient.focused = key == id;
        }
        PatchOutcome::Applied
    }

    pub fn scroll_to(&mut self, id: &str, offset: u32) -> PatchOutcome {
        match self.mounts.get_mut(id) {
            Some(mount) => {
                mount.transient.scroll_offset = offset;
                PatchOutcome::Applied
            }
            None => PatchOutcome::MissingMountPoint,
        }
    }

    pub fn select(&mut self, id: &str, range: Option<(usize, usize)>) -> PatchOutcome {
        match self.mounts.get_mut(id) {
            Some(mount) => {
                mount.transient.selection = range;
                PatchOutcome::Applied
            }
            None => PatchOutcome::MissingMountPoint,
        }
    }
}

impl Default for RenderTree {
    /// A tree holding the [`DEFAULT_MOUNT_IDS`].
    fn default() -> Self {
        let mut tree = Self::empty();
        for id in DEFAULT_MOUNT_IDS {
            tree.register(id);
        }
        tree
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
