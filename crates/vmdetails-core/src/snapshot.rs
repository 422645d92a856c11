//! Snapshot tree types and current-snapshot path resolution.

use serde::{Deserialize, Serialize};

/// Managed object reference identifying a snapshot (e.g. `"snapshot-42"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotRef(pub String);

impl SnapshotRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A node in a VM's snapshot tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTree {
    /// Display name of the snapshot.
    pub name: String,
    /// Reference to the snapshot object.
    pub snapshot: SnapshotRef,
    /// Child snapshots, in creation order.
    #[serde(default)]
    pub child_snapshot_list: Vec<SnapshotTree>,
}

impl SnapshotTree {
    pub fn new(name: impl Into<String>, snapshot: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snapshot: SnapshotRef::new(snapshot),
            child_snapshot_list: Vec::new(),
        }
    }

    /// Append a child snapshot.
    pub fn with_child(mut self, child: SnapshotTree) -> Self {
        self.child_snapshot_list.push(child);
        self
    }
}

/// Snapshot state of a VM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    /// Top-level snapshots.
    #[serde(default)]
    pub root_snapshot_list: Vec<SnapshotTree>,
    /// The snapshot the VM is currently running from.
    #[serde(default)]
    pub current_snapshot: Option<SnapshotRef>,
}

/// Find the slash-separated path of names leading to `current`.
///
/// The tree is searched depth-first in child-list order and the first
/// match wins. Returns `None` when `current` is `None` or no node
/// references it. A match below the root whose name is empty is treated
/// as not found.
pub fn snapshot_path(nodes: &[SnapshotTree], current: Option<&SnapshotRef>) -> Option<String> {
    let current = current?;
    find_path(nodes, current)
}

fn find_path(nodes: &[SnapshotTree], current: &SnapshotRef) -> Option<String> {
    for node in nodes {
        if &node.snapshot == current {
            return Some(node.name.clone());
        }
        // An empty sub-path does not count as found
        let sub_path = find_path(&node.child_snapshot_list, current).filter(|p| !p.is_empty());
        if let Some(sub_path) = sub_path {
            return Some(format!("{}/{}", node.name, sub_path));
        }
    }
    None
}
