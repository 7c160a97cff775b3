// Diff Engine - Detects tasks added since the previous snapshot

use crate::domain::{Snapshot, Task};

/// Tasks present in `new` whose id is absent from `old`, in `new`'s order
///
/// Removed tasks and tasks whose attributes changed under the same id never
/// show up here.
pub fn diff(new: &Snapshot, old: &Snapshot) -> Vec<Task> {
    new.iter()
        .filter(|(id, _)| !old.contains_key(*id))
        .map(|(_, task)| task.clone())
        .collect()
}
