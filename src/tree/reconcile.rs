//! Carry UI state across a reload
//!
//! Buckets are matched by name, level by level. A bucket that is new in the fresh
//! forest stays collapsed; buckets that disappeared contribute nothing. Matching
//! is structural, so a bucket deleted and recreated under the same name inherits
//! the old flag.

use crate::tree::forest::Forest;
use crate::tree::node::NodeId;

/// Return `fresh` with `expanded` flags copied from `previous`.
pub fn reconcile(fresh: &Forest, previous: &Forest) -> Forest {
    let mut merged = fresh.clone();
    for &root in fresh.roots() {
        let Some(name) = fresh.bucket(root).map(|b| b.name.as_str()) else {
            continue;
        };
        if let Some(old) = previous.root_bucket(name) {
            copy_flags(fresh, root, previous, old, &mut merged);
        }
    }
    merged
}

fn copy_flags(fresh: &Forest, id: NodeId, previous: &Forest, old_id: NodeId, out: &mut Forest) {
    let (Some(bucket), Some(old)) = (fresh.bucket(id), previous.bucket(old_id)) else {
        return;
    };
    out.set_expanded_by_id(id, old.expanded);

    for &child in &bucket.buckets {
        let Some(child_bucket) = fresh.bucket(child) else {
            continue;
        };
        if let Some(old_child) = previous.child_bucket(old_id, &child_bucket.name) {
            copy_flags(fresh, child, previous, old_child, out);
        }
    }
}
