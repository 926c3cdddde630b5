//! Per-file three-way reconciliation
//!
//! Classifies every file name appearing in the split point's snapshot, the
//! current head's snapshot, or the given head's snapshot, comparing blob
//! ids against the split point ("changed" means the id differs, with
//! absence as a distinguished value):
//!
//! - changed only on the given side: take the given version (including its
//!   deletion)
//! - changed only on the current side: keep the current version, nothing
//!   to do
//! - changed identically on both sides: nothing to do
//! - changed differently on both sides: conflict

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

type Snapshot = BTreeMap<String, ObjectId>;

/// One file-level outcome of the reconciliation pass that requires work.
/// Files the policy keeps as-is produce no action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Check out the given side's blob and stage it as an addition
    TakeGiven { name: String, blob_id: ObjectId },
    /// Delete the working file and stage a removal (the given side
    /// deleted a file the current side left unchanged)
    DropCurrent { name: String },
    /// Both sides changed the file differently; materialize conflict
    /// markers from the two versions (either may be absent)
    Conflict {
        name: String,
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

/// Classify every file across the three snapshots, in name order.
pub fn reconcile(split: &Snapshot, current: &Snapshot, given: &Snapshot) -> Vec<MergeAction> {
    let names: BTreeSet<&String> = split
        .keys()
        .chain(current.keys())
        .chain(given.keys())
        .collect();

    let mut actions = Vec::new();

    for name in names {
        let s = split.get(name);
        let c = current.get(name);
        let g = given.get(name);

        let current_changed = c != s;
        let given_changed = g != s;

        if !given_changed || c == g {
            // the current side's version already is the merge result
            continue;
        }

        if !current_changed {
            match g {
                Some(blob_id) => actions.push(MergeAction::TakeGiven {
                    name: name.clone(),
                    blob_id: blob_id.clone(),
                }),
                None => actions.push(MergeAction::DropCurrent { name: name.clone() }),
            }
            continue;
        }

        actions.push(MergeAction::Conflict {
            name: name.clone(),
            current: c.cloned(),
            given: g.cloned(),
        });
    }

    actions
}

/// The literal working-tree content a conflicted file receives.
pub fn conflict_content(current: Option<&str>, given: Option<&str>) -> String {
    format!(
        "<<<<<<< HEAD\n{}=======\n{}>>>>>>>\n",
        current.unwrap_or_default(),
        given.unwrap_or_default()
    )
}
