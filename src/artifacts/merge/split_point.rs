//! Split point search
//!
//! Finds the common ancestor a three-way merge uses as its base. The
//! commit graph is a DAG where each commit carries up to two parent edges
//! (primary and merge), and the search runs in two passes:
//!
//! 1. **Mark pass**: every ancestor of the given head `G` (following both
//!    parent edges, `G` included) goes into a visited set.
//! 2. **Depth pass**: a breadth-first walk from the current head `C` over
//!    the same combined edge set. The depth of a commit is the number of
//!    edges walked to reach it. The first marked commit met on a chain is
//!    recorded as a candidate at its depth and that chain stops.
//!
//! The candidate with the smallest depth wins; among equal-depth
//! candidates the first one found wins (breadth-first order makes the
//! tie-break deterministic). On pathological merge-heavy DAGs this can
//! select a common ancestor that is not the unique lowest one; that is an
//! accepted approximation.
//!
//! ## Debug Logging
//!
//! Build with the `debug_merge` feature to trace the candidate search on
//! stderr: `cargo build --features debug_merge`.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Macro for debug logging that is enabled with the debug_merge feature flag
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "debug_merge"))]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Split point finder
///
/// Generic over a loader so the algorithm works against the on-disk
/// object database in production and an in-memory map in tests.
pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    /// Function to load the parent links of any given commit
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// The split point between the current head and the given head.
    ///
    /// Both heads descend from the same root commit, so a common ancestor
    /// always exists.
    pub fn find(&self, current: &ObjectId, given: &ObjectId) -> anyhow::Result<ObjectId> {
        let marked = self.mark_ancestors(given)?;

        let mut candidates = BTreeMap::<usize, ObjectId>::new();
        let mut queue = VecDeque::from([(current.clone(), 0usize)]);
        let mut seen = HashSet::from([current.clone()]);

        while let Some((oid, depth)) = queue.pop_front() {
            if marked.contains(&oid) {
                debug_log!("split candidate {oid} at depth {depth}");
                // first candidate at a depth wins; never overwrite
                candidates.entry(depth).or_insert(oid);
                continue;
            }

            for parent in (self.commit_loader)(&oid)?.parents {
                if seen.insert(parent.clone()) {
                    queue.push_back((parent, depth + 1));
                }
            }
        }

        candidates
            .into_iter()
            .next()
            .map(|(depth, oid)| {
                debug_log!("split point {oid} chosen at depth {depth}");
                oid
            })
            .ok_or_else(|| anyhow::anyhow!("no common ancestor between {current} and {given}"))
    }

    /// Every ancestor of `start` (both parent edges, `start` included).
    fn mark_ancestors(&self, start: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut marked = HashSet::from([start.clone()]);
        let mut pending = vec![start.clone()];

        while let Some(oid) = pending.pop() {
            for parent in (self.commit_loader)(&oid)?.parents {
                if marked.insert(parent.clone()) {
                    pending.push(parent);
                }
            }
        }

        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sha1::Digest;
    use std::collections::HashMap;

    fn oid(seed: &str) -> ObjectId {
        let mut hasher = sha1::Sha1::new();
        hasher.update(seed);
        ObjectId::try_parse(format!("{:x}", hasher.finalize())).unwrap()
    }

    /// In-memory commit store: name -> parent names.
    #[derive(Default)]
    struct GraphFixture {
        parents: HashMap<ObjectId, Vec<ObjectId>>,
    }

    impl GraphFixture {
        fn commit(&mut self, name: &str, parents: &[&str]) {
            self.parents
                .insert(oid(name), parents.iter().map(|p| oid(p)).collect());
        }

        fn find(&self, current: &str, given: &str) -> ObjectId {
            let finder = SplitPointFinder::new(|id: &ObjectId| {
                Ok(SlimCommit {
                    oid: id.clone(),
                    parents: self.parents.get(id).cloned().unwrap_or_default(),
                })
            });
            finder.find(&oid(current), &oid(given)).unwrap()
        }
    }

    #[fixture]
    fn graph() -> GraphFixture {
        GraphFixture::default()
    }

    #[rstest]
    fn linear_history_splits_at_the_older_head(mut graph: GraphFixture) {
        graph.commit("root", &[]);
        graph.commit("a", &["root"]);
        graph.commit("b", &["a"]);

        pretty_assertions::assert_eq!(graph.find("b", "a"), oid("a"));
        pretty_assertions::assert_eq!(graph.find("a", "b"), oid("a"));
    }

    #[rstest]
    fn simple_divergence_splits_at_the_fork(mut graph: GraphFixture) {
        graph.commit("root", &[]);
        graph.commit("fork", &["root"]);
        graph.commit("left", &["fork"]);
        graph.commit("right", &["fork"]);

        pretty_assertions::assert_eq!(graph.find("left", "right"), oid("fork"));
    }

    #[rstest]
    fn merge_parent_edges_count_toward_reachability(mut graph: GraphFixture) {
        // master merged topic already; merging topic again must see the
        // topic head as an ancestor of the merge commit.
        graph.commit("root", &[]);
        graph.commit("fork", &["root"]);
        graph.commit("master1", &["fork"]);
        graph.commit("topic1", &["fork"]);
        graph.commit("merged", &["master1", "topic1"]);

        pretty_assertions::assert_eq!(graph.find("merged", "topic1"), oid("topic1"));
    }

    #[rstest]
    fn deeper_forks_lose_to_nearer_ancestors(mut graph: GraphFixture) {
        graph.commit("root", &[]);
        graph.commit("old-fork", &["root"]);
        graph.commit("mid", &["old-fork"]);
        graph.commit("near-fork", &["mid"]);
        graph.commit("left", &["near-fork"]);
        graph.commit("right", &["near-fork"]);
        graph.commit("left2", &["left"]);

        pretty_assertions::assert_eq!(graph.find("left2", "right"), oid("near-fork"));
    }

    #[rstest]
    fn criss_cross_tie_takes_the_first_candidate_found(mut graph: GraphFixture) {
        // classic criss-cross: both x and y are common ancestors at equal
        // depth from "left"; breadth-first order visits the primary parent
        // chain first, so x wins.
        graph.commit("root", &[]);
        graph.commit("x", &["root"]);
        graph.commit("y", &["root"]);
        graph.commit("left", &["x", "y"]);
        graph.commit("right", &["y", "x"]);

        pretty_assertions::assert_eq!(graph.find("left", "right"), oid("x"));
    }

    #[rstest]
    fn shared_root_is_the_last_resort(mut graph: GraphFixture) {
        graph.commit("root", &[]);
        graph.commit("left", &["root"]);
        graph.commit("right", &["root"]);

        pretty_assertions::assert_eq!(graph.find("left", "right"), oid("root"));
    }
}
