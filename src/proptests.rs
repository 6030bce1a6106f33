use crate::{
    BTreeFamily, ChildMap, HierarchicalList, ListConfig, ListError, MapFamily, SortedVecFamily, TrieNode,
};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

type Path = Vec<String>;

fn validate_tree<F: MapFamily>(node: &TrieNode<F>, is_root: bool) -> usize {
    if is_root {
        assert!(!node.is_leaf(), "root must never be a leaf");
    } else {
        assert!(
            node.is_leaf() || !node.children().is_empty(),
            "childless directory should have been pruned"
        );
    }

    let mut nodes = 0usize;
    let mut prev: Option<String> = None;
    let mut cursor = node.children().first();
    while let Some((segment, child)) = cursor {
        assert!(!segment.is_empty(), "empty segment stored");
        if let Some(prev) = &prev {
            assert!(prev.as_str() < segment, "children out of order");
        }
        prev = Some(segment.to_string());
        nodes += 1 + validate_tree(child, false);
        cursor = node.children().next_after(segment);
    }
    nodes
}

fn segment_strategy() -> impl Strategy<Value = String> {
    // Tiny alphabet so paths share prefixes often.
    "[a-c]{1,2}"
}

fn path_strategy() -> impl Strategy<Value = Path> {
    prop::collection::vec(segment_strategy(), 1..=4)
}

fn prefix_strategy() -> impl Strategy<Value = Path> {
    prop::collection::vec(segment_strategy(), 0..=3)
}

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "path_strategy()")] Path),
    #[proptest(weight = 3)]
    Delete(#[proptest(strategy = "path_strategy()")] Path),
    #[proptest(weight = 2)]
    List(
        #[proptest(strategy = "prefix_strategy()")] Path,
        #[proptest(strategy = "proptest::option::of(segment_strategy())")] Option<String>,
    ),
}

fn key_of(path: &[String]) -> String {
    let mut key = String::from("root");
    for segment in path {
        key.push('/');
        key.push_str(segment);
    }
    key
}

/// Direct children of `prefix` in the model, or `None` if no stored key
/// passes through it.
fn model_children(model: &BTreeSet<Path>, prefix: &[String]) -> Option<BTreeMap<String, bool>> {
    let mut exists = prefix.is_empty();
    let mut children = BTreeMap::new();
    for path in model {
        if path.len() < prefix.len() || path[..prefix.len()] != *prefix {
            continue;
        }
        exists = true;
        if let Some(child) = path.get(prefix.len()) {
            let mut child_path = prefix.to_vec();
            child_path.push(child.clone());
            children.insert(child.clone(), model.contains(&child_path));
        }
    }
    exists.then_some(children)
}

fn model_node_count(model: &BTreeSet<Path>) -> usize {
    let mut prefixes = BTreeSet::new();
    for path in model {
        for len in 1..=path.len() {
            prefixes.insert(&path[..len]);
        }
    }
    prefixes.len()
}

fn collect(out: &mut Vec<(String, bool)>, segment: &str, is_leaf: bool) -> ControlFlow<()> {
    out.push((segment.to_string(), is_leaf));
    ControlFlow::Continue(())
}

fn run_ops<F: MapFamily>(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut t: HierarchicalList<Vec<(String, bool)>, F> =
        HierarchicalList::with_map_family(ListConfig::new("root", "/"), collect).unwrap();
    let mut model: BTreeSet<Path> = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert(path) => {
                prop_assert_eq!(t.insert(&key_of(&path)), Ok(()));
                model.insert(path);
            }
            Op::Delete(path) => {
                let expected = model.remove(&path);
                prop_assert_eq!(t.delete(&key_of(&path)), Ok(expected));
            }
            Op::List(prefix, start_after) => {
                let mut out = Vec::new();
                let got = t.list(&key_of(&prefix), start_after.as_deref(), &mut out);
                match model_children(&model, &prefix) {
                    None => {
                        prop_assert_eq!(got, Err(ListError::NotFound));
                    }
                    Some(children) => {
                        let expected: Vec<(String, bool)> = children
                            .into_iter()
                            .filter(|(seg, _)| start_after.as_ref().map_or(true, |s| seg > s))
                            .collect();
                        prop_assert_eq!(got.map(|s| s.delivered), Ok(expected.len()));
                        prop_assert_eq!(out, expected);
                    }
                }
            }
        }

        prop_assert_eq!(t.node_count(), model_node_count(&model));
        for path in &model {
            prop_assert!(t.contains(&key_of(path)));
        }
    }

    prop_assert_eq!(validate_tree(t.root(), true), t.node_count());
    prop_assert_eq!(t.leaf_count(), model.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_model_btree(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        run_ops::<BTreeFamily>(ops)?;
    }

    #[test]
    fn prop_matches_model_sorted_vec(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        run_ops::<SortedVecFamily>(ops)?;
    }

    #[test]
    fn prop_insert_delete_inverse(
        base in prop::collection::vec(path_strategy(), 0..=20),
        extra in prop::collection::vec("[x-z]{1,3}", 1..=5),
    ) {
        // `extra` shares no prefix with `base`, whose segments are all a-c.
        let mut t = HierarchicalList::new("root", "/", collect);
        for path in &base {
            t.insert(&key_of(path)).unwrap();
        }
        let count = t.node_count();
        let mut before = Vec::new();
        t.list("root", None, &mut before).unwrap();

        t.insert(&key_of(&extra)).unwrap();
        prop_assert_eq!(t.node_count(), count + extra.len());
        prop_assert_eq!(t.delete(&key_of(&extra)), Ok(true));

        let mut after = Vec::new();
        t.list("root", None, &mut after).unwrap();
        prop_assert_eq!(t.node_count(), count);
        prop_assert_eq!(after, before);
    }

    #[test]
    fn prop_early_stop_delivers_exactly_n(
        paths in prop::collection::vec(path_strategy(), 1..=30),
        n in 1usize..10,
    ) {
        let mut t = HierarchicalList::new("root", "/", collect);
        for path in &paths {
            t.insert(&key_of(path)).unwrap();
        }
        let total = t.list_with("root", None, |_, _| ControlFlow::Continue(())).unwrap().delivered;

        let mut seen = 0usize;
        let summary = t
            .list_with("root", None, |_, _| {
                seen += 1;
                if seen == n { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
            })
            .unwrap();
        prop_assert_eq!(summary.delivered, n.min(total));
        prop_assert_eq!(summary.stopped, n <= total);
        prop_assert_eq!(seen, n.min(total));
    }

    #[test]
    fn prop_pages_cover_listing(
        paths in prop::collection::vec(path_strategy(), 1..=40),
        page_size in 1usize..5,
    ) {
        let mut t = HierarchicalList::new("root", "/", collect);
        for path in &paths {
            t.insert(&key_of(path)).unwrap();
        }
        let mut full = Vec::new();
        t.list("root", None, &mut full).unwrap();

        let mut paged = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let page = t.list_page("root", start.as_deref(), page_size).unwrap();
            prop_assert!(page.entries.len() <= page_size);
            paged.extend(page.entries.into_iter().map(|e| (e.segment, e.is_leaf)));
            match page.next_start {
                Some(next) => start = Some(next),
                None => break,
            }
        }
        prop_assert_eq!(paged, full);
    }
}

#[test]
fn exhaustive_delete_order_small_set() {
    let keys = ["root/a", "root/a/b", "root/a/b/c", "root/a/d", "root/e/f"];

    fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    for order in permutations(&keys) {
        let mut t = HierarchicalList::new("root", "/", collect);
        for key in &keys {
            t.insert(key).unwrap();
        }
        assert_eq!(t.node_count(), 6);

        for (i, key) in order.iter().enumerate() {
            assert_eq!(t.delete(key), Ok(true), "order {order:?}");
            assert_eq!(t.delete(key), Ok(false));
            validate_tree(t.root(), true);
            assert_eq!(t.leaf_count(), keys.len() - i - 1);
        }
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 0);
    }
}
