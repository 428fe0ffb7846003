//! Property tests: the structural invariants must survive arbitrary edit
//! scripts, not just the hand-picked cases in the unit tests.

use std::collections::HashSet;

use overlap::{AttachError, OverlappingHierarchy};
use proptest::prelude::*;

/// Node universe kept deliberately small so scripts collide on nodes often
/// enough to exercise every validation branch.
const UNIVERSE: u8 = 8;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Attach(u8, u8),
    Detach(u8, u8),
    Delete(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..UNIVERSE).prop_map(Op::Add),
        (0..UNIVERSE, 0..UNIVERSE).prop_map(|(node, parent)| Op::Attach(node, parent)),
        (0..UNIVERSE, 0..UNIVERSE).prop_map(|(node, parent)| Op::Detach(node, parent)),
        (0..UNIVERSE).prop_map(Op::Delete),
    ]
}

fn arb_script() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 0..48)
}

/// Apply a script, asserting along the way that a rejected attach never
/// mutates the store.
fn apply(hierarchy: &mut OverlappingHierarchy<u8>, script: &[Op]) {
    for op in script {
        match op {
            Op::Add(node) => hierarchy.add(*node),
            Op::Attach(node, parent) => {
                let before = hierarchy.clone();
                if hierarchy.attach(*node, *parent).is_err() {
                    assert_eq!(*hierarchy, before, "rejected attach mutated the store");
                }
            }
            Op::Detach(node, parent) => hierarchy.detach(node, parent),
            Op::Delete(node) => hierarchy.delete(node),
        }
    }
}

fn build(script: &[Op]) -> OverlappingHierarchy<u8> {
    let mut hierarchy = OverlappingHierarchy::new();
    apply(&mut hierarchy, script);
    hierarchy
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn no_node_is_its_own_descendant(script in arb_script()) {
        let hierarchy = build(&script);
        for node in hierarchy.nodes() {
            let below = hierarchy.descendants(Some(&node)).expect("member node");
            prop_assert!(!below.contains(&node), "{node} reaches itself");
        }
    }

    #[test]
    fn edge_set_stays_transitively_reduced(script in arb_script()) {
        // For every parent, no direct child may reach a sibling: such a
        // path would imply the sibling's direct edge.
        let hierarchy = build(&script);
        for parent in hierarchy.nodes() {
            let kids = hierarchy.children(Some(&parent)).expect("member node");
            for child in &kids {
                let below = hierarchy.descendants(Some(child)).expect("member node");
                for sibling in &kids {
                    if sibling != child {
                        prop_assert!(
                            !below.contains(sibling),
                            "edge {parent}->{sibling} is implied by a path through {child}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn every_referenced_node_is_a_member(script in arb_script()) {
        let hierarchy = build(&script);
        for parent in hierarchy.nodes() {
            for child in hierarchy.children(Some(&parent)).expect("member node") {
                prop_assert!(hierarchy.contains(&child));
            }
        }
    }

    #[test]
    fn hierarchs_are_exactly_the_parentless_nodes(script in arb_script()) {
        let hierarchy = build(&script);
        let hierarchs = hierarchy.hierarchs();
        for node in hierarchy.nodes() {
            let parentless = hierarchy
                .parents(&node)
                .expect("member node")
                .is_empty();
            prop_assert_eq!(hierarchs.contains(&node), parentless);
        }
        prop_assert_eq!(Some(hierarchs), hierarchy.children(None));
    }

    #[test]
    fn depth_one_matches_children(script in arb_script()) {
        let hierarchy = build(&script);
        for node in hierarchy.nodes() {
            prop_assert_eq!(
                hierarchy.descendants_within(Some(&node), 1),
                hierarchy.children(Some(&node))
            );
        }
        prop_assert_eq!(hierarchy.descendants_within(None, 1), hierarchy.children(None));
    }

    #[test]
    fn unlimited_depth_is_a_fixed_point(script in arb_script()) {
        // One level more than the node count can discover nothing new.
        let hierarchy = build(&script);
        let bound = hierarchy.len() + 1;
        for node in hierarchy.nodes() {
            prop_assert_eq!(
                hierarchy.descendants_within(Some(&node), bound),
                hierarchy.descendants(Some(&node))
            );
            prop_assert_eq!(
                hierarchy.ancestors_within(&node, bound),
                hierarchy.ancestors(&node)
            );
        }
    }

    #[test]
    fn ancestry_mirrors_descent(script in arb_script()) {
        let hierarchy = build(&script);
        for node in hierarchy.nodes() {
            for above in hierarchy.ancestors(&node).expect("member node") {
                let below = hierarchy.descendants(Some(&above)).expect("member node");
                prop_assert!(below.contains(&node));
            }
        }
    }

    #[test]
    fn self_attach_is_always_rejected(script in arb_script(), node in 0..UNIVERSE) {
        let mut hierarchy = build(&script);
        let before = hierarchy.clone();

        prop_assert_eq!(hierarchy.attach(node, node), Err(AttachError::Loop));
        prop_assert_eq!(hierarchy, before);
    }

    #[test]
    fn clone_is_independent_of_further_edits(script in arb_script(), edits in arb_script()) {
        let source = build(&script);
        let snapshot = source.clone();

        let mut copy = source.clone();
        apply(&mut copy, &edits);

        prop_assert_eq!(&source, &snapshot);
        let nodes: HashSet<u8> = source.nodes();
        for node in nodes {
            prop_assert_eq!(source.children(Some(&node)), snapshot.children(Some(&node)));
        }
    }
}
