use std::cmp::Ordering;
use std::collections::BTreeMap;

use proptest::prelude::*;

use super::AvlMultiset;

// (key, tag)
type Item = (u8, u8);

fn by_key(lhs: &Item, rhs: &Item) -> Ordering {
    lhs.0.cmp(&rhs.0)
}

fn by_tag(lhs: &Item, rhs: &Item) -> Ordering {
    lhs.1.cmp(&rhs.1)
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Item),
    Delete(Item),
}

fn item_strategy() -> impl Strategy<Value = Item> + Clone {
    // Few keys and tags so buckets fill up and deletes mostly hit.
    (0u8..32, 0u8..4)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let item = item_strategy();
    let op = prop_oneof![
        3 => item.clone().prop_map(Op::Insert),
        2 => item.prop_map(Op::Delete),
    ];
    prop::collection::vec(op, 0..=500)
}

/// Buckets of the model, keyed by the primary order.
/// Inserts append, and a stable sort by tag stands in for the secondary order.
struct Model {
    buckets: BTreeMap<u8, Vec<Item>>,
    sorted: bool,
}

impl Model {
    fn new(sorted: bool) -> Self {
        Self {
            buckets: BTreeMap::new(),
            sorted,
        }
    }

    fn insert(&mut self, item: Item) {
        let bucket = self.buckets.entry(item.0).or_default();
        bucket.push(item);
        if self.sorted {
            bucket.sort_by(by_tag);
        }
    }

    fn delete(&mut self, item: &Item) -> bool {
        let Some(bucket) = self.buckets.get_mut(&item.0) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|other| other == item) else {
            return false;
        };
        bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&item.0);
        }
        true
    }

    fn values(&self) -> Vec<Item> {
        self.buckets.values().flatten().copied().collect()
    }
}

fn check_against_model<P, S>(
    set: &mut AvlMultiset<Item, P, S>,
    mut model: Model,
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    P: Fn(&Item, &Item) -> Ordering,
    S: Fn(&Item, &Item) -> Ordering,
{
    for op in ops {
        match op {
            Op::Insert(item) => {
                set.insert(item);
                model.insert(item);
            }
            Op::Delete(item) => {
                let shape: Vec<(Item, usize)> =
                    set.shape().into_iter().map(|(key, height)| (*key, height)).collect();
                let removed = set.delete(&item);
                prop_assert_eq!(removed, model.delete(&item));
                if !removed {
                    let after: Vec<(Item, usize)> =
                        set.shape().into_iter().map(|(key, height)| (*key, height)).collect();
                    prop_assert_eq!(shape, after);
                }
            }
        }

        set.check_consistency();
        prop_assert_eq!(set.len(), model.values().len());
        prop_assert_eq!(set.node_count(), model.buckets.len());
    }

    let mut got = Vec::new();
    set.traverse(|item| got.push(*item));
    prop_assert_eq!(got, model.values());

    let bound = 1.44 * ((set.node_count() + 2) as f64).log2();
    prop_assert!(set.height() as f64 <= bound);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_insertion_order(ops in ops_strategy()) {
        let mut set: AvlMultiset<Item, _> = AvlMultiset::with_order(by_key);
        check_against_model(&mut set, Model::new(false), ops)?;
    }

    #[test]
    fn prop_equivalence_secondary_order(ops in ops_strategy()) {
        let mut set: AvlMultiset<Item, _, _> = AvlMultiset::with_orders(by_key, by_tag);
        check_against_model(&mut set, Model::new(true), ops)?;
    }

    #[test]
    fn prop_sorted_insert_keeps_height(len in 1usize..2_000) {
        let mut set = AvlMultiset::new();
        for value in 0..len {
            set.insert(value);
        }
        set.check_consistency();
        prop_assert!(set.height() as f64 <= 1.44 * ((len + 2) as f64).log2());
    }
}
