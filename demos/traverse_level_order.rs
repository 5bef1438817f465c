use avl_multiset::AvlMultiset;

fn main() {
    let mut set = AvlMultiset::new();
    for x in [1, 2, 3, 4, 5, 6, 2, 5] {
        set.insert(x);
    }

    println!("Level-order traversal:");
    set.traverse_level_order(|bucket| {
        println!("Key: {}, Count: {}", bucket[0], bucket.len());
    });
}
