use avl_multiset::AvlMultiset;

#[derive(Debug, PartialEq)]
struct Score {
    player: &'static str,
    points: u32,
    round: u32,
}

fn main() {
    let mut set = AvlMultiset::new();
    for x in [5, 3, 8, 1, 4, 7, 9, 3] {
        set.insert(x);
    }
    assert_eq!(set.count(&3), 2);
    set.delete(&3);
    assert_eq!(set.count(&3), 1);
    println!("{:?}", set);

    // Scores ordered by points, ties listed by round.
    let mut board = AvlMultiset::with_orders(
        |lhs: &Score, rhs: &Score| rhs.points.cmp(&lhs.points),
        |lhs: &Score, rhs: &Score| lhs.round.cmp(&rhs.round),
    );
    board.insert(Score { player: "ada", points: 30, round: 2 });
    board.insert(Score { player: "bob", points: 50, round: 3 });
    board.insert(Score { player: "cyd", points: 30, round: 1 });
    board.insert(Score { player: "dee", points: 10, round: 1 });

    board.traverse(|score| {
        println!("{} => {} (round {})", score.player, score.points, score.round);
    });
}
