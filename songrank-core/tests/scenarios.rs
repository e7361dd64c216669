use songrank_core::{
    compare_rankings, ComparisonAnswer, ComparisonKind, Direction, Item, PendingComparison, RankingState, Ranker,
};

fn song(name: &str) -> Item {
    Item::new(name.to_lowercase(), name, "Artist")
}

fn answer(ranker: &mut Ranker, answer: ComparisonAnswer) -> PendingComparison {
    let pending = ranker.pending().cloned().expect("a comparison should be pending");
    ranker.submit_answer(&pending, answer).unwrap();
    pending
}

#[test]
fn two_items_single_seed_comparison() {
    let mut ranker = Ranker::new(vec![song("Song1"), song("Song2")]);
    answer(&mut ranker, ComparisonAnswer::Better);

    assert!(ranker.is_complete());
    assert_eq!(ranker.ranked(), &[song("Song1"), song("Song2")]);
    assert_eq!(ranker.comparison_count(), 1);
}

#[test]
fn three_items_seed_then_binary_insertion() {
    let mut ranker = Ranker::new(vec![song("Song1"), song("Song2"), song("Song3")]);
    answer(&mut ranker, ComparisonAnswer::Better);
    assert_eq!(ranker.ranked(), &[song("Song1"), song("Song2")]);

    let first_probe = answer(&mut ranker, ComparisonAnswer::Worse);
    assert_eq!(first_probe.kind, ComparisonKind::Insertion);
    assert_eq!(first_probe.probe_item, song("Song1"));
    assert_eq!((first_probe.low_bound, first_probe.high_bound), (0, 1));

    let second_probe = ranker.pending().cloned().unwrap();
    assert_eq!(second_probe.probe_item, song("Song2"));
    assert_eq!((second_probe.low_bound, second_probe.high_bound), (1, 1));
    answer(&mut ranker, ComparisonAnswer::Better);

    assert!(ranker.is_complete());
    assert_eq!(ranker.ranked(), &[song("Song1"), song("Song3"), song("Song2")]);
    assert_eq!(ranker.comparison_count(), 3);
}

#[test]
fn unknown_seed_restarts_with_next_pair() {
    let mut ranker = Ranker::new(vec![song("A"), song("B"), song("C")]);
    answer(&mut ranker, ComparisonAnswer::Unknown);

    let reseed = ranker.pending().cloned().unwrap();
    assert!(reseed.is_seed());
    assert_eq!((reseed.new_item.clone(), reseed.probe_item.clone()), (song("B"), song("C")));

    answer(&mut ranker, ComparisonAnswer::Better);
    assert!(ranker.is_complete());
    assert_eq!(ranker.ranked(), &[song("B"), song("C")]);
    assert!(ranker.remaining().is_empty());
    assert_eq!(ranker.comparison_count(), 1);
    assert_eq!(ranker.skipped(), &[song("A")]);
}

#[test]
fn diff_of_overlapping_rankings() {
    let a = vec![song("X"), song("Y"), song("Z")];
    let b = vec![song("Y"), song("X"), song("W")];
    let diff = compare_rankings(&a, &b);

    assert_eq!(diff.shared_items.len(), 2);
    let x = diff.shared_items.iter().find(|s| s.item == song("X")).unwrap();
    assert_eq!((x.rank_a, x.rank_b, x.diff_amount), (1, 2, 1));
    assert_eq!(x.direction, Direction::Down);
    let y = diff.shared_items.iter().find(|s| s.item == song("Y")).unwrap();
    assert_eq!((y.rank_a, y.rank_b, y.diff_amount), (2, 1, 1));
    assert_eq!(y.direction, Direction::Up);

    assert_eq!(diff.only_in_a, vec![song("Z")]);
    assert_eq!(diff.only_in_b, vec![song("W")]);
    assert_eq!(diff.similarity, 67);
}

#[test]
fn resumed_draft_continues_from_stored_bounds() {
    let snapshot = RankingState {
        ranked: vec![song("P"), song("Q")],
        remaining: vec![song("R")],
        pending_comparison: Some(PendingComparison {
            kind: ComparisonKind::Insertion,
            new_item: song("R"),
            probe_item: song("Q"),
            probe_position: 1,
            low_bound: 0,
            high_bound: 1,
            probe_index: 0,
        }),
        comparison_count: 1,
        skipped: vec![],
    };

    let mut ranker = Ranker::resume(snapshot).unwrap();
    answer(&mut ranker, ComparisonAnswer::Better);

    let next = ranker.pending().cloned().unwrap();
    assert_eq!(next.probe_item, song("P"));
    assert_eq!((next.low_bound, next.high_bound), (0, 0));

    answer(&mut ranker, ComparisonAnswer::Worse);
    assert!(ranker.is_complete());
    assert_eq!(ranker.ranked(), &[song("P"), song("R"), song("Q")]);
    assert_eq!(ranker.comparison_count(), 3);
}

#[test]
fn extending_ranking_drops_already_ranked_items() {
    let s2_again = Item::new("catalog-s2", "s2 ", "ARTIST");
    let mut ranker = Ranker::with_existing(vec![s2_again, song("S3")], vec![song("S1"), song("S2")]);

    assert_eq!(ranker.remaining(), &[song("S3")]);
    let first = ranker.pending().cloned().unwrap();
    assert_eq!(first.kind, ComparisonKind::Insertion);
    assert_eq!(first.new_item, song("S3"));
    assert_eq!(first.probe_item, song("S1"));

    answer(&mut ranker, ComparisonAnswer::Worse);
    answer(&mut ranker, ComparisonAnswer::Worse);
    assert!(ranker.is_complete());
    assert_eq!(ranker.ranked(), &[song("S1"), song("S2"), song("S3")]);
}

#[test]
fn extending_with_only_known_items_is_already_complete() {
    let ranker = Ranker::with_existing(vec![song("S1")], vec![song("S1"), song("S2")]);
    assert!(ranker.is_complete());
    assert_eq!(ranker.ranked(), &[song("S1"), song("S2")]);
    assert_eq!(ranker.comparison_count(), 0);
}
