use proptest::prelude::*;

use super::{Involution, InvolutionError, Kind, MoveError, Row, Slot, Twins};

fn chars(s: &str) -> Vec<char> {
    s.split_whitespace().flat_map(|w| w.chars()).collect()
}

fn involution(top: &str, bottom: &str) -> Result<Involution, InvolutionError> {
    let (top, bottom) = (chars(top), chars(bottom));
    Involution::from_rows([&top[..], &bottom[..]])
}

#[test]
fn kind_follows_repeats_inside_a_row() {
    assert_eq!(involution("abc", "cba").unwrap().kind(), Kind::Abelian);
    assert_eq!(involution("abb", "cca").unwrap().kind(), Kind::Quadratic);
    assert_eq!(involution("aa", "bb").unwrap().kind(), Kind::Quadratic);
}

#[test]
fn construction_errors() {
    assert_eq!(
        involution("ab", "ac"),
        Err(InvolutionError::UnmatchedLabel {
            slot: Slot::top(1),
            occurrences: 1
        })
    );
    assert_eq!(
        involution("aab", "ba"),
        Err(InvolutionError::UnmatchedLabel {
            slot: Slot::top(0),
            occurrences: 3
        })
    );
    assert_eq!(
        involution("aab", "b"),
        Err(InvolutionError::InadmissibleLength)
    );

    let (top, bottom) = (chars("ab"), chars("ba"));
    assert!(Involution::abelian([&top[..], &bottom[..]]).is_ok());
    let (top, bottom) = (chars("abc"), chars("ab"));
    assert_eq!(
        Involution::abelian([&top[..], &bottom[..]]),
        Err(InvolutionError::AsymmetricLength { top: 3, bottom: 2 })
    );
    let (top, bottom) = (chars("baa"), chars("bcc"));
    assert_eq!(
        Involution::abelian([&top[..], &bottom[..]]),
        Err(InvolutionError::SameRowPair {
            slot: Slot::top(1),
            twin: Slot::top(2)
        })
    );
}

#[test]
fn quadratic_encoding_of_an_abelian_pairing() {
    let (top, bottom) = (chars("abc"), chars("cba"));
    let rows = [&top[..], &bottom[..]];
    let abelian = Involution::abelian(rows).unwrap();
    let quadratic = Involution::quadratic(rows).unwrap();
    assert_eq!(quadratic.kind(), Kind::Quadratic);
    for slot in abelian.slots() {
        assert_eq!(abelian.twin(slot), quadratic.twin(slot));
    }
}

#[test]
fn pair_ids_in_reading_order() {
    let inv = involution("abb", "cca").unwrap();
    assert_eq!(inv.pair_ids(), [vec![0, 1, 1], vec![2, 2, 0]]);
    assert_eq!(inv.total_len(), 3);
    assert_eq!(inv.lengths(), [3, 3]);
}

#[test]
fn not_movable_leaves_the_pairing_alone() {
    let mut inv = involution("aabb", "cc").unwrap();
    let before = inv.clone();
    assert_eq!(
        inv.rauzy_move(Row::Top),
        Err(MoveError::NotMovable { winner: Row::Top })
    );
    assert_eq!(inv, before);
}

#[test]
fn quadratic_moves() {
    let cases = [
        ("aa", "bbcc", Row::Top, "caa", "bbc"),
        ("122", "31344", Row::Top, "1422", "3134"),
        ("11", "223434", Row::Top, "411", "22343"),
        ("aabb", "cc", Row::Bottom, "aab", "bcc"),
        ("11233", "424", Row::Bottom, "1123", "3424"),
        ("abb", "cca", Row::Top, "aabb", "cc"),
        ("abb", "cca", Row::Bottom, "abb", "cca"),
        ("aab", "bcc", Row::Top, "aab", "bcc"),
        ("aab", "bcc", Row::Bottom, "aa", "bbcc"),
    ];
    for (top, bottom, winner, moved_top, moved_bottom) in cases {
        let mut inv = involution(top, bottom).unwrap();
        inv.rauzy_move(winner).unwrap();
        assert_eq!(
            inv,
            involution(moved_top, moved_bottom).unwrap(),
            "{top}/{bottom} moved by {winner}"
        );
    }
}

#[test]
fn abelian_moves() {
    let cases = [
        ("ab", "ba", Row::Top, "ab", "ba"),
        ("abc", "cba", Row::Top, "abc", "cab"),
        ("abc", "cba", Row::Bottom, "acb", "cba"),
        ("abc", "bca", Row::Top, "abc", "bca"),
        ("abc", "bca", Row::Bottom, "acb", "bca"),
        ("abc", "cab", Row::Top, "abc", "cba"),
        ("abc", "cab", Row::Bottom, "abc", "cab"),
    ];
    for (top, bottom, winner, moved_top, moved_bottom) in cases {
        let mut inv = involution(top, bottom).unwrap();
        inv.rauzy_move(winner).unwrap();
        assert_eq!(inv, involution(moved_top, moved_bottom).unwrap());
    }
}

#[test]
fn validate_catches_broken_pairings() {
    let broken = Involution::Abelian(super::AbelianTwins::from_map(vec![0, 0]));
    assert!(broken.validate().is_err());
}

const SEEDS: [(&str, &str); 8] = [
    ("abcd", "dcba"),
    ("abcde", "edcba"),
    ("abcd", "dbca"),
    ("abb", "cca"),
    ("aab", "bcc"),
    ("1122", "3434"),
    ("abac", "bcdd"),
    ("12233", "41564 65"),
];

proptest! {
    #[test]
    fn moves_preserve_the_involution(
        seed in 0..SEEDS.len(),
        walk in proptest::collection::vec(any::<bool>(), 0..40),
    ) {
        let (top, bottom) = SEEDS[seed];
        let mut inv = involution(top, bottom).unwrap();
        let kind = inv.kind();
        let total = inv.total_len();
        for winner in walk.into_iter().map(Row::from) {
            let before = inv.lengths();
            let movable = inv.is_rauzy_movable(winner);
            let moved = inv.rauzy_move(winner);
            prop_assert_eq!(moved.is_ok(), movable);
            prop_assert!(inv.validate().is_ok());
            prop_assert_eq!(inv.kind(), kind);
            prop_assert_eq!(inv.total_len(), total);

            let after = inv.lengths();
            match moved {
                Ok(to) if to.row == winner => {
                    prop_assert_eq!(after[winner as usize], before[winner as usize] + 1);
                    prop_assert_eq!(after[-winner as usize] + 1, before[-winner as usize]);
                }
                _ => prop_assert_eq!(after, before),
            }
        }
    }
}
