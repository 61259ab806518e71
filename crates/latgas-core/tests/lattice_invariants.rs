use std::collections::BTreeSet;

use latgas_core::rng::RngHandle;
use latgas_core::{Lattice, Occupancy, Site};
use proptest::prelude::*;

fn filled_sites(lattice: &Lattice) -> BTreeSet<Site> {
    lattice
        .sites()
        .filter(|site| lattice.occupancy_at(*site).unwrap() == Occupancy::Filled)
        .collect()
}

proptest! {
    #[test]
    fn generated_fill_matches_clamped_request(
        seed in any::<u64>(),
        width in 0usize..12,
        height in 0usize..12,
        requested in 0usize..200,
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let lattice = Lattice::random(width, height, requested, &mut rng).unwrap();
        let expected = requested.min(width * height);
        prop_assert_eq!(lattice.occupied_count(), expected);
        prop_assert_eq!(filled_sites(&lattice).len(), expected);
    }

    #[test]
    fn toggles_change_count_by_exactly_one(
        seed in any::<u64>(),
        edits in proptest::collection::vec((0usize..6, 0usize..6), 1..40),
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let mut lattice = Lattice::random(6, 6, 10, &mut rng).unwrap();
        for (row, col) in edits {
            let before = lattice.occupied_count();
            let next = lattice.toggle(Site::new(row, col)).unwrap();
            let after = lattice.occupied_count();
            if next.is_filled() {
                prop_assert_eq!(after, before + 1);
            } else {
                prop_assert_eq!(after + 1, before);
            }
            prop_assert_eq!(filled_sites(&lattice).len(), after);
        }
    }
}

#[test]
fn same_seed_reproduces_positions() {
    let a = Lattice::random(10, 10, 30, &mut RngHandle::from_seed(99)).unwrap();
    let b = Lattice::random(10, 10, 30, &mut RngHandle::from_seed(99)).unwrap();
    assert_eq!(a.canonical_hash(), b.canonical_hash());
    assert_eq!(filled_sites(&a), filled_sites(&b));
}

#[test]
fn different_seeds_keep_the_same_count() {
    let a = Lattice::random(10, 10, 30, &mut RngHandle::from_seed(1)).unwrap();
    let b = Lattice::random(10, 10, 30, &mut RngHandle::from_seed(2)).unwrap();
    assert_eq!(a.occupied_count(), b.occupied_count());
}
