use latgas_core::rng::RngHandle;
use latgas_core::{Lattice, Site};
use latgas_mcmc::energy::total_energy;
use latgas_mcmc::kernel::{evaluate_swap, metropolis_step, Coupling, StepOutcome};
use latgas_mcmc::{acceptance_probability, swap_acceptance_probability, StepStatistics};
use proptest::prelude::*;

fn lattice_with(width: usize, height: usize, filled: &[(usize, usize)]) -> Lattice {
    let mut lattice = Lattice::empty(width, height).unwrap();
    for &(row, col) in filled {
        lattice.toggle(Site::new(row, col)).unwrap();
    }
    lattice
}

#[test]
fn reference_probability_for_attractive_coupling() {
    // Mover at (1,1) has two filled neighbours; target at (4,4) has one.
    let lattice = lattice_with(6, 6, &[(1, 1), (0, 1), (1, 0), (4, 5)]);
    let coupling = Coupling::new(-50.0, 100.0).unwrap();
    let proposal = evaluate_swap(&lattice, Site::new(1, 1), Site::new(4, 4), coupling).unwrap();
    assert_eq!(proposal.mover_neighbors, 2);
    assert_eq!(proposal.target_neighbors, 1);
    assert_eq!(proposal.mover_energy, -100.0);
    assert_eq!(proposal.target_energy, -50.0);
    let q = (-0.5f64).exp();
    assert!((q - 0.6065).abs() < 1e-4);
    assert!((proposal.acceptance_prob - q / (1.0 + q)).abs() < 1e-12);
    assert!((proposal.acceptance_prob - 0.3775).abs() < 1e-4);
}

#[test]
fn adjacent_target_excludes_the_mover() {
    let lattice = lattice_with(5, 5, &[(2, 2), (1, 2), (3, 2)]);
    let coupling = Coupling::new(-50.0, 100.0).unwrap();
    let proposal = evaluate_swap(&lattice, Site::new(2, 2), Site::new(2, 3), coupling).unwrap();
    assert_eq!(proposal.mover_neighbors, 2);
    assert_eq!(proposal.target_neighbors, 0);
    assert_eq!(proposal.target_energy, 0.0);
}

#[test]
fn evaluate_rejects_misassigned_roles() {
    let lattice = lattice_with(3, 3, &[(0, 0)]);
    let coupling = Coupling::new(-1.0, 1.0).unwrap();
    let err = evaluate_swap(&lattice, Site::new(1, 1), Site::new(0, 0), coupling).unwrap_err();
    assert_eq!(err.code(), "invalid-swap");
    assert!(evaluate_swap(&lattice, Site::new(0, 0), Site::new(3, 0), coupling).is_err());
}

#[test]
fn sigmoid_saturates_without_overflow() {
    assert_eq!(acceptance_probability(1.0e6, 0.0, 1.0e-3), 1.0);
    assert_eq!(acceptance_probability(-1.0e6, 0.0, 1.0e-3), 0.0);
    assert_eq!(acceptance_probability(5.0, 5.0, 1.0), 0.5);
    let p = acceptance_probability(-100.0, -50.0, 100.0);
    let complement = acceptance_probability(-50.0, -100.0, 100.0);
    assert!((p + complement - 1.0).abs() < 1e-12);
}

#[test]
fn huge_interaction_energy_keeps_probabilities_defined() {
    // Both sites have two filled neighbours, so E1 and E2 overflow to the same infinity.
    let lattice = lattice_with(5, 5, &[(2, 2), (1, 2), (2, 1), (0, 0), (0, 2)]);
    let coupling = Coupling::new(1.0e308, 1.0).unwrap();
    let proposal = evaluate_swap(&lattice, Site::new(2, 2), Site::new(0, 1), coupling).unwrap();
    assert_eq!(proposal.mover_neighbors, 2);
    assert_eq!(proposal.target_neighbors, 2);
    assert!(proposal.mover_energy.is_infinite());
    assert_eq!(proposal.acceptance_prob, 0.5);

    assert_eq!(swap_acceptance_probability(4, 0, coupling), 1.0);
    assert_eq!(swap_acceptance_probability(0, 4, coupling), 0.0);
    let attractive = Coupling::new(-1.0e308, 1.0e-300).unwrap();
    assert_eq!(swap_acceptance_probability(3, 1, attractive), 0.0);
    assert_eq!(swap_acceptance_probability(1, 1, attractive), 0.5);
}

#[test]
fn coupling_rejects_non_positive_temperature() {
    assert_eq!(
        Coupling::new(-50.0, 0.0).unwrap_err().code(),
        "temperature-not-positive"
    );
    assert_eq!(
        Coupling::new(f64::NAN, 1.0).unwrap_err().code(),
        "non-finite-energy"
    );
}

#[test]
fn uniform_lattices_never_mutate() {
    let coupling = Coupling::new(-50.0, 100.0).unwrap();
    let mut rng = RngHandle::from_seed(5);
    for filled in [0usize, 100] {
        let mut lattice = Lattice::random(10, 10, filled, &mut rng).unwrap();
        let hash = lattice.canonical_hash();
        for _ in 0..500 {
            let outcome = metropolis_step(&mut lattice, coupling, &mut rng).unwrap();
            assert_eq!(outcome, StepOutcome::SameType);
        }
        assert_eq!(lattice.canonical_hash(), hash);
        assert_eq!(lattice.occupied_count(), filled);
    }
}

#[test]
fn empty_grid_is_a_no_op() {
    let coupling = Coupling::new(-50.0, 100.0).unwrap();
    let mut lattice = Lattice::empty(0, 0).unwrap();
    let outcome = metropolis_step(&mut lattice, coupling, &mut RngHandle::from_seed(1)).unwrap();
    assert_eq!(outcome, StepOutcome::SameType);
}

#[test]
fn accepted_swaps_change_total_energy_by_e2_minus_e1() {
    let coupling = Coupling::new(-3.0, 4.0).unwrap();
    let mut rng = RngHandle::from_seed(77);
    let mut lattice = Lattice::random(8, 8, 24, &mut rng).unwrap();
    let mut accepted = 0;
    for _ in 0..4000 {
        let before = total_energy(&lattice, coupling.interaction_energy());
        let outcome = metropolis_step(&mut lattice, coupling, &mut rng).unwrap();
        let after = total_energy(&lattice, coupling.interaction_energy());
        match outcome {
            StepOutcome::Accepted(proposal) => {
                accepted += 1;
                let delta = proposal.target_energy - proposal.mover_energy;
                assert!((after - before - delta).abs() < 1e-9);
                assert!(proposal.draw <= proposal.acceptance_prob);
            }
            StepOutcome::Rejected(proposal) => {
                assert_eq!(after, before);
                assert!(proposal.draw > proposal.acceptance_prob);
            }
            StepOutcome::SameType => assert_eq!(after, before),
        }
    }
    assert!(accepted > 0);
}

#[test]
fn zero_coupling_accepts_half_of_the_proposals() {
    let coupling = Coupling::new(0.0, 1.0).unwrap();
    let mut rng = RngHandle::from_seed(2024);
    let mut lattice = Lattice::random(20, 20, 200, &mut rng).unwrap();
    let mut stats = StepStatistics::default();
    for _ in 0..20_000 {
        let outcome = metropolis_step(&mut lattice, coupling, &mut rng).unwrap();
        stats.record(&outcome);
    }
    assert_eq!(stats.attempts, 20_000);
    assert_eq!(stats.same_type + stats.proposals(), stats.attempts);
    let rate = stats.acceptance_rate();
    assert!((rate - 0.5).abs() < 0.05, "unexpected acceptance {rate}");
}

#[test]
fn strong_attraction_at_low_temperature_never_raises_energy() {
    let coupling = Coupling::new(-1000.0, 1.0e-3).unwrap();
    let mut rng = RngHandle::from_seed(31);
    let mut lattice = Lattice::random(12, 12, 40, &mut rng).unwrap();
    let mut energy = total_energy(&lattice, coupling.interaction_energy());
    for _ in 0..5000 {
        metropolis_step(&mut lattice, coupling, &mut rng).unwrap();
        let next = total_energy(&lattice, coupling.interaction_energy());
        assert!(next <= energy);
        energy = next;
    }
}

#[test]
fn same_seed_replays_the_same_trajectory() {
    let coupling = Coupling::new(-50.0, 100.0).unwrap();
    let run = || {
        let mut rng = RngHandle::from_seed(404);
        let mut lattice = Lattice::random(15, 15, 60, &mut rng).unwrap();
        let outcomes: Vec<_> = (0..300)
            .map(|_| metropolis_step(&mut lattice, coupling, &mut rng).unwrap())
            .collect();
        (outcomes, lattice.canonical_hash())
    };
    assert_eq!(run(), run());
}

proptest! {
    #[test]
    fn steps_conserve_particle_count(
        seed in any::<u64>(),
        width in 1usize..10,
        height in 1usize..10,
        fill in 0usize..100,
        energy in -100.0f64..100.0,
        temperature in 0.01f64..500.0,
    ) {
        let coupling = Coupling::new(energy, temperature).unwrap();
        let mut rng = RngHandle::from_seed(seed);
        let mut lattice = Lattice::random(width, height, fill, &mut rng).unwrap();
        let expected = fill.min(width * height);
        for _ in 0..200 {
            metropolis_step(&mut lattice, coupling, &mut rng).unwrap();
            prop_assert_eq!(lattice.occupied_count(), expected);
        }
    }
}
