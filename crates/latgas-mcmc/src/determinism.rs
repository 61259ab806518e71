use latgas_core::{derive_substream_seed, LATTICE_SUBSTREAM, STEP_SUBSTREAM};

/// Derives the seed used to place particles for a given regeneration.
pub fn lattice_seed(master_seed: u64, generation: u64) -> u64 {
    derive_substream_seed(
        derive_substream_seed(master_seed, LATTICE_SUBSTREAM),
        generation,
    )
}

/// Derives the seed driving Metropolis steps after a given regeneration.
pub fn step_seed(master_seed: u64, generation: u64) -> u64 {
    derive_substream_seed(derive_substream_seed(master_seed, STEP_SUBSTREAM), generation)
}
