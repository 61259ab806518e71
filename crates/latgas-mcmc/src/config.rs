use latgas_core::errors::ErrorInfo;
use latgas_core::LatgasError;
use serde::{Deserialize, Serialize};

/// Parameters governing a lattice-gas simulation.
///
/// Every field has a default, so embedded YAML only needs to name the values it
/// overrides. Cosmetic fields are carried for presentation layers and never
/// read by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Number of lattice columns (`n`).
    #[serde(default = "default_width")]
    pub width: usize,
    /// Number of lattice rows (`m`).
    #[serde(default = "default_height")]
    pub height: usize,
    /// Filled sites requested at generation time, clamped to `width * height`.
    #[serde(default = "default_initial_filled")]
    pub initial_filled_count: usize,
    /// Wall-clock delay between automatic steps while running.
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
    /// Nearest-neighbour interaction energy `E`; negative values attract.
    #[serde(default = "default_interaction_energy")]
    pub interaction_energy: f64,
    /// Temperature `T`; must be strictly positive.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on overdue ticks executed by a single poll.
    #[serde(default = "default_max_catch_up")]
    pub max_catch_up: usize,
    /// Colour used by renderers for filled sites.
    #[serde(default = "default_filled_color")]
    pub filled_color: String,
    /// Colour used by renderers for empty sites.
    #[serde(default = "default_empty_color")]
    pub empty_color: String,
    /// Master seed and label.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_width() -> usize {
    30
}

fn default_height() -> usize {
    30
}

fn default_initial_filled() -> usize {
    150
}

fn default_step_interval_ms() -> u64 {
    10
}

fn default_interaction_energy() -> f64 {
    -50.0
}

fn default_temperature() -> f64 {
    100.0
}

fn default_max_catch_up() -> usize {
    64
}

fn default_filled_color() -> String {
    "#EBA352".to_string()
}

fn default_empty_color() -> String {
    "#FDFBF7".to_string()
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            initial_filled_count: default_initial_filled(),
            step_interval_ms: default_step_interval_ms(),
            interaction_energy: default_interaction_energy(),
            temperature: default_temperature(),
            max_catch_up: default_max_catch_up(),
            filled_color: default_filled_color(),
            empty_color: default_empty_color(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl SimulationParameters {
    /// Parses parameters from a YAML document and validates them.
    pub fn from_yaml_str(source: &str) -> Result<Self, LatgasError> {
        let params: Self = serde_yaml::from_str(source).map_err(|err| {
            LatgasError::Config(ErrorInfo::new("yaml-parse", err.to_string()))
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects parameter sets the engine cannot run.
    ///
    /// An `initial_filled_count` above capacity is not an error; generation
    /// clamps it.
    pub fn validate(&self) -> Result<(), LatgasError> {
        validate_dimensions(self.width, self.height)?;
        validate_interaction_energy(self.interaction_energy)?;
        validate_temperature(self.temperature)?;
        validate_step_interval(self.step_interval_ms)?;
        if self.max_catch_up == 0 {
            return Err(LatgasError::Config(
                ErrorInfo::new("zero-catch-up", "max_catch_up must be at least 1")
                    .with_hint("a poll that may run no ticks would stall the cadence"),
            ));
        }
        Ok(())
    }

    /// Number of sites the configured lattice will hold.
    pub fn capacity(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Filled sites a generation will actually realise.
    pub fn effective_filled_count(&self) -> usize {
        self.initial_filled_count.min(self.capacity())
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed from which lattice and step substreams are derived.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded alongside the seed in logs.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x1A77_1CE6_A5EE_D000_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

pub(crate) fn validate_dimensions(width: usize, height: usize) -> Result<(), LatgasError> {
    if width == 0 || height == 0 {
        return Err(LatgasError::Config(
            ErrorInfo::new("zero-dimension", "lattice width and height must be at least 1")
                .with_context("width", width.to_string())
                .with_context("height", height.to_string()),
        ));
    }
    if width.checked_mul(height).is_none() {
        return Err(LatgasError::Config(
            ErrorInfo::new("lattice-too-large", "lattice dimensions overflow")
                .with_context("width", width.to_string())
                .with_context("height", height.to_string()),
        ));
    }
    Ok(())
}

pub(crate) fn validate_temperature(temperature: f64) -> Result<(), LatgasError> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(LatgasError::Config(
            ErrorInfo::new("temperature-not-positive", "temperature must be finite and > 0")
                .with_context("temperature", temperature.to_string())
                .with_hint("acceptance probabilities divide by the temperature"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_interaction_energy(energy: f64) -> Result<(), LatgasError> {
    if !energy.is_finite() {
        return Err(LatgasError::Config(
            ErrorInfo::new("non-finite-energy", "interaction energy must be finite")
                .with_context("interaction_energy", energy.to_string()),
        ));
    }
    Ok(())
}

pub(crate) fn validate_step_interval(interval_ms: u64) -> Result<(), LatgasError> {
    if interval_ms == 0 {
        return Err(LatgasError::Config(ErrorInfo::new(
            "zero-interval",
            "step interval must be at least 1 ms",
        )));
    }
    Ok(())
}
