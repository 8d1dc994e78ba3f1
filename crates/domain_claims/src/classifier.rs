//! Damage classifiers
//!
//! The orchestrator only depends on the `Classifier` capability. Two
//! in-process mocks live here; the HTTP model client lives in
//! `infra_adapters`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, Money, PortError};

use crate::assessment::{DamageAssessment, Severity};

/// Which classification strategy is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    #[serde(alias = "random")]
    RandomMock,
    #[serde(alias = "keyword")]
    KeywordMock,
    #[serde(alias = "model")]
    RealModel,
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassifierKind::RandomMock => "random_mock",
            ClassifierKind::KeywordMock => "keyword_mock",
            ClassifierKind::RealModel => "real_model",
        };
        f.write_str(name)
    }
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" | "random_mock" => Ok(ClassifierKind::RandomMock),
            "keyword" | "keyword_mock" => Ok(ClassifierKind::KeywordMock),
            "model" | "real_model" => Ok(ClassifierKind::RealModel),
            other => Err(format!("unknown classifier '{}'", other)),
        }
    }
}

/// Reference to a submitted damage image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Original file name as uploaded
    pub name: String,
    /// Where the upload was stored, when it was stored
    pub path: Option<PathBuf>,
}

impl ImageReference {
    /// A reference by name only
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    /// A reference to a stored upload
    pub fn stored(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
        }
    }
}

/// Produces a damage assessment from an image
#[async_trait]
pub trait Classifier: DomainPort {
    /// The strategy this classifier implements
    fn kind(&self) -> ClassifierKind;

    /// Classifies one image
    async fn classify(&self, image: &ImageReference) -> Result<DamageAssessment, PortError>;
}

fn assessment(
    damage_type: &str,
    severity: Severity,
    cost: Decimal,
    confidence: f64,
) -> Result<DamageAssessment, PortError> {
    DamageAssessment::new(damage_type, severity, Money::usd(cost), confidence)
        .map_err(|e| PortError::transformation(e.to_string()))
}

/// Deterministic classifier driven by keywords in the image name
///
/// - `total` or `heavy`: Major Frontal Collision, severe, 4500.00
/// - `scratch`: Paint Scratch, minor, 350.00
/// - anything else: Front Bumper Dent, moderate, 850.00
#[derive(Debug, Clone, Default)]
pub struct KeywordMockClassifier;

impl KeywordMockClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl DomainPort for KeywordMockClassifier {}

#[async_trait]
impl Classifier for KeywordMockClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::KeywordMock
    }

    async fn classify(&self, image: &ImageReference) -> Result<DamageAssessment, PortError> {
        let name = image.name.to_lowercase();
        if name.contains("total") || name.contains("heavy") {
            assessment("Major Frontal Collision", Severity::Severe, dec!(4500.00), 0.98)
        } else if name.contains("scratch") {
            assessment("Paint Scratch", Severity::Minor, dec!(350.00), 0.85)
        } else {
            assessment("Front Bumper Dent", Severity::Moderate, dec!(850.00), 0.95)
        }
    }
}

const RANDOM_DAMAGE_TYPES: [&str; 5] = ["Collision", "Hail", "Flood", "Fire", "Vandalism"];

/// Classifier that draws a plausible assessment at random
///
/// The cost is drawn in cents from the severity's band and confidence
/// from 0.85 to 0.99.
#[derive(Debug)]
pub struct RandomMockClassifier {
    rng: Mutex<StdRng>,
}

impl RandomMockClassifier {
    /// Seeds from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence for tests and demos
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> Result<(&'static str, Severity, Decimal, f64), PortError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PortError::internal("random classifier state poisoned"))?;

        let damage_type = RANDOM_DAMAGE_TYPES
            .choose(&mut *rng)
            .copied()
            .unwrap_or("Collision");
        let severity = Severity::ALL
            .choose(&mut *rng)
            .copied()
            .unwrap_or(Severity::Moderate);

        let (low, high) = severity.cost_band();
        let low_cents = (low * dec!(100)).to_i64().unwrap_or_default();
        let high_cents = (high * dec!(100)).to_i64().unwrap_or_default();
        let cost = Decimal::new(rng.gen_range(low_cents..=high_cents), 2);
        let confidence = f64::from(rng.gen_range(85u32..=99)) / 100.0;

        Ok((damage_type, severity, cost, confidence))
    }
}

impl Default for RandomMockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPort for RandomMockClassifier {}

#[async_trait]
impl Classifier for RandomMockClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RandomMock
    }

    async fn classify(&self, _image: &ImageReference) -> Result<DamageAssessment, PortError> {
        let (damage_type, severity, cost, confidence) = self.draw()?;
        assessment(damage_type, severity, cost, confidence)
    }
}
