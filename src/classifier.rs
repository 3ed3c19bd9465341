//! Personality classifier.
//!
//! Wraps aprender's random forest: trees grown to purity on bootstrap
//! samples of six labelled sessions. Class indices follow
//! `Personality::ALL`.

use aprender::primitives::Matrix;
use aprender::tree::RandomForestClassifier;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClassifierError;

/// Number of trees grown by default
pub const DEFAULT_NUM_TREES: usize = 100;

/// Seed used for the shipped model so every run classifies the same way
pub const DEFAULT_SEED: u64 = 42;

const NUM_FEATURES: usize = 3;

/// Personality label predicted for a typing session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum_macros::Display,
)]
pub enum Personality {
    Focused,
    Neutral,
    Stressed,
}

impl Personality {
    pub const ALL: [Personality; 3] = [
        Personality::Focused,
        Personality::Neutral,
        Personality::Stressed,
    ];

    fn index(self) -> usize {
        match self {
            Personality::Focused => 0,
            Personality::Neutral => 1,
            Personality::Stressed => 2,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn description(self) -> &'static str {
        match self {
            Personality::Focused => "Consistent typing with low hesitation shows good focus.",
            Personality::Stressed => "Irregular typing and pauses may indicate stress.",
            Personality::Neutral => "Average rhythm suggests a neutral state.",
        }
    }
}

/// Inputs the classifier looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub average_delay_secs: f64,
    pub total_time_secs: f64,
    pub hesitations: u32,
}

impl Features {
    pub fn as_row(&self) -> [f64; NUM_FEATURES] {
        [
            self.average_delay_secs,
            self.total_time_secs,
            self.hesitations as f64,
        ]
    }
}

/// Anything that can turn session features into a personality label
pub trait Classifier {
    fn predict(&self, features: &Features) -> Personality;
}

/// The six labelled sessions the shipped model learns from
pub fn training_set() -> (Vec<Vec<f64>>, Vec<Personality>) {
    let rows = [
        (0.15, 20.0, 1.0, Personality::Focused),
        (0.35, 45.0, 5.0, Personality::Stressed),
        (0.25, 30.0, 3.0, Personality::Neutral),
        (0.10, 15.0, 0.0, Personality::Focused),
        (0.50, 50.0, 6.0, Personality::Stressed),
        (0.18, 22.0, 2.0, Personality::Focused),
    ];

    rows.iter()
        .map(|&(delay, time, hesitations, label)| (vec![delay, time, hesitations], label))
        .unzip()
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<Matrix<f32>, ClassifierError> {
    let data: Vec<f32> = rows.iter().flatten().map(|&v| v as f32).collect();
    Matrix::from_vec(rows.len(), NUM_FEATURES, data).map_err(ClassifierError::Matrix)
}

/// Personality model trained once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct PersonalityModel {
    forest: RandomForestClassifier,
}

impl PersonalityModel {
    pub fn train() -> Result<Self, ClassifierError> {
        Self::train_with(DEFAULT_NUM_TREES, DEFAULT_SEED)
    }

    pub fn train_with(num_trees: usize, seed: u64) -> Result<Self, ClassifierError> {
        let (samples, labels) = training_set();
        let x = to_matrix(&samples)?;
        let y: Vec<usize> = labels.iter().map(|p| p.index()).collect();

        let mut forest = RandomForestClassifier::new(num_trees.max(1)).with_random_state(seed);
        forest.fit(&x, &y)?;
        debug!(num_trees, seed, rows = samples.len(), "personality model trained");
        Ok(Self { forest })
    }

    /// Share of trees voting for each class, indexed like `Personality::ALL`
    pub fn predict_proba(&self, features: &Features) -> [f64; 3] {
        let mut proba = [0.0; 3];
        let x = match to_matrix(&[features.as_row().to_vec()]) {
            Ok(x) => x,
            Err(e) => {
                warn!(error = %e, "cannot classify features");
                return proba;
            }
        };

        let votes = self.forest.predict_proba(&x);
        let (_, classes) = votes.shape();
        for (i, p) in proba.iter_mut().enumerate().take(classes) {
            *p = f64::from(votes.get(0, i));
        }
        proba
    }
}

impl Classifier for PersonalityModel {
    /// Most voted class; ties go to the earlier class in `Personality::ALL`
    fn predict(&self, features: &Features) -> Personality {
        let proba = self.predict_proba(features);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Personality::from_index(best).unwrap_or(Personality::Neutral)
    }
}
