use async_trait::async_trait;
use std::time::Duration;

use crate::core::config::{VerifierConfig, VerifierMode};
use crate::features::checkin::providers::Frame;

/// Liveness decision for a captured frame.
///
/// One call, one outcome; retrying is up to the claimant.
#[async_trait]
pub trait FaceVerifier: Send + Sync {
    async fn verify(&self, frame: &Frame) -> bool;
}

/// Stand-in for face recognition: accepts a frame with a fixed probability
/// after a fixed processing delay.
pub struct SimulatedFaceVerifier {
    success_probability: f64,
    processing_delay: Duration,
}

impl SimulatedFaceVerifier {
    pub fn new(success_probability: f64, processing_delay: Duration) -> Self {
        Self {
            success_probability: success_probability.clamp(0.0, 1.0),
            processing_delay,
        }
    }
}

#[async_trait]
impl FaceVerifier for SimulatedFaceVerifier {
    async fn verify(&self, frame: &Frame) -> bool {
        tokio::time::sleep(self.processing_delay).await;
        let accepted = rand::random::<f64>() < self.success_probability;
        tracing::debug!(
            "Simulated verification of {} byte {} frame: accepted={}",
            frame.bytes.len(),
            frame.content_type,
            accepted
        );
        accepted
    }
}

/// Verifier with a predetermined outcome
pub struct FixedOutcomeVerifier {
    outcome: bool,
    processing_delay: Duration,
}

impl FixedOutcomeVerifier {
    pub fn new(outcome: bool, processing_delay: Duration) -> Self {
        Self {
            outcome,
            processing_delay,
        }
    }
}

#[async_trait]
impl FaceVerifier for FixedOutcomeVerifier {
    async fn verify(&self, _frame: &Frame) -> bool {
        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }
        self.outcome
    }
}

impl VerifierConfig {
    /// Build the verifier selected by `FACE_VERIFIER`
    pub fn build(&self) -> Box<dyn FaceVerifier> {
        match self.mode {
            VerifierMode::Simulated => Box::new(SimulatedFaceVerifier::new(
                self.success_probability,
                self.processing_delay,
            )),
            VerifierMode::Accept => Box::new(FixedOutcomeVerifier::new(true, self.processing_delay)),
            VerifierMode::Reject => {
                Box::new(FixedOutcomeVerifier::new(false, self.processing_delay))
            }
        }
    }
}
