//! Product identification.
//!
//! Recognition sits behind the [`Identifier`] capability so the flow logic does
//! not care whether QR decoding and photo analysis are real or simulated.
//! [`SimulatedIdentifier`] stands in for a recognition service with timers and
//! an injected [`DecisionSource`].
//!
//! [`IdentificationFlow`] holds the identify screen state. Attempts are
//! cancel-and-replace: every attempt gets a ticket, and results carrying a
//! ticket older than the latest attempt are dropped.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use shared::{Catalog, IdentificationMethod, PhotoAnalysis, ProductId};
use thiserror::Error;

use crate::state::{SessionActions, SessionStore};

/// An uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Nothing was actually selected
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What the user gave us to identify their product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentificationInput {
    /// Decoded QR payload
    QrCode(String),
    ModelNumber(String),
    Photo(Photo),
}

impl IdentificationInput {
    pub fn method(&self) -> IdentificationMethod {
        match self {
            IdentificationInput::QrCode(_) => IdentificationMethod::Qr,
            IdentificationInput::ModelNumber(_) => IdentificationMethod::Model,
            IdentificationInput::Photo(_) => IdentificationMethod::Photo,
        }
    }
}

/// The input did not match any catalog product; the user may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{method} was not recognized")]
pub struct NotRecognized {
    pub method: IdentificationMethod,
}

/// Recognition capability
#[async_trait]
pub trait Identifier: Send + Sync {
    async fn identify(&self, input: &IdentificationInput) -> Result<ProductId, NotRecognized>;

    async fn analyze_photo(&self, photo: &Photo) -> PhotoAnalysis;
}

// ── Simulated recognition ─────────────────────────────────────

/// Source of the simulated photo-analysis verdict
pub trait DecisionSource: Send {
    fn photo_recognized(&mut self) -> bool;
}

/// Always returns the same verdict
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub bool);

impl DecisionSource for FixedDecision {
    fn photo_recognized(&mut self) -> bool {
        self.0
    }
}

/// Random verdicts with a fixed success rate
#[derive(Debug)]
pub struct SeededDecisions {
    rng: StdRng,
    success_rate: f64,
}

impl SeededDecisions {
    pub const DEFAULT_SUCCESS_RATE: f64 = 0.7;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            success_rate: Self::DEFAULT_SUCCESS_RATE,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            success_rate: Self::DEFAULT_SUCCESS_RATE,
        }
    }

    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate.clamp(0.0, 1.0);
        self
    }
}

impl DecisionSource for SeededDecisions {
    fn photo_recognized(&mut self) -> bool {
        self.rng.gen_bool(self.success_rate)
    }
}

/// Delays of the simulated recognition service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationTimings {
    pub scan_tick: Duration,
    pub scan_ticks: u32,
    pub analysis_delay: Duration,
    pub confirm_delay: Duration,
}

impl Default for SimulationTimings {
    fn default() -> Self {
        Self {
            scan_tick: Duration::from_millis(100),
            scan_ticks: 10,
            analysis_delay: Duration::from_secs(2),
            confirm_delay: Duration::from_secs(1),
        }
    }
}

impl SimulationTimings {
    /// No waiting at all
    pub fn instant() -> Self {
        Self {
            scan_tick: Duration::ZERO,
            scan_ticks: 10,
            analysis_delay: Duration::ZERO,
            confirm_delay: Duration::ZERO,
        }
    }

    /// Default timings multiplied by `factor` (0 disables the delays).
    /// `None` when a scaled delay does not fit in a `Duration`.
    pub fn scaled(factor: f64) -> Option<Self> {
        let base = Self::default();
        let factor = factor.max(0.0);
        let scale = |d: Duration| Duration::try_from_secs_f64(d.as_secs_f64() * factor).ok();
        Some(Self {
            scan_tick: scale(base.scan_tick)?,
            scan_ticks: base.scan_ticks,
            analysis_delay: scale(base.analysis_delay)?,
            confirm_delay: scale(base.confirm_delay)?,
        })
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Timer-driven stand-in for a recognition service over a single-product catalog
pub struct SimulatedIdentifier {
    product_id: ProductId,
    timings: SimulationTimings,
    decisions: Mutex<Box<dyn DecisionSource>>,
}

impl SimulatedIdentifier {
    pub fn new(catalog: &Catalog, timings: SimulationTimings, decisions: Box<dyn DecisionSource>) -> Self {
        Self {
            product_id: catalog.product().id.clone(),
            timings,
            decisions: Mutex::new(decisions),
        }
    }

    fn decide(&self) -> bool {
        let mut decisions = self.decisions.lock().unwrap_or_else(|e| e.into_inner());
        decisions.photo_recognized()
    }
}

#[async_trait]
impl Identifier for SimulatedIdentifier {
    async fn identify(&self, input: &IdentificationInput) -> Result<ProductId, NotRecognized> {
        let not_recognized = NotRecognized {
            method: input.method(),
        };
        match input {
            IdentificationInput::QrCode(payload) => {
                for tick in 1..=self.timings.scan_ticks {
                    pause(self.timings.scan_tick).await;
                    tracing::trace!("QR scan {}%", tick * 100 / self.timings.scan_ticks.max(1));
                }
                if payload.trim().eq_ignore_ascii_case(&self.product_id) {
                    Ok(self.product_id.clone())
                } else {
                    tracing::warn!("Unknown QR payload '{payload}'");
                    Err(not_recognized)
                }
            }
            IdentificationInput::ModelNumber(text) => {
                if text.trim().is_empty() {
                    Err(not_recognized)
                } else {
                    Ok(self.product_id.clone())
                }
            }
            IdentificationInput::Photo(photo) => {
                if photo.is_empty() {
                    return Err(not_recognized);
                }
                match self.analyze_photo(photo).await {
                    PhotoAnalysis::Success => {
                        pause(self.timings.confirm_delay).await;
                        Ok(self.product_id.clone())
                    }
                    PhotoAnalysis::Warning => Err(not_recognized),
                }
            }
        }
    }

    async fn analyze_photo(&self, photo: &Photo) -> PhotoAnalysis {
        pause(self.timings.analysis_delay).await;
        let analysis = if !photo.is_empty() && self.decide() {
            PhotoAnalysis::Success
        } else {
            PhotoAnalysis::Warning
        };
        tracing::info!("Photo '{}' analysed: {analysis:?}", photo.file_name);
        analysis
    }
}

// ── Identify screen state ─────────────────────────────────────

/// Handle for one identification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptTicket {
    generation: u64,
    method: IdentificationMethod,
}

impl AttemptTicket {
    pub fn method(&self) -> IdentificationMethod {
        self.method
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "product_id", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Identified(ProductId),
    NeedsRetry,
    /// A newer attempt replaced this one; its result was ignored
    Superseded,
}

#[derive(Debug, Default)]
pub struct IdentificationFlow {
    method: Option<IdentificationMethod>,
    model_number: String,
    suggestion_visible: bool,
    generation: u64,
    pending: Option<u64>,
    identified: bool,
    needs_retry: bool,
    photo_analysis: Option<PhotoAnalysis>,
}

impl IdentificationFlow {
    pub fn method(&self) -> Option<IdentificationMethod> {
        self.method
    }

    pub fn model_number(&self) -> &str {
        &self.model_number
    }

    pub fn is_suggestion_visible(&self) -> bool {
        self.suggestion_visible
    }

    pub fn is_identified(&self) -> bool {
        self.identified
    }

    pub fn needs_retry(&self) -> bool {
        self.needs_retry
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_scanning(&self) -> bool {
        self.is_pending() && self.method == Some(IdentificationMethod::Qr)
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_pending() && self.method == Some(IdentificationMethod::Photo)
    }

    pub fn photo_analysis(&self) -> Option<PhotoAnalysis> {
        self.photo_analysis
    }

    pub fn set_model_number(&mut self, text: impl Into<String>) {
        self.model_number = text.into();
        if !self.model_number.is_empty() {
            self.suggestion_visible = false;
        }
    }

    /// Focusing an empty model field offers the catalog product as a suggestion
    pub fn focus_model_input(&mut self) {
        if self.model_number.is_empty() {
            self.suggestion_visible = true;
        }
    }

    pub fn accept_suggestion(&mut self, product_name: &str) {
        self.model_number = product_name.to_string();
        self.suggestion_visible = false;
    }

    /// The model-number confirm button is enabled
    pub fn can_submit_model(&self) -> bool {
        !self.model_number.trim().is_empty()
    }

    /// Start an attempt, superseding any attempt still in flight.
    ///
    /// Returns `None` when the input cannot be submitted (blank model number,
    /// no photo selected); nothing changes in that case.
    pub fn begin(&mut self, input: &IdentificationInput) -> Option<AttemptTicket> {
        match input {
            IdentificationInput::ModelNumber(text) => {
                if text.trim().is_empty() {
                    return None;
                }
                self.set_model_number(text.clone());
            }
            IdentificationInput::Photo(photo) if photo.is_empty() => return None,
            _ => {}
        }

        if let Some(stale) = self.pending {
            tracing::info!("Identification attempt {stale} superseded");
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        self.method = Some(input.method());
        self.needs_retry = false;
        self.identified = false;
        self.photo_analysis = None;
        Some(AttemptTicket {
            generation: self.generation,
            method: input.method(),
        })
    }

    /// Apply the result of an attempt. Results of superseded attempts are ignored.
    pub fn finish(
        &mut self,
        ticket: AttemptTicket,
        result: Result<ProductId, NotRecognized>,
        store: &mut SessionStore,
    ) -> AttemptOutcome {
        if self.pending != Some(ticket.generation) {
            tracing::debug!("Dropping result of stale attempt {}", ticket.generation);
            return AttemptOutcome::Superseded;
        }
        self.pending = None;

        if ticket.method == IdentificationMethod::Photo {
            self.photo_analysis = Some(if result.is_ok() {
                PhotoAnalysis::Success
            } else {
                PhotoAnalysis::Warning
            });
        }

        match result {
            Ok(product_id) => {
                tracing::info!("Identified {product_id} via {}", ticket.method);
                store.set_identified_product(product_id.clone());
                self.identified = true;
                AttemptOutcome::Identified(product_id)
            }
            Err(e) => {
                tracing::info!("{e}; asking the user to retry");
                self.needs_retry = true;
                AttemptOutcome::NeedsRetry
            }
        }
    }

    /// "Try again": back to method selection, dropping any attempt in flight
    pub fn try_again(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}
