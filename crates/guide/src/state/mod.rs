pub mod chat;
pub mod settings;

use std::collections::BTreeSet;

use shared::{ChatRole, Language, MediaTab, ProductId, StepNumber};

use crate::error::GuideError;
pub use chat::{ChatMessage, Transcript};
pub use settings::Preferences;

/// Named mutations of a guide session. This is the only way session state changes.
pub trait SessionActions {
    fn set_language(&mut self, language: Language);
    fn set_identified_product(&mut self, product_id: ProductId);
    fn set_current_step(&mut self, step: StepNumber) -> Result<(), GuideError>;
    fn complete_step(&mut self, step: StepNumber) -> Result<(), GuideError>;
    fn add_chat_message(&mut self, role: ChatRole, content: String) -> &ChatMessage;
    fn toggle_chat(&mut self);
    fn toggle_voice_mode(&mut self);
    fn set_listening(&mut self, listening: bool);
    fn set_active_media_tab(&mut self, tab: MediaTab);
    fn toggle_exploded_view(&mut self);
    fn reset_app(&mut self);
}

/// Session-scoped state of one user walking through the guide
#[derive(Debug)]
pub struct SessionStore {
    total_steps: StepNumber,
    language: Language,
    voice_mode: bool,
    listening: bool,
    identified_product: Option<ProductId>,
    current_step: StepNumber,
    completed_steps: BTreeSet<StepNumber>,
    transcript: Transcript,
    chat_open: bool,
    active_media_tab: MediaTab,
    exploded_view: bool,
    epoch: u64,
}

impl SessionStore {
    /// Fresh session for a guide with `total_steps` steps.
    pub fn new(total_steps: StepNumber, preferences: Preferences) -> Self {
        Self {
            total_steps,
            language: preferences.language,
            voice_mode: preferences.voice_mode,
            listening: false,
            identified_product: None,
            current_step: 1,
            completed_steps: BTreeSet::new(),
            transcript: Transcript::default(),
            chat_open: false,
            active_media_tab: MediaTab::default(),
            exploded_view: false,
            epoch: 0,
        }
    }

    fn check_step(&self, step: StepNumber) -> Result<(), GuideError> {
        if (1..=self.total_steps).contains(&step) {
            Ok(())
        } else {
            tracing::warn!("Rejected step {step} (guide has {} steps)", self.total_steps);
            Err(GuideError::StepOutOfRange {
                step,
                total: self.total_steps,
            })
        }
    }

    pub fn total_steps(&self) -> StepNumber {
        self.total_steps
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn voice_mode(&self) -> bool {
        self.voice_mode
    }

    /// Listening only counts while voice mode is on
    pub fn is_listening(&self) -> bool {
        self.voice_mode && self.listening
    }

    pub fn identified_product(&self) -> Option<&str> {
        self.identified_product.as_deref()
    }

    pub fn current_step(&self) -> StepNumber {
        self.current_step
    }

    /// Completed steps in ascending order
    pub fn completed_steps(&self) -> &BTreeSet<StepNumber> {
        &self.completed_steps
    }

    pub fn is_completed(&self, step: StepNumber) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn active_media_tab(&self) -> MediaTab {
        self.active_media_tab
    }

    pub fn is_exploded_view(&self) -> bool {
        self.exploded_view
    }

    /// Bumped by every reset. Deferred effects captured under an older
    /// epoch belong to a session that no longer exists.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            language: self.language,
            voice_mode: self.voice_mode,
        }
    }
}

impl SessionActions for SessionStore {
    fn set_language(&mut self, language: Language) {
        tracing::debug!("Language -> {language}");
        self.language = language;
    }

    fn set_identified_product(&mut self, product_id: ProductId) {
        tracing::debug!("Identified product -> {product_id}");
        self.identified_product = Some(product_id);
    }

    fn set_current_step(&mut self, step: StepNumber) -> Result<(), GuideError> {
        self.check_step(step)?;
        tracing::debug!("Current step -> {step}");
        self.current_step = step;
        Ok(())
    }

    fn complete_step(&mut self, step: StepNumber) -> Result<(), GuideError> {
        self.check_step(step)?;
        if self.completed_steps.insert(step) {
            tracing::debug!("Step {step} completed");
        }
        Ok(())
    }

    fn add_chat_message(&mut self, role: ChatRole, content: String) -> &ChatMessage {
        self.transcript.push(role, content)
    }

    fn toggle_chat(&mut self) {
        self.chat_open = !self.chat_open;
    }

    fn toggle_voice_mode(&mut self) {
        self.voice_mode = !self.voice_mode;
        self.listening = false;
    }

    fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
    }

    fn set_active_media_tab(&mut self, tab: MediaTab) {
        self.active_media_tab = tab;
    }

    fn toggle_exploded_view(&mut self) {
        self.exploded_view = !self.exploded_view;
    }

    fn reset_app(&mut self) {
        tracing::debug!("Session reset");
        self.epoch += 1;
        self.identified_product = None;
        self.current_step = 1;
        self.completed_steps.clear();
        self.transcript.clear();
        self.chat_open = false;
        self.active_media_tab = MediaTab::default();
        self.exploded_view = false;
        self.listening = false;
    }
}
