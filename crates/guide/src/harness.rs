//! Headless guide session.
//!
//! Bundles the catalog, the session store, the identify screen state and the
//! chat reply picker so a whole session can be driven without any UI. Used by
//! the JSON command protocol, the console runner, the HTTP service and tests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use shared::{Catalog, ChatRole, Language, MediaTab, Product, ProductId, StepNumber};

use crate::chat::{self, apply_quick_action, respond, ChatContext, CyclingPicker, QuickAction, ReplyPicker};
use crate::error::GuideError;
use crate::identify::{AttemptOutcome, AttemptTicket, IdentificationFlow, IdentificationInput, Identifier};
use crate::navigation::{self, StepTransition};
use crate::state::{ChatMessage, Preferences, SessionActions, SessionStore};
use crate::summary::{assembly_stats, generate_summary, summary_file_name, AssemblyStats};
use crate::views::{self, Route, UnknownRoute, View};

/// Plain-text summary ready for download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDocument {
    pub file_name: String,
    pub content: String,
}

/// Serializable copy of the session state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub language: Language,
    pub voice_mode: bool,
    pub listening: bool,
    pub identified_product: Option<ProductId>,
    pub current_step: StepNumber,
    pub total_steps: StepNumber,
    pub completed_steps: Vec<StepNumber>,
    pub chat_open: bool,
    pub active_media_tab: MediaTab,
    pub exploded_view: bool,
    pub transcript: Vec<ChatMessage>,
}

/// Headless guide session
pub struct GuideHarness {
    pub catalog: Catalog,
    pub store: SessionStore,
    pub flow: IdentificationFlow,
    picker: Box<dyn ReplyPicker>,
}

impl GuideHarness {
    /// Fresh session over `catalog` with default preferences.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_preferences(catalog, Preferences::default())
    }

    pub fn with_preferences(catalog: Catalog, preferences: Preferences) -> Self {
        let total = catalog.product().total_steps();
        Self {
            catalog,
            store: SessionStore::new(total, preferences),
            flow: IdentificationFlow::default(),
            picker: Box::new(CyclingPicker::default()),
        }
    }

    /// Replace the fallback reply picker.
    pub fn with_picker(mut self, picker: Box<dyn ReplyPicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn product(&self) -> &Product {
        self.catalog.product()
    }

    /// Back to a fresh session; preferences are kept.
    pub fn reset(&mut self) {
        self.store.reset_app();
        self.flow.try_again();
    }

    // ── Navigation ────────────────────────────────────────────

    pub fn advance(&mut self) -> Result<StepTransition, GuideError> {
        navigation::advance(&mut self.store)
    }

    pub fn retreat(&mut self) -> bool {
        navigation::retreat(&mut self.store)
    }

    pub fn go_to_step(&mut self, step: StepNumber) -> Result<(), GuideError> {
        navigation::go_to_step(&mut self.store, step)
    }

    // ── Chat ──────────────────────────────────────────────────

    pub fn open_chat(&mut self) {
        chat::open_chat(&mut self.store);
    }

    pub fn toggle_chat(&mut self) {
        chat::toggle_chat_panel(&mut self.store);
    }

    /// Append the user's message. Blank input is ignored and returns `false`.
    pub fn post_user_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.store.add_chat_message(ChatRole::User, text.to_string());
        true
    }

    /// Compute the bot reply to `text` from the current session and append it.
    pub fn reply_to(&mut self, text: &str) -> String {
        let ctx = ChatContext {
            current_step: self.store.current_step(),
            completed_count: self.store.completed_steps().len(),
            language: self.store.language(),
        };
        let reply = respond(text, &ctx, self.catalog.product(), self.picker.as_mut());
        self.store.add_chat_message(ChatRole::Bot, reply.clone());
        reply
    }

    /// Current reset epoch of the session store
    pub fn epoch(&self) -> u64 {
        self.store.epoch()
    }

    /// Answer `text` only if the session was not reset since `epoch`.
    /// A reply computed for a reset session is dropped.
    pub fn reply_if_current(&mut self, text: &str, epoch: u64) -> Option<String> {
        if self.store.epoch() != epoch {
            tracing::debug!("Dropping chat reply from epoch {epoch}");
            return None;
        }
        Some(self.reply_to(text))
    }

    /// Post a user message and answer it immediately.
    pub fn send_chat(&mut self, text: &str) -> Option<String> {
        if !self.post_user_message(text) {
            return None;
        }
        Some(self.reply_to(text.trim()))
    }

    pub fn quick_action(&mut self, action: QuickAction) -> String {
        apply_quick_action(action, &mut self.store, self.catalog.product())
    }

    // ── Identification ────────────────────────────────────────

    pub fn begin_identification(&mut self, input: &IdentificationInput) -> Option<AttemptTicket> {
        self.flow.begin(input)
    }

    pub fn finish_identification(
        &mut self,
        ticket: AttemptTicket,
        result: Result<ProductId, crate::identify::NotRecognized>,
    ) -> AttemptOutcome {
        self.flow.finish(ticket, result, &mut self.store)
    }

    /// Run a whole attempt. `None` when the input could not be submitted.
    pub async fn identify(
        &mut self,
        identifier: &dyn Identifier,
        input: IdentificationInput,
    ) -> Option<AttemptOutcome> {
        let ticket = self.begin_identification(&input)?;
        let result = identifier.identify(&input).await;
        Some(self.finish_identification(ticket, result))
    }

    // ── Views ─────────────────────────────────────────────────

    pub fn render(&mut self, route: Route) -> View {
        views::render(
            route,
            &mut self.store,
            &mut self.flow,
            self.catalog.product(),
        )
    }

    pub fn render_path(&mut self, path: &str) -> Result<View, UnknownRoute> {
        Ok(self.render(Route::parse(path)?))
    }

    // ── Completion ────────────────────────────────────────────

    pub fn stats(&self) -> AssemblyStats {
        assembly_stats(self.catalog.product(), self.store.completed_steps())
    }

    pub fn summary(&self, date: NaiveDate, now: DateTime<Utc>) -> SummaryDocument {
        SummaryDocument {
            file_name: summary_file_name(now),
            content: generate_summary(self.catalog.product(), self.store.completed_steps(), date),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        let store = &self.store;
        SessionSnapshot {
            language: store.language(),
            voice_mode: store.voice_mode(),
            listening: store.is_listening(),
            identified_product: store.identified_product().map(str::to_string),
            current_step: store.current_step(),
            total_steps: store.total_steps(),
            completed_steps: store.completed_steps().iter().copied().collect(),
            chat_open: store.is_chat_open(),
            active_media_tab: store.active_media_tab(),
            exploded_view: store.is_exploded_view(),
            transcript: store.transcript().messages().to_vec(),
        }
    }

    pub fn transcript_len(&self) -> usize {
        self.store.transcript().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_blank_chat_is_ignored() {
        let mut h = GuideHarness::new(fixtures::sample_catalog());
        assert_eq!(h.send_chat("   "), None);
        assert_eq!(h.transcript_len(), 0);
    }

    #[test]
    fn test_send_chat_appends_user_then_bot() {
        let mut h = GuideHarness::new(fixtures::sample_catalog());
        let reply = h.send_chat("which tools?").unwrap();
        assert!(reply.starts_with("You'll need these tools:"));

        let messages = h.store.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Bot);
        assert!(messages[0].id < messages[1].id);
    }

    #[test]
    fn test_reply_after_reset_is_dropped() {
        let mut h = GuideHarness::new(fixtures::sample_catalog());
        assert!(h.post_user_message("which tools?"));
        let epoch = h.epoch();

        h.render(Route::Entry);
        assert_eq!(h.reply_if_current("which tools?", epoch), None);
        assert_eq!(h.transcript_len(), 0);

        h.open_chat();
        let messages = h.store.transcript().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::Bot);
    }

    #[test]
    fn test_reply_in_same_epoch_is_posted() {
        let mut h = GuideHarness::new(fixtures::sample_catalog());
        h.post_user_message("which tools?");
        let epoch = h.epoch();
        assert!(h.reply_if_current("which tools?", epoch).is_some());
        assert_eq!(h.transcript_len(), 2);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut h = GuideHarness::new(fixtures::tiny_catalog());
        h.advance().unwrap();
        let snap = h.snapshot();
        assert_eq!(snap.current_step, 2);
        assert_eq!(snap.total_steps, 2);
        assert_eq!(snap.completed_steps, vec![1]);
    }

    #[test]
    fn test_summary_document() {
        let mut h = GuideHarness::new(fixtures::tiny_catalog());
        h.advance().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let now = DateTime::from_timestamp_millis(42).unwrap();
        let doc = h.summary(date, now);
        assert_eq!(doc.file_name, "sarmobi-assembly-summary-42.txt");
        assert!(doc.content.contains("Assembly Date: 1/2/2024"));
        assert!(doc.content.contains("1. Attach the sides"));
    }
}
