use serde::Serialize;
use shared::{Product, ProductId, ReplacementPart, StepNumber};

use super::Locale;
use crate::i18n::t;
use crate::state::SessionStore;

/// Product summary shown before assembly starts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub locale: Locale,
    pub product_id: ProductId,
    pub product_name: String,
    pub estimated_time_min: u32,
    pub complexity: String,
    pub people_needed: u32,
    pub total_steps: StepNumber,
    pub tools: Vec<String>,
    pub care_tips: Vec<String>,
    pub replacement_parts: Vec<ReplacementPart>,
    pub start_label: String,
    pub chatbot_label: String,
    pub care_tips_label: String,
    pub replacement_parts_label: String,
}

pub fn render(store: &SessionStore, product: &Product) -> OverviewView {
    let lang = store.language();
    OverviewView {
        locale: Locale::of(lang),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        estimated_time_min: product.estimated_time_min,
        complexity: product.complexity.clone(),
        people_needed: product.people_needed,
        total_steps: product.total_steps(),
        tools: product.tools.clone(),
        care_tips: product.care_tips.clone(),
        replacement_parts: product.replacement_parts.clone(),
        start_label: t(lang, "overview.startAssembly").to_string(),
        chatbot_label: t(lang, "overview.openChatbot").to_string(),
        care_tips_label: t(lang, "overview.careTips").to_string(),
        replacement_parts_label: t(lang, "overview.replacementParts").to_string(),
    }
}
