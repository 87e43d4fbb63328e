use serde::Serialize;
use shared::{IdentificationMethod, PhotoAnalysis, Product, ProductId};

use super::Locale;
use crate::i18n::t;
use crate::identify::IdentificationFlow;
use crate::state::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifiedProduct {
    pub id: ProductId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifyView {
    pub locale: Locale,
    pub title: String,
    pub scan_label: String,
    pub enter_model_label: String,
    pub model_placeholder: String,
    pub upload_photo_label: String,
    pub method: Option<IdentificationMethod>,
    pub model_number: String,
    pub suggestion: Option<String>,
    pub can_submit_model: bool,
    pub scanning: bool,
    pub analyzing: bool,
    pub photo_analysis: Option<PhotoAnalysis>,
    /// Success or retry notice for the last finished attempt
    pub status_message: Option<String>,
    pub identified_product: Option<IdentifiedProduct>,
}

pub fn render(store: &SessionStore, flow: &IdentificationFlow, product: &Product) -> IdentifyView {
    let lang = store.language();
    let identified_product = store
        .identified_product()
        .filter(|id| id.eq_ignore_ascii_case(&product.id))
        .map(|_| IdentifiedProduct {
            id: product.id.clone(),
            name: product.name.clone(),
        });

    let status_message = if flow.is_identified() {
        Some(t(lang, "identify.success").to_string())
    } else if flow.needs_retry() {
        Some(t(lang, "identify.retry").to_string())
    } else {
        None
    };

    IdentifyView {
        locale: Locale::of(lang),
        title: t(lang, "identify.title").to_string(),
        scan_label: t(lang, "identify.scanButton").to_string(),
        enter_model_label: t(lang, "identify.enterModel").to_string(),
        model_placeholder: t(lang, "identify.modelPlaceholder").to_string(),
        upload_photo_label: t(lang, "identify.uploadPhoto").to_string(),
        method: flow.method(),
        model_number: flow.model_number().to_string(),
        suggestion: flow
            .is_suggestion_visible()
            .then(|| product.name.clone()),
        can_submit_model: flow.can_submit_model(),
        scanning: flow.is_scanning(),
        analyzing: flow.is_analyzing(),
        photo_analysis: flow.photo_analysis(),
        status_message,
        identified_product,
    }
}
