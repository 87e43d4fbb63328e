use serde::Serialize;
use shared::{Product, ProductId, ReplacementPart, UpsellItem};

use super::Locale;
use crate::i18n::t;
use crate::state::SessionStore;
use crate::summary::{assembly_stats, AssemblyStats};

pub const PROMO_CODE: &str = "ASSEMBLY15";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteView {
    pub locale: Locale,
    pub title: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub stats: AssemblyStats,
    pub care_tips: Vec<String>,
    pub replacement_parts: Vec<ReplacementPart>,
    pub upsell: Vec<UpsellItem>,
    pub promo_code: &'static str,
    pub download_label: String,
    pub care_tips_label: String,
    pub replacement_parts_label: String,
}

pub fn render(store: &SessionStore, product: &Product) -> CompleteView {
    let lang = store.language();
    CompleteView {
        locale: Locale::of(lang),
        title: t(lang, "complete.title").to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        stats: assembly_stats(product, store.completed_steps()),
        care_tips: product.care_tips.clone(),
        replacement_parts: product.replacement_parts.clone(),
        upsell: product.upsell.clone(),
        promo_code: PROMO_CODE,
        download_label: t(lang, "complete.downloadSummary").to_string(),
        care_tips_label: t(lang, "complete.careTips").to_string(),
        replacement_parts_label: t(lang, "complete.replacementParts").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::{Preferences, SessionActions};

    #[test]
    fn test_complete_view_stats_and_upsell() {
        let product = fixtures::sample_product();
        let mut store = SessionStore::new(product.total_steps(), Preferences::default());
        for n in 1..=5 {
            store.complete_step(n).unwrap();
        }
        let view = render(&store, &product);
        assert!(view.stats.fully_completed);
        assert_eq!(view.stats.completion_rate, 100);
        assert_eq!(view.upsell.len(), 3);
        assert_eq!(view.promo_code, "ASSEMBLY15");
    }
}
