use serde::Serialize;
use shared::{MediaTab, Product, Step, StepNumber};

use super::Locale;
use crate::chat::open_chat;
use crate::i18n::{t, t_with};
use crate::state::SessionStore;

pub const IMAGE_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=600&query=assembly step";
pub const VIDEO_PLACEHOLDER: &str = "/placeholder.mp4";

/// Assets for the three media tabs of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepMedia {
    pub image: String,
    pub video: String,
    pub highlight: Vec<String>,
    /// Exploded view requested by the step or toggled by the user
    pub exploded: bool,
}

impl StepMedia {
    fn of(step: &Step, exploded_view: bool) -> Self {
        Self {
            image: step
                .image
                .clone()
                .unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string()),
            video: step
                .video
                .clone()
                .unwrap_or_else(|| VIDEO_PLACEHOLDER.to_string()),
            highlight: step.three_d.highlight.clone(),
            exploded: step.three_d.exploded || exploded_view,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabLabel {
    pub tab: MediaTab,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideView {
    pub locale: Locale,
    /// "Step X of Y"
    pub step_label: String,
    pub step: StepNumber,
    pub total_steps: StepNumber,
    pub title: String,
    pub instruction: String,
    pub tips: Vec<String>,
    pub safety: Vec<String>,
    pub media: StepMedia,
    pub active_tab: MediaTab,
    pub tabs: Vec<TabLabel>,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub step_completed: bool,
    /// Completed steps as a rounded percentage
    pub progress_percent: u32,
    pub back_label: String,
    pub next_label: String,
    pub chat_open: bool,
}

pub fn render(store: &mut SessionStore, product: &Product, chat_open: bool) -> GuideView {
    if chat_open {
        open_chat(store);
    }

    let lang = store.language();
    let current = store.current_step();
    let total = product.total_steps();
    let is_last_step = current >= total;

    let (title, instruction, tips, safety, media) = match product.step(current) {
        Some(step) => (
            step.title.clone(),
            step.instruction.clone(),
            step.tips().to_vec(),
            step.safety().to_vec(),
            StepMedia::of(step, store.is_exploded_view()),
        ),
        None => (
            String::new(),
            String::new(),
            Vec::new(),
            Vec::new(),
            StepMedia {
                image: IMAGE_PLACEHOLDER.to_string(),
                video: VIDEO_PLACEHOLDER.to_string(),
                highlight: Vec::new(),
                exploded: store.is_exploded_view(),
            },
        ),
    };

    let progress_percent = if total == 0 {
        0
    } else {
        (store.completed_steps().len() as f64 / total as f64 * 100.0).round() as u32
    };

    GuideView {
        locale: Locale::of(lang),
        step_label: t_with(
            lang,
            "guide.stepOf",
            &[("current", current.to_string()), ("total", total.to_string())],
        ),
        step: current,
        total_steps: total,
        title,
        instruction,
        tips,
        safety,
        media,
        active_tab: store.active_media_tab(),
        tabs: [MediaTab::ThreeD, MediaTab::Video, MediaTab::Image]
            .into_iter()
            .map(|tab| TabLabel {
                tab,
                label: t(lang, &format!("guide.tabs.{}", tab.as_str())).to_string(),
            })
            .collect(),
        is_first_step: current == 1,
        is_last_step,
        step_completed: store.is_completed(current),
        progress_percent,
        back_label: t(lang, "common.back").to_string(),
        next_label: if is_last_step {
            t(lang, "guide.completeAssembly").to_string()
        } else {
            t(lang, "common.done").to_string()
        },
        chat_open: store.is_chat_open(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::{Preferences, SessionActions};

    fn store_for(product: &Product) -> SessionStore {
        SessionStore::new(product.total_steps(), Preferences::default())
    }

    #[test]
    fn test_first_step() {
        let product = fixtures::sample_product();
        let mut store = store_for(&product);
        let view = render(&mut store, &product, false);
        assert_eq!(view.step_label, "Step 1 of 5");
        assert!(view.is_first_step);
        assert!(!view.is_last_step);
        assert_eq!(view.next_label, "Done");
        assert_eq!(view.active_tab, MediaTab::ThreeD);
        assert!(!view.chat_open);
    }

    #[test]
    fn test_last_step_without_media_uses_placeholders() {
        let product = fixtures::sample_product();
        let mut store = store_for(&product);
        store.set_current_step(5).unwrap();
        let view = render(&mut store, &product, false);
        assert!(view.is_last_step);
        assert_eq!(view.next_label, "Complete Assembly");
        assert_eq!(view.media.image, IMAGE_PLACEHOLDER);
        assert_eq!(view.media.video, VIDEO_PLACEHOLDER);
        assert!(view.tips.is_empty());
    }

    #[test]
    fn test_chat_open_query_opens_chat_with_welcome() {
        let product = fixtures::sample_product();
        let mut store = store_for(&product);
        let view = render(&mut store, &product, true);
        assert!(view.chat_open);
        assert_eq!(store.transcript().len(), 1);

        // already open: nothing more is posted
        render(&mut store, &product, true);
        assert_eq!(store.transcript().len(), 1);
    }

    #[test]
    fn test_progress_and_exploded_toggle() {
        let product = fixtures::tiny_product();
        let mut store = store_for(&product);
        store.complete_step(1).unwrap();
        store.set_current_step(2).unwrap();

        let view = render(&mut store, &product, false);
        assert_eq!(view.progress_percent, 50);
        assert!(!view.step_completed);
        assert!(!view.media.exploded);

        store.toggle_exploded_view();
        assert!(render(&mut store, &product, false).media.exploded);
    }
}
