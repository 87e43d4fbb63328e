//! Fixed chat-surface buttons. Each one changes the session once and posts one bot message.

use serde::{Deserialize, Serialize};
use shared::{ChatRole, MediaTab, Product};

use super::responder::numbered;
use crate::state::{SessionActions, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    ShowImage,
    ShowVideo,
    #[serde(rename = "show_3d")]
    Show3d,
    Tips,
}

impl QuickAction {
    pub fn all() -> &'static [QuickAction] {
        &[
            QuickAction::ShowImage,
            QuickAction::ShowVideo,
            QuickAction::Show3d,
            QuickAction::Tips,
        ]
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::ShowImage => "Show Image",
            QuickAction::ShowVideo => "Show Video",
            QuickAction::Show3d => "Show 3D",
            QuickAction::Tips => "Tips",
        }
    }
}

/// Run a quick action and return the bot message it posted.
pub fn apply_quick_action(
    action: QuickAction,
    store: &mut SessionStore,
    product: &Product,
) -> String {
    let message = match action {
        QuickAction::ShowImage => {
            store.set_active_media_tab(MediaTab::Image);
            "Switched to image view. You can see the visual guide for this step above.".to_string()
        }
        QuickAction::ShowVideo => {
            store.set_active_media_tab(MediaTab::Video);
            "Switched to video view. The video will show you exactly how to complete this step."
                .to_string()
        }
        QuickAction::Show3d => {
            store.set_active_media_tab(MediaTab::ThreeD);
            "Switched to 3D view. You can rotate and explore the model to better understand the assembly."
                .to_string()
        }
        QuickAction::Tips => {
            let step = store.current_step();
            let tips = product.step(step).map(|s| s.tips()).unwrap_or_default();
            if tips.is_empty() {
                format!(
                    "There are no extra tips for Step {step}. Follow the instructions above and take your time."
                )
            } else {
                format!("Here are the tips for Step {step}:\n{}", numbered(tips))
            }
        }
    };
    store.add_chat_message(ChatRole::Bot, message.clone());
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::Preferences;

    fn store_for(product: &Product) -> SessionStore {
        SessionStore::new(product.total_steps(), Preferences::default())
    }

    #[test]
    fn test_media_actions_switch_tab_and_post_once() {
        let product = fixtures::sample_product();
        let mut store = store_for(&product);

        for (action, tab) in [
            (QuickAction::ShowImage, MediaTab::Image),
            (QuickAction::ShowVideo, MediaTab::Video),
            (QuickAction::Show3d, MediaTab::ThreeD),
        ] {
            let before = store.transcript().len();
            apply_quick_action(action, &mut store, &product);
            assert_eq!(store.active_media_tab(), tab);
            assert_eq!(store.transcript().len(), before + 1);
            assert_eq!(store.transcript().last().unwrap().role, ChatRole::Bot);
        }
    }

    #[test]
    fn test_tips_lists_current_step_tips() {
        let product = fixtures::sample_product();
        let mut store = store_for(&product);
        store.set_current_step(2).unwrap();

        let message = apply_quick_action(QuickAction::Tips, &mut store, &product);
        assert!(message.starts_with("Here are the tips for Step 2:\n1. "));
        assert_eq!(store.transcript().len(), 1);
        assert_eq!(store.active_media_tab(), MediaTab::ThreeD);
    }

    #[test]
    fn test_tips_without_tips_still_posts_one_message() {
        let product = fixtures::product_without_extras(2);
        let mut store = store_for(&product);

        let message = apply_quick_action(QuickAction::Tips, &mut store, &product);
        assert!(message.starts_with("There are no extra tips for Step 1."));
        assert_eq!(store.transcript().len(), 1);
    }

    #[test]
    fn test_serde_names() {
        let action: QuickAction = serde_json::from_str("\"show_3d\"").unwrap();
        assert_eq!(action, QuickAction::Show3d);
        assert_eq!(serde_json::to_string(&QuickAction::Tips).unwrap(), "\"tips\"");
    }
}
