pub mod quick_action;
pub mod responder;

use shared::ChatRole;

use crate::i18n::t;
use crate::state::{SessionActions, SessionStore};

pub use quick_action::{apply_quick_action, QuickAction};
pub use responder::{classify, respond, ChatContext, CyclingPicker, Intent, ReplyPicker, SeededPicker};

fn greet_if_empty(store: &mut SessionStore) {
    if store.is_chat_open() && store.transcript().is_empty() {
        let welcome = t(store.language(), "chatbot.welcome").to_string();
        store.add_chat_message(ChatRole::Bot, welcome);
    }
}

/// Open the chat panel. An empty transcript gets the welcome message.
pub fn open_chat(store: &mut SessionStore) {
    if !store.is_chat_open() {
        store.toggle_chat();
    }
    greet_if_empty(store);
}

/// Flip the chat panel, greeting on open like [`open_chat`].
pub fn toggle_chat_panel(store: &mut SessionStore) {
    store.toggle_chat();
    greet_if_empty(store);
}
