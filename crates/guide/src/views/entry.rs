use serde::Serialize;
use shared::Language;

use super::Locale;
use crate::i18n::t;
use crate::identify::IdentificationFlow;
use crate::state::{SessionActions, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub locale: Locale,
    pub title: String,
    pub start_label: String,
    pub languages: Vec<LanguageOption>,
    pub voice_mode: bool,
    /// Shown only while voice mode is listening
    pub listening_label: Option<String>,
}

/// Landing on the entry screen starts a fresh session.
pub fn render(store: &mut SessionStore, flow: &mut IdentificationFlow) -> EntryView {
    store.reset_app();
    flow.try_again();

    let lang = store.language();
    EntryView {
        locale: Locale::of(lang),
        title: t(lang, "home.title").to_string(),
        start_label: t(lang, "home.startButton").to_string(),
        languages: Language::all()
            .iter()
            .map(|l| LanguageOption {
                code: l.code(),
                name: l.native_name(),
                selected: *l == lang,
            })
            .collect(),
        voice_mode: store.voice_mode(),
        listening_label: store
            .is_listening()
            .then(|| t(lang, "home.listening").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Preferences;
    use shared::ChatRole;

    #[test]
    fn test_entry_resets_session() {
        let mut store = SessionStore::new(5, Preferences::default());
        let mut flow = IdentificationFlow::default();
        store.set_current_step(4).unwrap();
        store.add_chat_message(ChatRole::User, "hi".to_string());
        flow.set_model_number("closet");

        let view = render(&mut store, &mut flow);

        assert_eq!(store.current_step(), 1);
        assert!(store.transcript().is_empty());
        assert_eq!(flow.model_number(), "");
        assert_eq!(view.languages.len(), 4);
        assert!(view.languages[0].selected);
        assert!(view.listening_label.is_none());
    }

    #[test]
    fn test_listening_label_needs_voice_mode() {
        let mut store = SessionStore::new(5, Preferences::default());
        let mut flow = IdentificationFlow::default();
        store.toggle_voice_mode();
        store.set_listening(true);
        // reset clears listening
        let view = render(&mut store, &mut flow);
        assert!(view.voice_mode);
        assert!(view.listening_label.is_none());
    }
}
