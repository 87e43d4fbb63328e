//! JSON command protocol for driving a guide session.
//!
//! Every user-facing action of the guide has a command here, so scripted
//! clients (the console runner, the HTTP service, tests) can replay a whole
//! session from JSON.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use shared::{Language, MediaTab, ProductId, StepNumber};

use crate::chat::QuickAction;
use crate::harness::GuideHarness;
use crate::navigation::StepTransition;
use crate::state::SessionActions;

/// A command a client can execute against a session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SessionCommand {
    SetLanguage {
        language: Language,
    },
    ToggleVoiceMode,
    SetListening {
        listening: bool,
    },
    ToggleChat,
    OpenChat,
    SetMediaTab {
        tab: MediaTab,
    },
    ToggleExplodedView,
    /// Jump to a step without completing anything
    GoToStep {
        step: StepNumber,
    },
    /// Mark the current step done and move on
    Advance,
    Retreat,
    /// Send a chat message and get the reply right away
    SendChat {
        text: String,
    },
    QuickAction {
        action: QuickAction,
    },
    FocusModelInput,
    SetModelNumber {
        text: String,
    },
    AcceptSuggestion,
    /// Back to identification method selection
    TryAgain,
    SetIdentifiedProduct {
        product_id: ProductId,
    },
    /// Render a route view, e.g. `/guide?chat=open`
    Render {
        route: String,
    },
    /// Start over; preferences are kept
    Reset,
    /// Inspect the session state.
    Inspect,
    /// Generate the assembly summary document.
    Summary,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_serialized<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(format!("Failed to serialize response: {e}")),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut GuideHarness, cmd: SessionCommand) -> CommandResponse {
    match cmd {
        SessionCommand::SetLanguage { language } => {
            harness.store.set_language(language);
            CommandResponse::ok_with_data(serde_json::json!({
                "language": language,
                "dir": language.direction(),
            }))
        }

        SessionCommand::ToggleVoiceMode => {
            harness.store.toggle_voice_mode();
            CommandResponse::ok_with_data(
                serde_json::json!({ "voice_mode": harness.store.voice_mode() }),
            )
        }

        SessionCommand::SetListening { listening } => {
            harness.store.set_listening(listening);
            CommandResponse::ok_with_data(
                serde_json::json!({ "listening": harness.store.is_listening() }),
            )
        }

        SessionCommand::ToggleChat => {
            harness.toggle_chat();
            CommandResponse::ok_with_data(
                serde_json::json!({ "chat_open": harness.store.is_chat_open() }),
            )
        }

        SessionCommand::OpenChat => {
            harness.open_chat();
            CommandResponse::ok_with_data(serde_json::json!({ "chat_open": true }))
        }

        SessionCommand::SetMediaTab { tab } => {
            harness.store.set_active_media_tab(tab);
            CommandResponse::ok()
        }

        SessionCommand::ToggleExplodedView => {
            harness.store.toggle_exploded_view();
            CommandResponse::ok_with_data(
                serde_json::json!({ "exploded_view": harness.store.is_exploded_view() }),
            )
        }

        SessionCommand::GoToStep { step } => match harness.go_to_step(step) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "current_step": step })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::Advance => match harness.advance() {
            Ok(transition @ StepTransition::Moved { .. }) => {
                CommandResponse::from_serialized(&transition)
            }
            Ok(StepTransition::AssemblyComplete) => CommandResponse::ok_with_data(serde_json::json!({
                "type": "assembly_complete",
                "redirect": "/complete",
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::Retreat => {
            let moved = harness.retreat();
            CommandResponse::ok_with_data(serde_json::json!({
                "moved": moved,
                "current_step": harness.store.current_step(),
            }))
        }

        SessionCommand::SendChat { text } => match harness.send_chat(&text) {
            Some(reply) => CommandResponse::ok_with_data(serde_json::json!({ "reply": reply })),
            None => CommandResponse::err("Message is empty"),
        },

        SessionCommand::QuickAction { action } => {
            let message = harness.quick_action(action);
            CommandResponse::ok_with_data(serde_json::json!({
                "message": message,
                "active_media_tab": harness.store.active_media_tab(),
            }))
        }

        SessionCommand::FocusModelInput => {
            harness.flow.focus_model_input();
            let suggestion = harness
                .flow
                .is_suggestion_visible()
                .then(|| harness.product().name.clone());
            CommandResponse::ok_with_data(serde_json::json!({ "suggestion": suggestion }))
        }

        SessionCommand::SetModelNumber { text } => {
            harness.flow.set_model_number(text);
            CommandResponse::ok_with_data(
                serde_json::json!({ "can_submit": harness.flow.can_submit_model() }),
            )
        }

        SessionCommand::AcceptSuggestion => {
            let name = harness.product().name.clone();
            harness.flow.accept_suggestion(&name);
            CommandResponse::ok_with_data(serde_json::json!({ "model_number": name }))
        }

        SessionCommand::TryAgain => {
            harness.flow.try_again();
            CommandResponse::ok()
        }

        SessionCommand::SetIdentifiedProduct { product_id } => {
            if harness.catalog.find(&product_id).is_none() {
                tracing::warn!("Identified product '{product_id}' is not in the catalog");
            }
            harness.store.set_identified_product(product_id);
            CommandResponse::ok()
        }

        SessionCommand::Render { route } => match harness.render_path(&route) {
            Ok(view) => CommandResponse::from_serialized(&view),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::Reset => {
            harness.reset();
            CommandResponse::ok()
        }

        SessionCommand::Inspect => CommandResponse::from_serialized(&harness.snapshot()),

        SessionCommand::Summary => {
            let doc = harness.summary(Local::now().date_naive(), Utc::now());
            CommandResponse::from_serialized(&doc)
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut GuideHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: SessionCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut GuideHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<SessionCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
