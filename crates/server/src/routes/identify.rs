use axum::extract::{Path, State};
use axum::response::Json;
use base64::Engine;
use sarmobi_guide_lib::identify::{AttemptOutcome, IdentificationInput, Photo};
use shared::{IdentificationMethod, IdentifyRequest, IdentifyResponse, IdentifyStatus};

use crate::error::ApiError;
use crate::AppState;

fn input_from_request(request: IdentifyRequest) -> Result<IdentificationInput, ApiError> {
    Ok(match request {
        IdentifyRequest::Qr { payload } => IdentificationInput::QrCode(payload),
        IdentifyRequest::Model { model_number } => IdentificationInput::ModelNumber(model_number),
        IdentifyRequest::Photo {
            file_name,
            content_base64,
        } => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(content_base64.trim())
                .map_err(|e| ApiError::BadRequest(format!("photo is not valid base64: {e}")))?;
            IdentificationInput::Photo(Photo { file_name, bytes })
        }
    })
}

/// Run one identification attempt. A newer attempt on the same session
/// supersedes this one while it is waiting on the recognition service.
pub async fn identify(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<IdentifyRequest>,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let input = input_from_request(request)?;
    let method = input.method();

    let Some(ticket) = state
        .with_session(&id, |h| h.begin_identification(&input))
        .await?
    else {
        return Ok(Json(IdentifyResponse {
            status: IdentifyStatus::Disabled,
            product_id: None,
            analysis: None,
        }));
    };

    let result = state.identifier.identify(&input).await;

    let (outcome, analysis) = state
        .with_session(&id, |h| {
            let outcome = h.finish_identification(ticket, result);
            let analysis = match (&outcome, method) {
                (AttemptOutcome::Superseded, _) => None,
                (_, IdentificationMethod::Photo) => h.flow.photo_analysis(),
                _ => None,
            };
            (outcome, analysis)
        })
        .await?;

    let response = match outcome {
        AttemptOutcome::Identified(product_id) => IdentifyResponse {
            status: IdentifyStatus::Identified,
            product_id: Some(product_id),
            analysis,
        },
        AttemptOutcome::NeedsRetry => IdentifyResponse {
            status: IdentifyStatus::NeedsRetry,
            product_id: None,
            analysis,
        },
        AttemptOutcome::Superseded => IdentifyResponse {
            status: IdentifyStatus::Superseded,
            product_id: None,
            analysis: None,
        },
    };
    Ok(Json(response))
}
