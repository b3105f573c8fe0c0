use super::{
    sessions::SessionStore,
    types::{
        ErrorResponse, GenerateRecipeRequest, SessionCreatedResponse, SessionResponse,
    },
};
use crate::{
    Error, Result as CrateResult,
    flow::{GenerationFlow, RefinementFlow},
    recipe::{
        EncodedImage, ImprovedRecipe, ImprovementRequest, RecipeSchema,
        schema::GENERATE_INPUT,
    },
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

const PHOTO_FIELD: &str = "photo";

#[derive(Clone)]
pub struct AppState {
    pub generation: GenerationFlow,
    pub refinement: RefinementFlow,
    pub sessions: Arc<SessionStore>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(e: Error) -> HandlerError {
    let status = match &e {
        Error::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Error::Read(_) | Error::InvalidDataUri(_) => StatusCode::BAD_REQUEST,
        Error::InvalidInput { .. } | Error::NoImageSelected => StatusCode::UNPROCESSABLE_ENTITY,
        Error::RequestInFlight => StatusCode::CONFLICT,
        Error::SchemaViolation { .. } => StatusCode::BAD_GATEWAY,
        Error::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.user_message(),
            kind: e.kind(),
        }),
    )
}

pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(request): Json<GenerateRecipeRequest>,
) -> Result<Json<RecipeSchema>, HandlerError> {
    GENERATE_INPUT
        .check_input(&request)
        .map_err(error_response)?;
    let photo = EncodedImage::from_data_uri(&request.photo_data_uri).map_err(error_response)?;
    info!("Received recipe request for a {} photo", photo.mime_type());

    let recipe = state
        .generation
        .generate(&photo)
        .await
        .map_err(error_response)?;
    Ok(Json(recipe))
}

pub async fn improve_recipe(
    State(state): State<AppState>,
    Json(request): Json<ImprovementRequest>,
) -> Result<Json<ImprovedRecipe>, HandlerError> {
    let improved = state
        .refinement
        .improve(&request)
        .await
        .map_err(error_response)?;
    Ok(Json(improved))
}

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let (id, _) = state.sessions.create(state.generation.clone()).await;
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: id.to_string(),
        }),
    )
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, HandlerError> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .map_err(error_response)?;
    let snapshot = session.controller.snapshot();

    Ok(Json(SessionResponse {
        session_id,
        has_image: snapshot.has_image,
        state: snapshot.state,
        notifications: session.notifications.recent(),
        updated_at: snapshot.updated_at,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    state
        .sessions
        .remove(&session_id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<StatusCode, HandlerError> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .map_err(error_response)?;

    match read_photo(&mut multipart).await {
        Ok(photo) => {
            session.controller.select_image(Some(photo));
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            session.controller.selection_failed(&e);
            Err(error_response(e))
        }
    }
}

async fn read_photo(multipart: &mut Multipart) -> CrateResult<EncodedImage> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::read(e.to_string()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| Error::read(e.to_string()))?;
        return EncodedImage::from_bytes(&mime_type, &bytes);
    }
    Err(Error::read(format!(
        "multipart field '{}' is missing",
        PHOTO_FIELD
    )))
}

pub async fn clear_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .map_err(error_response)?;
    session.controller.select_image(None);
    Ok(StatusCode::NO_CONTENT)
}

/// Admits the submission synchronously, then generates in the background;
/// clients poll the session for the outcome.
pub async fn submit(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .map_err(error_response)?;

    let ticket = session.controller.start().map_err(|e| {
        warn!("Submit rejected for session {}: {}", session_id, e);
        error_response(e)
    })?;

    let controller = session.controller.clone();
    tokio::spawn(async move {
        controller.finish(ticket).await;
    });

    Ok(StatusCode::ACCEPTED)
}
