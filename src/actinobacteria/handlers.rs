use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{ActinobacteriaBody, Pagination},
    repo::Actinobacteria,
};
use crate::{
    auth::session::AuthUser,
    error::{ApiJson, ApiPath, ApiQuery, AppError},
    policy,
    state::AppState,
};

const KIND: &str = "Actinobacteria";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/actinobacterias",
            get(list_actinobacterias).post(create_actinobacteria),
        )
        .route(
            "/actinobacterias/:id",
            get(get_actinobacteria)
                .patch(update_actinobacteria)
                .delete(delete_actinobacteria),
        )
}

#[instrument(skip(state))]
pub async fn list_actinobacterias(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Vec<Actinobacteria>>, AppError> {
    let (limit, offset) = p.clamped();
    let rows = state
        .actinobacterias
        .list_by_user(user_id, limit, offset)
        .await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_actinobacteria(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Actinobacteria>, AppError> {
    let id = policy::parse_id(&id, KIND)?;
    let found = state.actinobacterias.find_by_id(id).await?;
    let record = policy::authorize(found, &auth, KIND)?;
    Ok(Json(record))
}

#[instrument(skip(state, body))]
pub async fn create_actinobacteria(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<ActinobacteriaBody>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Actinobacteria>), AppError> {
    let fields = body.validate()?;
    let record = state.actinobacterias.create(user_id, &fields).await?;
    info!(id = %record.id, %user_id, "actinobacteria created");

    let location = format!("/api/actinobacterias/{}", record.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)))
}

#[instrument(skip(state, body))]
pub async fn update_actinobacteria(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<ActinobacteriaBody>,
) -> Result<Json<Actinobacteria>, AppError> {
    let id = policy::parse_id(&id, KIND)?;
    let fields = body.validate()?;

    let found = state.actinobacterias.find_by_id(id).await?;
    policy::authorize(found, &auth, KIND)?;

    let updated = state
        .actinobacterias
        .update(id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{KIND} not found")))?;
    info!(%id, user_id = %auth.0, "actinobacteria updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_actinobacteria(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    let id = policy::parse_id(&id, KIND)?;
    let found = state.actinobacterias.find_by_id(id).await?;
    policy::authorize(found, &auth, KIND)?;

    if !state.actinobacterias.delete(id).await? {
        return Err(AppError::NotFound(format!("{KIND} not found")));
    }
    info!(%id, user_id = %auth.0, "actinobacteria deleted");
    Ok(StatusCode::NO_CONTENT)
}
