use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UpdateUserRequest},
        repo_types::{Projection, User},
        services,
        session::{AuthUser, SessionContext},
    },
    error::{ApiJson, ApiPath, AppError},
    policy,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_authenticated_user))
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/:user_id", patch(update_user))
        .route("/users/verify/:user_id/:token", get(verify_account))
}

#[instrument(skip(state))]
pub async fn get_authenticated_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .find_by_id(user_id, Projection::WithEmail)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

#[instrument(skip(state, session, payload))]
pub async fn signup(
    State(state): State<AppState>,
    session: SessionContext,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let account = payload.validate()?;
    let (user, token) =
        services::register(state.users.as_ref(), state.tokens.as_ref(), &account).await?;

    services::send_verification_email(
        state.mailer.as_ref(),
        &state.config.base_url,
        &account.email,
        &token,
    )
    .await;

    session.login(user.id).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: SessionContext,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let creds = payload.validate()?;
    let user = services::authenticate(state.users.as_ref(), &creds).await?;
    session.login(user.id).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(session))]
pub async fn logout(session: SessionContext) -> Result<StatusCode, AppError> {
    session.logout().await?;
    info!("session destroyed");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user_id = policy::parse_id(&user_id, "User")?;
    let found = state.users.find_by_id(user_id, Projection::Default).await?;
    let user = policy::authorize(found, &auth, "User")?;

    let updated = services::update_profile(state.users.as_ref(), user, &payload).await?;
    info!(user_id = %updated.id, "user updated");
    Ok(Json(updated))
}

#[instrument(skip(state, token))]
pub async fn verify_account(
    State(state): State<AppState>,
    ApiPath((user_id, token)): ApiPath<(String, String)>,
) -> Result<StatusCode, AppError> {
    // A malformed id can never match a user, so it is reported as such.
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| AppError::NotFound("User not found".into()))?;

    services::redeem(
        state.users.as_ref(),
        state.tokens.as_ref(),
        user_id,
        &token,
        state.config.verification_token_ttl(),
    )
    .await?;
    Ok(StatusCode::OK)
}
