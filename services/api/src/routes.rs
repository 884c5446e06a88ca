//! API routes
//!
//! Every response uses the `{success, message?, data?}` envelope. The
//! session middleware resolves a bearer token into a [`SessionContext`];
//! each handler states the identity it requires through the gate.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{bearer_token, session_middleware},
    models::{
        Envelope, LoginRequest, NewUser, PlayerProfile, PlayerProfileUpdate, ProfileUpdate,
        PublicUser, Role, SearchCriteria,
    },
    session::{SessionContext, SessionRecord},
    state::AppState,
};

/// Successful login payload
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal: PublicUser,
}

/// Session introspection payload
#[derive(Serialize)]
pub struct SessionInfo {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionRecord>,
}

/// One page of a filtered listing plus the total under the same filters
#[derive(Serialize)]
pub struct Listing {
    pub items: Vec<PublicUser>,
    pub total: i64,
}

/// Player detail: the Principal plus its profile row
#[derive(Serialize)]
pub struct PlayerDetail {
    pub player: PublicUser,
    pub profile: Option<PlayerProfile>,
}

/// Per-role account counts for the admin dashboard
#[derive(Serialize)]
pub struct RoleCounts {
    pub players: i64,
    pub scouts: i64,
    pub clubs: i64,
}

#[derive(Deserialize)]
pub struct RoleFilter {
    #[serde(default)]
    pub role: Option<String>,
}

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session_info))
        .route("/players", get(search_players))
        .route("/players/:id", get(get_player))
        .route("/players/:id/profile", put(update_player_profile))
        .route("/users/:id", put(update_user))
        .route("/scouts", get(list_scouts))
        .route("/admin/users", get(admin_list_users))
        .route("/admin/users/:id", delete(admin_delete_user))
        .route("/admin/stats", get(admin_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

/// Liveness plus store connectivity
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let session_store = state.sessions.health_check().await.unwrap_or(false);

    Ok(Json(Envelope::data(json!({
        "database": database,
        "session_store": session_store,
    }))))
}

/// Register a new Principal
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let principal = state.users.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("registration complete", principal)),
    ))
}

/// Verify credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if !state.login_limiter.check(&payload.identifier).await {
        return Err(ApiError::RateLimited);
    }

    let principal = state
        .users
        .authenticate(&payload.identifier, &payload.password)
        .await?;

    state.login_limiter.clear(&payload.identifier).await;

    let token = state.sessions.open(principal.id, principal.role).await?;

    Ok(Json(Envelope::data(LoginResponse { token, principal })))
}

/// Revoke the session behind the presented token
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthenticated)?;

    if state.sessions.revoke(token).await? {
        Ok(Json(Envelope::message("logged out")))
    } else {
        Err(ApiError::Unauthenticated)
    }
}

/// Report whether the presented token still maps to a live session
pub async fn session_info(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let session = match bearer_token(&headers) {
        Some(token) => state.sessions.peek(token).await?,
        None => None,
    };

    Ok(Json(Envelope::data(SessionInfo {
        valid: session.is_some(),
        session,
    })))
}

/// Filtered player search for scouts, clubs, and admins
pub async fn search_players(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(criteria): Query<SearchCriteria>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_role(&[Role::Scout, Role::Club, Role::Admin])?;

    let (items, total) = state.users.search(Some(Role::Player), &criteria).await?;

    Ok(Json(Envelope::data(Listing { items, total })))
}

/// Player detail including the profile row
pub async fn get_player(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_authenticated()?;

    let player = state
        .users
        .find_by_id(id)
        .await?
        .filter(|user| user.role == Role::Player)
        .ok_or(ApiError::NotFound)?;

    let profile = state.profiles.find_by_user(id).await?;

    Ok(Json(Envelope::data(PlayerDetail {
        player: player.into(),
        profile,
    })))
}

/// Replace the mutable profile fields of a Principal (self or admin)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_self_or_admin(id)?;

    let principal = state.users.update(id, &payload).await?;

    Ok(Json(Envelope::data(principal)))
}

/// Replace a player's profile row (self or admin)
pub async fn update_player_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlayerProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_self_or_admin(id)?;

    let profile = state.profiles.update(id, &payload).await?;

    Ok(Json(Envelope::data(profile)))
}

/// Scout listing for signed-in principals
pub async fn list_scouts(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(criteria): Query<SearchCriteria>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_authenticated()?;

    let (items, total) = state.users.search(Some(Role::Scout), &criteria).await?;

    Ok(Json(Envelope::data(Listing { items, total })))
}

/// Administrative listing across every role, optionally pinned to one
pub async fn admin_list_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(role_filter): Query<RoleFilter>,
    Query(criteria): Query<SearchCriteria>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_role(&[Role::Admin])?;

    let base_role = match role_filter
        .role
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
    {
        Some(raw) => Some(Role::parse(raw).ok_or_else(|| ApiError::Validation {
            field: "role",
            message: format!("unknown role: {raw}"),
        })?),
        None => None,
    };

    let (items, total) = state.users.search(base_role, &criteria).await?;

    Ok(Json(Envelope::data(Listing { items, total })))
}

/// Delete a Principal; the player profile is removed by cascade
pub async fn admin_delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_role(&[Role::Admin])?;

    if state.users.delete(id).await? {
        Ok(Json(Envelope::message("user deleted")))
    } else {
        Err(ApiError::NotFound)
    }
}

/// Per-role account counts
pub async fn admin_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<impl IntoResponse> {
    ctx.require_role(&[Role::Admin])?;

    let players = state.users.count_by_role(Role::Player).await?;
    let scouts = state.users.count_by_role(Role::Scout).await?;
    let clubs = state.users.count_by_role(Role::Club).await?;

    Ok(Json(Envelope::data(RoleCounts {
        players,
        scouts,
        clubs,
    })))
}
