use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use futures::Stream;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use linkup_shared::constants::{
    DEFAULT_HISTORY_LIMIT, MAX_MESSAGE_LEN, TABLE_GROUPS, TABLE_GROUP_MEMBERS, TABLE_LOCATIONS,
    TABLE_MESSAGES, TABLE_USERS,
};
use linkup_shared::models::{Group, Location, Message, User};
use linkup_shared::types::{GroupId, Scope, UserId};
use linkup_store::{ChangeFilter, Database, GroupQuery, RealtimeHub};

use crate::config::ServerConfig;
use crate::error::ServerError;

const TABLES: [&str; 5] = [
    TABLE_LOCATIONS,
    TABLE_USERS,
    TABLE_GROUPS,
    TABLE_GROUP_MEMBERS,
    TABLE_MESSAGES,
];

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    /// Cloned out of the database so SSE streams never take the lock.
    pub hub: RealtimeHub,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let hub = db.hub().clone();
        Self {
            db: Arc::new(Mutex::new(db)),
            hub,
            config: Arc::new(config),
        }
    }

    /// Run `f` with the database locked. Never hold the lock across an await.
    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T, ServerError>) -> Result<T, ServerError> {
        let guard = self
            .db
            .lock()
            .map_err(|e| ServerError::Internal(format!("Lock poisoned: {e}")))?;
        f(&guard)
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .route("/locations", get(list_countries).post(create_location))
        .route("/locations/:country", get(list_states))
        .route("/locations/:country/:state", get(list_cities))
        .route("/users/:id", get(get_user).put(put_user))
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/:id", get(get_group))
        .route("/groups/:id/members", get(list_members).post(add_member))
        .route("/groups/:id/messages", get(list_messages).post(post_message))
        .route("/realtime", get(realtime))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ServerInfoResponse {
    name: String,
    version: &'static str,
    realtime_subscribers: usize,
}

#[derive(Serialize)]
struct CreatedResponse {
    created: bool,
}

#[derive(Serialize)]
struct JoinedResponse {
    joined: bool,
}

#[derive(Deserialize)]
struct GroupListQuery {
    scope: Option<String>,
    niche: Option<String>,
    search: Option<String>,
    #[serde(default)]
    public_only: bool,
}

#[derive(Deserialize)]
struct NewGroup {
    name: String,
    description: String,
    scope: Scope,
    niche: String,
    #[serde(default = "default_true")]
    is_public: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JoinRequest {
    user_id: UserId,
}

#[derive(Deserialize)]
struct PageQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

#[derive(Deserialize)]
struct NewMessage {
    author_id: UserId,
    author_name: String,
    content: String,
}

#[derive(Deserialize)]
struct RealtimeQuery {
    table: Option<String>,
    /// `column=eq.value`
    filter: Option<String>,
}

const TOTAL_COUNT_HEADER: &str = "x-total-count";

fn require(field: &str, value: &str) -> Result<(), ServerError> {
    if value.trim().is_empty() {
        return Err(ServerError::BadRequest(format!("'{field}' must not be blank")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        realtime_subscribers: state.hub.subscriber_count(),
    })
}

async fn list_countries(State(state): State<AppState>) -> Result<Json<Vec<String>>, ServerError> {
    let countries = state.with_db(|db| Ok(db.list_countries()?))?;
    Ok(Json(countries))
}

async fn list_states(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<String>>, ServerError> {
    let states = state.with_db(|db| Ok(db.list_states(&country)?))?;
    Ok(Json(states))
}

async fn list_cities(
    State(state): State<AppState>,
    Path((country, region)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ServerError> {
    let cities = state.with_db(|db| Ok(db.list_cities(&country, &region)?))?;
    Ok(Json(cities))
}

async fn create_location(
    State(state): State<AppState>,
    Json(location): Json<Location>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    require("country", &location.country)?;
    require("state", &location.state)?;
    require("city", &location.city)?;

    let created = state.with_db(|db| Ok(db.insert_location(&location)?))?;
    if created {
        info!(%location, "Location added");
    }
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(CreatedResponse { created })))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ServerError> {
    let user = state.with_db(|db| Ok(db.get_user(id)?))?;
    Ok(Json(user))
}

async fn put_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(user): Json<User>,
) -> Result<Json<User>, ServerError> {
    if user.id != id {
        return Err(ServerError::BadRequest("Body id does not match path".into()));
    }
    require("name", &user.name)?;

    state.with_db(|db| Ok(db.upsert_user(&user)?))?;
    info!(user = %user.id, "User stored");
    Ok(Json(user))
}

async fn list_groups(
    State(state): State<AppState>,
    Query(q): Query<GroupListQuery>,
) -> Result<Json<Vec<Group>>, ServerError> {
    let scope = match q.scope.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(
            s.parse::<Scope>()
                .map_err(|e| ServerError::BadRequest(e.to_string()))?,
        ),
    };
    let query = GroupQuery {
        scope,
        niche: q.niche.filter(|n| !n.trim().is_empty()),
        search: q.search.filter(|s| !s.trim().is_empty()),
        public_only: q.public_only,
    };

    let groups = state.with_db(|db| Ok(db.list_groups(&query)?))?;
    Ok(Json(groups))
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<NewGroup>,
) -> Result<(StatusCode, Json<Group>), ServerError> {
    require("name", &req.name)?;
    require("niche", &req.niche)?;

    let group = Group {
        id: GroupId::new(),
        name: req.name.trim().to_string(),
        description: req.description.trim().to_string(),
        member_count: 0,
        scope: req.scope,
        niche: req.niche.trim().to_string(),
        is_public: req.is_public,
        created_at: Utc::now(),
    };

    state.with_db(|db| Ok(db.insert_group(&group)?))?;
    info!(group = %group.id, name = %group.name, "Group created");
    Ok((StatusCode::CREATED, Json(group)))
}

async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
) -> Result<Json<Group>, ServerError> {
    let group = state.with_db(|db| Ok(db.get_group(id)?))?;
    Ok(Json(group))
}

async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
) -> Result<Json<Vec<UserId>>, ServerError> {
    let members = state.with_db(|db| {
        db.get_group(id)?;
        Ok(db.list_members(id)?)
    })?;
    Ok(Json(members))
}

async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinedResponse>, ServerError> {
    let joined = state.with_db(|db| Ok(db.add_member(id, req.user_id)?))?;
    if joined {
        info!(group = %id, user = %req.user_id, "Member added");
    }
    Ok(Json(JoinedResponse { joined }))
}

/// A page of history, oldest first. `x-total-count` carries the group's
/// full message count for paging.
async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
    Query(page): Query<PageQuery>,
) -> Result<([(&'static str, String); 1], Json<Vec<Message>>), ServerError> {
    let limit = page.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let offset = page.offset.unwrap_or(0);

    let (total, messages) = state.with_db(|db| {
        db.get_group(id)?;
        Ok((
            db.count_messages(id)?,
            db.get_messages_for_group(id, limit, offset)?,
        ))
    })?;
    Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(messages)))
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
    Json(req): Json<NewMessage>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    require("content", &req.content)?;
    require("author_name", &req.author_name)?;
    let content = req.content.trim();
    let len = content.chars().count();
    if len > MAX_MESSAGE_LEN {
        return Err(ServerError::BadRequest(format!(
            "Message is {len} characters (max {MAX_MESSAGE_LEN})"
        )));
    }

    let message = Message::new(id, req.author_id, req.author_name.trim(), content);
    state.with_db(|db| Ok(db.insert_message(&message)?))?;

    info!(msg_id = %message.id, group = %id, "Message stored");
    Ok((StatusCode::CREATED, Json(message)))
}

/// Server-sent events for row changes on one table, optionally filtered.
async fn realtime(
    State(state): State<AppState>,
    Query(q): Query<RealtimeQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ServerError> {
    let table = q.table.unwrap_or_else(|| TABLE_MESSAGES.to_string());
    if !TABLES.contains(&table.as_str()) {
        return Err(ServerError::BadRequest(format!("Unknown table '{table}'")));
    }
    let filter = q.filter.as_deref().map(ChangeFilter::parse).transpose()?;

    info!(%table, filter = ?filter, "Realtime subscriber connected");
    let subscription = state.hub.subscribe(&table, filter);

    let stream = futures::stream::unfold(subscription, |mut sub| async move {
        let change = sub.recv().await?;
        let event = Event::default().event(change.table.clone()).json_data(&change);
        Some((event, sub))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
