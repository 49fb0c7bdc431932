//! In-memory reference implementation of the todo board API.
//!
//! Users, sessions and todos live in one `RwLock`ed store. Passwords are
//! compared as given; hashing and durable storage belong to a real backend.

pub mod error;
pub mod models;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

pub use error::ServerError;
pub use models::{AuthSession, Message, Todo, TodoInput, TodoStatus, TokenPair, User};

use models::{Credentials, LogoutRequest};

#[derive(Debug, Default)]
pub struct Store {
    /// Keyed by email.
    users: HashMap<String, User>,
    /// Keyed by refresh token.
    sessions: HashMap<String, AuthSession>,
    /// Access token → session id.
    access_tokens: HashMap<String, String>,
    /// Creation order.
    todos: Vec<Todo>,
}

impl Store {
    fn issue_tokens(&mut self, user_id: &str) -> TokenPair {
        let session = AuthSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            token: Uuid::new_v4().simple().to_string(),
            created_at: now_millis(),
        };
        let access_token = Uuid::new_v4().simple().to_string();
        self.access_tokens
            .insert(access_token.clone(), session.id.clone());
        let pair = TokenPair {
            access_token,
            refresh_token: session.token.clone(),
        };
        self.sessions.insert(session.token.clone(), session);
        pair
    }

    fn user_for_access_token(&self, token: &str) -> Option<&str> {
        let session_id = self.access_tokens.get(token)?;
        self.sessions
            .values()
            .find(|s| &s.id == session_id)
            .map(|s| s.user_id.as_str())
    }

    fn revoke(&mut self, refresh_token: &str) -> bool {
        let Some(session) = self.sessions.remove(refresh_token) else {
            return false;
        };
        self.access_tokens.retain(|_, sid| *sid != session.id);
        true
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/todo", get(list_todos).post(create_todo))
        .route("/todo/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The user owning the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl FromRequestParts<Db> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ServerError::Unauthorized)?;
        let store = db.read().await;
        store
            .user_for_access_token(token)
            .map(|id| CurrentUser(id.to_string()))
            .ok_or(ServerError::Unauthorized)
    }
}

async fn register(
    State(db): State<Db>,
    Json(creds): Json<Credentials>,
) -> Result<(StatusCode, Json<TokenPair>), ServerError> {
    let email = creds.email.trim().to_lowercase();
    if email.is_empty() || creds.password.is_empty() {
        return Err(ServerError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    let mut store = db.write().await;
    if store.users.contains_key(&email) {
        warn!(%email, "registration for existing email");
        return Err(ServerError::UserExists);
    }
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        password: creds.password,
    };
    let pair = store.issue_tokens(&user.id);
    info!(user_id = %user.id, "user registered");
    store.users.insert(email, user);
    Ok((StatusCode::CREATED, Json(pair)))
}

async fn login(
    State(db): State<Db>,
    Json(creds): Json<Credentials>,
) -> Result<Json<TokenPair>, ServerError> {
    let email = creds.email.trim().to_lowercase();
    let mut store = db.write().await;
    let user_id = match store.users.get(&email) {
        Some(user) if user.password == creds.password => user.id.clone(),
        _ => {
            warn!(%email, "login rejected");
            return Err(ServerError::InvalidCredentials);
        }
    };
    let pair = store.issue_tokens(&user_id);
    info!(%user_id, "user logged in");
    Ok(Json(pair))
}

/// Idempotent: unknown tokens are acknowledged too.
async fn logout(State(db): State<Db>, Json(req): Json<LogoutRequest>) -> Json<Message> {
    let revoked = db.write().await.revoke(&req.token);
    info!(revoked, "logout");
    Json(Message::new("Logged out"))
}

async fn list_todos(State(db): State<Db>, CurrentUser(user_id): CurrentUser) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(
        store
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect(),
    )
}

fn validate(input: &TodoInput) -> Result<(), ServerError> {
    if input.title.trim().is_empty() {
        return Err(ServerError::BadRequest("Title is required".to_string()));
    }
    if !(1..=5).contains(&input.priority) {
        return Err(ServerError::BadRequest(
            "Priority must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

async fn create_todo(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), ServerError> {
    validate(&input)?;
    let now = now_millis();
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        created_at: now,
        updated_at: now,
        deadline_date: input.deadline_date,
        status: input.status,
        priority: input.priority,
        color: input.color,
        user_id,
    };
    info!(id = %todo.id, user_id = %todo.user_id, "todo created");
    db.write().await.todos.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Full-document replace of the client-editable fields.
async fn update_todo(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<TodoInput>,
) -> Result<Json<Todo>, ServerError> {
    validate(&input)?;
    let mut store = db.write().await;
    let todo = store
        .todos
        .iter_mut()
        .find(|t| t.id == id && t.user_id == user_id)
        .ok_or(ServerError::TodoNotFound)?;
    todo.title = input.title;
    todo.description = input.description;
    todo.deadline_date = input.deadline_date;
    todo.status = input.status;
    todo.priority = input.priority;
    todo.color = input.color;
    todo.updated_at = now_millis().max(todo.created_at);
    info!(%id, status = ?todo.status, "todo updated");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    let mut store = db.write().await;
    let before = store.todos.len();
    store.todos.retain(|t| !(t.id == id && t.user_id == user_id));
    if store.todos.len() == before {
        return Err(ServerError::TodoNotFound);
    }
    info!(%id, "todo deleted");
    Ok(Json(Message::new("Todo deleted")))
}
