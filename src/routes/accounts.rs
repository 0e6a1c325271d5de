use std::sync::LazyLock;

use axum::Json;
use axum::extract::{Path, Query, State};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{AccountResponse, Role};
use crate::state::SharedState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    pub about: Option<String>,
    #[serde(default)]
    pub role: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub account: AccountResponse,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
    pub accounts: Vec<AccountResponse>,
}

impl SignupRequest {
    /// Checks run in a fixed order: required/format fields first, then role
    /// membership, then password length. The first failure wins.
    pub fn validate(&self) -> Result<(), AppError> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require("email", &self.email)?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(AppError::validation(
                "email",
                "must be a valid email address",
            ));
        }
        require("phone", &self.phone)?;
        require("password", &self.password)?;
        require("role", &self.role)?;

        if self.role.parse::<Role>().is_err() {
            return Err(AppError::validation(
                "role",
                format!("must be one of: {}", Role::ALL.map(Role::as_str).join(", ")),
            ));
        }

        if self.password.len() < 8 {
            return Err(AppError::validation(
                "password",
                "must be at least 8 characters long",
            ));
        }

        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    Ok(())
}

pub async fn signup(
    State(state): State<SharedState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    // The plaintext is dropped with the request once hashed; it is never
    // stored or logged.
    let password_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    db::accounts::create(
        &state.pool,
        &req.first_name,
        &req.last_name,
        &req.email,
        &req.phone,
        &password_hash,
        req.about.as_deref(),
        &req.role,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("An account with this email already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(Json(MessageResponse {
        message: "Account created successfully".to_string(),
    }))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Unknown email and wrong password are indistinguishable to the caller.
    let account = db::accounts::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify(&req.password, &account.password_hash)
        .map_err(AppError::Internal)?;

    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        account: account.into(),
    }))
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, AppError> {
    // Absent or non-numeric values fall back to the defaults.
    let page = parse_param(params.page.as_deref()).unwrap_or(1).max(1);
    let page_size = parse_param(params.page_size.as_deref())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE)
        .max(1);
    let offset = (page - 1) * page_size;

    let accounts = db::accounts::list(&state.pool, page_size, offset).await?;

    Ok(Json(ListResponse {
        page,
        page_size,
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}

fn parse_param(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.parse().ok())
}

pub async fn get_by_id(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = db::accounts::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    Ok(Json(account.into()))
}
