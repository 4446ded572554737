use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, SignupRequest},
    password::{hash_password_blocking, verify_password_blocking},
    repo_types::{NewUser, User},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    validate::optional_text,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password_strength(field: &'static str, password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(
            field,
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn issue(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = state.keys.sign(user.id)?;
    Ok(AuthResponse {
        token,
        token_type: "Bearer",
        expires_in: state.keys.ttl().as_secs(),
        user: PublicUser::from(user),
    })
}

pub async fn register(state: &AppState, req: SignupRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::invalid("email", "is not a valid email address"));
    }
    check_password_strength("password", &req.password)?;

    let password_hash = hash_password_blocking(req.password).await?;
    let new_user = NewUser {
        email,
        password_hash,
        first_name: optional_text(req.first_name),
        last_name: optional_text(req.last_name),
    };
    let user = match state.users.create(new_user.clone()).await? {
        Some(u) => u,
        None => {
            warn!(email = %new_user.email, "email already registered");
            return Err(AppError::Conflict("email already registered".into()));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue(state, user)
}

/// Unknown email and wrong password produce the same error.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let ok = verify_password_blocking(req.password, user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    issue(state, user)
}

pub async fn profile(state: &AppState, user_id: Uuid) -> AppResult<PublicUser> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token refers to a missing user");
        AppError::NotFound
    })?;
    Ok(PublicUser::from(user))
}

pub async fn change_password(
    state: &AppState,
    user_id: Uuid,
    req: ChangePasswordRequest,
) -> AppResult<()> {
    check_password_strength("newPassword", &req.new_password)?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ok = verify_password_blocking(req.current_password, user.password_hash).await?;
    if !ok {
        warn!(user_id = %user_id, "password change with wrong current password");
        return Err(AppError::invalid("currentPassword", "is incorrect"));
    }

    let hash = hash_password_blocking(req.new_password).await?;
    if !state.users.update_password(user_id, &hash).await? {
        return Err(AppError::NotFound);
    }
    info!(user_id = %user_id, "password changed");
    Ok(())
}
