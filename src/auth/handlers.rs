use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        auth::AuthUser,
        jwt::generate_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    model::{
        role::Role,
        user::{UserDto, UserSql},
    },
    models::{AuthResponse, LoginReq, RegisterReq},
};

fn validate_register(req: &RegisterReq) -> Result<(), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !req.email.contains('@') || req.email.trim().is_empty() {
        return Err(ApiError::Validation("Please provide a valid email".into()));
    }
    if req.password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    if req.employee_id.trim().is_empty() {
        return Err(ApiError::Validation("Employee ID is required".into()));
    }
    if req.department.trim().is_empty() {
        return Err(ApiError::Validation("Department is required".into()));
    }
    Ok(())
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Validation failure or duplicate email/employee ID", body = Object, example = json!({
            "message": "User already exists with this email or employee ID"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(pool, config, req), fields(email = %req.email))]
pub async fn register(
    req: web::Json<RegisterReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    validate_register(&req)?;

    let role = req.role.unwrap_or(Role::Employee);
    let hashed = hash_password(&req.password)
        .map_err(|_| ApiError::Validation("Invalid password".into()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, password, role_id, employee_id, department)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(req.name.trim())
    .bind(req.email.trim())
    .bind(&hashed)
    .bind(role.as_id())
    .bind(req.employee_id.trim())
    .bind(req.department.trim())
    .execute(pool.get_ref())
    .await;

    let inserted = match result {
        Ok(res) => res,
        Err(e) => {
            // Unique key on email and on employee_id
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(ApiError::Conflict(
                        "User already exists with this email or employee ID".into(),
                    ));
                }
            }
            return Err(ApiError::store(e));
        }
    };

    let user_id = inserted.last_insert_id();
    info!(user_id, "user registered");

    let token = generate_token(
        user_id,
        req.email.trim(),
        role.as_id(),
        &config.jwt_secret,
        config.token_ttl,
    )
    .map_err(|_| ApiError::Store)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        user: UserDto {
            id: user_id,
            name: req.name.trim().to_owned(),
            email: req.email.trim().to_owned(),
            role,
            employee_id: req.employee_id.trim().to_owned(),
            department: req.department.trim().to_owned(),
        },
        token,
    }))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Bad credentials", body = Object, example = json!({
            "message": "Invalid email or password"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, req), fields(email = %req.email))]
pub async fn login(
    req: web::Json<LoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required".into()));
    }

    debug!("fetching user");

    let db_user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, name, email, password, role_id, employee_id, department
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(req.email.trim())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Auth("Invalid email or password".into()))?;

    if verify_password(&req.password, &db_user.password).is_err() {
        info!("password mismatch");
        return Err(ApiError::Auth("Invalid email or password".into()));
    }

    let token = generate_token(
        db_user.id,
        &db_user.email,
        db_user.role_id,
        &config.jwt_secret,
        config.token_ttl,
    )
    .map_err(|_| ApiError::Store)?;

    info!(user_id = db_user.id, "login successful");

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: UserDto::from_row(db_user),
        token,
    }))
}

/// Current user from the bearer token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let db_user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, name, email, password, role_id, employee_id, department
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Auth("User no longer exists".into()))?;

    Ok(HttpResponse::Ok().json(UserDto::from_row(db_user)))
}
