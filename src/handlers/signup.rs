use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::{error::AppError, models::signup::CreateSignupRequest};

/// Registers a visitor for the beta.
/// Requires a valid email and explicit consent.
pub async fn create_signup(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateSignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !payload.consent {
        return Err(AppError::BadRequest(
            "Please enter your email and confirm consent.".to_string(),
        ));
    }
    let payload = payload.normalized();
    payload.validate()?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO cms_signups (email, goal, experience)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&payload.email)
    .bind(&payload.goal)
    .bind(&payload.experience)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store signup: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("New beta signup {}", id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}
