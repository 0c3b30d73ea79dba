// src/handlers/school.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, store::DynStore};

/// Lists all schools, for the registration and login forms.
pub async fn list_schools(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    let schools = store.list_schools().await?;
    Ok(Json(schools))
}

/// Lists the classes of one school. 404 when the school does not exist.
pub async fn list_classes(
    State(store): State<DynStore>,
    Path(school_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if store.find_school(school_id).await?.is_none() {
        return Err(AppError::NotFound("Sekolah not found".to_string()));
    }

    let classes = store.list_classes(school_id).await?;
    Ok(Json(classes))
}
