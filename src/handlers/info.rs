use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Service banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Patients Management System API" }))
}

/// GET /about
/// Short service description
pub async fn about() -> Json<Value> {
    Json(json!({
        "message": "A fully functional API to manage your patient records"
    }))
}
