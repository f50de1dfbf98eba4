use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

pub async fn hello() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is working!",
        "timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}
