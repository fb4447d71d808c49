use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use prlens_tools::{tool_definitions, ToolError, ToolResponse};

use super::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_tools() -> Json<Vec<Value>> {
    Json(tool_definitions())
}

/// Body is the argument object; an empty body means no arguments.
/// Tool failures are returned as failure envelopes with status 200.
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolResponse>, (StatusCode, String)> {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(e) => {
                let err = ToolError::invalid(format!("Request body is not valid JSON: {}", e));
                return Ok(Json(ToolResponse::failure(&err)));
            }
        }
    };

    let facade = state.facade.clone();
    let response = tokio::task::spawn_blocking(move || {
        let facade = facade
            .lock()
            .map_err(|_| "Tool facade lock poisoned".to_string())?;
        Ok::<_, String>(facade.invoke(&name, &arguments))
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e))?;

    Ok(Json(response))
}
