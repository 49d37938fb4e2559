use serde::Serialize;

/// Envelope every JSON endpoint answers with.
///
/// Absent `data` and `error` are omitted, so an acknowledgement serializes
/// as `{"success":true}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub const fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Id of a newly inserted row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

/// Rows affected by a bulk operation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn acknowledgement_has_no_payload() {
        let body = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(body, json!({ "success": true }));
    }

    #[test]
    fn failure_carries_message_only() {
        let body = serde_json::to_value(ApiResponse::<CountResponse>::error("Forbidden")).unwrap();
        assert_eq!(body, json!({ "success": false, "error": "Forbidden" }));
    }

    #[test]
    fn created_id_is_wrapped() {
        let body = serde_json::to_value(ApiResponse::success(CreatedResponse { id: 7 })).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "id": 7 } }));
    }
}
