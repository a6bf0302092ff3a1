//! The `{ success, data, error, statusCode }` envelope front ends consume.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            status_code: None,
        }
    }

    pub fn failure(error: &ClientError) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.user_message()),
            status_code: error.status_code(),
        }
    }
}

impl<T> From<ClientResult<T>> for ApiResponse<T> {
    fn from(result: ClientResult<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response: ApiResponse<Vec<i64>> = Ok(vec![1, 2]).into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "data": [1, 2]})
        );
    }

    #[test]
    fn test_failure_envelope() {
        let response: ApiResponse<()> = Err(ClientError::NotFound("Cart item not found".into())).into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": false, "error": "Cart item not found", "statusCode": 404})
        );

        let response: ApiResponse<()> = Err(ClientError::Transport("reset".into())).into();
        assert_eq!(response.error.as_deref(), Some(crate::error::GENERIC_ERROR));
        assert_eq!(response.status_code, Some(500));
    }
}
