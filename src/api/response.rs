use serde::Serialize;

/// `{ok: bool, ...data, error?}` envelope used by every JSON reply except the
/// bare `list`/`get` payloads.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_envelope_shapes() {
        #[derive(Serialize)]
        struct Created {
            id: i32,
        }

        assert_eq!(
            serde_json::to_value(ApiResponse::success(Created { id: 4 })).unwrap(),
            json!({"ok": true, "id": 4})
        );
        assert_eq!(serde_json::to_value(ApiResponse::<Value>::ok()).unwrap(), json!({"ok": true}));
        assert_eq!(
            serde_json::to_value(ApiResponse::<Value>::error("Not logged in")).unwrap(),
            json!({"ok": false, "error": "Not logged in"})
        );
    }
}
