//! `{ "ok": true, ... }` success envelope

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        service: &'static str,
    }

    #[test]
    fn test_success_is_flattened() {
        let value = serde_json::to_value(ApiResponse::success(Payload { service: "gym-api" })).unwrap();
        assert_eq!(value, serde_json::json!({ "ok": true, "service": "gym-api" }));
    }
}
