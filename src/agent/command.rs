use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::hub::{CommandHandler, CommandRequest, CommandResponse, StatusCode};

pub const TALK_TO_ME: &str = "talktome";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceData {
    #[serde(default)]
    pub name: String,
}

pub fn greeting(name: &str) -> String {
    format!("Howdy from Pi to {} !!!", name)
}

/// `talktome`: echoes the caller's name back inside a greeting.
///
/// A payload that is not a JSON object gets `BadRequest` with an empty body.
/// Nothing outside the response is touched.
pub fn talk_to_me(request: &CommandRequest) -> CommandResponse {
    debug!("Command: Received - {}", request.name);

    let incoming: DeviceData = match serde_json::from_slice(&request.payload) {
        Ok(data) => data,
        Err(e) => {
            debug!("Command input is invalid: {}.", e);
            return CommandResponse::empty(StatusCode::BadRequest);
        }
    };

    let reply = DeviceData {
        name: greeting(&incoming.name),
    };

    match serde_json::to_vec(&reply) {
        Ok(body) => CommandResponse::new(StatusCode::Completed, body),
        Err(e) => {
            debug!("Command reply could not be encoded: {}.", e);
            CommandResponse::empty(StatusCode::BadRequest)
        }
    }
}

pub fn talk_to_me_handler() -> CommandHandler {
    Arc::new(talk_to_me)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(payload: &str) -> CommandResponse {
        talk_to_me(&CommandRequest::new(TALK_TO_ME, payload))
    }

    #[test]
    fn greets_by_name() {
        let resp = call(r#"{"name":"Dave"}"#);
        assert_eq!(resp.status, StatusCode::Completed);
        let body: serde_json::Value = serde_json::from_slice(&resp.payload).unwrap();
        assert_eq!(body, json!({ "name": "Howdy from Pi to Dave !!!" }));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let resp = call(r#"{"name":"Ann","mood":"grumpy"}"#);
        let body: DeviceData = serde_json::from_slice(&resp.payload).unwrap();
        assert_eq!(body.name, "Howdy from Pi to Ann !!!");
    }

    #[test]
    fn missing_name_greets_nobody() {
        let resp = call("{}");
        assert_eq!(resp.status, StatusCode::Completed);
        let body: DeviceData = serde_json::from_slice(&resp.payload).unwrap();
        assert_eq!(body.name, "Howdy from Pi to  !!!");
    }

    #[test]
    fn malformed_payload_is_bad_request_without_body() {
        for payload in ["{\"name\":", "not json", "", "null", "[1,2]"] {
            let resp = call(payload);
            assert_eq!(resp.status, StatusCode::BadRequest, "payload {:?}", payload);
            assert!(resp.is_empty());
        }
    }
}
