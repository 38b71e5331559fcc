pub mod request {
    use super::response::Error;
    use serde_json::{Map, Value};
    use std::fmt;

    /// The invocation payload as received, before any field is trusted.
    #[derive(Debug, Clone, PartialEq)]
    pub struct InputMessage(Map<String, Value>);

    impl InputMessage {
        pub fn from_slice(raw: &[u8]) -> Result<Self, Error> {
            let value = serde_json::from_slice::<Value>(raw)
                .map_err(|err| Error::MalformedInput(err.to_string()))?;
            Self::from_value(value)
        }

        pub fn from_value(value: Value) -> Result<Self, Error> {
            let kind = match value {
                Value::Object(map) => return Ok(Self(map)),
                Value::Null => "null",
                Value::Bool(_) => "boolean",
                Value::Number(_) => "number",
                Value::String(_) => "string",
                Value::Array(_) => "array",
            };
            Err(Error::MalformedInput(format!(
                "expected a JSON object, got {}",
                kind
            )))
        }

        pub fn get(&self, key: &str) -> Option<&Value> {
            self.0.get(key)
        }

        /// `None` when the key is absent or holds anything but a string.
        pub fn get_str(&self, key: &str) -> Option<&str> {
            self.get(key).and_then(Value::as_str)
        }

        pub fn phone(&self) -> Result<&str, Error> {
            self.get_str("phone").ok_or(Error::InvalidRequest)
        }

        /// Any string phone is accepted as is; matching is left to upstream.
        pub fn into_payload(self) -> Result<Payload, Error> {
            Ok(Payload {
                phone: self.phone()?.to_string(),
            })
        }
    }

    impl fmt::Display for InputMessage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let raw = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
            f.write_str(&raw)
        }
    }

    #[derive(Debug)]
    pub struct Payload {
        pub phone: String,
    }
}

pub mod response {
    use crate::{
        modules::{notification::service::sms, user::repository::User},
        utils::graphql,
    };
    use serde_json::{json, Value};

    pub struct Success {
        pub user: User,
    }

    impl Success {
        /// The envelope is keyed by the function's name upstream.
        pub fn into_response(self) -> Value {
            json!({
                "send_otp": {
                    "user": self.user,
                }
            })
        }
    }

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("Input Json Unmarshal Error :{0}")]
        MalformedInput(String),
        #[error("Phone number not found invalid request")]
        InvalidRequest,
        #[error("Upstream request failed: {0}")]
        UpstreamError(#[from] graphql::Error),
        #[error("Could Not Find any User Using :{0}")]
        UserNotFound(String),
        #[error("Failed to deliver OTP: {0}")]
        DeliveryFailed(#[from] sms::Error),
        #[error("Invocation deadline exceeded")]
        DeadlineExceeded,
    }

    pub type Response = Result<Success, Error>;
}
