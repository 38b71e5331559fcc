use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::utils::graphql;

type Result<T> = std::result::Result<T, graphql::Error>;

/// A user record as held by the upstream service. `data` is opaque to us.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// The two operations the OTP flow needs from the upstream user store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users whose phone equals `phone`, in upstream order.
    async fn find_by_phone(&self, phone: &str) -> Result<Vec<User>>;

    /// Sets the user's secret, returning the updated record.
    async fn update_secret(&self, id: &str, secret: &str) -> Result<Option<User>>;
}

const FIND_USER_BY_PHONE: &str = r#"
query FindUser($phone: String) {
  users(where: {phone: {eq: $phone}}) {
    id
    data {
      phone
    }
  }
}"#;

const UPDATE_USER_SECRET: &str = r#"
mutation UseOTPAsUserSecret($id: String!, $otp: String) {
  updateUser(_id: $id, payload: {secret: $otp}) {
    id
    data {
      phone
    }
  }
}"#;

#[derive(Deserialize)]
struct FindUserResponse {
    users: Option<Vec<User>>,
}

#[derive(Deserialize)]
struct UpdateUserResponse {
    #[serde(rename = "updateUser")]
    update_user: Option<User>,
}

/// [`UserDirectory`] backed by the Apito GraphQL API.
pub struct ApitoUserDirectory {
    client: graphql::Client,
}

impl ApitoUserDirectory {
    pub fn new(client: graphql::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserDirectory for ApitoUserDirectory {
    async fn find_by_phone(&self, phone: &str) -> Result<Vec<User>> {
        let response = self
            .client
            .run::<_, FindUserResponse>(FIND_USER_BY_PHONE, json!({ "phone": phone }))
            .await?;

        Ok(response.users.unwrap_or_default())
    }

    async fn update_secret(&self, id: &str, secret: &str) -> Result<Option<User>> {
        let response = self
            .client
            .run::<_, UpdateUserResponse>(UPDATE_USER_SECRET, json!({ "id": id, "otp": secret }))
            .await?;

        Ok(response.update_user)
    }
}
