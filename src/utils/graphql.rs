use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to send GraphQL request: {0}")]
    Transport(String),
    #[error("GraphQL request timed out")]
    Timeout,
    #[error("unexpected http response status: {0}")]
    Status(StatusCode),
    #[error("failed to decode GraphQL response: {0}")]
    Decode(String),
    #[error("{0}")]
    Graphql(String),
    #[error("GraphQL response carried no data")]
    MissingData,
}

#[derive(Serialize)]
struct Request<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct Response<R> {
    data: Option<R>,
    errors: Option<Vec<GraphqlError>>,
}

/// GraphQL-over-HTTP client authenticated with a bearer token.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl Client {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn run<V, R>(&self, query: &str, variables: V) -> Result<R, Error>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&Request { query, variables })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    tracing::error!("GraphQL request to {} timed out", self.endpoint);
                    return Error::Timeout;
                }
                tracing::error!("Failed to send GraphQL request: {}", err);
                Error::Transport(err.to_string())
            })?;

        let status = res.status();

        if !status.is_success() {
            match res.text().await {
                Ok(data) => tracing::error!("Got unexpected http response status {}: {}", status, data),
                Err(err) => tracing::error!(
                    "Got unexpected http response status {} and failed to read body: {}",
                    status,
                    err
                ),
            }
            return Err(Error::Status(status));
        }

        let data = res.text().await.map_err(|err| {
            if err.is_timeout() {
                tracing::error!("Timed out reading GraphQL response body");
                return Error::Timeout;
            }
            tracing::error!("Failed to get GraphQL response body: {}", err);
            Error::Transport(err.to_string())
        })?;

        tracing::trace!("Response received from GraphQL server: {}", data);

        decode(&data)
    }
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, Error> {
    let response = serde_json::from_str::<Response<R>>(body).map_err(|err| {
        tracing::error!("Failed to decode GraphQL response: {}", err);
        Error::Decode(err.to_string())
    })?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .map(|err| err.message)
            .collect::<Vec<_>>()
            .join("; ");
        tracing::error!("Got an error from the GraphQL server: {}", message);
        return Err(Error::Graphql(message));
    }

    response.data.ok_or(Error::MissingData)
}
