//! services/flashify/src/adapters/http.rs
//!
//! The shared HTTP transport used by every resource client. It owns the
//! `reqwest::Client` and the base URL, attaches the default headers and turns
//! transport faults and non-2xx answers into `PortError`s. It never retries.

use bytes::Bytes;
use flashify_core::{PortError, PortResult, Session};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// A response exactly as the server sent it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    /// Deserializes the body into an endpoint record.
    pub fn json<T: DeserializeOwned>(&self) -> PortResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| PortError::Schema(e.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`. A trailing slash is dropped.
    pub fn new(base_url: &str) -> PortResult<Self> {
        let client = Client::builder()
            .user_agent(format!("flashify/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Starts an unauthenticated request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Starts a request carrying the session's bearer token.
    pub fn authed(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.request(method, path).header(AUTHORIZATION, session.bearer())
    }

    /// Sends one request and returns the raw response if its status is 2xx.
    pub async fn execute(&self, request_builder: RequestBuilder) -> PortResult<ApiResponse> {
        let (client, request) = request_builder.build_split();
        let request = request.map_err(|e| PortError::Unexpected(format!("request build failed: {e}")))?;
        debug!(method = %request.method(), path = request.url().path(), "Sending request");

        let response = client
            .execute(request)
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Request rejected");
            return Err(PortError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status.as_u16(), &body),
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Picks the server's own explanation out of an error body when it has one.
fn rejection_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|field| value.get(field).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("Request failed with status code {status}"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Server ids arrive as strings or numbers. `null` reads as no id.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }),
    )
}

/// Reads an explicit `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Takes the first non-empty id among the candidates, in order.
pub(crate) fn first_id<const N: usize>(
    candidates: [Option<String>; N],
    record: &str,
) -> PortResult<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty())
        .ok_or_else(|| PortError::Schema(format!("{record} record carries no id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn rejection_message_prefers_server_fields() {
        assert_eq!(rejection_message(400, br#"{"message":"Name taken"}"#), "Name taken");
        assert_eq!(rejection_message(401, br#"{"error":"jwt expired"}"#), "jwt expired");
        assert_eq!(
            rejection_message(502, b"<html>Bad Gateway</html>"),
            "Request failed with status code 502"
        );
    }

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        label: String,
    }

    #[test]
    fn ids_and_nulls_decode_leniently() {
        let record: Record = serde_json::from_str(r#"{"id":7,"label":null}"#).unwrap();
        assert_eq!(record.id.as_deref(), Some("7"));
        assert_eq!(record.label, "");

        let record: Record = serde_json::from_str(r#"{"id":null}"#).unwrap();
        assert_eq!(record.id, None);
    }

    #[test]
    fn first_id_skips_missing_and_empty_candidates() {
        assert_eq!(
            first_id([None, Some(String::new()), Some("f1".into())], "folder").unwrap(),
            "f1"
        );
        assert!(matches!(
            first_id([None, None], "folder"),
            Err(PortError::Schema(message)) if message == "folder record carries no id"
        ));
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let http = HttpTransport::new("http://localhost:5000/").unwrap();
        assert_eq!(http.base_url(), "http://localhost:5000");
        assert_eq!(http.url("/folder/u1"), "http://localhost:5000/folder/u1");
        assert_eq!(http.url(""), "http://localhost:5000");
    }

    #[tokio::test]
    async fn raw_response_is_returned_unmodified() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .with_status(201)
            .with_body("  {\"odd\": [1,2]}  ")
            .create_async()
            .await;

        let http = HttpTransport::new(&server.url()).unwrap();
        let response = http.execute(http.request(Method::GET, "/ping")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 201);
        assert_eq!(&response.body[..], b"  {\"odd\": [1,2]}  ");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let http = HttpTransport::new("http://127.0.0.1:9").unwrap();
        let err = http
            .execute(http.request(Method::GET, "/anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Transport(_)));
    }
}
