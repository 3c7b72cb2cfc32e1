//! services/flashify/src/adapters/user_api.rs
//!
//! The user client: account creation and login against `/user`. These are the
//! only calls made without a bearer token.

use async_trait::async_trait;
use flashify_core::{AuthGrant, LoginDetails, PortResult, SignupDetails, UserService};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{first_id, optional_id, HttpTransport};

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Serialize)]
struct SignupPayload<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Default)]
struct UserRecord {
    #[serde(default, deserialize_with = "optional_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "optional_id")]
    object_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// The body of a signup or login answer. The user id may sit at the top level,
/// in snake or camel case, or inside a nested `user` object.
#[derive(Deserialize)]
struct AuthRecord {
    token: String,
    #[serde(default, deserialize_with = "optional_id")]
    user_id: Option<String>,
    #[serde(default, rename = "userId", deserialize_with = "optional_id")]
    user_id_camel: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user: Option<UserRecord>,
}

impl AuthRecord {
    fn to_domain(self, fallback_email: &str) -> PortResult<AuthGrant> {
        let user = self.user.unwrap_or_default();
        let user_id = first_id(
            [self.user_id, self.user_id_camel, user.id, user.object_id],
            "auth",
        )?;

        Ok(AuthGrant {
            token: self.token,
            user_id,
            username: self.username.or(user.username).unwrap_or_default(),
            email: self
                .email
                .or(user.email)
                .unwrap_or_else(|| fallback_email.to_string()),
        })
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct UserApi {
    http: HttpTransport,
}

impl UserApi {
    pub fn new(http: HttpTransport) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UserService for UserApi {
    async fn signup(&self, details: &SignupDetails) -> PortResult<AuthGrant> {
        let payload = SignupPayload {
            username: &details.username,
            email: &details.email,
            password: &details.password,
        };
        let response = self
            .http
            .execute(self.http.request(Method::POST, "/user/signup").json(&payload))
            .await?;
        response.json::<AuthRecord>()?.to_domain(&details.email)
    }

    async fn login(&self, details: &LoginDetails) -> PortResult<AuthGrant> {
        let payload = LoginPayload {
            email: &details.email,
            password: &details.password,
        };
        let response = self
            .http
            .execute(self.http.request(Method::POST, "/user/login").json(&payload))
            .await?;
        response.json::<AuthRecord>()?.to_domain(&details.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashify_core::PortError;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(server: &Server) -> UserApi {
        UserApi::new(HttpTransport::new(&server.url()).unwrap())
    }

    #[tokio::test]
    async fn login_posts_credentials_without_auth_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/login")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({"email": "ada@example.com", "password": "pw"})))
            .with_status(200)
            .with_body(r#"{"token":"t-1","user_id":"u-1","username":"ada","email":"ada@example.com"}"#)
            .create_async()
            .await;

        let grant = client(&server)
            .login(&LoginDetails {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(grant.token, "t-1");
        assert_eq!(grant.user_id, "u-1");
        assert_eq!(grant.username, "ada");
    }

    #[tokio::test]
    async fn signup_accepts_a_nested_user_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/signup")
            .match_body(Matcher::Json(
                json!({"username": "grace", "email": "grace@example.com", "password": "pw"}),
            ))
            .with_status(201)
            .with_body(r#"{"token":"t-2","user":{"_id":42,"username":"grace"}}"#)
            .create_async()
            .await;

        let grant = client(&server)
            .signup(&SignupDetails {
                username: "grace".into(),
                email: "grace@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(grant.user_id, "42");
        assert_eq!(grant.username, "grace");
        assert_eq!(grant.email, "grace@example.com");
    }

    #[tokio::test]
    async fn duplicated_and_null_id_fields_are_tolerated() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_status(200)
            .with_body(
                r#"{"token":"t-4","user_id":null,"userId":"u-4","user":{"_id":"m-4","id":"u-4","email":null}}"#,
            )
            .create_async()
            .await;

        let grant = client(&server)
            .login(&LoginDetails {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(grant.user_id, "u-4");
        assert_eq!(grant.email, "ada@example.com");
        assert_eq!(grant.username, "");
    }

    #[tokio::test]
    async fn bad_credentials_surface_the_server_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid email or password"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .login(&LoginDetails {
                email: "ada@example.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();

        match err {
            PortError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_grant_without_user_id_is_a_schema_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_status(200)
            .with_body(r#"{"token":"t-3"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .login(&LoginDetails {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Schema(_)));
    }
}
