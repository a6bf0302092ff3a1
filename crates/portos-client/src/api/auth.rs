use portos_core::validation::{validate_login, validate_registration};
use portos_core::{AuthToken, Credentials, Registration, User};
use tracing::info;

use crate::error::ClientResult;
use crate::http::{Access, Request, StorefrontClient};
use crate::session::SessionInfo;

impl StorefrontClient {
    /// Logs in and starts a session. The token never leaves the session store.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<User> {
        validate_login(credentials)?;

        let request = Request::post("/login", Access::Public)
            .json(credentials)?
            .on_failure("Login failed");
        let auth: AuthToken = self.execute(request).await?;

        let user = auth.user.clone().unwrap_or_else(|| User {
            id: None,
            username: credentials.username.clone(),
            email: None,
        });
        self.session().begin(&auth.token, Some(user.clone())).await?;
        info!(username = %user.username, "Logged in");
        Ok(user)
    }

    /// Creates an account. Does not log in.
    pub async fn register(&self, form: &Registration, confirm_password: &str) -> ClientResult<()> {
        validate_registration(form, confirm_password)?;

        let request = Request::post("/register", Access::Public)
            .json(form)?
            .on_failure("Registration failed");
        self.execute_ack(request).await?;
        info!(username = %form.username, "Account registered");
        Ok(())
    }

    /// Ends the local session. The API has no logout endpoint.
    pub async fn logout(&self) -> ClientResult<()> {
        self.session().end().await
    }

    pub async fn whoami(&self) -> Option<SessionInfo> {
        self.session().info().await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ClientError;
    use crate::testing::MockApi;
    use portos_core::{Credentials, Registration};
    use serde_json::json;

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_starts_session() {
        let api = MockApi::start().await;
        api.respond(
            "POST",
            "/login",
            200,
            json!({"token": "Bearer tok-1", "user": {"id": 4, "username": "asha"}}),
        );
        let client = api.client();

        let user = client.login(&credentials("asha", "secret1")).await.unwrap();
        assert_eq!(user.id, Some(4));
        assert_eq!(client.session().bearer().await.as_deref(), Some("Bearer tok-1"));

        let seen = &api.requests()[0];
        assert_eq!(seen.body, json!({"username": "asha", "password": "secret1"}));
        assert_eq!(seen.authorization, None);

        client.logout().await.unwrap();
        assert!(client.whoami().await.is_none());
    }

    #[tokio::test]
    async fn test_login_without_user_uses_username() {
        let api = MockApi::start().await;
        api.respond("POST", "/login", 200, json!({"token": "tok"}));
        let client = api.client();

        let user = client.login(&credentials("ravi", "secret1")).await.unwrap();
        assert_eq!(user.username, "ravi");
        assert_eq!(client.whoami().await.unwrap().user.unwrap().username, "ravi");
    }

    #[tokio::test]
    async fn test_login_failure_uses_server_message() {
        let api = MockApi::start().await;
        api.respond("POST", "/login", 400, json!({"message": "Invalid credentials"}));
        let client = api.client();

        let err = client.login(&credentials("asha", "wrong-pw")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register_validates_before_sending() {
        let api = MockApi::start().await;
        let client = api.client();
        let form = Registration {
            username: "asha".into(),
            email: "asha@example.com".into(),
            password: "secret1".into(),
        };

        let err = client.register(&form, "secret2").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.requests().is_empty());

        api.respond_raw("POST", "/register", 201, "");
        client.register(&form, "secret1").await.unwrap();
        assert_eq!(api.requests()[0].body["email"], json!("asha@example.com"));
    }
}
