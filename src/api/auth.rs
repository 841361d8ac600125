use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::{AuthCheck, Client, lenient::is_truthy},
    prelude::*,
    session::{User, UserPatch},
};

/// Account details as the login and session check endpoints return them.
#[derive(Debug, Deserialize)]
struct Account {
    #[serde(default)]
    user_id: Option<Value>,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    username: Option<String>,

    #[serde(default)]
    profile_image_url: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

impl Account {
    /// Signed-in user, if the response carries any user ID at all.
    fn into_user(self, email: Option<String>) -> Option<User> {
        let uid = match self.user_id.filter(|user_id| !user_id.is_null())? {
            Value::String(uid) => uid,
            uid => uid.to_string(),
        };
        Some(User {
            uid,
            email: email.or(self.email).filter(|email| !email.is_empty()),
            username: self.username.filter(|username| !username.is_empty()),
            image: self.profile_image_url.filter(|url| !url.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    #[serde(default)]
    success: bool,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

impl Client {
    /// Sign in and remember the user. Returns the backend's greeting.
    #[instrument(skip_all, fields(email = email))]
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<String> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
            remember: bool,
        }

        info!("signing in…");
        let account: Account = self
            .request(
                Method::POST,
                "/login",
                Some(&LoginRequest { email, password, remember }),
                AuthCheck::Bypass,
            )
            .await?
            .context("the backend returned an empty login response")?;
        let message = account.message.clone().unwrap_or_else(|| "Login successful!".to_string());
        let user = account
            .into_user(Some(email.to_string()))
            .context("the login response is missing the user ID")?;
        info!(uid = %user.uid, "signed in");
        self.session().set_user(user)?;
        Ok(message)
    }

    /// Create an account. The user still has to sign in afterwards.
    #[instrument(skip_all, fields(username = username, email = email))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        #[derive(Serialize)]
        struct RegisterRequest<'a> {
            username: &'a str,
            email: &'a str,
            password: &'a str,
        }

        info!("registering…");
        let response: Option<Acknowledgement> = self
            .request(
                Method::POST,
                "/register",
                Some(&RegisterRequest { username, email, password }),
                AuthCheck::Bypass,
            )
            .await?;
        Ok(response
            .and_then(|response| response.message)
            .unwrap_or_else(|| "Registration successful!".to_string()))
    }

    /// Verify the session against the backend and refresh the stored user.
    ///
    /// Any failure signs the user out.
    #[instrument(skip_all)]
    pub async fn check_session(&self) -> Result<bool> {
        match self.get::<Account>("/auth/check-session").await {
            Ok(account) => {
                if let Some(user) = account
                    .filter(|account| account.user_id.as_ref().is_some_and(is_truthy))
                    .and_then(|account| account.into_user(None))
                {
                    debug!(uid = %user.uid, "session is valid");
                    self.session().set_user(user)?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Err(error) => {
                warn!("invalid session: {error:#}");
                self.session().clear()?;
                Ok(false)
            }
        }
    }

    /// Forget the local session. The backend is not notified.
    pub fn logout(&self) -> Result {
        info!("signing out…");
        self.session().clear()
    }

    /// Update the profile on the backend and merge the change into the stored user.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, patch: &UserPatch) -> Result<User> {
        ensure!(self.session().user().is_some(), "User not found");
        let response: Option<Acknowledgement> =
            self.send(Method::PUT, "/user/profile", patch).await?;
        match response {
            Some(Acknowledgement { success: true, message, .. }) => {
                let user = self.session().update_user(patch)?;
                info!(
                    uid = %user.uid,
                    message = message.as_deref().unwrap_or("Profile updated successfully"),
                    "updated the profile",
                );
                Ok(user)
            }
            Some(Acknowledgement { error: Some(error), .. }) if !error.is_empty() => bail!(error),
            _ => bail!("Failed to update profile."),
        }
    }
}
