use tracing::{info, warn};

use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::models::{AuthResponse, LoginRequest, RegisterForm, User};
use crate::navigation::View;
use crate::settings::SettingsStore;
use crate::state::{Action, StateHandle};
use crate::MavigoClient;

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(MavigoError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    pub async fn login(&self, state: &impl StateHandle, email: &str, password: &str) -> Result<User> {
        require(email, "Email is required.")?;
        require(password, "Password is required.")?;
        let _guard = self.in_flight.begin(Action::Login)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth = self.api.login(&request).await?;
        Ok(self.install_session(state, auth))
    }

    pub async fn register(&self, state: &impl StateHandle, form: &RegisterForm) -> Result<User> {
        require(&form.display_name, "Name is required.")?;
        require(&form.email, "Email is required.")?;
        require(&form.password, "Password is required.")?;
        let _guard = self.in_flight.begin(Action::Register)?;

        let form = RegisterForm {
            display_name: form.display_name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            home_address: form
                .home_address
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        };
        let auth = self.api.register(&form).await?;
        Ok(self.install_session(state, auth))
    }

    fn install_session(&self, state: &impl StateHandle, auth: AuthResponse) -> User {
        let AuthResponse { user, token } = auth;
        self.settings.set_credentials(&user.id, &token);
        self.api.set_token(Some(token));
        info!(user_id = %user.id, "logged in");

        let installed = user.clone();
        state.update(|s| s.replace_user(user));
        self.set_view(state, View::Tasks);
        installed
    }

    /// Startup restore from persisted credentials. Never fails: anything
    /// short of a fetched user leaves the session logged out.
    pub async fn restore_session(&self, state: &impl StateHandle) -> Option<User> {
        let Some((user_id, token)) = self.settings.credentials() else {
            state.update(|s| s.clear_session());
            return None;
        };
        self.api.set_token(Some(token));

        match self.api.get_user(&user_id).await {
            Ok(user) => {
                info!(user_id = %user.id, "session restored");
                let restored = user.clone();
                state.update(|s| s.replace_user(user));
                Some(restored)
            }
            Err(err) => {
                if err.is_auth_required() {
                    warn!(user_id, "stored token rejected, discarding it");
                    self.settings.clear_token();
                } else {
                    warn!(user_id, error = %err, "session restore failed");
                }
                self.api.set_token(None);
                state.update(|s| s.clear_session());
                None
            }
        }
    }

    pub fn logout(&self, state: &impl StateHandle) {
        self.settings.clear_session();
        self.api.set_token(None);
        state.update(|s| s.clear_session());
        self.settings.set_last_view(View::Journey);
        info!("logged out");
    }

    pub async fn refresh_user(&self, state: &impl StateHandle) -> Result<User> {
        let user_id = state
            .read(|s| s.user_id().map(str::to_string))
            .ok_or(MavigoError::NotLoggedIn)?;
        let user = self.api.get_user(&user_id).await?;
        let refreshed = user.clone();
        state.update(|s| s.replace_user(user));
        Ok(refreshed)
    }
}
