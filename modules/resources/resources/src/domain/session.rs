//! Signed-in staff session: bearer token plus the current user's profile.

use depot_utils::SecretString;
use parking_lot::RwLock;
use resources_sdk::{
    Credentials, Employee, ProfilePatch, ResourceError, ResourceGateway, ResourceId, ResourceKind,
    SessionGateway, UpdateRequest, UserData, decode,
};
use tracing::{debug, info, instrument};

#[derive(Clone)]
struct Session {
    token: SecretString,
    user: Option<UserData>,
}

/// Shared authentication state.
///
/// Read by the REST gateway on every request; written by login, logout and
/// profile edits of the signed-in user.
#[derive(Default)]
pub struct SessionContext {
    state: RwLock<Option<Session>>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context already holding `token`, with no user profile.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        Self {
            state: RwLock::new(Some(Session { token, user: None })),
        }
    }

    /// Sign in through `gateway` and keep the returned token and profile.
    ///
    /// # Errors
    /// `ValidationFailed` for blank credentials (nothing is sent), otherwise
    /// any error from [`SessionGateway::login`]. A failed login leaves the
    /// previous session in place.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(
        &self,
        gateway: &dyn SessionGateway,
        credentials: &Credentials,
    ) -> Result<Option<UserData>, ResourceError> {
        credentials.validate()?;
        let response = gateway.login(credentials).await?;
        if response.token.is_empty() {
            return Err(ResourceError::malformed("login response carries an empty token"));
        }
        let user = response.employee.map(UserData::from);
        *self.state.write() = Some(Session {
            token: response.token,
            user: user.clone(),
        });
        info!(user_id = user.as_ref().map(|u| u.id), "signed in");
        Ok(user)
    }

    pub fn logout(&self) {
        if self.state.write().take().is_some() {
            debug!("signed out");
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.state.read().as_ref().map(|s| s.token.clone())
    }

    #[must_use]
    pub fn user(&self) -> Option<UserData> {
        self.state.read().as_ref().and_then(|s| s.user.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_some()
    }

    /// Save a profile edit for employee `id`.
    ///
    /// When `id` is the signed-in user (or no profile is held yet) the stored
    /// profile is replaced with the server's answer.
    ///
    /// # Errors
    /// `Unauthenticated` without a session; `ValidationFailed` for an invalid
    /// patch; any gateway error otherwise.
    #[instrument(skip_all, fields(id = id))]
    pub async fn update_profile(
        &self,
        gateway: &dyn ResourceGateway,
        id: i64,
        patch: &ProfilePatch,
    ) -> Result<Employee, ResourceError> {
        if !self.is_authenticated() {
            return Err(ResourceError::Unauthenticated);
        }
        let request = UpdateRequest::from_patch(patch)?;
        let value = gateway
            .update(ResourceKind::Employees, &ResourceId::Numeric(id), request)
            .await?;
        let employee: Employee = decode(value)?;

        let mut state = self.state.write();
        if let Some(session) = state.as_mut() {
            let replace = session.user.as_ref().is_none_or(|u| u.id == employee.id);
            if replace {
                session.user = Some(UserData::from(employee.clone()));
                debug!("stored profile replaced");
            }
        }
        Ok(employee)
    }
}
