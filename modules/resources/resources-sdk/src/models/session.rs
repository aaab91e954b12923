use depot_utils::SecretString;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::records::Employee;
use super::timestamp::Timestamp;
use crate::error::ResourceError;

/// Staff login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    /// # Errors
    /// `ValidationFailed` when the email or password is blank.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.email.trim().is_empty() {
            return Err(ResourceError::validation("email", "is required"));
        }
        if self.password.is_empty() {
            return Err(ResourceError::validation("password", "is required"));
        }
        Ok(())
    }
}

/// Answer to a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: SecretString,
    pub message: Option<String>,
    pub employee: Option<Employee>,
}

/// The signed-in staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub role: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contactno: Option<String>,
    pub address: Option<String>,
    pub salary: Option<f64>,
    pub djoined: Option<Timestamp>,
}

impl From<Employee> for UserData {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            image: e.image,
            role: e.role,
            country: e.country,
            contactno: e.contactno,
            address: e.address,
            salary: e.salary,
            djoined: e.djoined,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::models::decode;
    use serde_json::json;

    #[test]
    fn login_response_keeps_token_secret() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "token": "eyJ.abc.def",
            "message": "Login successful",
            "employee": {"id": 3, "name": "Sam", "email": "sam@depot.example", "role": "Admin"}
        }))
        .unwrap();
        assert_eq!(resp.token.expose(), "eyJ.abc.def");
        assert!(!format!("{resp:?}").contains("eyJ"));

        let user = UserData::from(resp.employee.unwrap());
        assert_eq!(user.id, 3);
        assert_eq!(user.role.as_deref(), Some("Admin"));
    }

    #[test]
    fn login_without_token_is_an_error() {
        let parsed = decode::<LoginResponse>(json!({"message": "ok"}));
        assert!(matches!(parsed, Err(ResourceError::MalformedResponse { .. })));
    }

    #[test]
    fn credentials_require_both_fields() {
        let creds = Credentials::new("", SecretString::new("pw"));
        assert!(matches!(
            creds.validate(),
            Err(ResourceError::ValidationFailed { ref field, .. }) if field == "email"
        ));
        let creds = Credentials::new("a@b.c", SecretString::new(""));
        assert!(creds.validate().is_err());
        assert!(Credentials::new("a@b.c", SecretString::new("pw")).validate().is_ok());
    }
}
