use serde::Serialize;
use crate::sessions::SessionToken;
use crate::utils::error::ActionError;
use crate::utils::validation::{RequestFields, validate_max_len};

pub const MAX_USERNAME_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct CredentialsInputArgs {
    pub username: String,
    pub password: String,
}

impl CredentialsInputArgs {
    /// The username is stored trimmed; the password is checked for blankness
    /// but kept exactly as typed.
    pub fn from_fields(fields: &RequestFields) -> Result<Self, ActionError> {
        let username = fields.trimmed("username");
        let password = fields
            .get("password")
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string);

        let (Some(username), Some(password)) = (username, password) else {
            return Err(ActionError::validation("Missing username or password"));
        };
        validate_max_len(&username, MAX_USERNAME_LEN, "Username")?;

        Ok(Self { username, password })
    }
}

#[derive(Debug)]
pub enum AccountsProcessorInput {
    Register(CredentialsInputArgs),
    Login(CredentialsInputArgs),
    Logout,
}

/// Session state the accounts processor reads and replaces.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub presented: Option<SessionToken>,
}

#[derive(Serialize, Debug, Clone)]
pub struct SignedInOutputArgs {
    pub username: String,
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<String>,
    #[serde(skip)]
    pub session: SessionToken,
}

#[derive(Debug)]
pub enum AccountsProcessorOutput {
    Register(SignedInOutputArgs),
    Login(SignedInOutputArgs),
    Logout,
}
