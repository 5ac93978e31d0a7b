use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Incoming body for register and update. Deserialization already rejects
/// missing fields; `validate` covers empty values and the email format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    pub password: String,
    pub email: String,
    pub birth_date: String,
    pub full_name: String,
}

impl UserPayload {
    /// Required-field and email-format checks; runs before any store access.
    pub fn validate(&self) -> Result<(), &'static str> {
        let filled = [
            &self.username,
            &self.password,
            &self.email,
            &self.birth_date,
            &self.full_name,
        ]
        .iter()
        .all(|field| !field.is_empty());

        if !filled || !is_valid_email(&self.email) {
            return Err("Invalid input data");
        }
        Ok(())
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Non-password projection returned by the list endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub birth_date: String,
    pub full_name: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            birth_date: user.birth_date,
            full_name: user.full_name,
        }
    }
}
