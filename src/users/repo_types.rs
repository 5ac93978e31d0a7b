use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record as persisted. Column names follow the wire format
/// (`birthDate`, `fullName`), so serde and sqlx share one camelCase mapping.
///
/// `password` is stored and compared as plaintext. That mirrors the system
/// this service stays compatible with; see README before deploying anywhere
/// that matters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub birth_date: String,
    pub full_name: String,
}
