use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::users as UsersTable;

#[derive(Serialize, Deserialize, Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = UsersTable)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = UsersTable)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
}
