// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account queries.

use resolvenow_core::ResolveError;
use resolvenow_core::types::{Page, PageRequest, ProfileUpdate, Role, User, UserFilter, timestamp_now};
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::database::{Database, map_tr_err};
use crate::queries::{Conditions, parse_column};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_active, phone, address, \
                            last_login, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: parse_column(row, 4)?,
        is_active: row.get(5)?,
        phone: row.get(6)?,
        address: row.get(7)?,
        last_login: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub(crate) fn fetch_user(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        user_from_row,
    )
    .optional()
}

/// Insert a user unless the email is taken. Returns whether a row was written.
pub async fn insert_user(db: &Database, user: &User) -> Result<bool, ResolveError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO users (id, name, email, password_hash, role, is_active, phone, \
                 address, last_login, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(email) DO NOTHING",
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.password_hash,
                    user.role.to_string(),
                    user.is_active,
                    user.phone,
                    user.address,
                    user.last_login,
                    user.created_at,
                    user.updated_at,
                ],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, ResolveError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| fetch_user(conn, &id))
        .await
        .map_err(map_tr_err)
}

pub async fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>, ResolveError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Users matching `filter`, newest first.
pub async fn list_users(
    db: &Database,
    filter: &UserFilter,
    page: PageRequest,
) -> Result<Page<User>, ResolveError> {
    let mut conditions = Conditions::default();
    if let Some(role) = filter.role {
        conditions.push("role = ?", role.to_string());
    }
    if let Some(active) = filter.is_active {
        conditions.push("is_active = ?", active);
    }

    db.connection()
        .call(move |conn| {
            let where_sql = conditions.where_sql();
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM users{where_sql}"),
                params_from_iter(conditions.values()),
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users{where_sql}
                 ORDER BY created_at DESC, rowid DESC LIMIT {} OFFSET {}",
                page.limit,
                page.offset()
            ))?;
            let items = stmt
                .query_map(params_from_iter(conditions.values()), user_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(Page {
                items,
                total: total as u64,
                request: page,
            })
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_active_agents(db: &Database) -> Result<Vec<User>, ResolveError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE role = 'agent' AND is_active = 1 ORDER BY name"
            ))?;
            let agents = stmt
                .query_map([], user_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(agents)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_users(db: &Database, role: Role) -> Result<u64, ResolveError> {
    let role = role.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE role = ?1",
                params![role],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply the present fields of `update`. `None` when the user does not exist.
pub async fn update_profile(
    db: &Database,
    id: &str,
    update: &ProfileUpdate,
) -> Result<Option<User>, ResolveError> {
    let id = id.to_string();
    let update = update.clone();
    let now = timestamp_now();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users SET
                    name = COALESCE(?1, name),
                    phone = COALESCE(?2, phone),
                    address = COALESCE(?3, address),
                    updated_at = ?4
                 WHERE id = ?5",
                params![update.name, update.phone, update.address, now, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_user(conn, &id)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_role(db: &Database, id: &str, role: Role) -> Result<Option<User>, ResolveError> {
    set_column(db, id, "role", role.to_string().into()).await
}

pub async fn set_active(db: &Database, id: &str, active: bool) -> Result<Option<User>, ResolveError> {
    set_column(db, id, "is_active", active.into()).await
}

async fn set_column(
    db: &Database,
    id: &str,
    column: &'static str,
    value: rusqlite::types::Value,
) -> Result<Option<User>, ResolveError> {
    let id = id.to_string();
    let now = timestamp_now();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                &format!("UPDATE users SET {column} = ?1, updated_at = ?2 WHERE id = ?3"),
                params![value, now, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_user(conn, &id)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn record_login(db: &Database, id: &str, at: &str) -> Result<(), ResolveError> {
    let id = id.to_string();
    let at = at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET last_login = ?1 WHERE id = ?2",
                params![at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use resolvenow_core::types::new_id;

    pub(crate) fn make_user(email: &str, role: Role) -> User {
        let now = timestamp_now();
        User {
            id: new_id(),
            name: email.split('@').next().unwrap_or("someone").to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$placeholder".to_string(),
            role,
            is_active: true,
            phone: None,
            address: None,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_by_id_and_email() {
        let db = Database::open_in_memory().await.unwrap();
        let user = make_user("ada@example.com", Role::User);
        assert!(insert_user(&db, &user).await.unwrap());

        let by_id = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");
        assert_eq!(by_id.role, Role::User);
        assert_eq!(by_id.password_hash, user.password_hash);

        let by_email = get_user_by_email(&db, "ada@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);
        assert!(get_user(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_not_inserted() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(insert_user(&db, &make_user("dup@example.com", Role::User)).await.unwrap());
        assert!(!insert_user(&db, &make_user("dup@example.com", Role::Agent)).await.unwrap());
        assert_eq!(count_users(&db, Role::User).await.unwrap(), 1);
        assert_eq!(count_users(&db, Role::Agent).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..5 {
            insert_user(&db, &make_user(&format!("u{i}@example.com"), Role::User))
                .await
                .unwrap();
        }
        let agent = make_user("agent@example.com", Role::Agent);
        insert_user(&db, &agent).await.unwrap();
        set_active(&db, &agent.id, false).await.unwrap();

        let page = list_users(
            &db,
            &UserFilter {
                role: Some(Role::User),
                is_active: None,
            },
            PageRequest::new(Some(2), Some(2), 20),
        )
        .await
        .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination().pages, 3);

        let inactive = list_users(
            &db,
            &UserFilter {
                role: None,
                is_active: Some(false),
            },
            PageRequest::new(None, None, 20),
        )
        .await
        .unwrap();
        assert_eq!(inactive.total, 1);
        assert_eq!(inactive.items[0].id, agent.id);
    }

    #[tokio::test]
    async fn active_agents_excludes_inactive_and_other_roles() {
        let db = Database::open_in_memory().await.unwrap();
        let zed = make_user("zed@example.com", Role::Agent);
        let amy = make_user("amy@example.com", Role::Agent);
        let off = make_user("off@example.com", Role::Agent);
        for u in [&zed, &amy, &off, &make_user("user@example.com", Role::User)] {
            insert_user(&db, u).await.unwrap();
        }
        set_active(&db, &off.id, false).await.unwrap();

        let agents = list_active_agents(&db).await.unwrap();
        let names: Vec<_> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }

    #[tokio::test]
    async fn profile_update_keeps_absent_fields() {
        let db = Database::open_in_memory().await.unwrap();
        let mut user = make_user("p@example.com", Role::User);
        user.phone = Some("555-0100".into());
        insert_user(&db, &user).await.unwrap();

        let updated = update_profile(
            &db,
            &user.id,
            &ProfileUpdate {
                name: Some("Patricia".into()),
                phone: None,
                address: Some("1 Main St".into()),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Patricia");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.address.as_deref(), Some("1 Main St"));

        let missing = update_profile(&db, "nope", &ProfileUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn role_change_and_login_stamp() {
        let db = Database::open_in_memory().await.unwrap();
        let user = make_user("r@example.com", Role::User);
        insert_user(&db, &user).await.unwrap();

        let promoted = set_role(&db, &user.id, Role::Agent).await.unwrap().unwrap();
        assert_eq!(promoted.role, Role::Agent);
        assert!(set_role(&db, "ghost", Role::Admin).await.unwrap().is_none());

        let at = timestamp_now();
        record_login(&db, &user.id, &at).await.unwrap();
        let reread = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(reread.last_login.as_deref(), Some(at.as_str()));
    }
}
