//! Postgres-backed repositories.
//!
//! Diesel is synchronous, so every query runs on the blocking pool and the
//! request task only awaits the join handle.

use diesel::pg::PgConnection;
use diesel::prelude::*;

use emoji_shared::clients::db::DbPool;
use emoji_shared::types::EmojiRecord;

use crate::models::{Emoji, NewEmoji, NewProfile, Profile};
use crate::schema::{emojis, profiles};

use super::ports::{EmojiRepository, ProfileRepository, StoreError};

async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| StoreError::Task(e.to_string()))?
}

#[derive(Clone)]
pub struct PgEmojiRepository {
    pool: DbPool,
}

impl PgEmojiRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[axum::async_trait]
impl EmojiRepository for PgEmojiRepository {
    async fn insert(&self, emoji: NewEmoji) -> Result<EmojiRecord, StoreError> {
        with_conn(&self.pool, move |conn| {
            let row = diesel::insert_into(emojis::table)
                .values(&emoji)
                .returning(Emoji::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn list_newest_first(&self) -> Result<Vec<EmojiRecord>, StoreError> {
        with_conn(&self.pool, |conn| {
            let rows = emojis::table
                .order((emojis::created_at.desc(), emojis::id.desc()))
                .select(Emoji::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(EmojiRecord::from).collect())
        })
        .await
    }

    async fn likes_count(&self, id: i64) -> Result<Option<i32>, StoreError> {
        with_conn(&self.pool, move |conn| {
            emojis::table
                .find(id)
                .select(emojis::likes_count)
                .first::<Option<i32>>(conn)
                .optional()?
                .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn set_likes_count(&self, id: i64, likes_count: i32) -> Result<EmojiRecord, StoreError> {
        with_conn(&self.pool, move |conn| {
            let row = diesel::update(emojis::table.find(id))
                .set(emojis::likes_count.eq(Some(likes_count)))
                .returning(Emoji::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or(StoreError::NotFound)?;
            Ok(row.into())
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        with_conn(&self.pool, |conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(())
        })
        .await
    }
}

#[derive(Clone)]
pub struct PgProfileRepository {
    pool: DbPool,
}

impl PgProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[axum::async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            Ok(profiles::table
                .find(user_id)
                .select(Profile::as_select())
                .first(conn)
                .optional()?)
        })
        .await
    }

    async fn insert_if_absent(&self, profile: NewProfile) -> Result<bool, StoreError> {
        with_conn(&self.pool, move |conn| {
            let inserted = diesel::insert_into(profiles::table)
                .values(&profile)
                .on_conflict(profiles::user_id)
                .do_nothing()
                .execute(conn)?;
            Ok(inserted > 0)
        })
        .await
    }
}
