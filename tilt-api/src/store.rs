//! SQLite-backed activity log.
//!
//! Every observed post lands in `user_activity`; threshold-triggered
//! recommendations are attached to the originating row afterwards. The
//! connection sits behind a mutex, which is adequate for the low write rate
//! of one row per observed post.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tilt_engine::{ActivityRecorder, NewActivity};

/// Durable store for observed activity and attached recommendations.
pub struct ActivityStore {
    conn: Arc<Mutex<Connection>>,
}

/// One row from the activity log.
#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub bias_label: String,
    pub subreddit: Option<String>,
    pub threshold_reached: bool,
    pub recommendation_triggered: bool,
    pub recommended_urls: Vec<String>,
    pub created_at: String,
}

impl ActivityStore {
    /// Open (or create) the activity database at the given path.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS user_activity (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL DEFAULT '',
                bias_label TEXT NOT NULL,
                subreddit TEXT,
                threshold_reached INTEGER NOT NULL DEFAULT 0,
                recommendation_triggered INTEGER NOT NULL DEFAULT 0,
                recommended_urls TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_user_activity_user
                ON user_activity (user_id, created_at);
            ",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Fetch a single row by id.
    pub fn activity(&self, id: i64) -> Result<Option<ActivityRow>> {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("{}", e))?;
        let row = conn
            .query_row(
                "SELECT id, user_id, title, body, bias_label, subreddit,
                        threshold_reached, recommendation_triggered,
                        recommended_urls, created_at
                 FROM user_activity WHERE id = ?1",
                params![id],
                map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Most recent activity for a user, newest first.
    pub fn recent_for_user(&self, user_id: &str, limit: u32) -> Result<Vec<ActivityRow>> {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("{}", e))?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, body, bias_label, subreddit,
                    threshold_reached, recommendation_triggered,
                    recommended_urls, created_at
             FROM user_activity
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActivityRow> {
    let urls: Option<String> = row.get(8)?;
    Ok(ActivityRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        bias_label: row.get(4)?,
        subreddit: row.get(5)?,
        threshold_reached: row.get::<_, i64>(6)? != 0,
        recommendation_triggered: row.get::<_, i64>(7)? != 0,
        recommended_urls: urls
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default(),
        created_at: row.get(9)?,
    })
}

#[async_trait]
impl ActivityRecorder for ActivityStore {
    async fn record(&self, activity: &NewActivity) -> Result<i64> {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("{}", e))?;
        let urls = if activity.recommended_urls.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&activity.recommended_urls)?)
        };

        conn.execute(
            r"
            INSERT INTO user_activity
                (user_id, title, body, bias_label, subreddit,
                 recommendation_triggered, recommended_urls, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
            params![
                activity.user_id,
                activity.title,
                activity.body,
                activity.bias_label.as_str(),
                activity.subreddit,
                activity.recommendation_triggered as i64,
                urls,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn attach_recommendations(&self, id: i64, urls: &[String]) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("{}", e))?;
        let updated = conn.execute(
            r"
            UPDATE user_activity
            SET threshold_reached = 1,
                recommendation_triggered = 1,
                recommended_urls = ?2
            WHERE id = ?1
            ",
            params![id, serde_json::to_string(urls)?],
        )?;

        if updated == 0 {
            anyhow::bail!("no activity row with id {}", id);
        }
        Ok(())
    }
}
