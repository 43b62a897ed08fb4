//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::db::repository::{
    ChatRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    RequestRepository, ScheduleRepository, SlotRepository, UpsertOutcome,
};
use crate::models::{
    BroadcastId, BroadcastSchedule, BroadcastScheduleDraft, ChatMessage, ChatMessageDraft,
    MessageId, RequestId, RequestStatus, Slot, SlotChanges, SlotDraft, SlotId, SongRequest,
    SongRequestDraft, Weekday,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = env_u32("PG_POOL_MAX", 10);
        let min_pool_size = env_u32("PG_POOL_MIN", 1);
        let connection_timeout_sec = env_u64("PG_CONN_TIMEOUT_SEC", 30);
        let idle_timeout_sec = env_u64("PG_IDLE_TIMEOUT_SEC", 600);
        let max_retries = env_u32("PG_MAX_RETRIES", 3);
        let retry_delay_ms = env_u64("PG_RETRY_DELAY_MS", 100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// The operation is retried up to `max_retries` times when a retryable
    /// error occurs (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!(
                            "retryable database error on attempt {}: {}",
                            attempt + 1,
                            e
                        );
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn slot_not_found(id: &SlotId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("slot {} does not exist", id),
        ErrorContext::default()
            .with_entity("slot")
            .with_entity_id(id),
    )
}

fn load_slots(rows: Vec<SlotRow>) -> RepositoryResult<Vec<Slot>> {
    rows.into_iter().map(SlotRow::into_slot).collect()
}

#[async_trait]
impl SlotRepository for PostgresRepository {
    async fn insert_slot(&self, draft: SlotDraft) -> RepositoryResult<SlotId> {
        let id = SlotId::new(Uuid::new_v4().to_string());
        let row = SlotRow::from_slot(&Slot {
            id: id.clone(),
            day: draft.day,
            start: draft.start,
            end: draft.end,
            program: draft.program,
            tracks: draft.tracks,
            sort_key: draft.sort_key,
        });

        self.with_conn(move |conn| {
            diesel::insert_into(playlist_slots::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn get_slot(&self, id: &SlotId) -> RepositoryResult<Slot> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let row = playlist_slots::table
                .find(id.as_str())
                .select(SlotRow::as_select())
                .first::<SlotRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| slot_not_found(&id))?;
            row.into_slot()
        })
        .await
    }

    async fn update_slot(&self, id: &SlotId, changes: SlotChanges) -> RepositoryResult<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let row = playlist_slots::table
                .find(id.as_str())
                .select(SlotRow::as_select())
                .first::<SlotRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| slot_not_found(&id))?;

            let mut slot = row.into_slot()?;
            changes.clone().apply_to(&mut slot);
            let updated = SlotRow::from_slot(&slot);

            diesel::update(playlist_slots::table.find(id.as_str()))
                .set((
                    playlist_slots::day.eq(updated.day),
                    playlist_slots::start_minutes.eq(updated.start_minutes),
                    playlist_slots::end_minutes.eq(updated.end_minutes),
                    playlist_slots::program.eq(updated.program),
                    playlist_slots::tracks.eq(updated.tracks),
                    playlist_slots::sort_key.eq(updated.sort_key),
                ))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn upsert_slot(&self, id: &SlotId, draft: SlotDraft) -> RepositoryResult<UpsertOutcome> {
        let id = id.clone();
        let fresh = SlotId::new(Uuid::new_v4().to_string());
        self.with_conn(move |conn| {
            // Existing record keeps its sort key; only content fields move.
            let updated = diesel::update(playlist_slots::table.find(id.as_str()))
                .set((
                    playlist_slots::day.eq(i16::from(draft.day.index())),
                    playlist_slots::start_minutes.eq(i32::from(draft.start.minutes())),
                    playlist_slots::end_minutes.eq(i32::from(draft.end.minutes())),
                    playlist_slots::program.eq(draft.program.clone()),
                    playlist_slots::tracks.eq(draft.tracks.clone()),
                ))
                .execute(conn)
                .map_err(map_diesel_error)?;
            if updated > 0 {
                return Ok(UpsertOutcome::Updated);
            }

            let row = SlotRow {
                id: fresh.as_str().to_string(),
                day: i16::from(draft.day.index()),
                start_minutes: i32::from(draft.start.minutes()),
                end_minutes: i32::from(draft.end.minutes()),
                program: draft.program.clone(),
                tracks: draft.tracks.clone(),
                sort_key: draft.sort_key,
            };
            diesel::insert_into(playlist_slots::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(UpsertOutcome::Inserted(fresh.clone()))
        })
        .await
    }

    async fn delete_slot(&self, id: &SlotId) -> RepositoryResult<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(playlist_slots::table.find(id.as_str()))
                .execute(conn)
                .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(slot_not_found(&id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_all_slots(&self) -> RepositoryResult<usize> {
        self.with_conn(|conn| {
            diesel::delete(playlist_slots::table)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_slots(&self) -> RepositoryResult<Vec<Slot>> {
        self.with_conn(|conn| {
            let rows = playlist_slots::table
                .select(SlotRow::as_select())
                .order((
                    playlist_slots::day.asc(),
                    playlist_slots::sort_key.asc(),
                    playlist_slots::start_minutes.asc(),
                ))
                .load::<SlotRow>(conn)
                .map_err(map_diesel_error)?;
            load_slots(rows)
        })
        .await
    }

    async fn list_slots_by_day(&self, day: Weekday) -> RepositoryResult<Vec<Slot>> {
        self.with_conn(move |conn| {
            let rows = playlist_slots::table
                .filter(playlist_slots::day.eq(i16::from(day.index())))
                .select(SlotRow::as_select())
                .order((
                    playlist_slots::sort_key.asc(),
                    playlist_slots::start_minutes.asc(),
                ))
                .load::<SlotRow>(conn)
                .map_err(map_diesel_error)?;
            load_slots(rows)
        })
        .await
    }

    async fn max_sort_key(&self, day: Weekday) -> RepositoryResult<i32> {
        self.with_conn(move |conn| {
            let max_key: Option<i32> = playlist_slots::table
                .filter(playlist_slots::day.eq(i16::from(day.index())))
                .select(max(playlist_slots::sort_key))
                .first(conn)
                .map_err(map_diesel_error)?;
            Ok(max_key.unwrap_or(-1))
        })
        .await
    }
}

#[async_trait]
impl RequestRepository for PostgresRepository {
    async fn insert_request(&self, draft: SongRequestDraft) -> RepositoryResult<RequestId> {
        let id = RequestId::new(Uuid::new_v4().to_string());
        let row = SongRequestRow::from_request(&SongRequest {
            id: id.clone(),
            name: draft.name,
            title: draft.title,
            status: RequestStatus::New,
            created_at: Utc::now(),
        });

        self.with_conn(move |conn| {
            diesel::insert_into(song_requests::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> RepositoryResult<Vec<SongRequest>> {
        self.with_conn(move |conn| {
            let mut query = song_requests::table
                .select(SongRequestRow::as_select())
                .order(song_requests::created_at.desc())
                .into_boxed();
            if let Some(status) = status {
                query = query.filter(song_requests::status.eq(status.to_string()));
            }
            let rows = query.load::<SongRequestRow>(conn).map_err(map_diesel_error)?;
            rows.into_iter().map(SongRequestRow::into_request).collect()
        })
        .await
    }

    async fn set_request_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> RepositoryResult<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let updated = diesel::update(song_requests::table.find(id.as_str()))
                .set(song_requests::status.eq(status.to_string()))
                .execute(conn)
                .map_err(map_diesel_error)?;
            if updated == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("request {} does not exist", id),
                    ErrorContext::default()
                        .with_entity("request")
                        .with_entity_id(&id),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn count_new_requests(&self) -> RepositoryResult<u64> {
        self.with_conn(|conn| {
            use diesel::dsl::count_star;
            let count: i64 = song_requests::table
                .filter(song_requests::status.eq(RequestStatus::New.to_string()))
                .select(count_star())
                .first(conn)
                .map_err(map_diesel_error)?;
            Ok(count as u64)
        })
        .await
    }
}

#[async_trait]
impl ScheduleRepository for PostgresRepository {
    async fn insert_schedule(
        &self,
        draft: BroadcastScheduleDraft,
    ) -> RepositoryResult<BroadcastId> {
        let id = BroadcastId::new(Uuid::new_v4().to_string());
        let row = BroadcastScheduleRow::from_schedule(&BroadcastSchedule {
            id: id.clone(),
            title: draft.title,
            host: draft.host,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
        });

        self.with_conn(move |conn| {
            diesel::insert_into(broadcast_schedules::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn list_schedules(&self) -> RepositoryResult<Vec<BroadcastSchedule>> {
        self.with_conn(|conn| {
            let rows = broadcast_schedules::table
                .select(BroadcastScheduleRow::as_select())
                .order(broadcast_schedules::start_time.desc())
                .load::<BroadcastScheduleRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(BroadcastScheduleRow::into_schedule)
                .collect())
        })
        .await
    }

    async fn delete_schedule(&self, id: &BroadcastId) -> RepositoryResult<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(broadcast_schedules::table.find(id.as_str()))
                .execute(conn)
                .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("schedule {} does not exist", id),
                    ErrorContext::default()
                        .with_entity("schedule")
                        .with_entity_id(&id),
                ));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ChatRepository for PostgresRepository {
    async fn insert_message(&self, draft: ChatMessageDraft) -> RepositoryResult<MessageId> {
        let id = MessageId::new(Uuid::new_v4().to_string());
        let row = ChatMessageRow::from_message(&ChatMessage {
            id: id.clone(),
            name: draft.name,
            text: draft.text,
            ip: draft.ip,
            ts: draft.ts,
            flagged: draft.flagged,
        });

        self.with_conn(move |conn| {
            diesel::insert_into(chat_messages::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn list_messages_after(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RepositoryResult<Vec<ChatMessage>> {
        self.with_conn(move |conn| {
            let rows = chat_messages::table
                .filter(chat_messages::ts.gt(since))
                .select(ChatMessageRow::as_select())
                .order(chat_messages::ts.asc())
                .limit(limit as i64)
                .load::<ChatMessageRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(ChatMessageRow::into_message).collect())
        })
        .await
    }

    async fn list_recent_messages(
        &self,
        flagged_only: bool,
        limit: usize,
    ) -> RepositoryResult<Vec<ChatMessage>> {
        self.with_conn(move |conn| {
            let mut query = chat_messages::table
                .select(ChatMessageRow::as_select())
                .order(chat_messages::ts.desc())
                .limit(limit as i64)
                .into_boxed();
            if flagged_only {
                query = query.filter(chat_messages::flagged.eq(true));
            }
            let rows = query.load::<ChatMessageRow>(conn).map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(ChatMessageRow::into_message).collect())
        })
        .await
    }

    async fn delete_message(&self, id: &MessageId) -> RepositoryResult<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(chat_messages::table.find(id.as_str()))
                .execute(conn)
                .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("message {} does not exist", id),
                    ErrorContext::default()
                        .with_entity("chat_message")
                        .with_entity_id(&id),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn record_rate_event(&self, ip: &str, ts: DateTime<Utc>) -> RepositoryResult<()> {
        let ip = ip.to_string();
        self.with_conn(move |conn| {
            diesel::insert_into(chat_rate_events::table)
                .values((
                    chat_rate_events::ip.eq(ip.clone()),
                    chat_rate_events::ts.eq(ts),
                ))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn count_rate_events_since(
        &self,
        ip: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        let ip = ip.to_string();
        self.with_conn(move |conn| {
            use diesel::dsl::count_star;
            let count: i64 = chat_rate_events::table
                .filter(chat_rate_events::ip.eq(ip.clone()))
                .filter(chat_rate_events::ts.ge(since))
                .select(count_star())
                .first(conn)
                .map_err(map_diesel_error)?;
            Ok(count as u64)
        })
        .await
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }
}
