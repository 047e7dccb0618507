/// All database primary keys are PostgreSQL UUIDs (`gen_random_uuid()`),
/// matching the user ids issued by the external auth service.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
