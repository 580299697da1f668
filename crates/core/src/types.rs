/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Shape kind tags are SMALLINT references into the `shape_kinds` lookup table.
pub type KindTag = i16;
