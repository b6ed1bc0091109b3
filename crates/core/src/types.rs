/// Job identifiers are opaque server-assigned strings.
pub type JobId = String;

/// User identifiers are opaque server-assigned strings.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
