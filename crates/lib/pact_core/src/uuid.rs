// Helpers for generating UUIDv7 (timestamp-sortable UUIDs).
//
// Token ids and request trace ids are generated app-side so that they sort
// by issuance time. User ids keep PG's gen_random_uuid() (v4).

use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use uuid::{ContextV7, Timestamp, Uuid};

/// Shared v7 counter so ids built within one millisecond still sort.
static V7_CONTEXT: LazyLock<Mutex<ContextV7>> = LazyLock::new(|| Mutex::new(ContextV7::new()));

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Build a UUIDv7 from an explicit wall-clock reading.
///
/// Ids from the same process are strictly increasing, even within one
/// millisecond. Fails when the clock reads earlier than the unix epoch.
pub fn uuidv7_at(now: SystemTime) -> Result<Uuid, SystemTimeError> {
    let since_epoch = now.duration_since(UNIX_EPOCH)?;
    let context = V7_CONTEXT.lock().unwrap_or_else(PoisonError::into_inner);
    let ts = Timestamp::from_unix(
        &*context,
        since_epoch.as_secs(),
        since_epoch.subsec_nanos(),
    );
    Ok(Uuid::new_v7(ts))
}
