use crate::base::error::CleanError;
use rusqlite::ffi;

fn sqlite_failure(code: i32) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
}

#[test]
fn test_busy_and_locked_map_to_storage_locked() {
    assert_eq!(
        CleanError::from(sqlite_failure(ffi::SQLITE_BUSY)),
        CleanError::StorageLocked
    );
    assert_eq!(
        CleanError::from(sqlite_failure(ffi::SQLITE_LOCKED)),
        CleanError::StorageLocked
    );
}

#[test]
fn test_other_sqlite_errors_are_storage_errors() {
    let err = CleanError::from(sqlite_failure(ffi::SQLITE_CORRUPT));
    assert!(matches!(err, CleanError::Storage { .. }));
    assert!(!err.is_locked());

    let err = CleanError::from(rusqlite::Error::QueryReturnedNoRows);
    assert!(matches!(err, CleanError::Storage { .. }));
}

#[test]
fn test_error_messages_name_the_subject() {
    assert_eq!(
        CleanError::process_running("Firefox").to_string(),
        "Firefox is running"
    );
    assert_eq!(
        CleanError::store_not_found("/x/Cookies").to_string(),
        "cookie store not found: /x/Cookies"
    );
}
