use std::error::Error;
use pairslot_core::errors::{BookingError, BookingResult};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Pair booking not found".to_string());
    let validation = BookingError::Validation("Invalid input".to_string());
    let conflict = BookingError::Conflict("Slot already claimed".to_string());
    let forbidden = BookingError::Forbidden("Not a participant".to_string());
    let authentication = BookingError::Authentication("Missing X-User-Id".to_string());
    let database = BookingError::Database(eyre::eyre!("Database connection failed"));
    let internal = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Pair booking not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(conflict.to_string(), "Conflict: Slot already claimed");
    assert_eq!(forbidden.to_string(), "Forbidden: Not a participant");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Missing X-User-Id"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_source_is_kept() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let booking_error = BookingError::Internal(Box::new(io_error));

    assert!(booking_error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_eyre_report_converts_to_database_error() {
    fn load() -> BookingResult<()> {
        Err::<(), _>(eyre::eyre!("connection reset"))?;
        Ok(())
    }

    let error = load().unwrap_err();
    assert!(matches!(error, BookingError::Database(_)));
    assert!(error.to_string().contains("connection reset"));
}
