use shared_types::AppError;

/// SQLSTATE raised by `RAISE EXCEPTION` inside the stored procedures.
const RAISE_EXCEPTION: &str = "P0001";
const UNIQUE_VIOLATION: &str = "23505";

/// Convert a sqlx::Error into an AppError.
///
/// Procedure errors carry user-facing messages and pass through verbatim.
/// Anything else is logged and replaced with a generic message.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(RAISE_EXCEPTION) => AppError::bad_request(db_err.message()),
            Some(UNIQUE_VIOLATION) => {
                let detail = db_err.message();
                let constraint = db_err.constraint().unwrap_or_default();
                AppError::conflict(unique_violation_message(constraint, detail))
            }
            _ => {
                tracing::error!(error = %err, "Database error");
                AppError::database("Database error")
            }
        },
        _ => {
            tracing::error!(error = %err, "Database error");
            AppError::database("Database error")
        }
    }
}

/// Friendly text for a unique violation, keyed on the constraint name or
/// the server's detail message.
pub fn unique_violation_message(constraint: &str, detail: &str) -> &'static str {
    let hit = |needle: &str| constraint.contains(needle) || detail.contains(needle);
    if hit("email") {
        "An account with this email already exists"
    } else if hit("member_number") {
        "This member number is already in use"
    } else if hit("exception_date") {
        "An exception already exists for this date"
    } else if hit("stripe_session_id") {
        "This payment was already processed"
    } else {
        "A record with this value already exists"
    }
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
