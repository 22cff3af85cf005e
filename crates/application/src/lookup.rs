use dtrack_core::{AppError, AppResult};

/// Turns `AppError::NotFound` into `Ok(None)` and passes other results
/// through.
pub fn found<T>(result: AppResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::NotFound(_)) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Turns a missing lookup result into `AppError::NotFound`.
pub fn require<T>(value: Option<T>, what: impl FnOnce() -> String) -> AppResult<T> {
    value.ok_or_else(|| AppError::NotFound(what()))
}

#[cfg(test)]
mod tests {
    use dtrack_core::AppError;

    use super::{found, require};

    #[test]
    fn not_found_becomes_none() {
        assert!(matches!(
            found::<u8>(Err(AppError::NotFound("team".to_owned()))),
            Ok(None)
        ));
        assert!(matches!(found(Ok(3)), Ok(Some(3))));
        assert!(matches!(
            found::<u8>(Err(AppError::Forbidden("nope".to_owned()))),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn require_names_the_missing_entity() {
        let message = require::<u8>(None, || "team 'ops'".to_owned())
            .err()
            .map(|error| error.to_string())
            .unwrap_or_default();
        assert_eq!(message, "not found: team 'ops'");
    }
}
