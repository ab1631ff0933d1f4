use serie_core::{Capability, SerieError};

/// Collapse a set of provider errors into a uniform `SerieError` outcome.
///
/// Rules:
/// - If `attempted_any` is false → `Unsupported(capability)`.
/// - If all errors are `ProviderTimeout` → `AllProvidersTimedOut(capability)`.
/// - If `not_found_what` is `Some` and all errors are `NotFound` → `NotFound(what)`.
/// - Else → `AllProvidersFailed(errors)`.
pub fn collapse_errors(
    capability: Capability,
    attempted_any: bool,
    errors: Vec<SerieError>,
    not_found_what: Option<String>,
) -> SerieError {
    if !attempted_any {
        return SerieError::unsupported(capability.to_string());
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, SerieError::ProviderTimeout { .. }))
    {
        return SerieError::AllProvidersTimedOut {
            capability: capability.to_string(),
        };
    }
    if let Some(what) = not_found_what
        && !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, SerieError::NotFound { .. }))
    {
        return SerieError::not_found(what);
    }
    SerieError::AllProvidersFailed(errors)
}

/// Run `fut` under an optional deadline, mapping expiry to `RequestTimeout(capability)`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<std::time::Duration>,
    capability: Capability,
    fut: Fut,
) -> Result<T, SerieError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| SerieError::request_timeout(capability.to_string())),
        None => Ok(fut.await),
    }
}
