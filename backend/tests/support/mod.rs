//! Shared helpers for integration tests.

/// Variable naming the PostgreSQL database used by repository tests.
pub const TEST_DATABASE_URL_VAR: &str = "HOMESTOCK_TEST_DATABASE_URL";

/// Database URL for repository tests, or `None` with a skip marker when the
/// variable is unset.
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {TEST_DATABASE_URL_VAR} is not set");
            None
        }
    }
}
