use std::env;

/// Name of the gRPC metadata header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Validates the provided API key against the expected API key from environment.
///
/// Returns `Ok(())` if the key is valid, or an error if invalid or missing.
#[allow(clippy::result_large_err)]
pub fn validate_api_key(provided_key: &str) -> Result<(), tonic::Status> {
    let expected_key = env::var("API_KEY")
        .map_err(|_| tonic::Status::internal("API_KEY not set in environment"))?;

    check_api_key(provided_key, &expected_key)
}

/// Compares a provided key with the expected one.
#[allow(clippy::result_large_err)]
pub fn check_api_key(provided_key: &str, expected_key: &str) -> Result<(), tonic::Status> {
    if !expected_key.is_empty() && provided_key == expected_key {
        Ok(())
    } else {
        Err(tonic::Status::unauthenticated("Invalid API key"))
    }
}
