use circle_compare::CompareError;
use circle_compare::core::{BuildCredential, DEFAULT_TOKEN_ENV};

// The process-wide credential can only be initialised once, so this binary
// holds a single test.
#[test]
fn test_missing_token_stays_missing() {
    unsafe { std::env::remove_var(DEFAULT_TOKEN_ENV) };
    assert!(matches!(
        BuildCredential::get(),
        Err(CompareError::MissingCredential { ref var }) if var == DEFAULT_TOKEN_ENV
    ));

    unsafe { std::env::set_var(DEFAULT_TOKEN_ENV, "late") };
    assert!(matches!(
        BuildCredential::get(),
        Err(CompareError::MissingCredential { .. })
    ));
    assert!(matches!(
        BuildCredential::resolve(DEFAULT_TOKEN_ENV),
        Err(CompareError::MissingCredential { .. })
    ));
}
