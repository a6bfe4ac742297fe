/*!
 * Common test utilities for the vocab-trainer test suite
 */

use anyhow::Result;
use std::sync::Once;
use tempfile::TempDir;
use vocab_trainer::app_controller::Controller;
use vocab_trainer::database::NewCollection;
use vocab_trainer::dictionary::{CombinationPayload, WordInput};

static LOGGER: Once = Once::new();

/// Route library logs through env_logger once per test binary
pub fn init_logging() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Controller backed by a fresh in-memory database
pub fn create_test_controller() -> Result<Controller> {
    init_logging();
    Controller::new_for_test()
}

/// Two-word payload from (word, language) tuples
pub fn pair(first: (&str, &str), second: (&str, &str)) -> CombinationPayload {
    CombinationPayload::pair(
        WordInput::new(first.0, first.1),
        WordInput::new(second.0, second.1),
    )
}

/// Minimal valid collection
pub fn new_collection(name: &str, language_combination: &str) -> NewCollection {
    NewCollection {
        name: name.to_string(),
        creator: "tester".to_string(),
        language_combination: language_combination.to_string(),
        ..Default::default()
    }
}
