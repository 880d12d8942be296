use rand::rngs::StdRng;
use rand::SeedableRng;
use statgrad_core::Array;

// Helper function to create an f64 array for testing.
// Added allow(dead_code) because usage across different test crates isn't detected easily.
#[allow(dead_code)]
pub(crate) fn create_test_array(data: Vec<f64>, shape: Vec<usize>) -> Array<f64> {
    Array::new(data, shape).expect("Test array creation failed")
}

/// Deterministic generator so failures are reproducible.
#[allow(dead_code)]
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Routes `log` records to the test output; safe to call from every test.
#[allow(dead_code)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
