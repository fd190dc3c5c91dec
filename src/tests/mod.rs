pub mod integration_tests;
pub mod processor_tests;
