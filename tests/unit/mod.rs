/// Engine behaviour exercised through the public API
mod basic_tests;
