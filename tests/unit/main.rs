//! Unit test modules.

mod elapsed_key_test;
