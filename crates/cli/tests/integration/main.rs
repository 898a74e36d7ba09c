mod common;
mod config_tests;
mod edit_tests;
mod entry_tests;
mod list_tests;
