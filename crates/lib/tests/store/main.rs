mod common;
mod logger_tests;
mod smoke_tests;
