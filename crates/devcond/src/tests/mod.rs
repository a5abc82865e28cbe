//! Test suites for the console server.

mod support;
