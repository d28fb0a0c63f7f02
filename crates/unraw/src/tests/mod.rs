//! Test suites for the rewrite runtime.

mod lib_api;
mod pool;
mod support;
