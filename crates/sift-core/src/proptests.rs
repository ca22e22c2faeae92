//! Property-based tests for the compiler.
