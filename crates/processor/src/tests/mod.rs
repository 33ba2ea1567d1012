//! Shared fixtures for processor tests
