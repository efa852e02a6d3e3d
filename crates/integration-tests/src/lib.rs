//! End-to-end tests for the gatehouse middleware; see `tests/`.
