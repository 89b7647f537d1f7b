//! Integration tests for nebula-member
//!
//! These tests drive members through the public API the way a storage layer
//! would: declare, write, observe.

mod change_records;
mod configuration;
mod containers;
mod escape_hatches;
mod scalars;
