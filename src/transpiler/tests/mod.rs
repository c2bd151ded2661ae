//! Transpiler tests, split by concern.

mod core;
mod dialects;
