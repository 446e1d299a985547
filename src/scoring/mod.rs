//! Pure scoring core: date canonicalization, the weekly gains table, and the
//! day score calculation. No I/O and no clock reads; callers pass the target
//! day explicitly.

pub mod calendar;
pub mod score;
