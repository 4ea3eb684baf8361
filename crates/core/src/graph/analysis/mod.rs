#![forbid(unsafe_code)]

//! Read-only views derived from the live edge set.

mod causality;
mod closure;
mod cycles;
mod impact;
mod order;
mod reach;
mod reorder;
mod validate;
mod visualize;
