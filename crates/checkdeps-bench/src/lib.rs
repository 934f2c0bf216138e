#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Benchmark harness for checkdeps.
//!
//! Run benchmarks with: `cargo bench -p checkdeps-bench`
//!
//! This crate only holds criterion benchmarks.
