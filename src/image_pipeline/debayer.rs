//! Debayering module for converting CFA mosaics to RGB

pub mod cpu_debayer;

pub use cpu_debayer::{CpuDebayer, cfa_from_name};
