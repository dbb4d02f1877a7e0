//! Execution windows: the n-dimensional iteration space of a kernel
//!
//! A [`Window`] describes which elements a kernel invocation visits as a
//! per-axis `(start, end, step)` triple. Kernels compute their window once at
//! configure time; the scheduler then splits it into disjoint sub-windows,
//! and kernel bodies iterate it through 3D slices or
//! [`execute_window_loop`].

mod core;
mod loops;
mod slice;

pub use core::{Steps, Window, WindowDimension};
pub use loops::execute_window_loop;
