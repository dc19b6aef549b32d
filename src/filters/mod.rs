//! Matrix filter primitives used by the binarization pipeline.
//!
//! All filters operate on 2D `ndarray` matrices and are pure functions.
//! Boundary handling is clamp-at-edge throughout: a window index that
//! falls outside the matrix reads the nearest edge cell. The one
//! exception is binary dilation, which treats out-of-bounds cells as
//! false, matching the usual zero-padded morphology convention.

pub mod blur;
pub mod morphology;
pub mod percentile;
pub mod resample;
