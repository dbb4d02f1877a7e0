//! Window and per-axis dimension types

use crate::error::{Error, Result, Status};
use crate::helpers::{ceil_to_multiple, div_ceil};
use crate::tensor::{TensorDescriptor, MAX_DIMS};
use smallvec::SmallVec;

/// One axis of a window: the half-open range `[start, end)` visited with
/// the given step
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WindowDimension {
    start: isize,
    end: isize,
    step: usize,
}

impl WindowDimension {
    /// Create a dimension from start, end, and step.
    pub fn new(start: isize, end: isize, step: usize) -> Self {
        Self { start, end, step }
    }

    /// First position.
    #[inline]
    pub fn start(&self) -> isize {
        self.start
    }

    /// One past the last position.
    #[inline]
    pub fn end(&self) -> isize {
        self.end
    }

    /// Distance between consecutive iterations.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of positions covered (`end - start`).
    #[inline]
    pub fn extent(&self) -> usize {
        (self.end - self.start).max(0) as usize
    }

    /// Number of iterations needed to cover the extent with this step.
    #[inline]
    pub fn num_iterations(&self) -> usize {
        if self.step == 0 {
            return 0;
        }
        div_ceil(self.extent(), self.step)
    }
}

impl Default for WindowDimension {
    /// A single-iteration dimension: `[0, 1)` with step 1.
    fn default() -> Self {
        Self {
            start: 0,
            end: 1,
            step: 1,
        }
    }
}

/// Per-axis iteration steps used when building a kernel's maximum window
///
/// Axes without an explicit entry default to a step of 1. Steps reflect how
/// many elements a kernel processes per iteration (its vector width on the
/// innermost axis, for instance).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Steps(SmallVec<[usize; MAX_DIMS]>);

impl Steps {
    /// All-default steps (1 on every axis).
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Set the step for `axis`, filling skipped axes with 1.
    pub fn set(&mut self, axis: usize, step: usize) -> &mut Self {
        while self.0.len() <= axis {
            self.0.push(1);
        }
        self.0[axis] = step;
        self
    }

    /// Step for `axis`; 1 when unset.
    #[inline]
    pub fn get(&self, axis: usize) -> usize {
        self.0.get(axis).copied().unwrap_or(1)
    }
}

impl From<&[usize]> for Steps {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Steps {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

/// An n-dimensional iteration space: one `(start, end, step)` per axis
///
/// Axes beyond the stored rank behave as default single-iteration
/// dimensions, so windows of different ranks compose without special
/// casing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Window {
    dims: SmallVec<[WindowDimension; MAX_DIMS]>,
}

impl Window {
    /// Create an empty (zero-dimensional) window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of explicitly set dimensions.
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.dims.len()
    }

    /// Dimension for `axis`; single-iteration default beyond the rank.
    #[inline]
    pub fn dimension(&self, axis: usize) -> WindowDimension {
        self.dims.get(axis).copied().unwrap_or_default()
    }

    /// Set the dimension for `axis`, growing the rank with defaults if
    /// needed.
    pub fn set(&mut self, axis: usize, dimension: WindowDimension) {
        while self.dims.len() <= axis {
            self.dims.push(WindowDimension::default());
        }
        self.dims[axis] = dimension;
    }

    /// Number of positions along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.dimension(axis).extent()
    }

    /// Number of iterations along `axis`.
    #[inline]
    pub fn num_iterations(&self, axis: usize) -> usize {
        self.dimension(axis).num_iterations()
    }

    /// Total number of iterations over every axis.
    pub fn num_iterations_total(&self) -> usize {
        (0..self.num_dimensions())
            .map(|axis| self.num_iterations(axis))
            .product()
    }

    /// Shift `axis` by `delta` positions; start and end move together, so
    /// the extent is unchanged.
    pub fn shift(&mut self, axis: usize, delta: isize) {
        let dim = self.dimension(axis);
        self.set(
            axis,
            WindowDimension::new(dim.start() + delta, dim.end() + delta, dim.step()),
        );
    }

    /// Move one boundary of `axis` by `delta`: the start if `at_start`,
    /// the end otherwise.
    pub fn adjust(&mut self, axis: usize, delta: isize, at_start: bool) {
        let dim = self.dimension(axis);
        let (start, end) = if at_start {
            (dim.start() + delta, dim.end())
        } else {
            (dim.start(), dim.end() + delta)
        };
        self.set(axis, WindowDimension::new(start, end, dim.step()));
    }

    /// Check the window invariants: `end >= start` and `step > 0` on every
    /// axis.
    pub fn validate(&self) -> Status {
        for (axis, dim) in self.dims.iter().enumerate() {
            if dim.end < dim.start {
                return Err(Error::window(format!(
                    "axis {axis}: end {} < start {}",
                    dim.end, dim.start
                )));
            }
            if dim.step == 0 {
                return Err(Error::window(format!("axis {axis}: step is zero")));
            }
        }
        Ok(())
    }

    /// Build the maximum window a kernel can execute on over `descriptor`.
    ///
    /// Each axis starts at the valid-region anchor and ends at the anchor
    /// plus the valid extent rounded up to a multiple of the step, so
    /// stepped kernels cover ragged tails (which they must then clip).
    pub fn calculate_max_window(descriptor: &TensorDescriptor, steps: &Steps) -> Result<Window> {
        let region = descriptor.valid_region();
        let mut window = Window::new();
        for axis in 0..descriptor.num_dimensions() {
            let step = steps.get(axis);
            let start = region.start(axis);
            let extent = ceil_to_multiple(region.shape.extent(axis), step)?;
            window.set(
                axis,
                WindowDimension::new(start, start + extent as isize, step),
            );
        }
        Ok(window)
    }

    /// Check that `candidate` is contained in `parent` per axis, with
    /// identical steps.
    pub fn validate_subwindow(parent: &Window, candidate: &Window) -> Status {
        let rank = parent.num_dimensions().max(candidate.num_dimensions());
        for axis in 0..rank {
            let p = parent.dimension(axis);
            let c = candidate.dimension(axis);
            if c.start < p.start || c.end > p.end || c.step != p.step {
                return Err(Error::SubWindowOutOfBounds);
            }
        }
        Ok(())
    }

    /// Extract the `id`-th of `total` contiguous partitions along `axis`.
    ///
    /// Partitioning is by iterations, so steps stay aligned; remainder
    /// iterations go to the first partitions. The union of all partitions
    /// covers the axis exactly once, with no gaps or overlaps.
    pub fn split(&self, axis: usize, id: usize, total: usize) -> Window {
        debug_assert!(id < total);
        let dim = self.dimension(axis);
        let iterations = dim.num_iterations();
        let base = iterations / total;
        let remainder = iterations % total;

        let my_iterations = base + usize::from(id < remainder);
        let first_iteration = id * base + id.min(remainder);

        let start = dim.start() + (first_iteration * dim.step()) as isize;
        let end = (start + (my_iterations * dim.step()) as isize).min(dim.end());

        let mut sub = self.clone();
        sub.set(axis, WindowDimension::new(start, end, dim.step()));
        sub
    }

    /// Merge the axes from `first_dimension` upward into a single axis, if
    /// they are contiguous: each must start at 0, have step 1, and cover
    /// the full extent of `full_window`. Returns the (possibly) collapsed
    /// window and whether a merge happened. Collapsing only regroups the
    /// iteration space; it never changes which elements are visited.
    pub fn collapse_if_possible(
        &self,
        full_window: &Window,
        first_dimension: usize,
    ) -> (Window, bool) {
        let rank = self.num_dimensions().max(full_window.num_dimensions());
        let mut collapsed = self.clone();
        if first_dimension + 1 >= rank {
            return (collapsed, false);
        }

        let mut merged_end = self.dimension(first_dimension).end();
        for axis in first_dimension + 1..rank {
            let dim = self.dimension(axis);
            let full = full_window.dimension(axis);
            let contiguous = dim.start() == 0
                && full.start() == 0
                && dim.step() == 1
                && full.end() == dim.end();
            if !contiguous {
                return (collapsed, false);
            }
            merged_end *= dim.end();
        }

        let first = self.dimension(first_dimension);
        collapsed.set(
            first_dimension,
            WindowDimension::new(first.start(), merged_end, first.step()),
        );
        for axis in first_dimension + 1..rank {
            collapsed.set(axis, WindowDimension::default());
        }
        (collapsed, true)
    }

    /// Like [`Window::collapse_if_possible`], but failing to collapse is an
    /// error.
    pub fn collapse(&self, full_window: &Window, first_dimension: usize) -> Result<Window> {
        let (collapsed, has_collapsed) = self.collapse_if_possible(full_window, first_dimension);
        if has_collapsed {
            Ok(collapsed)
        } else {
            Err(Error::window("window cannot be collapsed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DataType;

    fn window_3d(extents: [usize; 3]) -> Window {
        let mut window = Window::new();
        for (axis, &extent) in extents.iter().enumerate() {
            window.set(axis, WindowDimension::new(0, extent as isize, 1));
        }
        window
    }

    #[test]
    fn test_dimension_iterations() {
        let dim = WindowDimension::new(0, 10, 3);
        assert_eq!(dim.extent(), 10);
        assert_eq!(dim.num_iterations(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let mut window = Window::new();
        window.set(0, WindowDimension::new(4, 2, 1));
        assert!(window.validate().is_err());

        let mut window = Window::new();
        window.set(0, WindowDimension::new(0, 4, 0));
        assert!(window.validate().is_err());
    }

    #[test]
    fn test_max_window_from_descriptor() {
        let desc = TensorDescriptor::new([10, 4, 2], DataType::F32);
        let window = Window::calculate_max_window(&desc, &Steps::new()).unwrap();
        assert_eq!(window.num_dimensions(), 3);
        assert_eq!(window.dimension(0), WindowDimension::new(0, 10, 1));
        assert_eq!(window.dimension(2), WindowDimension::new(0, 2, 1));
    }

    #[test]
    fn test_max_window_rounds_end_to_step() {
        let desc = TensorDescriptor::new([10, 4], DataType::F32);
        let window =
            Window::calculate_max_window(&desc, Steps::new().set(0, 4)).unwrap();
        // 10 rounded up to a multiple of 4.
        assert_eq!(window.dimension(0), WindowDimension::new(0, 12, 4));
        assert_eq!(window.dimension(1), WindowDimension::new(0, 4, 1));
    }

    #[test]
    fn test_shift_and_adjust() {
        let mut window = window_3d([8, 4, 2]);
        window.shift(0, 2);
        assert_eq!(window.dimension(0), WindowDimension::new(2, 10, 1));
        assert_eq!(window.extent(0), 8);

        window.adjust(1, 1, true);
        assert_eq!(window.dimension(1), WindowDimension::new(1, 4, 1));
        window.adjust(1, -1, false);
        assert_eq!(window.dimension(1), WindowDimension::new(1, 3, 1));
    }

    #[test]
    fn test_subwindow_validation() {
        let parent = window_3d([16, 8, 4]);
        let mut sub = parent.clone();
        sub.set(2, WindowDimension::new(1, 3, 1));
        assert!(Window::validate_subwindow(&parent, &sub).is_ok());

        let mut outside = parent.clone();
        outside.set(2, WindowDimension::new(1, 5, 1));
        assert!(Window::validate_subwindow(&parent, &outside).is_err());

        let mut stepped = parent.clone();
        stepped.set(0, WindowDimension::new(0, 16, 2));
        assert!(Window::validate_subwindow(&parent, &stepped).is_err());
    }

    #[test]
    fn test_split_even() {
        let window = window_3d([4, 4, 100]);
        let parts: Vec<_> = (0..4).map(|id| window.split(2, id, 4)).collect();
        let starts: Vec<_> = parts.iter().map(|w| w.dimension(2).start()).collect();
        assert_eq!(starts, [0, 25, 50, 75]);
        for part in &parts {
            assert_eq!(part.extent(2), 25);
            // Other axes untouched.
            assert_eq!(part.extent(0), 4);
        }
    }

    #[test]
    fn test_split_remainder_goes_first() {
        let window = window_3d([1, 1, 10]);
        let parts: Vec<_> = (0..3).map(|id| window.split(2, id, 3)).collect();
        let extents: Vec<_> = parts.iter().map(|w| w.extent(2)).collect();
        assert_eq!(extents, [4, 3, 3]);
        assert_eq!(parts[1].dimension(2).start(), 4);
        assert_eq!(parts[2].dimension(2).end(), 10);
    }

    #[test]
    fn test_split_with_step_clips_last_end() {
        let mut window = Window::new();
        window.set(0, WindowDimension::new(0, 10, 4));
        // 3 iterations split 2 ways: 2 + 1.
        let a = window.split(0, 0, 2);
        let b = window.split(0, 1, 2);
        assert_eq!(a.dimension(0), WindowDimension::new(0, 8, 4));
        assert_eq!(b.dimension(0), WindowDimension::new(8, 10, 4));
    }

    #[test]
    fn test_collapse_contiguous_axes() {
        let window = window_3d([8, 4, 2]);
        let (collapsed, merged) = window.collapse_if_possible(&window, 1);
        assert!(merged);
        assert_eq!(collapsed.dimension(1), WindowDimension::new(0, 8, 1));
        assert_eq!(collapsed.dimension(2), WindowDimension::default());
        assert_eq!(
            collapsed.num_iterations_total(),
            window.num_iterations_total()
        );
    }

    #[test]
    fn test_collapse_refuses_partial_coverage() {
        let full = window_3d([8, 4, 4]);
        let mut partial = full.clone();
        partial.set(2, WindowDimension::new(0, 2, 1));
        let (_, merged) = partial.collapse_if_possible(&full, 1);
        assert!(!merged);
        assert!(partial.collapse(&full, 1).is_err());
    }
}
