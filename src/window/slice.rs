//! 3D slice iteration over higher-dimensional windows
//!
//! Kernel inner loops only know how to iterate in 3D. A window of any rank
//! is driven by taking its first 3D slice and sliding it along the outer
//! axes until exhausted:
//!
//! ```rust,ignore
//! let mut slice = window.first_slice_3d();
//! loop {
//!     run_3d(&slice);
//!     if !window.slide_slice_3d(&mut slice) {
//!         break;
//!     }
//! }
//! ```

use super::core::{Window, WindowDimension};

impl Window {
    /// The window restricted to its 3 innermost axes; every outer axis is
    /// pinned to a single iteration at its start.
    pub fn first_slice_3d(&self) -> Window {
        let mut slice = Window::new();
        for axis in 0..3.min(self.num_dimensions()) {
            slice.set(axis, self.dimension(axis));
        }
        for axis in 3..self.num_dimensions() {
            let dim = self.dimension(axis);
            slice.set(axis, WindowDimension::new(dim.start(), dim.start() + 1, 1));
        }
        slice
    }

    /// Advance a slice obtained from [`Window::first_slice_3d`] to the next
    /// position, stepping axis 3 first and carrying into higher axes in
    /// row-major order. Returns `false` once every position has been
    /// visited; the slice is then reset to the first position.
    pub fn slide_slice_3d(&self, slice: &mut Window) -> bool {
        for axis in 3..self.num_dimensions() {
            let dim = self.dimension(axis);
            let next = slice.dimension(axis).start() + dim.step() as isize;
            if next < dim.end() {
                slice.set(axis, WindowDimension::new(next, next + 1, 1));
                return true;
            }
            slice.set(axis, WindowDimension::new(dim.start(), dim.start() + 1, 1));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_from(extents: &[usize]) -> Window {
        let mut window = Window::new();
        for (axis, &extent) in extents.iter().enumerate() {
            window.set(axis, WindowDimension::new(0, extent as isize, 1));
        }
        window
    }

    #[test]
    fn test_3d_window_yields_single_slice() {
        let window = window_from(&[4, 3, 2]);
        let mut slice = window.first_slice_3d();
        assert_eq!(slice, window);
        assert!(!window.slide_slice_3d(&mut slice));
    }

    #[test]
    fn test_5d_window_visits_all_outer_positions() {
        let window = window_from(&[4, 3, 2, 3, 2]);
        let mut slice = window.first_slice_3d();
        let mut visited = Vec::new();
        loop {
            visited.push((slice.dimension(3).start(), slice.dimension(4).start()));
            if !window.slide_slice_3d(&mut slice) {
                break;
            }
        }
        // Axis 3 varies fastest, axis 4 slowest.
        assert_eq!(
            visited,
            [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_outer_axis_advances_by_step() {
        let mut window = window_from(&[2, 2, 1]);
        window.set(3, WindowDimension::new(0, 8, 2));
        let mut slice = window.first_slice_3d();
        let mut starts = Vec::new();
        loop {
            starts.push(slice.dimension(3).start());
            if !window.slide_slice_3d(&mut slice) {
                break;
            }
        }
        assert_eq!(starts, [0, 2, 4, 6]);
    }

    #[test]
    fn test_inner_dimensions_preserved_in_slice() {
        let mut window = window_from(&[10, 5, 3, 2]);
        window.set(0, WindowDimension::new(2, 10, 4));
        let slice = window.first_slice_3d();
        assert_eq!(slice.dimension(0), WindowDimension::new(2, 10, 4));
        assert_eq!(slice.dimension(3), WindowDimension::new(0, 1, 1));
    }
}
