//! Reference iteration over a window's coordinates

use super::core::Window;
use crate::tensor::Coordinates;

/// Visit every coordinate of `window` in row-major order: axis 0 (the
/// innermost) varies fastest, the outermost axis slowest.
///
/// A zero-dimensional window is visited exactly once at the origin; a
/// window with any empty axis is not visited at all.
pub fn execute_window_loop<F>(window: &Window, mut f: F)
where
    F: FnMut(&Coordinates),
{
    let rank = window.num_dimensions();
    if rank == 0 {
        f(&Coordinates::new());
        return;
    }
    if window.num_iterations_total() == 0 {
        return;
    }

    let mut coords: Coordinates = (0..rank).map(|axis| window.dimension(axis).start()).collect();
    loop {
        f(&coords);

        // Odometer increment, carrying from the innermost axis outward.
        let mut axis = 0;
        loop {
            if axis == rank {
                return;
            }
            let dim = window.dimension(axis);
            coords[axis] += dim.step() as isize;
            if coords[axis] < dim.end() {
                break;
            }
            coords[axis] = dim.start();
            axis += 1;
        }
    }
}
