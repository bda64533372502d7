use crate::common::Cell;

/// Reduce a walked path to its endpoints and the cells where the direction
/// of travel changes.
pub fn simplify_path(path: &[Cell]) -> Vec<Cell> {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return Vec::new();
    };
    if path.len() == 1 {
        return vec![first];
    }

    let mut simplified = vec![first];
    for window in path.windows(2).skip(1) {
        let (current, next) = (window[0], window[1]);
        // Heading from the last kept point, so straight runs of any length collapse.
        let prev = simplified[simplified.len() - 1];
        if heading(prev, current) != heading(current, next) {
            simplified.push(current);
        }
    }
    simplified.push(last);
    simplified
}

fn heading(from: Cell, to: Cell) -> (isize, isize) {
    (
        (to.0 as isize - from.0 as isize).signum(),
        (to.1 as isize - from.1 as isize).signum(),
    )
}
