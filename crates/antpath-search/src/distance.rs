use antpath_core::{Node, TilePos};

/// Octile distance between two tiles: diagonal steps weigh √2, straight
/// steps 1.
///
/// Adjacent steps are charged [`step_cost`], which prices diagonals the
/// same as straight moves, so this estimate can exceed the real remaining
/// cost on diagonal-heavy routes.
#[inline]
pub fn octile(a: TilePos, b: TilePos) -> f32 {
    let (dx, dy) = a.abs_diff(b);
    let (dx, dy) = (dx as f32, dy as f32);
    (dx + dy) + (std::f32::consts::SQRT_2 - 2.0) * dx.min(dy)
}

/// Cost of stepping onto the adjacent node `to`, in any of the 8
/// directions.
#[inline]
pub fn step_cost(to: &Node) -> f32 {
    to.travel_cost_modifier()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octile_straight_and_diagonal() {
        let o = TilePos::new(0, 0);
        assert_eq!(octile(o, o), 0.0);
        assert_eq!(octile(o, TilePos::new(4, 0)), 4.0);
        assert_eq!(octile(o, TilePos::new(0, 3)), 3.0);
        let d = octile(o, TilePos::new(3, 3));
        assert!((d - 3.0 * std::f32::consts::SQRT_2).abs() < 1e-5);
        // Two diagonal steps plus one straight.
        let m = octile(TilePos::new(5, 1), TilePos::new(2, 3));
        assert!((m - (1.0 + 2.0 * std::f32::consts::SQRT_2)).abs() < 1e-5);
    }

    #[test]
    fn octile_is_symmetric() {
        let a = TilePos::new(7, 2);
        let b = TilePos::new(1, 9);
        assert_eq!(octile(a, b), octile(b, a));
    }
}
