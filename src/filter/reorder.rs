//! Reorder filtered points to follow an explicit include list.

use crate::core::schema::BuildPoint;

use super::pipeline::resequence;
use super::range::BuildList;

/// Sort `points` into `include` order and renumber them.
///
/// Without an include list the points are returned unchanged. The sort is
/// stable; labels missing from the list sort first, keeping their relative
/// order.
pub fn reorder(mut points: Vec<BuildPoint>, include: Option<&BuildList>) -> Vec<BuildPoint> {
    let Some(include) = include else {
        return points;
    };
    // None < Some(_), so labels absent from the list come first
    points.sort_by_key(|p| include.position(&p.x_label));
    resequence(&mut points);
    points
}
