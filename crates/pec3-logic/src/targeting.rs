//! Nearest-candidate resolution for threat lists.

use crate::vector::Vec3;

/// Scan `candidates`, drop every entry `locate` cannot place (stale), and
/// return the closest survivor to `origin` together with the pruned list.
///
/// Survivors keep their relative order. On equal distance the earlier entry
/// wins. Returns `(None, [])` when nothing survives.
pub fn resolve_nearest<H: Copy>(
    origin: Vec3,
    candidates: &[H],
    mut locate: impl FnMut(H) -> Option<Vec3>,
) -> (Option<H>, Vec<H>) {
    let mut survivors = Vec::with_capacity(candidates.len());
    let mut nearest: Option<(H, f32)> = None;

    for &handle in candidates {
        let Some(position) = locate(handle) else {
            continue;
        };
        survivors.push(handle);
        let distance = origin.distance_squared(&position);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((handle, distance)),
        }
    }

    (nearest.map(|(h, _)| h), survivors)
}
