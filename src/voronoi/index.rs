//! Bucket index answering nearest-site queries.

use glam::Vec2;

/// Uniform bucket grid over the map holding site ids.
#[derive(Debug, Clone)]
pub(crate) struct SiteIndex {
    cols: usize,
    rows: usize,
    cell_w: f32,
    cell_h: f32,
    buckets: Vec<Vec<usize>>,
}

impl SiteIndex {
    pub(crate) fn new(sites: &[Vec2], width: f32, height: f32) -> Self {
        let side = ((sites.len() as f32).sqrt().ceil() as usize).max(1);
        let mut index = Self {
            cols: side,
            rows: side,
            cell_w: width / side as f32,
            cell_h: height / side as f32,
            buckets: vec![Vec::new(); side * side],
        };
        for (id, site) in sites.iter().enumerate() {
            let (gx, gy) = index.coords(*site);
            index.buckets[gy * index.cols + gx].push(id);
        }
        index
    }

    fn coords(&self, p: Vec2) -> (usize, usize) {
        let gx = (p.x / self.cell_w).max(0.0) as usize;
        let gy = (p.y / self.cell_h).max(0.0) as usize;
        (gx.min(self.cols - 1), gy.min(self.rows - 1))
    }

    /// Id of the site closest to `p`, ties going to the lower id.
    ///
    /// Searches rings of buckets outward from the query bucket and stops once
    /// no unvisited ring can hold a closer site.
    pub(crate) fn nearest(&self, sites: &[Vec2], p: Vec2) -> Option<usize> {
        if sites.is_empty() || !p.is_finite() {
            return None;
        }
        let (gx, gy) = self.coords(p);
        let gx = gx as isize;
        let gy = gy as isize;
        let max_ring = self.cols.max(self.rows) as isize;
        let ring_step = self.cell_w.min(self.cell_h);

        let mut best: Option<(f32, usize)> = None;
        for ring in 0..=max_ring {
            for ny in (gy - ring)..=(gy + ring) {
                for nx in (gx - ring)..=(gx + ring) {
                    let on_ring = (ny - gy).abs() == ring || (nx - gx).abs() == ring;
                    if !on_ring || nx < 0 || ny < 0 {
                        continue;
                    }
                    let (ux, uy) = (nx as usize, ny as usize);
                    if ux >= self.cols || uy >= self.rows {
                        continue;
                    }
                    for &id in &self.buckets[uy * self.cols + ux] {
                        let d = sites[id].distance_squared(p);
                        let closer = match best {
                            None => true,
                            Some((bd, bid)) => d < bd || (d == bd && id < bid),
                        };
                        if closer {
                            best = Some((d, id));
                        }
                    }
                }
            }
            // Anything beyond this ring is at least `ring * ring_step` away.
            if let Some((bd, _)) = best {
                let reach = ring as f32 * ring_step;
                if bd < reach * reach {
                    break;
                }
            }
        }
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(sites: &[Vec2], p: Vec2) -> usize {
        let mut best = 0;
        for (i, s) in sites.iter().enumerate() {
            if s.distance_squared(p) < sites[best].distance_squared(p) {
                best = i;
            }
        }
        best
    }

    #[test]
    fn test_matches_brute_force() {
        let sites: Vec<Vec2> = (0..57)
            .map(|i| {
                let t = i as f32;
                Vec2::new((t * 37.3) % 200.0, (t * 91.7) % 150.0)
            })
            .collect();
        let index = SiteIndex::new(&sites, 200.0, 150.0);
        for yi in 0..30 {
            for xi in 0..40 {
                let p = Vec2::new(xi as f32 * 5.0 + 0.3, yi as f32 * 5.0 + 0.7);
                let found = index.nearest(&sites, p).unwrap();
                let expected = brute_force(&sites, p);
                assert_eq!(
                    sites[found].distance_squared(p),
                    sites[expected].distance_squared(p)
                );
            }
        }
    }

    #[test]
    fn test_empty_and_nan() {
        let index = SiteIndex::new(&[], 10.0, 10.0);
        assert_eq!(index.nearest(&[], Vec2::ONE), None);

        let sites = [Vec2::new(1.0, 1.0)];
        let index = SiteIndex::new(&sites, 10.0, 10.0);
        assert_eq!(index.nearest(&sites, Vec2::new(f32::NAN, 0.0)), None);
        assert_eq!(index.nearest(&sites, Vec2::new(9.0, 9.0)), Some(0));
    }
}
