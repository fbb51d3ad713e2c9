use nalgebra::Point3;

/// Backbone particle as seen by the distance-force generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneParticle {
    pub included: bool,
    pub segment: i32,
    pub position: Point3<f64>,
}

/// Harmonic distance restraint between two backbone force indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceForce {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
    pub force_constant: f64,
}

impl DistanceForce {
    /// `<first> <second> distance forceConstant`
    pub fn to_line(&self, decimals: usize) -> String {
        format!(
            "<{}> <{}> {:.prec$} {:.prec$}",
            self.first,
            self.second,
            self.distance,
            self.force_constant,
            prec = decimals
        )
    }
}

/// Included particles with their compacted 1-based force index.
fn included(particles: &[BackboneParticle]) -> Vec<(usize, &BackboneParticle)> {
    particles
        .iter()
        .filter(|p| p.included)
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect()
}

/// Distance restraints between included backbone particles `k` apart.
///
/// Excluded particles are dropped first and the remaining ones are numbered
/// consecutively from 1. A pair `(i, i + k)` is emitted when both members belong
/// to the same segment; its distance is scaled by `conversion`.
pub fn distance_forces(
    particles: &[BackboneParticle],
    distance_type: usize,
    conversion: f64,
    force_constant: f64,
) -> Vec<DistanceForce> {
    if distance_type == 0 {
        return Vec::new();
    }
    let active = included(particles);
    if active.len() < distance_type + 1 {
        return Vec::new();
    }
    active
        .iter()
        .zip(active.iter().skip(distance_type))
        .filter(|((_, a), (_, b))| a.segment == b.segment)
        .map(|((i, a), (j, b))| DistanceForce {
            first: *i,
            second: *j,
            distance: nalgebra::distance(&a.position, &b.position) * conversion,
            force_constant,
        })
        .collect()
}

/// Largest `k` for which [`distance_forces`] is not empty, 0 if there is none.
pub fn max_distance_type(particles: &[BackboneParticle]) -> usize {
    let segments: Vec<i32> = included(particles).iter().map(|(_, p)| p.segment).collect();
    (1..segments.len())
        .rev()
        .find(|&k| segments.iter().zip(&segments[k..]).any(|(a, b)| a == b))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(x: f64, segment: i32, included: bool) -> BackboneParticle {
        BackboneParticle {
            included,
            segment,
            position: Point3::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn three_residue_chain_gives_two_nearest_neighbour_forces() {
        let particles = [
            particle(0.0, 0, true),
            particle(3.8, 0, true),
            particle(7.6, 0, true),
        ];
        let forces = distance_forces(&particles, 1, 0.5, 10.0);
        assert_eq!(forces.len(), 2);
        assert_eq!((forces[0].first, forces[0].second), (1, 2));
        assert_eq!((forces[1].first, forces[1].second), (2, 3));
        assert_eq!(forces[0].to_line(3), "<1> <2> 1.900 10.000");
    }

    #[test]
    fn excluded_particles_are_compacted_away() {
        let particles = [
            particle(0.0, 0, true),
            particle(1.0, 0, false),
            particle(2.0, 0, true),
            particle(3.0, 0, true),
        ];
        let forces = distance_forces(&particles, 1, 1.0, 1.0);
        assert_eq!(forces.len(), 2);
        assert_eq!((forces[0].first, forces[0].second), (1, 2));
        assert!((forces[0].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn pairs_never_cross_segments() {
        let particles = [
            particle(0.0, 1, true),
            particle(1.0, 1, true),
            particle(2.0, 2, true),
            particle(3.0, 2, true),
        ];
        let forces = distance_forces(&particles, 1, 1.0, 1.0);
        let pairs: Vec<(usize, usize)> = forces.iter().map(|f| (f.first, f.second)).collect();
        assert_eq!(pairs, vec![(1, 2), (3, 4)]);
        assert!(distance_forces(&particles, 2, 1.0, 1.0).is_empty());
        assert_eq!(max_distance_type(&particles), 1);
    }

    #[test]
    fn short_segments_yield_no_forces() {
        let particles = [particle(0.0, 0, true), particle(1.0, 0, true)];
        assert!(distance_forces(&particles, 2, 1.0, 1.0).is_empty());
        assert!(distance_forces(&particles, 0, 1.0, 1.0).is_empty());
        assert!(distance_forces(&[particle(0.0, 0, false)], 1, 1.0, 1.0).is_empty());
    }

    #[test]
    fn max_distance_type_spans_the_longest_segment() {
        let particles = [
            particle(0.0, 1, true),
            particle(0.0, 2, true),
            particle(0.0, 2, true),
            particle(0.0, 2, true),
            particle(0.0, 1, false),
        ];
        assert_eq!(max_distance_type(&particles), 2);
        assert_eq!(max_distance_type(&[]), 0);
        assert_eq!(max_distance_type(&[particle(0.0, 0, true)]), 0);
    }
}
