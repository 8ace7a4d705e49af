use noise::NoiseFn;

/// Presents a 3D noise through a 2D interface by pinning the third axis.
///
/// Lets a 3D octave composite drive a 2D height field.
#[derive(Clone, Debug)]
pub struct Noise3dTo2dAdapter<N> {
    source: N,
    fixed: f64,
}

impl<N> Noise3dTo2dAdapter<N> {
    /// Adapter evaluating `source` at `z = 0`.
    pub fn new(source: N) -> Self {
        Self::with_fixed(source, 0.0)
    }

    /// Adapter evaluating `source` at `z = fixed`.
    pub fn with_fixed(source: N, fixed: f64) -> Self {
        Self { source, fixed }
    }
}

impl<N: NoiseFn<f64, 3>> NoiseFn<f64, 2> for Noise3dTo2dAdapter<N> {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.source.get([point[0], point[1], self.fixed])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BrownianNoise, PerlinNoise, WorldSeed};

    #[test]
    fn test_adapter_matches_3d_at_fixed_axis() {
        let fbm = BrownianNoise::new(PerlinNoise::new(WorldSeed::new(4)), 8).unwrap();
        let adapter = Noise3dTo2dAdapter::new(fbm.clone());
        for i in 0..40 {
            let (x, y) = (i as f64 * 0.23, i as f64 * -0.41);
            let expected = NoiseFn::<f64, 3>::get(&fbm, [x, y, 0.0]);
            assert_eq!(adapter.get([x, y]), expected);
        }
    }

    #[test]
    fn test_fixed_coordinate_changes_slice() {
        let perlin = PerlinNoise::new(WorldSeed::new(4));
        let a = Noise3dTo2dAdapter::new(perlin.clone());
        let b = Noise3dTo2dAdapter::with_fixed(perlin, 0.5);
        let differs = (0..20).any(|i| {
            let p = [i as f64 * 0.3 + 0.1, i as f64 * 0.7 + 0.2];
            (a.get(p) - b.get(p)).abs() > 1e-9
        });
        assert!(differs);
    }
}
