use rand::Rng;
use rand::seq::SliceRandom;

/// Number of positions on the ring.
pub const NUM_LIGHTS: usize = 30;

// Fixed multiset of point values dealt onto the ring each game, highest
// value first. Any positions left over are dead (zero-value) lights.
const POINT_VALUE_DEAL: [(u32, usize); 4] = [(10, 4), (5, 3), (2, 6), (1, 17)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Light {
    pub point_value: u32,
    pub is_main_target: bool,
}

impl Light {
    fn with_value(point_value: u32) -> Self {
        Light {
            point_value,
            is_main_target: point_value == 10,
        }
    }
}

/// The fixed circle of lights the cycle walks. Dealt once per game start,
/// immutable until the next one.
#[derive(Debug, Clone)]
pub struct Ring {
    lights: Vec<Light>,
}

impl Ring {
    /// Deals the point-value multiset onto a fresh ring in shuffled order.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = Vec::with_capacity(NUM_LIGHTS);
        for &(value, count) in &POINT_VALUE_DEAL {
            values.extend(std::iter::repeat_n(value, count));
        }
        values.resize(NUM_LIGHTS, 0);
        values.shuffle(rng);

        Ring {
            lights: values.into_iter().map(Light::with_value).collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_values(values: &[u32]) -> Self {
        Ring {
            lights: values.iter().map(|&v| Light::with_value(v)).collect(),
        }
    }

    pub fn light(&self, index: usize) -> &Light {
        &self.lights[index]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
