use crate::core::{error::EngineError, rule_helper};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

/// Settled value of the six-sided die.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieFace(u8);

impl DieFace {
    pub fn new(value: u8) -> Result<Self, EngineError> {
        if (rule_helper::DIE_FACE_MIN..=rule_helper::DIE_FACE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::InvalidFace(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn steps(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = DieFace> {
        (rule_helper::DIE_FACE_MIN..=rule_helper::DIE_FACE_MAX).map(DieFace)
    }

    /// Euler rotation (x, y, z radians) that leaves this face pointing up on a
    /// die modelled with 1 on +Y, 6 on -Y, 2 on +Z, 5 on -Z, 3 on +X, 4 on -X.
    /// The roll animation lands on this orientation; it never feeds back into
    /// which face was rolled.
    pub fn upright_rotation(self) -> [f32; 3] {
        match self.0 {
            1 => [0.0, 0.0, 0.0],
            2 => [-FRAC_PI_2, 0.0, 0.0],
            3 => [0.0, 0.0, FRAC_PI_2],
            4 => [0.0, 0.0, -FRAC_PI_2],
            5 => [FRAC_PI_2, 0.0, 0.0],
            _ => [PI, 0.0, 0.0],
        }
    }
}

impl TryFrom<u8> for DieFace {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieFace::new(value)
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> Self {
        face.0
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seed for a session RNG when the caller did not supply one.
#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let low = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (high << 32) | low
}

#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Uniform, independent die roll.
pub fn roll_face<R: Rng + ?Sized>(rng: &mut R) -> DieFace {
    DieFace(rng.random_range(rule_helper::DIE_FACE_MIN..=rule_helper::DIE_FACE_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::{SeedableRng, rngs::StdRng};

    const NUM_ROLLS: usize = 10_000;
    // chi-square, 5 degrees of freedom, p = 0.001
    const CHI_SQUARE_CRITICAL: f64 = 20.515;

    #[test]
    fn new_rejects_out_of_range_faces() {
        assert_eq!(DieFace::new(0), Err(EngineError::InvalidFace(0)));
        assert_eq!(DieFace::new(7), Err(EngineError::InvalidFace(7)));
        assert_eq!(DieFace::new(6).map(DieFace::value), Ok(6));
    }

    #[test]
    fn serde_rejects_out_of_range_faces() {
        assert_eq!(serde_json::from_str::<DieFace>("4").unwrap(), DieFace(4));
        assert!(serde_json::from_str::<DieFace>("9").is_err());
        assert_eq!(serde_json::to_string(&DieFace(2)).unwrap(), "2");
    }

    #[test]
    fn roll_face_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let face = roll_face(&mut rng);
            assert!((1..=6).contains(&face.value()));
        }
    }

    #[test]
    fn roll_face_is_uniform_by_chi_square() {
        let mut rng = StdRng::seed_from_u64(20_240_611);
        let counts = (0..NUM_ROLLS).map(|_| roll_face(&mut rng)).counts();

        assert_eq!(counts.len(), rule_helper::NUM_DIE_FACES);
        let expected = NUM_ROLLS as f64 / rule_helper::NUM_DIE_FACES as f64;
        let chi_square: f64 = DieFace::all()
            .map(|face| {
                let observed = counts.get(&face).copied().unwrap_or(0) as f64;
                (observed - expected).powi(2) / expected
            })
            .sum();

        assert!(
            chi_square < CHI_SQUARE_CRITICAL,
            "chi-square {chi_square:.3} exceeds {CHI_SQUARE_CRITICAL}"
        );
    }

    #[test]
    fn next_face_is_not_determined_by_previous_face() {
        let mut rng = StdRng::seed_from_u64(99);
        let rolls = (0..NUM_ROLLS).map(|_| roll_face(&mut rng)).collect::<Vec<_>>();
        let followers = rolls
            .iter()
            .tuple_windows()
            .map(|(prev, next)| (*prev, *next))
            .into_group_map();

        for face in DieFace::all() {
            let distinct_followers = followers
                .get(&face)
                .map(|nexts| nexts.iter().unique().count())
                .unwrap_or(0);
            assert_eq!(
                distinct_followers,
                rule_helper::NUM_DIE_FACES,
                "face {face} was followed by only {distinct_followers} distinct faces"
            );
        }
    }

    #[test]
    fn upright_rotations_are_distinct() {
        let rotations = DieFace::all()
            .map(|face| face.upright_rotation())
            .collect::<Vec<_>>();
        for (a, b) in rotations.iter().tuple_combinations() {
            assert_ne!(a, b);
        }
        assert_eq!(DieFace(1).upright_rotation(), [0.0, 0.0, 0.0]);
        assert_eq!(DieFace(6).upright_rotation(), [PI, 0.0, 0.0]);
    }
}
