use crate::domain::ValueSource;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// [`ValueSource`] backed by the `fake` lorem generators and a `rand` RNG.
pub struct FakeSource<R: Rng = StdRng> {
    rng: R,
}

impl FakeSource<StdRng> {
    /// Source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source for tests and `--seed`
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FakeSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ValueSource for FakeSource<R> {
    fn word(&mut self) -> String {
        Word().fake_with_rng(&mut self.rng)
    }

    fn sentence(&mut self) -> String {
        Sentence(3..8).fake_with_rng(&mut self.rng)
    }

    fn random_int(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn random_float(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        if (high - low).is_finite() {
            return self.rng.gen_range(low..=high);
        }
        // Span overflows f64; interpolate on halves instead.
        let t: f64 = self.rng.gen();
        (low + t * (high / 2.0 - low / 2.0) * 2.0).clamp(low, high)
    }

    fn boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}
