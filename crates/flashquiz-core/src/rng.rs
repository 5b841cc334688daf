// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A minimal, zero-dependency, completely insecure PRNG to shuffle the cards.
#[derive(Clone, Debug)]
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed the RNG from the wall clock.
    #[cfg(feature = "clock")]
    pub fn from_clock() -> Self {
        let seed = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default() as u64;
        Self::from_seed(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    // Generate random number in range [0, max).
    pub fn generate(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(v: Vec<T>, rng: &mut TinyRng) -> Vec<T> {
    let mut v = v;
    for i in (1..v.len()).rev() {
        let j = rng.generate(i as u32 + 1) as usize;
        v.swap(i, j);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = TinyRng::from_seed(42);
        let original: Vec<u32> = (0..50).collect();
        let mut shuffled = shuffle(original.clone(), &mut rng);
        assert_ne!(shuffled, original);
        shuffled.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let a = shuffle((0..10).collect::<Vec<u32>>(), &mut TinyRng::from_seed(7));
        let b = shuffle((0..10).collect::<Vec<u32>>(), &mut TinyRng::from_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_degenerate_inputs() {
        let mut rng = TinyRng::from_seed(1);
        assert_eq!(shuffle(Vec::<u32>::new(), &mut rng), Vec::<u32>::new());
        assert_eq!(shuffle(vec![9], &mut rng), vec![9]);
    }

    /// Every element should land in every slot roughly equally often.
    #[test]
    fn test_shuffle_is_roughly_uniform() {
        let mut rng = TinyRng::from_seed(2024);
        let mut counts = [[0u32; 4]; 4];
        let trials = 8000;
        for _ in 0..trials {
            let v = shuffle(vec![0usize, 1, 2, 3], &mut rng);
            for (slot, value) in v.into_iter().enumerate() {
                counts[value][slot] += 1;
            }
        }
        let expected = trials / 4;
        for row in counts {
            for count in row {
                assert!(count.abs_diff(expected) < expected / 5, "{count}");
            }
        }
    }
}
