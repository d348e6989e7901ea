use rand::Rng;

/// Returns a uniformly random permutation of `input` without mutating it.
///
/// Fisher-Yates from the last index down to 1, swapping with a uniformly
/// chosen partner in `[0, i]`.
pub fn shuffled<T: Clone, R: Rng>(input: &[T], rng: &mut R) -> Vec<T> {
    let mut out = input.to_vec();

    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }

    out
}
