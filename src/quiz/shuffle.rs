use rand::Rng;

/// Returns a uniformly shuffled copy of `items`, leaving the input untouched.
///
/// Walks from the last index down to 1, swapping each slot with a random
/// slot in `0..=i`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}
