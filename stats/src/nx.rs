use num_traits::PrimInt;

/// Smallest item such that items at least that large make up `fraction` of
/// the total. `None` for an empty list.
fn nx<T: PrimInt>(items: &[T], fraction: f64) -> Option<T> {
    assert!(fraction > 0f64 && fraction < 1f64);

    let mut sorted = items.to_vec();
    sorted.sort_unstable_by(|x, y| y.cmp(x));

    let total: f64 = sorted.iter().map(|x| x.to_f64().unwrap_or(0.0)).sum();
    let cutoff = total * fraction;
    let mut cumulative = 0f64;
    for item in sorted {
        cumulative += item.to_f64().unwrap_or(0.0);
        if cumulative >= cutoff {
            return Some(item);
        }
    }
    None
}

/// Compute the N50 of a list of lengths: half of all bases sit in items of
/// this length or longer.
///
/// # Example
/// ```rust
/// use stats::n50;
/// let lengths: Vec<usize> = vec![2, 3, 4, 5, 6, 7, 8, 9, 10];
/// assert_eq!(n50(&lengths), Some(8));
/// assert_eq!(n50::<usize>(&[]), None);
/// ```
pub fn n50<T: PrimInt>(items: &[T]) -> Option<T> {
    nx(items, 0.5f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n50_unsorted_input() {
        assert_eq!(n50(&[70, 60, 50, 40, 30, 100, 50]), Some(60));
        assert_eq!(n50(&[68, 90, 11, 50, 15, 57, 27, 67, 24, 45]), Some(57));
    }

    #[test]
    fn test_n50_single_contig() {
        assert_eq!(n50(&[1234usize]), Some(1234));
    }
}
