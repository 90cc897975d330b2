/// Number of bins used for contig length distributions.
pub const DEFAULT_NUM_BINS: usize = 10;

/// One bin of a length histogram, covering `[lower, upper)` bases.
/// The last bin of a histogram also includes its upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// Number of items in the bin.
    pub count: usize,
    /// Inclusive lower bound.
    pub lower: f64,
    /// Exclusive upper bound (inclusive for the last bin).
    pub upper: f64,
}

/// Bin `items` into `num_bins` equal-width bins spanning `[min, max]`.
///
/// An empty input gives no bins. When every item has the same value the
/// width would be zero; a single bin `[value, value + 1)` holding all items
/// is returned instead.
pub fn histogram(items: &[usize], num_bins: usize) -> Vec<HistogramBin> {
    assert!(num_bins > 0);
    let (Some(&min), Some(&max)) = (items.iter().min(), items.iter().max()) else {
        return Vec::new();
    };

    if min == max {
        return vec![HistogramBin {
            count: items.len(),
            lower: min as f64,
            upper: min as f64 + 1.0,
        }];
    }

    let span = (max - min) as u128;
    let edge = |i: usize| min as f64 + (max - min) as f64 * i as f64 / num_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            count: 0,
            lower: edge(i),
            upper: edge(i + 1),
        })
        .collect();

    for &x in items {
        // exact integer floor of (x - min) / width
        let idx = ((x - min) as u128 * num_bins as u128 / span) as usize;
        bins[idx.min(num_bins - 1)].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_add_up() {
        let items = vec![300, 301, 450, 999, 1000, 1000, 2500, 312, 700];
        let bins = histogram(&items, DEFAULT_NUM_BINS);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), items.len());
        assert_eq!(bins[0].lower, 300.0);
        assert_eq!(bins[9].upper, 2500.0);
        // max lands in the last bin
        assert_eq!(bins[9].count, 1);
    }

    #[test]
    fn test_bin_edges() {
        let bins = histogram(&[0, 100], 10);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[9].count, 1);
        assert_eq!((bins[3].lower, bins[3].upper), (30.0, 40.0));
        assert!(bins[1..9].iter().all(|b| b.count == 0));

        // values on an inner edge go to the bin starting there
        let bins = histogram(&[0, 10, 100], 10);
        assert_eq!(bins[1].count, 1);
    }

    #[test]
    fn test_equal_lengths_share_one_bin() {
        let bins = histogram(&[500, 500, 500, 500], DEFAULT_NUM_BINS);
        assert_eq!(
            bins,
            vec![HistogramBin {
                count: 4,
                lower: 500.0,
                upper: 501.0
            }]
        );
        assert_eq!(histogram(&[77], 10).len(), 1);
    }

    #[test]
    fn test_empty() {
        assert!(histogram(&[], DEFAULT_NUM_BINS).is_empty());
    }
}
