/// Resolves Redis-style inclusive `start`/`stop` indexes against a sequence of `len` items.
/// Negative indexes count from the end (`-1` is the last item); out-of-range values are clamped.
///
/// Returns `None` when the resulting range is empty.
pub fn resolve(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len || stop < 0 {
        return None;
    }

    Some((start as usize, stop as usize))
}

/// Resolves a single index, negative counting from the end. `None` when out of range.
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { len + index } else { index };
    (0..len).contains(&index).then_some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_and_negative_bounds() {
        assert_eq!(resolve(0, -1, 5), Some((0, 4)));
        assert_eq!(resolve(-3, -1, 5), Some((2, 4)));
        assert_eq!(resolve(1, 2, 5), Some((1, 2)));
        assert_eq!(resolve(-100, 100, 5), Some((0, 4)));
    }

    #[test]
    fn empty_ranges() {
        assert_eq!(resolve(0, -1, 0), None);
        assert_eq!(resolve(3, 1, 5), None);
        assert_eq!(resolve(5, 10, 5), None);
        assert_eq!(resolve(0, -6, 5), None);
    }

    #[test]
    fn single_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(resolve_index(-4, 3), None);
    }
}
