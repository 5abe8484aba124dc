//! Back-list reordering for duplex registration.
//!
//! The back pairs are printed in reverse document order so that, once the
//! stack is flipped, each document's back sheet lands behind its own front
//! sheet.

use crate::constants::PAGES_PER_SIDE;

/// Reverse the order of consecutive pairs, keeping each pair intact.
///
/// Pairs are counted from the end of the list. With an odd length the
/// first entry is left over and ends up last.
pub fn reverse_pairs<T: Clone>(list: &[T]) -> Vec<T> {
    list.rchunks(PAGES_PER_SIDE)
        .flat_map(|pair| pair.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageRef;

    #[test]
    fn test_empty_list() {
        let empty: Vec<u32> = Vec::new();
        assert!(reverse_pairs(&empty).is_empty());
    }

    #[test]
    fn test_single_pair_unchanged() {
        assert_eq!(reverse_pairs(&["a", "b"]), vec!["a", "b"]);
    }

    #[test]
    fn test_pairs_reverse_and_keep_internal_order() {
        let list = ["a0", "a1", "b0", "b1", "c0", "c1"];
        assert_eq!(
            reverse_pairs(&list),
            vec!["c0", "c1", "b0", "b1", "a0", "a1"]
        );
    }

    #[test]
    fn test_pair_position_property() {
        let k = 5;
        let list: Vec<(usize, usize)> = (0..k).flat_map(|d| [(d, 0), (d, 1)]).collect();
        let reversed = reverse_pairs(&list);

        for i in 0..k {
            let target = k - 1 - i;
            assert_eq!(reversed[2 * target], list[2 * i]);
            assert_eq!(reversed[2 * target + 1], list[2 * i + 1]);
        }
    }

    #[test]
    fn test_odd_length_pairs_from_the_end() {
        assert_eq!(reverse_pairs(&[1, 2, 3]), vec![2, 3, 1]);
        assert_eq!(reverse_pairs(&[1, 2, 3, 4, 5]), vec![4, 5, 2, 3, 1]);
        assert_eq!(reverse_pairs(&[1]), vec![1]);
    }

    #[test]
    fn test_reversal_is_an_involution_on_even_lists() {
        let list = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(reverse_pairs(&reverse_pairs(&list)), list.to_vec());
    }

    #[test]
    fn test_blank_pairs_move_with_their_document() {
        let list = [
            PageRef::page(0, 2),
            PageRef::page(0, 3),
            PageRef::BLANK,
            PageRef::BLANK,
        ];
        assert_eq!(
            reverse_pairs(&list),
            vec![
                PageRef::BLANK,
                PageRef::BLANK,
                PageRef::page(0, 2),
                PageRef::page(0, 3)
            ]
        );
    }
}
