//! Duplex alignment for double-sided card sheets.
//!
//! After a sheet is printed on both sides and flipped, the card printed at
//! `(row, column)` on the back must sit behind the card at `(row, column)` on
//! the front. Flipping about the long (vertical) edge swaps left and right
//! but keeps top and bottom, so the back page reverses the column order of
//! every row and leaves the row order alone.
//!
//! Short-edge duplexing would also need the rows reversed; it is not
//! supported. Printers must be set to "flip on long edge".

/// Mirror a padded page for long-edge duplex printing.
///
/// `slots` is the full row-major page including empty slots; its length is
/// expected to be a multiple of `columns`. Output slot `(r, c)` holds input
/// slot `(r, columns - 1 - c)`. Empty slots are mirrored in place and never
/// move to another row. Applying the function twice gives back the input.
pub fn mirror_page<T: Clone>(slots: &[Option<T>], columns: usize) -> Vec<Option<T>> {
    if columns == 0 {
        return slots.to_vec();
    }
    debug_assert!(
        slots.len() % columns == 0,
        "page of {} slots is not a whole number of {columns}-wide rows",
        slots.len()
    );
    slots
        .chunks(columns)
        .flat_map(|row| row.iter().rev().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{pad, GridSpec};
    use proptest::prelude::*;

    #[test]
    fn reverses_each_row() {
        let front: Vec<Option<u8>> = (0..12).map(Some).collect();
        let back = mirror_page(&front, 3);
        let expected: Vec<Option<u8>> = [2, 1, 0, 5, 4, 3, 8, 7, 6, 11, 10, 9]
            .into_iter()
            .map(Some)
            .collect();
        assert_eq!(back, expected);
    }

    #[test]
    fn single_card_lands_at_right_edge_of_first_row() {
        let front = pad(&["only"], GridSpec::FLASHCARDS.capacity());
        let back = mirror_page(&front, GridSpec::FLASHCARDS.columns);
        assert_eq!(back[0], None);
        assert_eq!(back[1], None);
        assert_eq!(back[2], Some("only"));
        assert!(back[3..].iter().all(Option::is_none));
    }

    #[test]
    fn partial_row_stays_in_its_row() {
        let front = pad(&[1, 2, 3, 4], 12);
        let back = mirror_page(&front, 3);
        assert_eq!(&back[0..3], &[Some(3), Some(2), Some(1)]);
        assert_eq!(&back[3..6], &[None, None, Some(4)]);
    }

    proptest! {
        #[test]
        fn mirroring_is_an_involution(len in 0usize..=12) {
            let items: Vec<usize> = (0..len).collect();
            let page = pad(&items, 12);
            prop_assert_eq!(mirror_page(&mirror_page(&page, 3), 3), page);
        }

        #[test]
        fn outer_columns_swap(len in 0usize..=12) {
            let items: Vec<usize> = (0..len).collect();
            let page = pad(&items, 12);
            let mirrored = mirror_page(&page, 3);
            for r in 0..4 {
                prop_assert_eq!(&mirrored[r * 3], &page[r * 3 + 2]);
                prop_assert_eq!(&mirrored[r * 3 + 1], &page[r * 3 + 1]);
                prop_assert_eq!(&mirrored[r * 3 + 2], &page[r * 3]);
            }
        }
    }
}
