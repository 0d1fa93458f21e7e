#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use pagecodec_core::compression::codecs::bsr::{
        bound, compress_into, decompress_into, longest_zero_run,
    };
    use pagecodec_core::compression::CompressionError;

    fn pack(page: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; bound(page.len())];
        let n = compress_into(page, &mut out).expect("bsr compress");
        out.truncate(n);
        out
    }

    fn unpack(stored: &[u8], page_len: usize) -> Vec<u8> {
        let mut out = vec![0xEEu8; page_len];
        let n = decompress_into(stored, &mut out).expect("bsr decompress");
        assert_eq!(n, page_len);
        out
    }

    #[test]
    fn all_zero_page_is_header_only() {
        let page = [0u8; 64];
        let stored = pack(&page);
        assert_eq!(stored, vec![0x00, 0x00]);
        assert_eq!(unpack(&stored, 64), page.to_vec());
    }

    #[test]
    fn page_without_zeros_grows_by_two() {
        let page: Vec<u8> = (1..=200u8).collect();
        let stored = pack(&page);
        assert_eq!(stored.len(), page.len() + 2);
        assert_eq!(&stored[..2], &[0, 0]);
        assert_eq!(&stored[2..], &page[..]);
    }

    #[test]
    fn typical_page_layout() {
        // header, cell pointers, free space, cell content
        let mut page = vec![0u8; 4096];
        page[..100].fill(0x0D);
        page[3900..].fill(0x42);
        let stored = pack(&page);
        assert_eq!(stored.len(), 2 + 100 + 196);
        assert_eq!(&stored[..2], &[0x00, 0x64]);
        assert_eq!(unpack(&stored, 4096), page);
    }

    #[test]
    fn empty_page_round_trips() {
        let stored = pack(&[]);
        assert_eq!(stored, vec![0, 0]);
        assert!(unpack(&stored, 0).is_empty());
    }

    #[test]
    fn undersized_destination_is_rejected() {
        let page = [1u8, 2, 3, 0, 0];
        let mut out = [0u8; 3];
        assert_eq!(
            compress_into(&page, &mut out),
            Err(CompressionError::BufferTooSmall { need: 5, have: 3 })
        );
    }

    #[test]
    fn corrupt_streams_are_rejected() {
        let mut out = [0u8; 8];
        // no header
        assert!(matches!(decompress_into(&[0x00], &mut out), Err(CompressionError::CorruptInput(_))));
        // head offset beyond the body
        assert!(matches!(
            decompress_into(&[0x00, 0x05, 1, 2], &mut out),
            Err(CompressionError::CorruptInput(_))
        ));
        // body longer than the page
        assert!(matches!(
            decompress_into(&[0x00, 0x00, 1, 2, 3, 4, 5, 6, 7, 8, 9], &mut out),
            Err(CompressionError::CorruptInput(_))
        ));
    }

    #[test]
    fn seeded_sparse_pages_round_trip() {
        let mut rng = StdRng::seed_from_u64(0xB5B5);
        for _ in 0..64 {
            let len = rng.gen_range(0..8192);
            let page: Vec<u8> = (0..len)
                .map(|_| if rng.gen_bool(0.6) { 0 } else { rng.gen() })
                .collect();
            assert_eq!(unpack(&pack(&page), len), page);
        }
    }

    proptest! {
        #[test]
        fn prop_size_law(page in proptest::collection::vec(prop_oneof![Just(0u8), any::<u8>()], 0..2048)) {
            let (_, zeros) = longest_zero_run(&page);
            let stored = pack(&page);
            prop_assert_eq!(stored.len(), 2 + page.len() - zeros);
            prop_assert!(stored.len() <= page.len() + 2);
        }

        #[test]
        fn prop_round_trip(page in proptest::collection::vec(prop_oneof![Just(0u8), any::<u8>()], 0..4096)) {
            let stored = pack(&page);
            prop_assert_eq!(unpack(&stored, page.len()), page);
        }
    }
}
