#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use pagecodec_core::compression::codecs::ndsc::{bound, compress_into, decompress_into};
    use pagecodec_core::compression::CompressionError;

    fn pack(page: &[u8], mode: i32) -> Vec<u8> {
        let mut out = vec![0u8; bound(page.len())];
        let n = compress_into(page, &mut out, mode).expect("ndsc compress");
        out.truncate(n);
        out
    }

    fn unpack(stored: &[u8], page_len: usize) -> Result<Vec<u8>, CompressionError> {
        let mut out = vec![0u8; page_len];
        decompress_into(stored, &mut out)?;
        Ok(out)
    }

    fn text_page(len: usize) -> Vec<u8> {
        b"CREATE TABLE t(id INTEGER PRIMARY KEY, name TEXT, body BLOB);"
            .iter()
            .cycle()
            .take(len)
            .copied()
            .collect()
    }

    #[test]
    fn repeated_byte_uses_run_command() {
        let page = [b'A'; 50];
        let stored = pack(&page, 4);
        // one literal, then cmd 1 with cnt = 49 - 3
        assert_eq!(stored, vec![0b0100_0000, b'A', 0x10, 0x2E]);
        assert_eq!(stored[2] >> 4, 1);
        assert!(stored.len() < 10);
        assert_eq!(unpack(&stored, 50).unwrap(), page.to_vec());
    }

    #[test]
    fn long_runs_are_split_at_count_limit() {
        let page = vec![0u8; 10_000];
        let stored = pack(&page, 4);
        assert!(stored.len() < 16);
        assert_eq!(unpack(&stored, page.len()).unwrap(), page);
    }

    #[test]
    fn incompressible_data_uses_spans() {
        let mut rng = StdRng::seed_from_u64(7);
        let page: Vec<u8> = (0..4096).map(|_| rng.gen()).collect();
        let stored = pack(&page, 4);
        assert!(stored.len() <= bound(page.len()));
        assert_eq!(unpack(&stored, page.len()).unwrap(), page);
    }

    #[test]
    fn every_mode_round_trips() {
        let page = text_page(4096);
        for mode in 0..=8 {
            let stored = pack(&page, mode);
            assert!(stored.len() < page.len() / 4, "mode {} gave {} bytes", mode, stored.len());
            assert_eq!(unpack(&stored, page.len()).unwrap(), page);
        }
    }

    #[test]
    fn modes_outside_range_are_rejected() {
        let mut out = vec![0u8; 64];
        for mode in [-1, 9, 42] {
            assert_eq!(
                compress_into(b"hello", &mut out, mode),
                Err(CompressionError::UnsupportedMode { mode })
            );
        }
    }

    #[test]
    fn undersized_destination_is_rejected() {
        let mut rng = StdRng::seed_from_u64(11);
        let page: Vec<u8> = (0..512).map(|_| rng.gen()).collect();
        let mut out = vec![0u8; 100];
        assert!(matches!(
            compress_into(&page, &mut out, 4),
            Err(CompressionError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn truncated_streams_are_corrupt() {
        let page = text_page(1024);
        let stored = pack(&page, 4);
        for cut in 1..stored.len() {
            let result = unpack(&stored[..cut], page.len());
            assert!(
                matches!(result, Err(CompressionError::CorruptInput(_))),
                "cut at {} was accepted", cut
            );
        }
    }

    #[test]
    fn reference_before_output_start_is_corrupt() {
        // one literal, then cmd 3 with distance 3 from position 1
        let stream = [0b0100_0000, b'x', 0x30, 0x00];
        assert!(matches!(unpack(&stream, 4), Err(CompressionError::CorruptInput(_))));

        // run with no previous byte
        let stream = [0b1000_0000, 0x10, 0x00];
        assert!(matches!(unpack(&stream, 3), Err(CompressionError::CorruptInput(_))));
    }

    #[test]
    fn output_length_must_match() {
        let stored = pack(b"abcdef", 4);
        assert!(matches!(unpack(&stored, 5), Err(CompressionError::CorruptInput(_))));
        assert!(matches!(unpack(&stored, 7), Err(CompressionError::CorruptInput(_))));
        assert_eq!(unpack(&stored, 6).unwrap(), b"abcdef".to_vec());
    }

    #[test]
    fn span_reaching_past_input_is_corrupt() {
        // span of 16 bytes but only 4 follow
        let stream = [0b1000_0000, 0x00, 0x00, 1, 2, 3, 4];
        assert!(matches!(unpack(&stream, 16), Err(CompressionError::CorruptInput(_))));
    }

    proptest! {
        #[test]
        fn prop_round_trip_and_bound(
            page in proptest::collection::vec(any::<u8>(), 0..4096),
            mode in 0i32..=8,
        ) {
            let stored = pack(&page, mode);
            prop_assert!(stored.len() <= page.len() * 9 / 8 + 1);
            prop_assert_eq!(unpack(&stored, page.len()).unwrap(), page);
        }

        #[test]
        fn prop_round_trip_low_entropy(
            page in proptest::collection::vec(0u8..4, 0..8192),
        ) {
            let stored = pack(&page, 4);
            prop_assert!(stored.len() <= bound(page.len()));
            prop_assert_eq!(unpack(&stored, page.len()).unwrap(), page);
        }

        #[test]
        fn prop_garbage_never_panics(
            stream in proptest::collection::vec(any::<u8>(), 0..512),
            page_len in 0usize..1024,
        ) {
            let _ = unpack(&stream, page_len);
        }
    }
}
