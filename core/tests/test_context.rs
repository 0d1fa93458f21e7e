#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use pagecodec_core::compression::REGISTRY;
    use pagecodec_core::connection::{detect, ConnectionContext};
    use pagecodec_core::telemetry::TelemetrySnapshot;
    use pagecodec_core::types::{status_of, PageCodecError, StatusCode};

    const PAGE: usize = 4096;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn open(uri: &str) -> ConnectionContext {
        detect((), uri, None)
            .expect("detect")
            .into_context()
            .expect("engaged")
    }

    /// Page shaped like a b-tree leaf: header, cells at the end, free space between.
    fn leaf_page(seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut page = vec![0u8; PAGE];
        page[0] = 0x0D;
        for b in page[8..64].iter_mut() {
            *b = rng.gen_range(0..16);
        }
        for (i, b) in page[2800..].iter_mut().enumerate() {
            *b = if i % 37 < 20 { b"row payload text "[i % 17] } else { rng.gen() };
        }
        page
    }

    fn round_trip(ctx: &mut ConnectionContext, page: &[u8]) -> Vec<u8> {
        let stored = ctx.compress_to_vec(page).expect("compress");
        assert!(stored.len() <= ctx.bound(page.len()));
        let mut out = vec![0u8; page.len()];
        let n = ctx.decompress(&stored, &mut out).expect("decompress");
        assert_eq!(n, page.len());
        out
    }

    #[test]
    fn every_codec_round_trips_plain_and_keyed() {
        init_logger();
        let page = leaf_page(1);
        for descriptor in REGISTRY {
            for suffix in ["", "&password=hunter2"] {
                let uri = format!("file:t.db?zv={}{}", descriptor.name, suffix);
                let mut ctx = open(&uri);
                assert_eq!(ctx.is_encrypted(), !suffix.is_empty());
                for _ in 0..3 {
                    assert_eq!(round_trip(&mut ctx, &page), page, "{}", uri);
                }
                ctx.close().unwrap();
            }
        }
    }

    #[test]
    fn encryption_changes_only_the_stored_prefix() {
        let page = leaf_page(2);
        let mut plain = open("file:t.db?zv=ndsc");
        let mut keyed = open("file:t.db?zv=ndsc&password=pw");

        let a = plain.compress_to_vec(&page).unwrap();
        let b = keyed.compress_to_vec(&page).unwrap();
        assert_eq!(a.len(), b.len());
        assert!(a.len() > 64);
        assert_ne!(&a[..64], &b[..64]);
        assert_eq!(&a[64..], &b[64..]);
    }

    #[test]
    fn wrong_password_does_not_restore_page() {
        let page = leaf_page(3);
        let mut writer = open("file:t.db?zv=bsr&password=right");
        let stored = writer.compress_to_vec(&page).unwrap();

        let mut reader = open("file:t.db?zv=bsr&password=wrong");
        let mut out = vec![0u8; PAGE];
        match reader.decompress(&stored, &mut out) {
            Ok(_) => assert_ne!(out, page),
            Err(e) => assert_eq!(e.status(), StatusCode::Corrupt),
        }
    }

    #[test]
    fn decompress_does_not_modify_stored_bytes() {
        let page = leaf_page(4);
        let mut ctx = open("file:t.db?zv=ndsc&password=pw");
        let stored = ctx.compress_to_vec(&page).unwrap();
        let before = stored.clone();
        let mut out = vec![0u8; PAGE];
        ctx.decompress(&stored, &mut out).unwrap();
        assert_eq!(stored, before);
        assert_eq!(out, page);
    }

    #[test]
    fn undersized_destination_maps_to_error_status() {
        let mut ctx = open("file:t.db?zv=bsr");
        let page = vec![7u8; 100];
        let mut dst = vec![0u8; 10];
        let result = ctx.compress(&page, &mut dst);
        assert!(matches!(result, Err(PageCodecError::BufferTooSmall { .. })));
        assert_eq!(status_of(&result), StatusCode::Error as i32);
    }

    #[test]
    fn corrupt_page_maps_to_corrupt_status() {
        let mut ctx = open("file:t.db?zv=ndsc");
        let mut out = vec![0u8; 64];
        let result = ctx.decompress(&[0xFF, 0x20, 0x00, 0x00], &mut out);
        assert_eq!(status_of(&result), StatusCode::Corrupt as i32);
    }

    #[test]
    fn level_selects_ndsc_mode() {
        let page = leaf_page(5);
        for level in [-1, 0, 4, 8, 12] {
            let mut ctx = open(&format!("file:t.db?zv=ndsc&level={}", level));
            assert_eq!(round_trip(&mut ctx, &page), page);
        }
    }

    #[cfg(feature = "zlib")]
    #[test]
    fn zlib_levels_round_trip() {
        let page = leaf_page(6);
        for level in [-1, 0, 1, 9, 42] {
            let mut ctx = open(&format!("file:t.db?zv=zlib&level={}", level));
            assert_eq!(round_trip(&mut ctx, &page), page);
        }
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4hc_levels_round_trip() {
        let page = leaf_page(7);
        for level in [-1, 1, 9, 12, 40] {
            let mut ctx = open(&format!("file:t.db?zv=lz4hc&level={}", level));
            assert_eq!(round_trip(&mut ctx, &page), page);
        }
    }

    #[test]
    fn telemetry_counts_pages_and_bytes() {
        let page = leaf_page(8);
        let mut ctx = open("file:t.db?zv=ndsc&password=pw");
        let stored = ctx.compress_to_vec(&page).unwrap();
        let mut out = vec![0u8; PAGE];
        ctx.decompress(&stored, &mut out).unwrap();
        let _ = ctx.decompress(&[0x80], &mut out);

        let snap = ctx.telemetry();
        assert_eq!(snap.algorithm, "ndsc");
        assert!(snap.encrypted);
        assert_eq!(snap.counters.pages_compressed, 1);
        assert_eq!(snap.counters.pages_decompressed, 1);
        assert_eq!(snap.counters.bytes_raw_in, PAGE as u64);
        assert_eq!(snap.counters.bytes_stored_out, stored.len() as u64);
        assert_eq!(snap.counters.bytes_raw_out, PAGE as u64);
        assert_eq!(snap.counters.bytes_enciphered, 128);
        assert_eq!(snap.counters.failures, 1);
        assert!(snap.compression_ratio > 0.0 && snap.compression_ratio < 1.0);
        assert!(snap.bytes_saved() > 0);

        let json = snap.to_json().unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.algorithm, snap.algorithm);
        assert_eq!(back.counters, snap.counters);
        assert!((back.compression_ratio - snap.compression_ratio).abs() < 1e-9);
    }

    #[test]
    fn dropping_without_close_is_fine() {
        let mut ctx = open("file:t.db?zv=bsr&password=pw");
        let _ = ctx.compress_to_vec(&leaf_page(9)).unwrap();
        drop(ctx);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_keyed_ndsc_round_trip(page in proptest::collection::vec(any::<u8>(), 0..PAGE)) {
            let mut ctx = open("file:t.db?zv=ndsc&password=p");
            let stored = ctx.compress_to_vec(&page).unwrap();
            let mut out = vec![0u8; page.len()];
            ctx.decompress(&stored, &mut out).unwrap();
            prop_assert_eq!(out, page);
        }

        #[test]
        fn prop_keyed_bsr_round_trip(page in proptest::collection::vec(prop_oneof![Just(0u8), any::<u8>()], 0..PAGE)) {
            let mut ctx = open("file:t.db?zv=bsr&password=p");
            let stored = ctx.compress_to_vec(&page).unwrap();
            let mut out = vec![0u8; page.len()];
            ctx.decompress(&stored, &mut out).unwrap();
            prop_assert_eq!(out, page);
        }
    }
}
