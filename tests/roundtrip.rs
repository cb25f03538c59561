use enough::Unstoppable;
use zenglyph::*;

fn noise_pattern(len: usize, seed: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; len];
    let mut state: u32 = 0xDEAD_BEEF ^ seed;
    for p in pixels.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = state as u8;
    }
    pixels
}

const LAYOUTS: [PixelLayout; 4] = [
    PixelLayout::Gray8,
    PixelLayout::Rgb555,
    PixelLayout::Bgr8,
    PixelLayout::Bgra8,
];

#[test]
fn bmp_roundtrip_all_layouts_and_sizes() {
    let heights = [1u32, 2, 3, 5, 17, 64];
    for layout in LAYOUTS {
        for width in 1..=64u32 {
            for height in heights {
                let len = (width * height) as usize * layout.bytes_per_pixel();
                let pixels = noise_pattern(len, width * 131 + height);
                let image = DecodedImage::new(pixels, width, height, layout).unwrap();

                let encoded = encode_bmp(&image, Unstoppable).unwrap();
                let decoded = decode_bmp(&encoded, Unstoppable).unwrap();
                assert_eq!(decoded, image, "{layout:?} {width}x{height}");
            }
        }
    }
}

#[test]
fn bmp_roundtrip_gray8() {
    let w = 3;
    let h = 2;
    let pixels = vec![
        0, 64, 128, // row 0
        192, 255, 100, // row 1
    ];
    let image = DecodedImage::new(pixels.clone(), w, h, PixelLayout::Gray8).unwrap();

    let encoded = EncodeRequest::bmp().encode(&image, Unstoppable).unwrap();
    assert_eq!(&encoded[0..2], b"BM");

    let decoded = DecodeRequest::new(&encoded).decode(Unstoppable).unwrap();
    assert_eq!(decoded.width, w);
    assert_eq!(decoded.height, h);
    assert_eq!(decoded.layout, PixelLayout::Gray8);
    assert_eq!(decoded.bytes_per_pixel(), 1);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn bmp_roundtrip_bgr8() {
    let w = 3;
    let h = 2;
    let pixels = vec![
        255, 0, 0, 0, 255, 0, 0, 0, 255, // row 0: B G R
        128, 128, 128, 64, 64, 64, 0, 0, 0, // row 1: gray dark black
    ];
    let image = DecodedImage::new(pixels.clone(), w, h, PixelLayout::Bgr8).unwrap();

    let encoded = encode_bmp(&image, Unstoppable).unwrap();
    // 9 bytes per row, padded to 12.
    assert_eq!(encoded.len(), 54 + 24);

    let decoded = decode_bmp(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.layout, PixelLayout::Bgr8);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn bmp_roundtrip_strict() {
    let image = DecodedImage::new(noise_pattern(5 * 7 * 3, 7), 5, 7, PixelLayout::Bgr8).unwrap();
    let encoded = encode_bmp(&image, Unstoppable).unwrap();
    // Our own output must satisfy every bookkeeping check.
    let decoded = DecodeRequest::new(&encoded)
        .with_permissiveness(Permissiveness::Strict)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded, image);
}

#[test]
fn file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.bmp");

    let image =
        DecodedImage::new(noise_pattern(9 * 4 * 4, 3), 9, 4, PixelLayout::Bgra8).unwrap();
    write_bmp(&image, &path, Unstoppable).unwrap();
    let decoded = read_bmp(&path, Unstoppable).unwrap();
    assert_eq!(decoded, image);
}

#[test]
fn write_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bmp");
    std::fs::write(&path, vec![0xFFu8; 4096]).unwrap();

    let image = DecodedImage::new(vec![1, 2], 2, 1, PixelLayout::Gray8).unwrap();
    write_bmp(&image, &path, Unstoppable).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 58);
    assert_eq!(read_bmp(&path, Unstoppable).unwrap(), image);
}

#[test]
fn write_to_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.bmp");
    let image = DecodedImage::new(vec![0], 1, 1, PixelLayout::Gray8).unwrap();
    let err = write_bmp(&image, &path, Unstoppable).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn limits_reject_large() {
    let image = DecodedImage::new(vec![255u8; 6], 1, 2, PixelLayout::Bgr8).unwrap();
    let encoded = encode_bmp(&image, Unstoppable).unwrap();

    let limits = Limits {
        max_pixels: Some(1), // only 1 pixel allowed
        ..Default::default()
    };

    let result = DecodeRequest::new(&encoded)
        .with_limits(&limits)
        .decode(Unstoppable);
    match result.unwrap_err() {
        BitmapError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn limits_max_memory() {
    let image = DecodedImage::new(vec![0u8; 12], 2, 2, PixelLayout::Bgr8).unwrap();
    let encoded = encode_bmp(&image, Unstoppable).unwrap();
    let limits = Limits {
        max_memory_bytes: Some(11),
        ..Default::default()
    };
    let err = decode_bmp_with_limits(&encoded, &limits, Unstoppable).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);

    let roomy = Limits {
        max_memory_bytes: Some(12),
        ..Default::default()
    };
    assert!(decode_bmp_with_limits(&encoded, &roomy, Unstoppable).is_ok());
}

#[test]
fn glyph_from_encoded_sheet() {
    // Two 2x2 cells side by side: ' ' is dark, '!' is bright.
    let pixels = vec![
        0, 0, 255, 255, //
        0, 0, 255, 128, //
    ];
    let image = DecodedImage::new(pixels, 4, 2, PixelLayout::Gray8).unwrap();
    let decoded = decode_bmp(&encode_bmp(&image, Unstoppable).unwrap(), Unstoppable).unwrap();

    let sheet = GlyphSheet::new(&decoded, CellGeometry::new(2, 2));
    assert_eq!(sheet.render_char(' ').unwrap(), "--\n--\n");
    assert_eq!(sheet.render_char('!').unwrap(), "##\n#=\n");
}

// ── Cancellation ─────────────────────────────────────────────────────

mod cancellation {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use enough::{Stop, StopReason, Unstoppable};
    use zenglyph::*;

    /// Lets `allowed` checks pass, then reports `reason` on every later one.
    struct StopAfter {
        allowed: usize,
        checks: AtomicUsize,
        reason: StopReason,
    }

    impl StopAfter {
        fn new(allowed: usize) -> Self {
            Self {
                allowed,
                checks: AtomicUsize::new(0),
                reason: StopReason::Cancelled,
            }
        }

        fn checks(&self) -> usize {
            self.checks.load(Ordering::Relaxed)
        }
    }

    impl Stop for StopAfter {
        fn check(&self) -> Result<(), StopReason> {
            if self.checks.fetch_add(1, Ordering::Relaxed) >= self.allowed {
                Err(self.reason)
            } else {
                Ok(())
            }
        }
    }

    /// 3x40 Gray8: taller than two 16-row check intervals.
    fn tall_image() -> DecodedImage {
        let pixels = (0..3 * 40).map(|i| i as u8).collect();
        DecodedImage::new(pixels, 3, 40, PixelLayout::Gray8).unwrap()
    }

    fn assert_cancelled(result: Result<impl std::fmt::Debug, BitmapError>) {
        let err = result.unwrap_err();
        assert!(
            matches!(err, BitmapError::Cancelled(StopReason::Cancelled)),
            "{err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn decode_stops_before_allocating() {
        let encoded = encode_bmp(&tall_image(), Unstoppable).unwrap();
        let stop = StopAfter::new(0);
        assert_cancelled(decode_bmp(&encoded, &stop));
        assert_eq!(stop.checks(), 1);
    }

    #[test]
    fn encode_stops_before_allocating() {
        let stop = StopAfter::new(0);
        assert_cancelled(encode_bmp(&tall_image(), &stop));
        assert_eq!(stop.checks(), 1);
    }

    #[test]
    fn decode_stops_between_rows() {
        let encoded = encode_bmp(&tall_image(), Unstoppable).unwrap();
        // Pre-allocation check and row 0 pass; row 16 stops.
        let stop = StopAfter::new(2);
        assert_cancelled(DecodeRequest::new(&encoded).decode(&stop));
        assert_eq!(stop.checks(), 3);
    }

    #[test]
    fn encode_stops_between_rows() {
        let stop = StopAfter::new(3);
        assert_cancelled(EncodeRequest::bmp().encode(&tall_image(), &stop));
        assert_eq!(stop.checks(), 4);
    }

    #[test]
    fn checks_every_sixteen_rows() {
        let image = tall_image();
        // Once up front, then at rows 0, 16 and 32.
        let stop = StopAfter::new(usize::MAX);
        let encoded = encode_bmp(&image, &stop).unwrap();
        assert_eq!(stop.checks(), 4);

        let stop = StopAfter::new(usize::MAX);
        assert_eq!(decode_bmp(&encoded, &stop).unwrap(), image);
        assert_eq!(stop.checks(), 4);
    }

    #[test]
    fn read_from_disk_reports_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tall.bmp");
        write_bmp(&tall_image(), &path, Unstoppable).unwrap();

        let stop = StopAfter {
            reason: StopReason::TimedOut,
            ..StopAfter::new(1)
        };
        let err = read_bmp(&path, &stop).unwrap_err();
        assert!(matches!(err, BitmapError::Cancelled(StopReason::TimedOut)));
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }
}
