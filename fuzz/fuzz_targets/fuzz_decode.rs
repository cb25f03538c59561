#![no_main]
use libfuzzer_sys::fuzz_target;
use zenglyph::*;

fuzz_target!(|data: &[u8]| {
    // Must never panic, whatever the permissiveness.
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    let _ = decode_bmp_with_limits(data, &limits, enough::Unstoppable);
    let Ok(image) = DecodeRequest::new(data)
        .with_limits(&limits)
        .with_permissiveness(Permissiveness::Strict)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Any decodable sheet can be sliced into cells without panicking.
    let geometry = CellGeometry::new(8, 8);
    let sheet = GlyphSheet::new(&image, geometry);
    for ch in [' ', '!', 'A'] {
        if let Ok(samples) = sheet.samples_for_char(ch) {
            assert_eq!(samples.count(), 64);
        }
    }
});
