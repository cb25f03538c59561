#![no_main]
use libfuzzer_sys::fuzz_target;
use zenglyph::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    let Ok(decoded) = decode_bmp_with_limits(data, &limits, enough::Unstoppable) else {
        return;
    };

    // Re-encoding must produce a strictly valid file with identical pixels.
    let reencoded = encode_bmp(&decoded, enough::Unstoppable).expect("decoded image re-encodes");
    let decoded2 = DecodeRequest::new(&reencoded)
        .with_permissiveness(Permissiveness::Strict)
        .decode(enough::Unstoppable)
        .expect("re-encoded data decodes");

    assert_eq!(decoded, decoded2, "roundtrip mismatch");

    // Encoding is deterministic: a second pass is byte-identical.
    let reencoded2 = encode_bmp(&decoded2, enough::Unstoppable).expect("second encode");
    assert_eq!(reencoded, reencoded2);
});
