use icopack::{IconDir, IconImage, SizeProfile, TargetSizes};
use std::io::Cursor;

//===========================================================================//

fn opaque_square(side: u32, rgb: [u8; 3]) -> IconImage {
    let mut rgba = Vec::with_capacity((side * side * 4) as usize);
    for _ in 0..(side * side) {
        rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 0xff]);
    }
    IconImage::from_rgba_data(side, side, rgba)
}

//===========================================================================//

#[test]
fn three_sizes_from_one_large_source() {
    // One 512x512 opaque source rendered at 16, 32, and 256 pixels.
    let source = opaque_square(512, [200, 100, 50]);
    let sizes = TargetSizes::new(&[16, 32, 256]).unwrap();
    let mut output = Vec::<u8>::new();
    icopack::convert(vec![source], Some(&sizes), &mut output).unwrap();

    // Directory width/height bytes, with the 256 -> 0 sentinel.
    assert_eq!(&output[6..8], &[16, 16]);
    assert_eq!(&output[6 + 16..8 + 16], &[32, 32]);
    assert_eq!(&output[6 + 32..8 + 32], &[0, 0]);

    let payloads: u32 =
        [16u32, 32, 256].iter().map(|s| 40 + s * s * 4).sum();
    assert_eq!(output.len() as u32, 6 + 16 * 3 + payloads);
}

#[test]
fn raw_output_length_formula() {
    let images =
        vec![opaque_square(8, [1, 2, 3]), opaque_square(24, [4, 5, 6])];
    let mut output = Vec::<u8>::new();
    icopack::convert(images, None, &mut output).unwrap();
    let expected = 6 + 16 * 2 + (40 + 8 * 8 * 4) + (40 + 24 * 24 * 4);
    assert_eq!(output.len(), expected);
}

#[test]
fn undersized_sources_are_filtered_out() {
    // A set holding only a 1x1 image degenerates to a zero-entry container.
    let tiny = IconImage::from_rgba_data(1, 1, vec![0, 0, 0, 0xff]);
    let sizes = TargetSizes::new(&[16, 32]).unwrap();
    let mut output = Vec::<u8>::new();
    icopack::convert(vec![tiny], Some(&sizes), &mut output).unwrap();
    assert_eq!(output.as_slice(), b"\x00\x00\x01\x00\x00\x00");
}

#[test]
fn smallest_sufficient_source_is_chosen() {
    // With an 8px red source and a 64px blue source, a 16px target must be
    // rendered from the blue one (the smallest that needs no upscaling).
    let red = opaque_square(8, [0xff, 0, 0]);
    let blue = opaque_square(64, [0, 0, 0xff]);
    let sizes = TargetSizes::new(&[16]).unwrap();
    let mut output = Vec::<u8>::new();
    icopack::convert(vec![red, blue], Some(&sizes), &mut output).unwrap();
    let icondir = IconDir::read(Cursor::new(&output)).unwrap();
    assert_eq!(icondir.entries().len(), 1);
    let image = icondir.entries()[0].decode().unwrap();
    assert_eq!(image.width(), 16);
    assert_eq!(image.data()[0..4], [0, 0, 0xff, 0xff]);
}

#[test]
fn all_sources_narrower_than_target_fall_back_to_widest() {
    let small = opaque_square(8, [0x10, 0x20, 0x30]);
    let wide = opaque_square(32, [0x80, 0x90, 0xa0]);
    let sizes = TargetSizes::new(&[128]).unwrap();
    let mut output = Vec::<u8>::new();
    icopack::convert(vec![small, wide], Some(&sizes), &mut output).unwrap();
    let icondir = IconDir::read(Cursor::new(&output)).unwrap();
    let image = icondir.entries()[0].decode().unwrap();
    assert_eq!(image.width(), 128);
    assert_eq!(image.data()[0..4], [0x80, 0x90, 0xa0, 0xff]);
}

#[test]
fn convert_preserves_input_order_without_sizes() {
    let images = vec![
        opaque_square(48, [1, 1, 1]),
        opaque_square(16, [2, 2, 2]),
        opaque_square(32, [3, 3, 3]),
    ];
    let mut output = Vec::<u8>::new();
    icopack::convert(images, None, &mut output).unwrap();
    let icondir = IconDir::read(Cursor::new(&output)).unwrap();
    let widths: Vec<u32> =
        icondir.entries().iter().map(|entry| entry.width()).collect();
    assert_eq!(widths, vec![48, 16, 32]);
}

//===========================================================================//

#[test]
fn png_strategy_entries_are_png_and_sorted() {
    let source = opaque_square(300, [9, 9, 9]);
    let mut sink = Cursor::new(Vec::<u8>::new());
    icopack::save(source, SizeProfile::Application, &mut sink).unwrap();
    let output = sink.into_inner();
    let icondir = IconDir::read(Cursor::new(&output)).unwrap();
    // The 300px source is normalized to 256, so every application size
    // qualifies.
    assert_eq!(icondir.entries().len(), 7);
    let widths: Vec<u32> =
        icondir.entries().iter().map(|entry| entry.width()).collect();
    assert_eq!(widths, vec![256, 128, 64, 48, 32, 24, 16]);
    for entry in icondir.entries() {
        assert!(entry.is_png());
        assert_eq!(entry.bits_per_pixel(), 32);
    }
}

#[test]
fn png_strategy_total_length_matches_directory() {
    let source = opaque_square(64, [40, 50, 60]);
    let mut sink = Cursor::new(Vec::<u8>::new());
    icopack::save(source, SizeProfile::Application, &mut sink).unwrap();
    let output = sink.into_inner();
    let icondir = IconDir::read(Cursor::new(&output)).unwrap();
    let payloads: usize =
        icondir.entries().iter().map(|entry| entry.data().len()).sum();
    assert_eq!(output.len(), 6 + 16 * icondir.entries().len() + payloads);
}

//===========================================================================//
