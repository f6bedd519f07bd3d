//! Behavioral properties of error level analysis on synthetic images.

use forensight_core::ela::{compute_ela, difference, recompress, ElaImage, Raster};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn flat(width: u32, height: u32, channels: u8, value: u8) -> Raster {
    let len = (width * height) as usize * channels as usize;
    Raster::new(width, height, channels, vec![value; len]).unwrap()
}

fn noise(width: u32, height: u32, seed: u64) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..width * height * 3).map(|_| rng.gen::<u8>()).collect();
    Raster::new(width, height, 3, samples).unwrap()
}

fn gradient(width: u32, height: u32) -> Raster {
    let mut samples = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            samples.push((x * 255 / width) as u8);
            samples.push((y * 255 / height) as u8);
            samples.push(160);
        }
    }
    Raster::new(width, height, 3, samples).unwrap()
}

/// Copy `patch` into `base` with its top-left corner at (`left`, `top`).
fn paste(base: &Raster, patch: &Raster, left: u32, top: u32) -> Raster {
    let channels = base.channels() as usize;
    let mut samples = base.samples().to_vec();
    for y in 0..patch.height() {
        for x in 0..patch.width() {
            let dst = (((top + y) * base.width() + left + x) as usize) * channels;
            let src = ((y * patch.width() + x) as usize) * channels;
            samples[dst..dst + channels].copy_from_slice(&patch.samples()[src..src + channels]);
        }
    }
    Raster::new(base.width(), base.height(), base.channels(), samples).unwrap()
}

fn region_max(raster: &Raster, left: u32, top: u32, width: u32, height: u32) -> u8 {
    let mut max = 0;
    for y in top..top + height {
        for x in left..left + width {
            for c in 0..raster.channels() {
                max = max.max(raster.sample(x, y, c).unwrap());
            }
        }
    }
    max
}

#[test]
fn dimensions_are_preserved() {
    let inputs = [
        flat(1, 1, 3, 200),
        flat(7, 13, 1, 40),
        gradient(17, 9),
        noise(64, 48, 7),
    ];
    for input in &inputs {
        for quality in [1, 50, 90, 100] {
            let ela = compute_ela(input, quality, None).unwrap();
            assert_eq!(ela.dimensions(), input.dimensions());
            assert_eq!(ela.raster().channels(), input.channels());
        }
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let input = noise(48, 40, 42);
    let first = compute_ela(&input, 90, None).unwrap();
    let second = compute_ela(&input, 90, None).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_png().unwrap(), second.to_png().unwrap());
}

#[test]
fn perfect_recompression_is_black() {
    let input = gradient(32, 24);
    let ela = ElaImage::from_pair(&input, &input, 90, None).unwrap();
    assert_eq!(ela.max_diff(), 0);
    assert_eq!(ela.scale(), 1.0);
    assert!(ela.raster().samples().iter().all(|&s| s == 0));
}

#[test]
fn mid_gray_survives_recompression_unchanged() {
    for channels in [1, 3] {
        let input = flat(40, 24, channels, 128);
        let ela = compute_ela(&input, 90, None).unwrap();
        assert_eq!(ela.max_diff(), 0);
        assert!(ela.raster().samples().iter().all(|&s| s == 0));
    }
}

#[test]
fn samples_saturate_at_255() {
    let input = noise(32, 32, 3);
    let diff = difference(&input, &recompress(&input, 60).unwrap()).unwrap();

    let ela = compute_ela(&input, 60, Some(u32::MAX)).unwrap();
    for (&d, &out) in diff.samples().iter().zip(ela.raster().samples()) {
        let expected = if d == 0 { 0 } else { 255 };
        assert_eq!(out, expected);
    }

    let auto = compute_ela(&input, 60, None).unwrap();
    assert!(auto.max_diff() > 0);
    assert_eq!(auto.raster().max_sample(), 255);
}

#[test]
fn lower_quality_keeps_pasted_region_visible() {
    // Background already saved at high quality, with an uncompressed patch
    // pasted on an 8x8 block boundary.
    let background = recompress(&gradient(128, 96), 95).unwrap();
    let (left, top, size) = (48, 32, 32);
    let doctored = paste(&background, &noise(size, size, 1234), left, top);

    let at_95 = difference(&doctored, &recompress(&doctored, 95).unwrap()).unwrap();
    let at_50 = difference(&doctored, &recompress(&doctored, 50).unwrap()).unwrap();

    let region_95 = region_max(&at_95, left, top, size, size);
    let region_50 = region_max(&at_50, left, top, size, size);
    assert!(region_95 > 0);
    assert!(
        region_50 >= region_95,
        "region max fell from {} at q95 to {} at q50",
        region_95,
        region_50
    );
}

#[test]
fn flat_gray_jpeg_round_trip_is_near_zero() {
    let (width, height) = (100, 100);
    let pixels = vec![120u8; (width * height * 3) as usize];
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 90)
        .encode(&pixels, width, height, ExtendedColorType::Rgb8)
        .unwrap();

    let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
    let source = Raster::from_rgb_image(&decoded).unwrap();

    // Unit scale so output samples are the raw differences
    let ela = compute_ela(&source, 90, Some(1)).unwrap();
    assert_eq!(ela.dimensions(), (100, 100));
    assert!(ela.max_diff() <= 10, "max_diff was {}", ela.max_diff());
    assert!(ela.raster().samples().iter().all(|&s| s <= 10));
}
