//! Cryptographic file digests and perceptual image hashing.

use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig, ImageHash};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::types::FileHashes;

/// Provides integrity digests for files and perceptual hashes for images.
///
/// The perceptual hasher is pre-configured and cached to avoid
/// re-allocating the same `HasherConfig` for every comparison.
pub struct Hasher {
    phash_hasher: image_hasher::Hasher,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a new hasher with a pre-configured perceptual hash algorithm.
    pub fn new() -> Self {
        let phash_hasher = HasherConfig::new()
            .hash_alg(HashAlg::DoubleGradient)
            .hash_size(16, 16)
            .to_hasher();
        Self { phash_hasher }
    }

    /// Compute MD5, SHA-1, SHA-256 and BLAKE3 over an in-memory buffer.
    pub fn file_hashes(data: &[u8]) -> FileHashes {
        FileHashes {
            md5: format!("{:x}", Md5::digest(data)),
            sha1: format!("{:x}", Sha1::digest(data)),
            sha256: format!("{:x}", Sha256::digest(data)),
            blake3: blake3::hash(data).to_hex().to_string(),
        }
    }

    /// Generate a perceptual hash. Similar images have similar hashes even
    /// after resizing or recompression.
    pub fn perceptual_hash(&self, image: &DynamicImage) -> ImageHash {
        self.phash_hasher.hash_image(image)
    }

    /// Hamming distance between the perceptual hashes of two images.
    ///
    /// 0 means visually identical; distances below ~10 typically indicate
    /// the same picture at a different size or quality.
    pub fn perceptual_distance(&self, a: &DynamicImage, b: &DynamicImage) -> u32 {
        self.perceptual_hash(a).dist(&self.perceptual_hash(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::gradient;
    use image::imageops::FilterType;

    #[test]
    fn test_known_digests_of_empty_input() {
        let hashes = Hasher::file_hashes(b"");
        assert_eq!(hashes.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hashes.sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            hashes.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hashes.blake3,
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_known_digests_of_abc() {
        let hashes = Hasher::file_hashes(b"abc");
        assert_eq!(hashes.md5, "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(hashes.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            hashes.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_perceptual_hash_consistency() {
        let hasher = Hasher::new();
        let img = gradient(100, 100);
        assert_eq!(hasher.perceptual_distance(&img, &img), 0);
    }

    #[test]
    fn test_perceptual_distance_survives_resize() {
        let hasher = Hasher::new();
        let img = gradient(200, 150);
        let small = img.resize(80, 60, FilterType::Triangle);
        let flipped = img.fliph().flipv();

        let similar = hasher.perceptual_distance(&img, &small);
        let different = hasher.perceptual_distance(&img, &flipped);
        assert!(similar < different);
    }
}
