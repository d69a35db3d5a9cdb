//! 16x16 평균 해시 (aHash).
//!
//! 이미지를 16x16 격자로 샘플링한 휘도와 평균값을 비교해 256비트 지문을 만든다.
//! 두 지문의 해밍 거리로 유사도를 계산한다.

use image::RgbaImage;

/// 샘플링 격자 한 변 크기
pub const HASH_GRID: u32 = 16;

/// 지문 바이트 길이 (256비트)
pub const FINGERPRINT_LEN: usize = 32;

/// 최대 해밍 거리 ("완전히 다름")
pub const MAX_DISTANCE: u32 = 256;

/// 256비트 평균 해시 지문
pub type Fingerprint = [u8; FINGERPRINT_LEN];

/// 16x16 평균 해시 계산
///
/// - 휘도: `0.2126R + 0.7152G + 0.0722B`
/// - 샘플 좌표: `floor(i * step + step / 2)`, 마지막 인덱스로 클램프
/// - 비트 `i`는 `gray[i] >= 평균`일 때 1, MSB 우선으로 패킹
///
/// 폭이나 높이가 0이면 모두 0인 지문을 반환한다.
pub fn average_hash_16x16(image: &RgbaImage) -> Fingerprint {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return [0u8; FINGERPRINT_LEN];
    }

    let step_x = f64::from(width) / f64::from(HASH_GRID);
    let step_y = f64::from(height) / f64::from(HASH_GRID);

    let mut gray = [0f64; (HASH_GRID * HASH_GRID) as usize];
    let mut sum = 0f64;

    for y in 0..HASH_GRID {
        let sy = sample_index(y, step_y, height);
        for x in 0..HASH_GRID {
            let sx = sample_index(x, step_x, width);
            let [r, g, b, _] = image.get_pixel(sx, sy).0;
            let luma = 0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b);
            gray[(y * HASH_GRID + x) as usize] = luma;
            sum += luma;
        }
    }

    let mean = sum / gray.len() as f64;
    let mut bits = [0u8; FINGERPRINT_LEN];
    for (i, value) in gray.iter().enumerate() {
        if *value >= mean {
            bits[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bits
}

#[inline]
fn sample_index(i: u32, step: f64, len: u32) -> u32 {
    let pos = (f64::from(i) * step + step / 2.0) as u32;
    pos.min(len - 1)
}

/// 두 지문의 해밍 거리
///
/// 어느 한쪽이라도 32바이트가 아니면 [`MAX_DISTANCE`]를 반환한다.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    if a.len() != FINGERPRINT_LEN || b.len() != FINGERPRINT_LEN {
        return MAX_DISTANCE;
    }
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// 지문 유사도 (0.0 ~ 1.0)
pub fn similarity(a: &[u8], b: &[u8]) -> f64 {
    1.0 - f64::from(hamming_distance(a, b)) / f64::from(MAX_DISTANCE)
}
