// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Randomness helpers backed by the system CSPRNG.

use ring::rand::{SecureRandom, SystemRandom};

use crate::error::AppError;

/// Largest integer a JavaScript client can represent exactly (2^53 - 1).
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Draw a uniformly random `u64`.
pub fn random_u64(rng: &SystemRandom) -> Result<u64, AppError> {
    let mut buf = [0u8; 8];
    rng.fill(&mut buf)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(u64::from_le_bytes(buf))
}

/// Generate a non-zero document ID that survives a round trip through JSON numbers.
pub fn random_id() -> Result<u64, AppError> {
    let rng = SystemRandom::new();
    loop {
        let id = random_u64(&rng)? & MAX_SAFE_INTEGER;
        if id != 0 {
            return Ok(id);
        }
    }
}

/// Pick up to `count` items uniformly at random, without replacement.
///
/// Uses a partial Fisher-Yates shuffle; the relative order of the picks is random.
pub fn sample<T>(mut items: Vec<T>, count: usize) -> Result<Vec<T>, AppError> {
    let rng = SystemRandom::new();
    let count = count.min(items.len());

    for i in 0..count {
        let remaining = (items.len() - i) as u64;
        let j = i + (random_u64(&rng)? % remaining) as usize;
        items.swap(i, j);
    }

    items.truncate(count);
    Ok(items)
}
