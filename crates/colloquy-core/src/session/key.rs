//! Session key allocation.

use colloquy_types::error::ChatError;
use rand::RngCore;
use rand::rngs::OsRng;

/// Produces fresh session keys: 128 bits from the OS entropy source,
/// formatted as a hyphenated v4 UUID.
///
/// Stateless. An entropy failure is reported as `ChatError::Allocation`
/// instead of panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionKeyAllocator;

impl SessionKeyAllocator {
    pub fn new() -> Self {
        Self
    }

    pub fn allocate(&self) -> Result<String, ChatError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ChatError::Allocation(e.to_string()))?;
        Ok(uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string())
    }
}

/// Whether a caller-supplied key should be used as-is.
///
/// Blank keys count as absent and get a fresh allocation.
pub fn is_usable_key(key: &str) -> bool {
    !key.trim().is_empty()
}
