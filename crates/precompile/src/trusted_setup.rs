//! Process-wide handle to the KZG trusted setup used by
//! [`crate::kzg_point_evaluation`].
//!
//! The verification tables are embedded by [`c_kzg`] and are `'static`.
//! Loading and freeing only controls their availability to the precompile,
//! no memory is mapped or unmapped here.
use c_kzg::KzgSettings;
use std::sync::RwLock;

/// Precompute level for the embedded mainnet setup.
const PRECOMPUTE: u64 = 8;

static SETTINGS: RwLock<Option<&'static KzgSettings>> = RwLock::new(None);

/// Makes the embedded Ethereum mainnet trusted setup available to the point
/// evaluation precompile. Idempotent and safe to call concurrently.
pub fn load() {
    let mut settings = SETTINGS.write().unwrap_or_else(|e| e.into_inner());
    if settings.is_none() {
        *settings = Some(c_kzg::ethereum_kzg_settings(PRECOMPUTE));
    }
}

/// Returns `true` if a trusted setup is currently available.
pub fn is_loaded() -> bool {
    get().is_some()
}

/// Takes the trusted setup out of service. Point evaluation calls fail with
/// [`crate::PrecompileError::BlobTrustedSetupNotLoaded`] until [`load`] runs
/// again.
pub fn free() {
    *SETTINGS.write().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Returns the currently loaded settings, if any.
pub fn get() -> Option<&'static KzgSettings> {
    *SETTINGS.read().unwrap_or_else(|e| e.into_inner())
}
