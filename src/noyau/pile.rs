//! Garde-fou de pile pour la descente récursive (analyse + évaluation).
//!
//! - Natif : `stacker` agrandit la pile à la demande.
//! - wasm32 : appel direct (la pile est gérée par le runtime).

/// Espace minimal à garder libre avant de descendre d’un niveau.
#[cfg(not(target_arch = "wasm32"))]
const ZONE_ROUGE: usize = 64 * 1024;

/// Taille de chaque nouveau segment de pile.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn assure_pile<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(ZONE_ROUGE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn assure_pile<R>(f: impl FnOnce() -> R) -> R {
    f()
}
