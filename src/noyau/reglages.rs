//! Limites de l’évaluateur (garde-fous anti-gel / anti-mémoire).
//!
//! Les entiers restent exacts tant que possible : sans borne, `9**9**9**9`
//! ou `factorial(10**6)` bloqueraient la machine. On refuse donc tôt,
//! avec une erreur de domaine.

/// Taille max (en bits) d’un entier produit par `**`.
pub const BITS_ENTIER_DEFAUT: u64 = 65_536;

/// Argument max de `factorial`.
pub const FACTORIELLE_DEFAUT: u64 = 5_000;

/// Profondeur max d’imbrication à l’analyse (parenthèses, unaires, puissances).
pub const PROFONDEUR_DEFAUT: usize = 200;

/// Bornes dures : même via la ligne de commande, on ne va pas au-delà.
const BITS_ENTIER_PLAFOND: u64 = 1 << 24;
const FACTORIELLE_PLAFOND: u64 = 100_000;
const PROFONDEUR_PLAFOND: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limites {
    pub bits_entier_max: u64,
    pub factorielle_max: u64,
    pub profondeur_max: usize,
}

impl Default for Limites {
    fn default() -> Self {
        Self {
            bits_entier_max: BITS_ENTIER_DEFAUT,
            factorielle_max: FACTORIELLE_DEFAUT,
            profondeur_max: PROFONDEUR_DEFAUT,
        }
    }
}

impl Limites {
    pub fn avec_bits_entier(mut self, bits: u64) -> Self {
        self.bits_entier_max = bits.clamp(64, BITS_ENTIER_PLAFOND);
        self
    }

    pub fn avec_factorielle(mut self, n: u64) -> Self {
        self.factorielle_max = n.min(FACTORIELLE_PLAFOND);
        self
    }

    pub fn avec_profondeur(mut self, profondeur: usize) -> Self {
        self.profondeur_max = profondeur.clamp(1, PROFONDEUR_PLAFOND);
        self
    }
}
