// src/noyau/format.rs
//
// Affichage du résultat (côté appelant, mais partagé UI + CLI).
// - entier (pas de partie fractionnaire) : chaîne entière exacte du flottant
//   (1e20 -> "100000000000000000000", précision perdue comprise)
// - sinon : plus courte écriture décimale relisible, en notation
//   scientifique sous 1e-4 ("1e-05"), comme le repr des flottants
// - inf / -inf / nan : tels quels

use num_bigint::BigInt;
use num_traits::FromPrimitive;

/// Seuil sous lequel on passe en notation scientifique.
const SEUIL_SCIENTIFIQUE: f64 = 1e-4;

/// Vrai si le résultat s’affiche comme un entier.
pub fn est_entier(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

/// Valeur entière exacte d’un flottant entier.
fn en_entier_exact(v: f64) -> Option<BigInt> {
    if est_entier(v) {
        BigInt::from_f64(v)
    } else {
        None
    }
}

pub fn formater_resultat(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // -0.0 -> "0"
    if let Some(n) = en_entier_exact(v) {
        return n.to_string();
    }

    if v.abs() < SEUIL_SCIENTIFIQUE {
        return format_scientifique(v);
    }

    // `{}` donne déjà la plus courte écriture relisible
    format!("{v}")
}

/// "1.5e-7" -> "1.5e-07" (exposant signé, au moins 2 chiffres).
fn format_scientifique(v: f64) -> String {
    let brut = format!("{v:e}");
    let Some((mantisse, exposant)) = brut.split_once('e') else {
        return brut;
    };

    let (signe, chiffres) = match exposant.strip_prefix('-') {
        Some(c) => ('-', c),
        None => ('+', exposant),
    };

    format!("{mantisse}e{signe}{chiffres:0>2}")
}
