// src/noyau/tables.rs
//
// Listes blanches (statiques, en lecture seule).
// - Opérateurs binaires / unaires -> fonction numérique
// - Noms -> constante OU fonction appelable
//
// IMPORTANT (SAFE):
// - Chaque entrée est écrite à la main : rien n’est énuméré depuis une
//   bibliothèque, la liste ne peut pas grossir en silence.
// - Absent de la table => refus (jamais de repli).

use std::f64::consts::{E, PI, TAU};

use super::arbre::{OpBinaire, OpUnaire};
use super::erreur::EvalError;
use super::fonctions::Fonction;
use super::nombre::{self, Nombre};
use super::reglages::Limites;

pub type FnBinaire = fn(Nombre, Nombre, &Limites) -> Result<Nombre, EvalError>;
pub type FnUnaire = fn(Nombre) -> Nombre;

static OPERATEURS_BINAIRES: [(OpBinaire, FnBinaire); 7] = [
    (OpBinaire::Plus, nombre::ajouter),
    (OpBinaire::Moins, nombre::soustraire),
    (OpBinaire::Fois, nombre::multiplier),
    (OpBinaire::Division, nombre::diviser),
    (OpBinaire::DivisionEntiere, nombre::diviser_plancher),
    (OpBinaire::Modulo, nombre::modulo),
    (OpBinaire::Puissance, nombre::puissance),
];

static OPERATEURS_UNAIRES: [(OpUnaire, FnUnaire); 2] = [
    (OpUnaire::Plus, nombre::plus),
    (OpUnaire::Moins, nombre::moins),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entree {
    Constante(f64),
    Fonction(Fonction),
}

static NOMS: [(&str, Entree); 21] = [
    ("pi", Entree::Constante(PI)),
    ("e", Entree::Constante(E)),
    ("tau", Entree::Constante(TAU)),
    ("abs", Entree::Fonction(Fonction::Abs)),
    ("round", Entree::Fonction(Fonction::Round)),
    ("sqrt", Entree::Fonction(Fonction::Sqrt)),
    ("log", Entree::Fonction(Fonction::Log)),
    ("log10", Entree::Fonction(Fonction::Log10)),
    ("ln", Entree::Fonction(Fonction::Log)),
    ("exp", Entree::Fonction(Fonction::Exp)),
    ("sin", Entree::Fonction(Fonction::Sin)),
    ("cos", Entree::Fonction(Fonction::Cos)),
    ("tan", Entree::Fonction(Fonction::Tan)),
    ("asin", Entree::Fonction(Fonction::Asin)),
    ("acos", Entree::Fonction(Fonction::Acos)),
    ("atan", Entree::Fonction(Fonction::Atan)),
    ("degrees", Entree::Fonction(Fonction::Degrees)),
    ("radians", Entree::Fonction(Fonction::Radians)),
    ("factorial", Entree::Fonction(Fonction::Factorial)),
    ("floor", Entree::Fonction(Fonction::Floor)),
    ("ceil", Entree::Fonction(Fonction::Ceil)),
];

pub fn operateur_binaire(op: OpBinaire) -> Option<FnBinaire> {
    OPERATEURS_BINAIRES
        .iter()
        .find(|(o, _)| *o == op)
        .map(|(_, f)| *f)
}

pub fn operateur_unaire(op: OpUnaire) -> Option<FnUnaire> {
    OPERATEURS_UNAIRES
        .iter()
        .find(|(o, _)| *o == op)
        .map(|(_, f)| *f)
}

pub fn chercher_nom(nom: &str) -> Option<Entree> {
    NOMS.iter().find(|(n, _)| *n == nom).map(|(_, e)| *e)
}

/// Noms autorisés (ordre de la table) : pour l’UI et les tests.
pub fn noms() -> impl Iterator<Item = &'static str> {
    NOMS.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operateurs_autorises_seulement() {
        for op in [
            OpBinaire::Plus,
            OpBinaire::Moins,
            OpBinaire::Fois,
            OpBinaire::Division,
            OpBinaire::DivisionEntiere,
            OpBinaire::Modulo,
            OpBinaire::Puissance,
        ] {
            assert!(operateur_binaire(op).is_some(), "{op:?}");
        }
        for op in [
            OpBinaire::EtBinaire,
            OpBinaire::OuBinaire,
            OpBinaire::DecalGauche,
            OpBinaire::DecalDroite,
            OpBinaire::Matrice,
        ] {
            assert!(operateur_binaire(op).is_none(), "{op:?}");
        }
        assert!(operateur_unaire(OpUnaire::Moins).is_some());
        assert!(operateur_unaire(OpUnaire::Inversion).is_none());
        assert!(operateur_unaire(OpUnaire::Non).is_none());
    }

    #[test]
    fn noms_constantes_et_fonctions() {
        assert_eq!(chercher_nom("pi"), Some(Entree::Constante(PI)));
        assert_eq!(chercher_nom("ln"), Some(Entree::Fonction(Fonction::Log)));
        assert_eq!(chercher_nom("PI"), None);
        assert_eq!(chercher_nom("__import__"), None);
        assert_eq!(chercher_nom("pow"), None);
        assert_eq!(noms().count(), 21);
    }

    #[test]
    fn noms_uniques() {
        let mut v: Vec<&str> = noms().collect();
        v.sort_unstable();
        v.dedup();
        assert_eq!(v.len(), 21);
    }
}
