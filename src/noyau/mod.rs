//! Noyau d’évaluation sûre
//!
//! Organisation interne :
//! - jetons.rs   : tokenisation (littéraux, opérateurs, ponctuation)
//! - analyse.rs  : descente récursive -> arbre (profondeur bornée)
//! - arbre.rs    : arbre fermé (les constructions refusées y sont marquées)
//! - tables.rs   : listes blanches opérateurs / noms
//! - nombre.rs   : tour numérique entier exact / flottant
//! - fonctions.rs: fonctions autorisées + liaison des arguments
//! - eval.rs     : pipeline complet
//! - format.rs   : affichage du résultat
//! - erreur.rs   : taxonomie EvalError
//! - reglages.rs : limites (bits, factorielle, profondeur)
//! - pile.rs     : garde de pile pour la récursion

pub mod analyse;
pub mod arbre;
pub mod erreur;
pub mod eval;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod nombre;
pub mod pile;
pub mod reglages;
pub mod tables;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::EvalError;
pub use eval::{evaluate, Evaluateur};
pub use format::formater_resultat;
pub use reglages::Limites;
