//! Noyau : évaluation (pipeline réel)
//!
//! trim -> `^` devient `**` -> jetons -> arbre -> parcours récursif -> f64
//!
//! Contrats :
//! - Fonction pure : aucune entrée/sortie, aucun état partagé modifiable.
//! - Chaque nœud est vérifié contre les listes blanches (tables.rs) AVANT
//!   d’évaluer ses enfants.
//! - Toute erreur sort sous forme d’EvalError (aucun détail d’analyse ne fuit).

use super::analyse::analyser;
use super::arbre::{Appele, Litteral, Noeud};
use super::erreur::EvalError;
use super::jetons::{format_tokens, tokenize};
use super::nombre::Nombre;
use super::pile::assure_pile;
use super::reglages::Limites;
use super::tables::{chercher_nom, operateur_binaire, operateur_unaire, Entree};

/// API publique : évalue avec les limites par défaut.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    Evaluateur::default().evaluer(expression)
}

/// Évaluateur configuré (Copy, sans état : partageable entre threads).
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluateur {
    limites: Limites,
}

impl Evaluateur {
    pub fn new(limites: Limites) -> Self {
        Self { limites }
    }

    pub fn evaluer(&self, expression: &str) -> Result<f64, EvalError> {
        let resultat = self.pipeline(expression);
        match &resultat {
            Ok(v) => tracing::debug!(expression, resultat = v, "évaluation réussie"),
            Err(e) => tracing::debug!(expression, erreur = %e, "évaluation refusée"),
        }
        resultat
    }

    fn pipeline(&self, expression: &str) -> Result<f64, EvalError> {
        let s = expression.trim();
        if s.is_empty() {
            return Err(EvalError::EmptyExpression);
        }

        // Alias puissance : substitution textuelle, sans exception
        let s = s.replace('^', "**");

        // 1) Jetons + 2) Arbre : le détail reste dans les logs
        let arbre = tokenize(&s)
            .and_then(|jetons| {
                tracing::trace!(jetons = %format_tokens(&jetons), "jetons");
                analyser(&jetons, self.limites.profondeur_max)
            })
            .map_err(|e| {
                tracing::debug!(detail = %e, "syntaxe refusée");
                EvalError::from(e)
            })?;

        // 3) Parcours
        let valeur = self.evaluer_noeud(&arbre)?;

        // 4) Finalisation
        let v = valeur.en_f64()?;
        if v.is_nan() {
            return Err(EvalError::NonNumericResult);
        }
        Ok(v)
    }

    fn evaluer_noeud(&self, noeud: &Noeud) -> Result<Nombre, EvalError> {
        assure_pile(|| match noeud {
            Noeud::Litteral(Litteral::Entier(n)) => Ok(Nombre::Entier(n.clone())),
            Noeud::Litteral(Litteral::Flottant(v)) => Ok(Nombre::Flottant(*v)),
            Noeud::Litteral(Litteral::NonNumerique(_)) => Err(EvalError::NonNumericConstant),

            Noeud::Binaire { .. } => self.evaluer_chaine(noeud),

            Noeud::Unaire { op, operande } => {
                let f = operateur_unaire(*op)
                    .ok_or(EvalError::UnaryOperatorNotAllowed(op.symbole()))?;
                Ok(f(self.evaluer_noeud(operande)?))
            }

            Noeud::Appel {
                appele,
                positionnels,
                nommes,
            } => {
                let nom = match appele {
                    Appele::Nom(nom) => nom,
                    Appele::Expression(_) => return Err(EvalError::OnlyLiteralCallsAllowed),
                };
                let fonction = match chercher_nom(nom) {
                    Some(Entree::Fonction(f)) => f,
                    _ => return Err(EvalError::FunctionNotAllowed(nom.clone())),
                };

                let args = positionnels
                    .iter()
                    .map(|a| self.evaluer_noeud(a))
                    .collect::<Result<Vec<_>, _>>()?;
                let kwargs = nommes
                    .iter()
                    .map(|(k, a)| self.evaluer_noeud(a).map(|v| (k.clone(), v)))
                    .collect::<Result<Vec<_>, _>>()?;

                fonction.appeler(nom, args, kwargs, &self.limites)
            }

            Noeud::Identifiant(nom) => match chercher_nom(nom) {
                Some(Entree::Constante(v)) => Ok(Nombre::Flottant(v)),
                _ => Err(EvalError::NameNotAllowed(nom.clone())),
            },

            Noeud::NonSupporte(c) => Err(EvalError::non_supporte(c.to_string())),
        })
    }

    /// Épine gauche `((a op b) op c) op d` parcourue en boucle : `1+1+…+1`
    /// n’est pas bornée par la profondeur. Même ordre que la récursion :
    /// opérateurs de haut en bas, puis opérandes de gauche à droite.
    fn evaluer_chaine(&self, racine: &Noeud) -> Result<Nombre, EvalError> {
        let mut epine = Vec::new();
        let mut noeud = racine;
        while let Noeud::Binaire { op, gauche, droite } = noeud {
            let f = operateur_binaire(*op).ok_or(EvalError::OperatorNotAllowed(op.symbole()))?;
            epine.push((f, &**droite));
            noeud = &**gauche;
        }

        let mut acc = self.evaluer_noeud(noeud)?;
        while let Some((f, droite)) = epine.pop() {
            let b = self.evaluer_noeud(droite)?;
            acc = f(acc, b, &self.limites)?;
        }
        Ok(acc)
    }
}
