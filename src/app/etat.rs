//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, résultat, erreur,
//! historique) et offrir les actions des boutons / du champ de saisie.
//!
//! Contrats :
//! - Chaque action est une méthode explicite : aucun effet caché pendant le rendu.
//! - Le noyau reste pur : l’état l’appelle, jamais l’inverse.
//! - Un échec n’ajoute rien à l’historique et ne touche pas à l’entrée.

use std::collections::VecDeque;

use crate::noyau::{formater_resultat, Evaluateur, Limites};

/// Nombre maximal de lignes conservées (la plus récente en tête).
pub const HISTORIQUE_MAX: usize = 15;

/// Message affiché quand on évalue un champ vide.
pub const MSG_ENTREE_VIDE: &str = "Enter an expression.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntreeHistorique {
    pub expression: String,
    pub resultat: String,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: Option<String>,
    pub erreur: Option<String>,

    // --- historique (plus récent d’abord) ---
    pub historique: VecDeque<EntreeHistorique>,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,

    evaluateur: Evaluateur,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::avec_limites(Limites::default())
    }
}

impl AppCalc {
    pub fn avec_limites(limites: Limites) -> Self {
        Self {
            entree: String::new(),
            resultat: None,
            erreur: None,
            historique: VecDeque::with_capacity(HISTORIQUE_MAX),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
            evaluateur: Evaluateur::new(limites),
        }
    }

    /* ------------------------ Champ de saisie ------------------------ */

    /// L’utilisateur a tapé dans le champ : l’ancienne erreur ne vaut plus.
    pub fn synchroniser_entree(&mut self) {
        self.erreur = None;
    }

    /* ------------------------ Pavé / puces ------------------------ */

    pub fn ajouter_jeton(&mut self, jeton: &str) {
        self.entree.push_str(jeton);
        self.erreur = None;
        self.focus_entree = true;
    }

    /// ⌫ : retire un caractère (pas un octet).
    pub fn effacer_dernier(&mut self) {
        self.entree.pop();
        self.erreur = None;
        self.focus_entree = true;
    }

    /// C : entrée + résultat + erreur.
    pub fn tout_effacer(&mut self) {
        self.entree.clear();
        self.resultat = None;
        self.erreur = None;
        self.focus_entree = true;
    }

    /* ------------------------ Évaluation ------------------------ */

    pub fn evaluer(&mut self) {
        self.focus_entree = true;

        let expression = self.entree.trim().to_string();
        if expression.is_empty() {
            self.resultat = None;
            self.erreur = Some(MSG_ENTREE_VIDE.to_string());
            return;
        }

        match self.evaluateur.evaluer(&expression) {
            Ok(v) => {
                let affiche = formater_resultat(v);
                self.resultat = Some(affiche.clone());
                self.erreur = None;
                self.pousser_historique(expression, affiche);
            }
            Err(e) => {
                self.resultat = None;
                self.erreur = Some(e.to_string());
            }
        }
    }

    fn pousser_historique(&mut self, expression: String, resultat: String) {
        self.historique.push_front(EntreeHistorique {
            expression,
            resultat,
        });
        self.historique.truncate(HISTORIQUE_MAX);
    }

    /* ------------------------ Historique ------------------------ */

    /// « Use » : recharge une expression passée dans le champ.
    pub fn utiliser_historique(&mut self, expression: &str) {
        tracing::info!(expression, "expression rechargée depuis l’historique");
        self.entree = expression.to_string();
        self.erreur = None;
        self.focus_entree = true;
    }

    pub fn vider_historique(&mut self) {
        tracing::info!(lignes = self.historique.len(), "historique vidé");
        self.historique.clear();
    }
}
