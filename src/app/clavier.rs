// src/app/clavier.rs
//
// Pavé + puces de fonctions (données statiques).
// La vue les dessine, l’état les applique : aucune logique d’affichage ici.

use super::etat::AppCalc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Ajoute le texte à la fin de l’entrée.
    Inserer(&'static str),
    Effacer,
    ToutEffacer,
    Evaluer,
}

#[derive(Clone, Copy, Debug)]
pub struct Touche {
    pub etiquette: &'static str,
    pub action: Action,
    pub aide: &'static str,
}

const fn ins(etiquette: &'static str, texte: &'static str) -> Touche {
    Touche {
        etiquette,
        action: Action::Inserer(texte),
        aide: "",
    }
}

const fn act(etiquette: &'static str, action: Action, aide: &'static str) -> Touche {
    Touche {
        etiquette,
        action,
        aide,
    }
}

pub const COLONNES: usize = 5;

/// Les symboles affichés (÷ × π √) insèrent leur forme ASCII.
pub static RANGEES: [[Touche; COLONNES]; 5] = [
    [
        ins("7", "7"),
        ins("8", "8"),
        ins("9", "9"),
        ins("÷", "/"),
        act("⌫", Action::Effacer, "Delete the last character"),
    ],
    [
        ins("4", "4"),
        ins("5", "5"),
        ins("6", "6"),
        ins("×", "*"),
        ins("(", "("),
    ],
    [
        ins("1", "1"),
        ins("2", "2"),
        ins("3", "3"),
        ins("-", "-"),
        ins(")", ")"),
    ],
    [
        ins("0", "0"),
        ins(".", "."),
        ins("%", "%"),
        ins("+", "+"),
        act("C", Action::ToutEffacer, "Clear expression and result"),
    ],
    [
        ins("π", "pi"),
        ins("e", "e"),
        ins("^", "^"),
        ins("√", "sqrt("),
        act("=", Action::Evaluer, "Evaluate"),
    ],
];

/// Puces : l’étiquette est le texte inséré.
pub static PUCES: [&str; 15] = [
    "sin(",
    "cos(",
    "tan(",
    "asin(",
    "acos(",
    "atan(",
    "log(",
    "log10(",
    "ln(",
    "exp(",
    "factorial(",
    "degrees(",
    "radians(",
    "abs(",
    "round(",
];

impl AppCalc {
    pub fn appliquer(&mut self, action: Action) {
        match action {
            Action::Inserer(texte) => self.ajouter_jeton(texte),
            Action::Effacer => self.effacer_dernier(),
            Action::ToutEffacer => self.tout_effacer(),
            Action::Evaluer => self.evaluer(),
        }
    }
}
