// src/noyau/arbre.rs
//
// Arbre syntaxique FERMÉ (construit par analyse.rs, consommé par eval.rs).
// - Litteral / Binaire / Unaire / Appel / Identifiant : grammaire autorisée
// - NonSupporte : constructions reconnues pour mieux les refuser
//
// IMPORTANT (SAFE):
// - Les opérateurs hors liste (&, |, <<, ~, not…) existent dans l’arbre,
//   mais seule la table d’opérateurs décide s’ils s’évaluent.

use num_bigint::BigInt;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Litteral {
    Entier(BigInt),
    Flottant(f64),
    // chaîne, imaginaire, True/False/None : refusés à l’évaluation
    NonNumerique(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Plus,
    Moins,
    Fois,
    Division,
    DivisionEntiere,
    Modulo,
    Puissance,

    EtBinaire,
    OuBinaire,
    DecalGauche,
    DecalDroite,
    Matrice,
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Plus => "+",
            OpBinaire::Moins => "-",
            OpBinaire::Fois => "*",
            OpBinaire::Division => "/",
            OpBinaire::DivisionEntiere => "//",
            OpBinaire::Modulo => "%",
            OpBinaire::Puissance => "**",
            OpBinaire::EtBinaire => "&",
            OpBinaire::OuBinaire => "|",
            OpBinaire::DecalGauche => "<<",
            OpBinaire::DecalDroite => ">>",
            OpBinaire::Matrice => "@",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnaire {
    Plus,
    Moins,
    Inversion, // ~
    Non,       // not
}

impl OpUnaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpUnaire::Plus => "+",
            OpUnaire::Moins => "-",
            OpUnaire::Inversion => "~",
            OpUnaire::Non => "not",
        }
    }
}

/// Constructions analysées mais jamais évaluées.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Construction {
    Liste,
    Tuple,
    Ensemble,
    Dictionnaire,
    Attribut(String),
    Indexation,
    OperationBooleenne,
    Comprehension,
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construction::Liste => write!(f, "list display"),
            Construction::Tuple => write!(f, "tuple display"),
            Construction::Ensemble => write!(f, "set display"),
            Construction::Dictionnaire => write!(f, "dict display"),
            Construction::Attribut(nom) => write!(f, "attribute access '.{nom}'"),
            Construction::Indexation => write!(f, "subscript"),
            Construction::OperationBooleenne => write!(f, "boolean operation"),
            Construction::Comprehension => write!(f, "comprehension"),
        }
    }
}

/// Cible d’un appel : seul un nom nu est appelable.
#[derive(Clone, Debug, PartialEq)]
pub enum Appele {
    Nom(String),
    Expression(Box<Noeud>), // (f)(x), obj.m(x), f(1)(2)…
}

#[derive(Clone, Debug, PartialEq)]
pub enum Noeud {
    Litteral(Litteral),
    Binaire {
        op: OpBinaire,
        gauche: Box<Noeud>,
        droite: Box<Noeud>,
    },
    Unaire {
        op: OpUnaire,
        operande: Box<Noeud>,
    },
    Appel {
        appele: Appele,
        positionnels: Vec<Noeud>,
        nommes: Vec<(String, Noeud)>,
    },
    Identifiant(String),
    NonSupporte(Construction),
}

impl Noeud {
    pub fn binaire(op: OpBinaire, gauche: Noeud, droite: Noeud) -> Self {
        Noeud::Binaire {
            op,
            gauche: Box::new(gauche),
            droite: Box::new(droite),
        }
    }

    pub fn unaire(op: OpUnaire, operande: Noeud) -> Self {
        Noeud::Unaire {
            op,
            operande: Box::new(operande),
        }
    }

    /// Déplace les enfants directs vers `pile` (ce nœud devient une feuille).
    fn detacher_enfants(&mut self, pile: &mut Vec<Noeud>) {
        match self {
            Noeud::Binaire { gauche, droite, .. } => {
                pile.push(detacher(gauche));
                pile.push(detacher(droite));
            }
            Noeud::Unaire { operande, .. } => pile.push(detacher(operande)),
            Noeud::Appel {
                appele,
                positionnels,
                nommes,
            } => {
                if let Appele::Expression(cible) = appele {
                    pile.push(detacher(cible));
                }
                pile.append(positionnels);
                pile.extend(nommes.drain(..).map(|(_, n)| n));
            }
            Noeud::Litteral(_) | Noeud::Identifiant(_) | Noeud::NonSupporte(_) => {}
        }
    }
}

fn detacher(enfant: &mut Noeud) -> Noeud {
    std::mem::replace(enfant, Noeud::Identifiant(String::new()))
}

/// Libération itérative : `1+1+…+1` ou `f(1)(1)…` donnent des chaînes
/// sans limite de longueur, la pile d’appels ne doit pas les suivre.
impl Drop for Noeud {
    fn drop(&mut self) {
        let mut pile = Vec::new();
        self.detacher_enfants(&mut pile);
        while let Some(mut noeud) = pile.pop() {
            noeud.detacher_enfants(&mut pile);
        }
    }
}

/// Affichage compact, parenthésé partout (logs uniquement).
impl fmt::Display for Noeud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Noeud::Litteral(Litteral::Entier(n)) => write!(f, "{n}"),
            Noeud::Litteral(Litteral::Flottant(v)) => write!(f, "{v:?}"),
            Noeud::Litteral(Litteral::NonNumerique(s)) => write!(f, "<{s}>"),
            Noeud::Binaire { op, gauche, droite } => {
                write!(f, "({gauche} {} {droite})", op.symbole())
            }
            Noeud::Unaire { op, operande } => match op {
                OpUnaire::Non => write!(f, "(not {operande})"),
                _ => write!(f, "({}{operande})", op.symbole()),
            },
            Noeud::Appel {
                appele,
                positionnels,
                nommes,
            } => {
                match appele {
                    Appele::Nom(nom) => write!(f, "{nom}(")?,
                    Appele::Expression(e) => write!(f, "{e}(")?,
                }
                let mut premier = true;
                for a in positionnels {
                    if !premier {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                    premier = false;
                }
                for (nom, a) in nommes {
                    if !premier {
                        write!(f, ", ")?;
                    }
                    write!(f, "{nom}={a}")?;
                    premier = false;
                }
                write!(f, ")")
            }
            Noeud::Identifiant(nom) => write!(f, "{nom}"),
            Noeud::NonSupporte(c) => write!(f, "<{c}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn un() -> Noeud {
        Noeud::Litteral(Litteral::Entier(BigInt::from(1)))
    }

    #[test]
    fn liberation_chaine_gauche_million() {
        let mut g = un();
        for _ in 0..1_000_000 {
            g = Noeud::binaire(OpBinaire::Plus, g, un());
        }
        drop(g);
    }

    #[test]
    fn liberation_appels_et_unaires_empiles() {
        let mut n = Noeud::Identifiant("f".into());
        for i in 0..500_000 {
            n = if i % 2 == 0 {
                Noeud::Appel {
                    appele: Appele::Expression(Box::new(n)),
                    positionnels: vec![un()],
                    nommes: vec![("k".into(), un())],
                }
            } else {
                Noeud::unaire(OpUnaire::Moins, n)
            };
        }
        drop(n);
    }

    #[test]
    fn arbre_intact_apres_detachement() {
        let n = Noeud::binaire(
            OpBinaire::Fois,
            Noeud::binaire(OpBinaire::Plus, un(), un()),
            Noeud::unaire(OpUnaire::Moins, un()),
        );
        let copie = n.clone();
        assert_eq!(copie.to_string(), "((1 + 1) * (-1))");
        assert_eq!(n, copie);
    }
}
