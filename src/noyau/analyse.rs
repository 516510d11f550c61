// src/noyau/analyse.rs
//
// Descente récursive : jetons -> arbre (Noeud)
//
// Précédence (de la plus faible à la plus forte) :
//   or < and < not < | < & < << >> < + - < * / // % @ < unaire + - ~ < ** < appel/attribut/index
//
// Règles:
// - `**` est associatif à droite et lie plus fort que le moins unaire À GAUCHE :
//   "-2**2" => -(2**2) ; mais l’exposant accepte un unaire : "2**-1".
// - Un appel n’a une cible `Appele::Nom` que si l’identifiant est nu
//   (pas entre parenthèses, pas un attribut, pas le résultat d’un appel).
// - La profondeur d’imbrication est bornée (Limites::profondeur_max).

use super::arbre::{Appele, Construction, Litteral, Noeud, OpBinaire, OpUnaire};
use super::erreur::ErreurSyntaxe;
use super::jetons::Tok;
use super::pile::assure_pile;

/// Mots réservés : jamais des identifiants.
const MOTS_CLES: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

fn est_mot_cle(nom: &str) -> bool {
    MOTS_CLES.contains(&nom)
}

type Res<T> = Result<T, ErreurSyntaxe>;

/// Analyse une suite de jetons en UNE expression (rien après).
pub fn analyser(jetons: &[Tok], profondeur_max: usize) -> Res<Noeud> {
    if jetons.is_empty() {
        return Err(ErreurSyntaxe::new("expression vide"));
    }

    let mut a = Analyseur {
        jetons,
        pos: 0,
        profondeur: 0,
        profondeur_max,
    };

    let racine = a.expression()?;
    if let Some(t) = a.courant() {
        return Err(ErreurSyntaxe::new(format!("jeton inattendu: {t:?}")));
    }
    Ok(racine)
}

struct Analyseur<'a> {
    jetons: &'a [Tok],
    pos: usize,
    profondeur: usize,
    profondeur_max: usize,
}

impl<'a> Analyseur<'a> {
    /* ------------------------ Curseur ------------------------ */

    fn courant(&self) -> Option<&'a Tok> {
        self.jetons.get(self.pos)
    }

    fn suivant(&self) -> Option<&'a Tok> {
        self.jetons.get(self.pos + 1)
    }

    fn avancer(&mut self) -> Option<&'a Tok> {
        let t = self.jetons.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// Consomme `attendu` s’il est là.
    fn accepter(&mut self, attendu: &Tok) -> bool {
        if self.courant() == Some(attendu) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn exiger(&mut self, attendu: &Tok) -> Res<()> {
        if self.accepter(attendu) {
            Ok(())
        } else {
            Err(ErreurSyntaxe::new(format!(
                "attendu {attendu:?}, trouvé {:?}",
                self.courant()
            )))
        }
    }

    fn accepter_mot(&mut self, mot: &str) -> bool {
        if matches!(self.courant(), Some(Tok::Ident(n)) if n == mot) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Un niveau d’imbrication de plus (borné + pile garantie).
    fn descendre<T>(&mut self, f: impl FnOnce(&mut Self) -> Res<T>) -> Res<T> {
        if self.profondeur >= self.profondeur_max {
            return Err(ErreurSyntaxe::new("imbrication trop profonde"));
        }
        self.profondeur += 1;
        let r = assure_pile(|| f(self));
        self.profondeur -= 1;
        r
    }

    /* ------------------------ Niveaux booléens ------------------------ */

    fn expression(&mut self) -> Res<Noeud> {
        let gauche = self.et()?;
        if !self.accepter_mot("or") {
            return Ok(gauche);
        }
        loop {
            self.et()?;
            if !self.accepter_mot("or") {
                return Ok(Noeud::NonSupporte(Construction::OperationBooleenne));
            }
        }
    }

    fn et(&mut self) -> Res<Noeud> {
        let gauche = self.non()?;
        if !self.accepter_mot("and") {
            return Ok(gauche);
        }
        loop {
            self.non()?;
            if !self.accepter_mot("and") {
                return Ok(Noeud::NonSupporte(Construction::OperationBooleenne));
            }
        }
    }

    fn non(&mut self) -> Res<Noeud> {
        if self.accepter_mot("not") {
            let operande = self.descendre(|a| a.non())?;
            return Ok(Noeud::unaire(OpUnaire::Non, operande));
        }
        self.ou_binaire()
    }

    /* ------------------------ Niveaux binaires (gauche -> droite) ------------------------ */

    fn ou_binaire(&mut self) -> Res<Noeud> {
        let mut g = self.et_binaire()?;
        while self.accepter(&Tok::Barre) {
            let d = self.et_binaire()?;
            g = Noeud::binaire(OpBinaire::OuBinaire, g, d);
        }
        Ok(g)
    }

    fn et_binaire(&mut self) -> Res<Noeud> {
        let mut g = self.decalage()?;
        while self.accepter(&Tok::Esperluette) {
            let d = self.decalage()?;
            g = Noeud::binaire(OpBinaire::EtBinaire, g, d);
        }
        Ok(g)
    }

    fn decalage(&mut self) -> Res<Noeud> {
        let mut g = self.somme()?;
        loop {
            let op = match self.courant() {
                Some(Tok::DecalGauche) => OpBinaire::DecalGauche,
                Some(Tok::DecalDroite) => OpBinaire::DecalDroite,
                _ => return Ok(g),
            };
            self.pos += 1;
            let d = self.somme()?;
            g = Noeud::binaire(op, g, d);
        }
    }

    fn somme(&mut self) -> Res<Noeud> {
        let mut g = self.terme()?;
        loop {
            let op = match self.courant() {
                Some(Tok::Plus) => OpBinaire::Plus,
                Some(Tok::Moins) => OpBinaire::Moins,
                _ => return Ok(g),
            };
            self.pos += 1;
            let d = self.terme()?;
            g = Noeud::binaire(op, g, d);
        }
    }

    fn terme(&mut self) -> Res<Noeud> {
        let mut g = self.facteur()?;
        loop {
            let op = match self.courant() {
                Some(Tok::Etoile) => OpBinaire::Fois,
                Some(Tok::Slash) => OpBinaire::Division,
                Some(Tok::DoubleSlash) => OpBinaire::DivisionEntiere,
                Some(Tok::Pourcent) => OpBinaire::Modulo,
                Some(Tok::Arobase) => OpBinaire::Matrice,
                _ => return Ok(g),
            };
            self.pos += 1;
            let d = self.facteur()?;
            g = Noeud::binaire(op, g, d);
        }
    }

    /* ------------------------ Unaires + puissance ------------------------ */

    fn facteur(&mut self) -> Res<Noeud> {
        let op = match self.courant() {
            Some(Tok::Plus) => Some(OpUnaire::Plus),
            Some(Tok::Moins) => Some(OpUnaire::Moins),
            Some(Tok::Tilde) => Some(OpUnaire::Inversion),
            _ => None,
        };

        match op {
            Some(op) => {
                self.pos += 1;
                let operande = self.descendre(|a| a.facteur())?;
                Ok(Noeud::unaire(op, operande))
            }
            None => self.puissance(),
        }
    }

    fn puissance(&mut self) -> Res<Noeud> {
        let base = self.postfixe()?;
        if !self.accepter(&Tok::DoubleEtoile) {
            return Ok(base);
        }
        // exposant = facteur : associatif à droite + unaire autorisé
        let exposant = self.descendre(|a| a.facteur())?;
        Ok(Noeud::binaire(OpBinaire::Puissance, base, exposant))
    }

    /* ------------------------ Appels / attributs / index ------------------------ */

    fn postfixe(&mut self) -> Res<Noeud> {
        let (mut noeud, mut entre_parentheses) = self.atome()?;

        loop {
            match self.courant() {
                Some(Tok::ParG) => {
                    self.pos += 1;
                    let nom_nu = match &mut noeud {
                        Noeud::Identifiant(nom) if !entre_parentheses => Some(std::mem::take(nom)),
                        _ => None,
                    };
                    let appele = match nom_nu {
                        Some(nom) => Appele::Nom(nom),
                        None => Appele::Expression(Box::new(noeud)),
                    };
                    let (positionnels, nommes) = self.descendre(|a| a.arguments())?;
                    noeud = Noeud::Appel {
                        appele,
                        positionnels,
                        nommes,
                    };
                }
                Some(Tok::Point) => {
                    self.pos += 1;
                    match self.avancer() {
                        Some(Tok::Ident(nom)) if !est_mot_cle(nom) => {
                            noeud = Noeud::NonSupporte(Construction::Attribut(nom.clone()));
                        }
                        t => {
                            return Err(ErreurSyntaxe::new(format!(
                                "attribut invalide après '.': {t:?}"
                            )))
                        }
                    }
                }
                Some(Tok::CrochetG) => {
                    self.pos += 1;
                    self.descendre(|a| a.indexation())?;
                    noeud = Noeud::NonSupporte(Construction::Indexation);
                }
                _ => return Ok(noeud),
            }
            entre_parentheses = false;
        }
    }

    /// Après '(' : positionnels puis nommés, virgule finale tolérée.
    fn arguments(&mut self) -> Res<(Vec<Noeud>, Vec<(String, Noeud)>)> {
        let mut positionnels = Vec::new();
        let mut nommes: Vec<(String, Noeud)> = Vec::new();

        loop {
            if self.accepter(&Tok::ParD) {
                return Ok((positionnels, nommes));
            }

            let mot_cle = match (self.courant(), self.suivant()) {
                (Some(Tok::Ident(nom)), Some(Tok::Egal)) if !est_mot_cle(nom) => Some(nom.clone()),
                _ => None,
            };

            if let Some(nom) = mot_cle {
                self.pos += 2;
                if nommes.iter().any(|(n, _)| *n == nom) {
                    return Err(ErreurSyntaxe::new(format!("argument nommé répété: {nom}")));
                }
                let valeur = self.expression()?;
                nommes.push((nom, valeur));
            } else {
                if !nommes.is_empty() {
                    return Err(ErreurSyntaxe::new(
                        "argument positionnel après un argument nommé",
                    ));
                }
                positionnels.push(self.expression()?);
            }

            if !self.accepter(&Tok::Virgule) {
                self.exiger(&Tok::ParD)?;
                return Ok((positionnels, nommes));
            }
        }
    }

    /// Après '[' : index ou tranche (a:b:c), jusqu’à ']'.
    fn indexation(&mut self) -> Res<()> {
        let mut vide = true;
        loop {
            match self.courant() {
                Some(Tok::CrochetD) => {
                    if vide {
                        return Err(ErreurSyntaxe::new("index vide"));
                    }
                    self.pos += 1;
                    return Ok(());
                }
                Some(Tok::DeuxPoints) | Some(Tok::Virgule) => {
                    self.pos += 1;
                }
                Some(_) => {
                    self.expression()?;
                }
                None => return Err(ErreurSyntaxe::new("']' manquant")),
            }
            vide = false;
        }
    }

    /* ------------------------ Atomes ------------------------ */

    /// Retourne (noeud, entre_parentheses).
    fn atome(&mut self) -> Res<(Noeud, bool)> {
        let t = self
            .avancer()
            .ok_or_else(|| ErreurSyntaxe::new("fin d’expression inattendue"))?;

        let noeud = match t {
            Tok::Entier(n) => Noeud::Litteral(Litteral::Entier(n.clone())),
            Tok::Flottant(v) => Noeud::Litteral(Litteral::Flottant(*v)),
            Tok::Imaginaire(_) => Noeud::Litteral(Litteral::NonNumerique("complex".into())),
            Tok::Texte(_) => {
                // 'a' 'b' : concaténation implicite
                while matches!(self.courant(), Some(Tok::Texte(_))) {
                    self.pos += 1;
                }
                Noeud::Litteral(Litteral::NonNumerique("str".into()))
            }

            Tok::Ident(nom) => match nom.as_str() {
                "True" | "False" | "None" => Noeud::Litteral(Litteral::NonNumerique(nom.clone())),
                _ if est_mot_cle(nom) => {
                    return Err(ErreurSyntaxe::new(format!("mot-clé inattendu: {nom}")))
                }
                _ => Noeud::Identifiant(nom.clone()),
            },

            Tok::ParG => return self.descendre(|a| a.parentheses()),
            Tok::CrochetG => self.descendre(|a| a.liste())?,
            Tok::AccoladeG => self.descendre(|a| a.accolades())?,

            autre => return Err(ErreurSyntaxe::new(format!("jeton inattendu: {autre:?}"))),
        };

        Ok((noeud, false))
    }

    /// Après '(' : groupe, ou tuple si virgule.
    fn parentheses(&mut self) -> Res<(Noeud, bool)> {
        if self.accepter(&Tok::ParD) {
            return Ok((Noeud::NonSupporte(Construction::Tuple), false));
        }

        let interieur = self.expression()?;
        if self.accepter(&Tok::ParD) {
            return Ok((interieur, true));
        }
        if self.accepter_mot("for") {
            return Ok((self.comprehension(&Tok::ParD)?, false));
        }

        self.exiger(&Tok::Virgule)?;
        self.suite_elements(&Tok::ParD)?;
        Ok((Noeud::NonSupporte(Construction::Tuple), false))
    }

    /// Après '[' : [a, b, ...]
    fn liste(&mut self) -> Res<Noeud> {
        if !self.accepter(&Tok::CrochetD) {
            self.expression()?;
            if self.accepter_mot("for") {
                return self.comprehension(&Tok::CrochetD);
            }
            if self.accepter(&Tok::Virgule) {
                self.suite_elements(&Tok::CrochetD)?;
            } else {
                self.exiger(&Tok::CrochetD)?;
            }
        }
        Ok(Noeud::NonSupporte(Construction::Liste))
    }

    /// Après '{' : {} / {k: v, ...} / {a, b, ...}
    fn accolades(&mut self) -> Res<Noeud> {
        if self.accepter(&Tok::AccoladeD) {
            return Ok(Noeud::NonSupporte(Construction::Dictionnaire));
        }

        self.expression()?;
        if self.accepter_mot("for") {
            return self.comprehension(&Tok::AccoladeD);
        }
        if !self.accepter(&Tok::DeuxPoints) {
            if self.accepter(&Tok::Virgule) {
                self.suite_elements(&Tok::AccoladeD)?;
            } else {
                self.exiger(&Tok::AccoladeD)?;
            }
            return Ok(Noeud::NonSupporte(Construction::Ensemble));
        }

        self.expression()?;
        if self.accepter_mot("for") {
            return self.comprehension(&Tok::AccoladeD);
        }
        loop {
            if self.accepter(&Tok::AccoladeD) {
                return Ok(Noeud::NonSupporte(Construction::Dictionnaire));
            }
            self.exiger(&Tok::Virgule)?;
            if self.accepter(&Tok::AccoladeD) {
                return Ok(Noeud::NonSupporte(Construction::Dictionnaire));
            }
            self.expression()?;
            self.exiger(&Tok::DeuxPoints)?;
            self.expression()?;
        }
    }

    /// Après `for` : clauses sautées jusqu’à la fermeture équilibrée.
    fn comprehension(&mut self, fermeture: &Tok) -> Res<Noeud> {
        let mut ouvertes: Vec<Tok> = Vec::new();
        let mut vide = true;
        loop {
            let t = self
                .avancer()
                .ok_or_else(|| ErreurSyntaxe::new("compréhension non fermée"))?;
            match t {
                Tok::ParG => ouvertes.push(Tok::ParD),
                Tok::CrochetG => ouvertes.push(Tok::CrochetD),
                Tok::AccoladeG => ouvertes.push(Tok::AccoladeD),
                Tok::ParD | Tok::CrochetD | Tok::AccoladeD => match ouvertes.pop() {
                    Some(attendue) if attendue == *t => {}
                    None if t == fermeture && !vide => {
                        return Ok(Noeud::NonSupporte(Construction::Comprehension))
                    }
                    _ => return Err(ErreurSyntaxe::new(format!("fermeture inattendue: {t:?}"))),
                },
                _ => {}
            }
            vide = false;
        }
    }

    /// Éléments restants après une première virgule : `b, c, ] ` (virgule finale tolérée).
    fn suite_elements(&mut self, fermeture: &Tok) -> Res<()> {
        loop {
            if self.accepter(fermeture) {
                return Ok(());
            }
            self.expression()?;
            if !self.accepter(&Tok::Virgule) {
                return self.exiger(fermeture);
            }
        }
    }
}
