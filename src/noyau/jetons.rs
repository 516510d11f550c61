// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_traits::Num;

use super::erreur::ErreurSyntaxe;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Entier(BigInt),
    Flottant(f64),
    Imaginaire(f64), // 2j : reconnu, puis refusé à l’évaluation
    Texte(String),   // 'abc' : idem

    // Identifiants ET mots-clés (le parse décide : True/None/not/lambda…)
    Ident(String),

    Plus,
    Moins,
    Etoile,
    DoubleEtoile, // ** (et ^ après substitution)
    Slash,
    DoubleSlash, // //
    Pourcent,

    // Opérateurs hors liste : analysés pour un refus précis
    Tilde,
    Esperluette,
    Barre,
    Arobase,
    DecalGauche,
    DecalDroite,

    ParG,
    ParD,
    CrochetG,
    CrochetD,
    AccoladeG,
    AccoladeD,
    Virgule,
    Point,
    DeuxPoints,
    Egal,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers décimaux (séparateurs `_`), hex/octal/binaire (0x, 0o, 0b)
/// - flottants (1.5, .5, 5., 1e10, 1.5e-3) et suffixe imaginaire (2j)
/// - chaînes '…' / "…" (uniquement pour les refuser proprement)
/// - opérateurs + - * ** / // % et ~ & | @ << >>
/// - ( ) [ ] { } , . : =
/// - identifiants unicode, sensibles à la casse
/// - commentaires `#` jusqu’à la fin de ligne
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurSyntaxe> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    // saut de ligne autorisé seulement entre parenthèses/crochets/accolades
    let mut profondeur: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\n' || c == '\r' {
            if profondeur == 0 {
                return Err(ErreurSyntaxe::new("saut de ligne hors parenthèses"));
            }
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // Ponctuation + opérateurs
        let suivant = chars.get(i + 1).copied();
        let simple = match c {
            '(' | '[' | '{' => {
                profondeur += 1;
                Some(match c {
                    '(' => Tok::ParG,
                    '[' => Tok::CrochetG,
                    _ => Tok::AccoladeG,
                })
            }
            ')' | ']' | '}' => {
                profondeur = profondeur.saturating_sub(1);
                Some(match c {
                    ')' => Tok::ParD,
                    ']' => Tok::CrochetD,
                    _ => Tok::AccoladeD,
                })
            }
            ',' => Some(Tok::Virgule),
            ':' => Some(Tok::DeuxPoints),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Moins),
            '%' => Some(Tok::Pourcent),
            '~' => Some(Tok::Tilde),
            '&' => Some(Tok::Esperluette),
            '|' => Some(Tok::Barre),
            '@' => Some(Tok::Arobase),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        match (c, suivant) {
            ('*', Some('*')) => {
                out.push(Tok::DoubleEtoile);
                i += 2;
                continue;
            }
            ('*', _) => {
                out.push(Tok::Etoile);
                i += 1;
                continue;
            }
            ('/', Some('/')) => {
                out.push(Tok::DoubleSlash);
                i += 2;
                continue;
            }
            ('/', _) => {
                out.push(Tok::Slash);
                i += 1;
                continue;
            }
            ('<', Some('<')) => {
                out.push(Tok::DecalGauche);
                i += 2;
                continue;
            }
            ('>', Some('>')) => {
                out.push(Tok::DecalDroite);
                i += 2;
                continue;
            }
            ('=', Some('=')) => {
                return Err(ErreurSyntaxe::new("comparaison interdite"));
            }
            ('=', _) => {
                out.push(Tok::Egal);
                i += 1;
                continue;
            }
            _ => {}
        }

        // Nombre : chiffre, ou '.' suivi d’un chiffre
        if c.is_ascii_digit() || (c == '.' && suivant.is_some_and(|d| d.is_ascii_digit())) {
            let (tok, fin) = lire_nombre(&chars, i)?;
            out.push(tok);
            i = fin;
            continue;
        }

        if c == '.' {
            out.push(Tok::Point);
            i += 1;
            continue;
        }

        // Chaînes (y compris concaténation implicite gérée au parse)
        if c == '\'' || c == '"' {
            let (texte, fin) = lire_texte(&chars, i)?;
            out.push(Tok::Texte(texte));
            i = fin;
            continue;
        }

        // Identifiants : [alpha_][alnum_]*
        if c.is_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word));
            continue;
        }

        return Err(ErreurSyntaxe::new(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Chiffres avec `_` autorisé uniquement ENTRE deux chiffres.
/// Retourne (chiffres sans `_`, position après).
fn lire_chiffres(
    chars: &[char],
    mut i: usize,
    est_chiffre: fn(char) -> bool,
) -> Result<(String, usize), ErreurSyntaxe> {
    let mut digits = String::new();
    while i < chars.len() {
        let c = chars[i];
        if est_chiffre(c) {
            digits.push(c);
            i += 1;
        } else if c == '_' {
            let avant_ok = !digits.is_empty();
            let apres_ok = chars.get(i + 1).is_some_and(|&d| est_chiffre(d));
            if !avant_ok || !apres_ok {
                return Err(ErreurSyntaxe::new("séparateur '_' mal placé"));
            }
            i += 1;
        } else {
            break;
        }
    }
    Ok((digits, i))
}

fn lire_nombre(chars: &[char], start: usize) -> Result<(Tok, usize), ErreurSyntaxe> {
    let mut i = start;

    // Préfixes 0x / 0o / 0b
    if chars[i] == '0' {
        let base = match chars.get(i + 1) {
            Some('x' | 'X') => Some((16, (|c: char| c.is_ascii_hexdigit()) as fn(char) -> bool)),
            Some('o' | 'O') => Some((8, (|c: char| ('0'..='7').contains(&c)) as fn(char) -> bool)),
            Some('b' | 'B') => Some((2, (|c: char| c == '0' || c == '1') as fn(char) -> bool)),
            _ => None,
        };
        if let Some((radix, est_chiffre)) = base {
            i += 2;
            // Python tolère 0x_ff : un '_' juste après le préfixe
            if chars.get(i) == Some(&'_') {
                i += 1;
            }
            let (digits, fin) = lire_chiffres(chars, i, est_chiffre)?;
            if digits.is_empty() {
                return Err(ErreurSyntaxe::new("littéral entier invalide"));
            }
            refuse_collage(chars, fin)?;
            let n = BigInt::from_str_radix(&digits, radix)
                .map_err(|_| ErreurSyntaxe::new("littéral entier invalide"))?;
            return Ok((Tok::Entier(n), fin));
        }
    }

    // Partie entière (peut être vide : ".5")
    let (entier, fin_entier) = lire_chiffres(chars, i, |c| c.is_ascii_digit())?;
    i = fin_entier;

    let mut texte = entier.clone();
    let mut flottant = false;

    // Partie fractionnaire
    if chars.get(i) == Some(&'.') {
        flottant = true;
        i += 1;
        texte.push('.');
        if chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            let (frac, fin) = lire_chiffres(chars, i, |c| c.is_ascii_digit())?;
            texte.push_str(&frac);
            i = fin;
        }
    }

    // Exposant
    if matches!(chars.get(i), Some('e' | 'E')) {
        let mut j = i + 1;
        let mut signe = String::new();
        if let Some(&s @ ('+' | '-')) = chars.get(j) {
            signe.push(s);
            j += 1;
        }
        if chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
            let (exp, fin) = lire_chiffres(chars, j, |c| c.is_ascii_digit())?;
            texte.push('e');
            texte.push_str(&signe);
            texte.push_str(&exp);
            flottant = true;
            i = fin;
        } else {
            return Err(ErreurSyntaxe::new("exposant invalide"));
        }
    }

    // Imaginaire
    if matches!(chars.get(i), Some('j' | 'J')) {
        i += 1;
        refuse_collage(chars, i)?;
        let v = parse_f64(&texte)?;
        return Ok((Tok::Imaginaire(v), i));
    }

    refuse_collage(chars, i)?;

    if flottant {
        return Ok((Tok::Flottant(parse_f64(&texte)?), i));
    }

    // 012 interdit (sauf 000)
    if entier.len() > 1 && entier.starts_with('0') && entier.chars().any(|c| c != '0') {
        return Err(ErreurSyntaxe::new("zéros initiaux interdits"));
    }
    let n = BigInt::parse_bytes(entier.as_bytes(), 10)
        .ok_or_else(|| ErreurSyntaxe::new("nombre invalide"))?;
    Ok((Tok::Entier(n), i))
}

/// `2pi`, `1.real` : un nombre ne peut pas être collé à un identifiant.
fn refuse_collage(chars: &[char], i: usize) -> Result<(), ErreurSyntaxe> {
    match chars.get(i) {
        Some(&c) if c.is_alphanumeric() || c == '_' => {
            Err(ErreurSyntaxe::new("littéral décimal invalide"))
        }
        _ => Ok(()),
    }
}

fn parse_f64(texte: &str) -> Result<f64, ErreurSyntaxe> {
    // "5." et ".5" sont acceptés par str::parse ; 1e400 donne inf
    texte
        .parse::<f64>()
        .map_err(|_| ErreurSyntaxe::new("flottant invalide"))
}

fn lire_texte(chars: &[char], start: usize) -> Result<(String, usize), ErreurSyntaxe> {
    let quote = chars[start];
    let mut i = start + 1;
    let mut texte = String::new();

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            if let Some(&e) = chars.get(i + 1) {
                texte.push(e);
            }
            i += 2;
            continue;
        }
        if c == quote {
            return Ok((texte, i + 1));
        }
        if c == '\n' {
            break;
        }
        texte.push(c);
        i += 1;
    }

    Err(ErreurSyntaxe::new("chaîne non terminée"))
}

/// Format utilitaire (logs) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Entier(n) => n.to_string(),
            Tok::Flottant(v) => format!("{v:?}"),
            Tok::Imaginaire(v) => format!("{v:?}j"),
            Tok::Texte(s) => format!("{s:?}"),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Moins => "-".to_string(),
            Tok::Etoile => "*".to_string(),
            Tok::DoubleEtoile => "**".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::DoubleSlash => "//".to_string(),
            Tok::Pourcent => "%".to_string(),

            Tok::Tilde => "~".to_string(),
            Tok::Esperluette => "&".to_string(),
            Tok::Barre => "|".to_string(),
            Tok::Arobase => "@".to_string(),
            Tok::DecalGauche => "<<".to_string(),
            Tok::DecalDroite => ">>".to_string(),

            Tok::ParG => "(".to_string(),
            Tok::ParD => ")".to_string(),
            Tok::CrochetG => "[".to_string(),
            Tok::CrochetD => "]".to_string(),
            Tok::AccoladeG => "{".to_string(),
            Tok::AccoladeD => "}".to_string(),
            Tok::Virgule => ",".to_string(),
            Tok::Point => ".".to_string(),
            Tok::DeuxPoints => ":".to_string(),
            Tok::Egal => "=".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
