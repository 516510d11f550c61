//! Fonctions de la liste blanche : signature + implémentation.
//!
//! Chaque fonction déclare ses paramètres ; la liaison des arguments
//! (positionnels puis nommés) est faite ici, avant tout calcul.
//! Seule `round` accepte des arguments nommés (`number`, `ndigits`).

use std::f64::consts::{LN_10, LN_2};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use super::erreur::EvalError;
use super::nombre::Nombre;
use super::reglages::Limites;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Abs,
    Round,
    Sqrt,
    Log,
    Log10,
    Exp,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Degrees,
    Radians,
    Factorial,
    Floor,
    Ceil,
}

struct Signature {
    params: &'static [&'static str],
    obligatoires: usize,
    mots_cles: bool,
}

const UN_ARGUMENT: Signature = Signature {
    params: &["x"],
    obligatoires: 1,
    mots_cles: false,
};

impl Fonction {
    fn signature(self) -> Signature {
        match self {
            Fonction::Round => Signature {
                params: &["number", "ndigits"],
                obligatoires: 1,
                mots_cles: true,
            },
            Fonction::Log => Signature {
                params: &["x", "base"],
                obligatoires: 1,
                mots_cles: false,
            },
            _ => UN_ARGUMENT,
        }
    }

    /// Lie les arguments puis calcule. `nom` est le nom tel qu’écrit (ln / log).
    pub fn appeler(
        self,
        nom: &str,
        positionnels: Vec<Nombre>,
        nommes: Vec<(String, Nombre)>,
        limites: &Limites,
    ) -> Result<Nombre, EvalError> {
        let mut args = lier(nom, &self.signature(), positionnels, nommes)?.into_iter();

        // `lier` garantit la présence des obligatoires
        let x = args
            .next()
            .flatten()
            .ok_or_else(|| EvalError::non_supporte(format!("{nom}() missing argument")))?;
        let option = args.next().flatten();

        match self {
            Fonction::Abs => Ok(match x {
                Nombre::Entier(n) => Nombre::Entier(n.abs()),
                Nombre::Flottant(v) => Nombre::Flottant(v.abs()),
            }),
            Fonction::Round => arrondir(x, option),
            Fonction::Sqrt => {
                let v = x.en_f64()?;
                if v < 0.0 {
                    return Err(domaine());
                }
                Ok(Nombre::Flottant(v.sqrt()))
            }
            Fonction::Log => {
                let num = ln(&x)?;
                match option {
                    None => Ok(Nombre::Flottant(num)),
                    Some(base) => {
                        let den = ln(&base)?;
                        if den == 0.0 {
                            return Err(EvalError::domaine("float division by zero"));
                        }
                        Ok(Nombre::Flottant(num / den))
                    }
                }
            }
            Fonction::Log10 => match x.en_f64() {
                Ok(v) if v <= 0.0 => Err(domaine()),
                Ok(v) => Ok(Nombre::Flottant(v.log10())),
                // entier hors plage f64 (forcément > 0 sinon ln refuse)
                Err(_) => Ok(Nombre::Flottant(ln(&x)? / LN_10)),
            },
            Fonction::Exp => {
                let v = x.en_f64()?;
                let r = v.exp();
                if r.is_infinite() && v.is_finite() {
                    return Err(EvalError::domaine("math range error"));
                }
                Ok(Nombre::Flottant(r))
            }
            Fonction::Sin | Fonction::Cos | Fonction::Tan => {
                let v = x.en_f64()?;
                if v.is_infinite() {
                    return Err(domaine());
                }
                Ok(Nombre::Flottant(match self {
                    Fonction::Sin => v.sin(),
                    Fonction::Cos => v.cos(),
                    _ => v.tan(),
                }))
            }
            Fonction::Asin | Fonction::Acos => {
                let v = x.en_f64()?;
                if v.abs() > 1.0 {
                    return Err(domaine());
                }
                Ok(Nombre::Flottant(if self == Fonction::Asin {
                    v.asin()
                } else {
                    v.acos()
                }))
            }
            Fonction::Atan => Ok(Nombre::Flottant(x.en_f64()?.atan())),
            Fonction::Degrees => Ok(Nombre::Flottant(x.en_f64()?.to_degrees())),
            Fonction::Radians => Ok(Nombre::Flottant(x.en_f64()?.to_radians())),
            Fonction::Factorial => factorielle(x, limites).map(Nombre::Entier),
            Fonction::Floor => vers_entier(x, f64::floor).map(Nombre::Entier),
            Fonction::Ceil => vers_entier(x, f64::ceil).map(Nombre::Entier),
        }
    }
}

fn domaine() -> EvalError {
    EvalError::domaine("math domain error")
}

/* ------------------------ Liaison des arguments ------------------------ */

fn lier(
    nom: &str,
    sig: &Signature,
    positionnels: Vec<Nombre>,
    nommes: Vec<(String, Nombre)>,
) -> Result<Vec<Option<Nombre>>, EvalError> {
    let max = sig.params.len();
    let donnes = positionnels.len() + nommes.len();

    let attendu = || {
        let quantite = if sig.obligatoires == max {
            format!("exactly {max} argument{}", if max > 1 { "s" } else { "" })
        } else {
            format!("from {} to {max} arguments", sig.obligatoires)
        };
        EvalError::non_supporte(format!("{nom}() takes {quantite} ({donnes} given)"))
    };

    if !nommes.is_empty() && !sig.mots_cles {
        return Err(EvalError::non_supporte(format!(
            "{nom}() takes no keyword arguments"
        )));
    }
    if positionnels.len() > max {
        return Err(attendu());
    }

    let mut cases: Vec<Option<Nombre>> = vec![None; max];
    for (case, v) in cases.iter_mut().zip(positionnels) {
        *case = Some(v);
    }

    for (cle, v) in nommes {
        let idx = sig.params.iter().position(|p| *p == cle).ok_or_else(|| {
            EvalError::non_supporte(format!(
                "{nom}() got an unexpected keyword argument '{cle}'"
            ))
        })?;
        if cases[idx].is_some() {
            return Err(EvalError::non_supporte(format!(
                "{nom}() got multiple values for argument '{cle}'"
            )));
        }
        cases[idx] = Some(v);
    }

    for (idx, case) in cases.iter().enumerate().take(sig.obligatoires) {
        if case.is_none() {
            if donnes == 0 || !sig.mots_cles {
                return Err(attendu());
            }
            return Err(EvalError::non_supporte(format!(
                "{nom}() missing required argument '{}'",
                sig.params[idx]
            )));
        }
    }

    Ok(cases)
}

/* ------------------------ Logarithme (entiers géants inclus) ------------------------ */

/// ln(x), x > 0. Un entier hors plage f64 est réduit : n = m * 2^k.
fn ln(x: &Nombre) -> Result<f64, EvalError> {
    match x {
        Nombre::Flottant(v) => {
            if *v <= 0.0 {
                return Err(domaine());
            }
            Ok(v.ln())
        }
        Nombre::Entier(n) => {
            if !n.is_positive() {
                return Err(domaine());
            }
            if let Some(v) = n.to_f64().filter(|v| v.is_finite()) {
                return Ok(v.ln());
            }
            let k = n.bits().saturating_sub(64);
            let mantisse = (n >> k).to_f64().ok_or_else(domaine)?;
            Ok(mantisse.ln() + k as f64 * LN_2)
        }
    }
}

/* ------------------------ Arrondis / conversions entières ------------------------ */

fn vers_entier(x: Nombre, f: fn(f64) -> f64) -> Result<BigInt, EvalError> {
    match x {
        Nombre::Entier(n) => Ok(n),
        Nombre::Flottant(v) => flottant_en_entier(f(v)),
    }
}

fn flottant_en_entier(v: f64) -> Result<BigInt, EvalError> {
    if v.is_nan() {
        return Err(EvalError::domaine("cannot convert float NaN to integer"));
    }
    BigInt::from_f64(v)
        .ok_or_else(|| EvalError::domaine("cannot convert float infinity to integer"))
}

/// round(number[, ndigits]) : demi vers le pair.
fn arrondir(x: Nombre, ndigits: Option<Nombre>) -> Result<Nombre, EvalError> {
    let nd = match ndigits {
        None => {
            return match x {
                Nombre::Entier(n) => Ok(Nombre::Entier(n)),
                Nombre::Flottant(v) => flottant_en_entier(v.round_ties_even()).map(Nombre::Entier),
            }
        }
        Some(Nombre::Entier(nd)) => nd,
        Some(Nombre::Flottant(_)) => {
            return Err(EvalError::non_supporte(
                "'float' object cannot be interpreted as an integer",
            ))
        }
    };

    match x {
        Nombre::Entier(n) => Ok(Nombre::Entier(arrondir_entier(n, &nd))),
        Nombre::Flottant(v) => arrondir_flottant(v, &nd).map(Nombre::Flottant),
    }
}

fn arrondir_entier(n: BigInt, nd: &BigInt) -> BigInt {
    if !nd.is_negative() {
        return n;
    }

    // 10^e > 2|n| dès que e > bits(n) + 1 : le résultat est 0
    let e = nd.magnitude().to_u64().unwrap_or(u64::MAX);
    if e > n.bits() + 1 {
        return BigInt::zero();
    }
    let Ok(e) = u32::try_from(e) else {
        return BigInt::zero();
    };

    let p = BigInt::from(10).pow(e);
    let (q, r) = n.div_mod_floor(&p);
    let double = &r * 2;
    let q = if double > p || (double == p && q.is_odd()) {
        q + 1
    } else {
        q
    };
    q * p
}

fn arrondir_flottant(v: f64, nd: &BigInt) -> Result<f64, EvalError> {
    if !v.is_finite() {
        return Ok(v);
    }

    let nd = match nd.to_i32() {
        Some(nd) => nd,
        None if nd.is_positive() => return Ok(v),
        None => return Ok(0.0f64.copysign(v)),
    };
    if nd > 323 {
        return Ok(v);
    }
    if nd < -308 {
        return Ok(0.0f64.copysign(v));
    }

    if nd >= 0 {
        // formatage décimal exact de la valeur binaire, puis relecture
        let texte = format!("{:.*}", nd as usize, v);
        return texte
            .parse::<f64>()
            .map_err(|_| EvalError::domaine("rounding failed"));
    }

    let p = 10f64.powi(-nd);
    let r = (v / p).round_ties_even() * p;
    if !r.is_finite() {
        return Err(EvalError::domaine("rounded value too large to represent"));
    }
    Ok(r)
}

/* ------------------------ Factorielle ------------------------ */

fn factorielle(x: Nombre, limites: &Limites) -> Result<BigInt, EvalError> {
    let n = match x {
        Nombre::Entier(n) => n,
        Nombre::Flottant(v) => {
            if !v.is_finite() || v.fract() != 0.0 {
                return Err(EvalError::domaine(
                    "factorial() only accepts integral values",
                ));
            }
            flottant_en_entier(v)?
        }
    };

    if n.is_negative() {
        return Err(EvalError::domaine(
            "factorial() not defined for negative values",
        ));
    }

    let n = n
        .to_u64()
        .filter(|n| *n <= limites.factorielle_max)
        .ok_or_else(|| {
            tracing::warn!(
                max = limites.factorielle_max,
                "factorielle refusée (argument trop grand)"
            );
            EvalError::domaine("factorial() argument too large")
        })?;

    Ok((2..=n).fold(BigInt::from(1), |acc, k| acc * k))
}
