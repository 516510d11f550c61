// src/noyau/nombre.rs
//
// Valeurs numériques de l’évaluateur.
// - Entier  : exact (BigInt), tant que l’opération le permet
// - Flottant: f64 dès qu’un flottant, une division vraie ou une fonction
//             transcendante intervient
//
// IMPORTANT (SAFE):
// - Aucune opération ne panique : division par zéro, dépassement, résultat
//   complexe => EvalError::MathDomainError.
// - Les puissances entières exactes sont bornées (Limites::bits_entier_max).

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::EvalError;
use super::reglages::Limites;

#[derive(Clone, Debug, PartialEq)]
pub enum Nombre {
    Entier(BigInt),
    Flottant(f64),
}

impl Nombre {
    /// Conversion vers f64 (échoue si l’entier dépasse la plage des flottants).
    pub fn en_f64(&self) -> Result<f64, EvalError> {
        match self {
            Nombre::Flottant(v) => Ok(*v),
            Nombre::Entier(n) => entier_en_f64(n),
        }
    }
}

pub fn entier_en_f64(n: &BigInt) -> Result<f64, EvalError> {
    n.to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EvalError::domaine("int too large to convert to float"))
}

/* ------------------------ Opérateurs unaires ------------------------ */

pub fn plus(x: Nombre) -> Nombre {
    x
}

pub fn moins(x: Nombre) -> Nombre {
    match x {
        Nombre::Entier(n) => Nombre::Entier(-n),
        Nombre::Flottant(v) => Nombre::Flottant(-v),
    }
}

/* ------------------------ Opérateurs binaires ------------------------ */

/// Entier ⊕ entier reste exact ; sinon on passe en flottant.
fn arith(
    a: Nombre,
    b: Nombre,
    ent: impl FnOnce(BigInt, BigInt) -> BigInt,
    flo: impl FnOnce(f64, f64) -> f64,
) -> Result<Nombre, EvalError> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => Ok(Nombre::Entier(ent(x, y))),
        (a, b) => Ok(Nombre::Flottant(flo(a.en_f64()?, b.en_f64()?))),
    }
}

pub fn ajouter(a: Nombre, b: Nombre, _: &Limites) -> Result<Nombre, EvalError> {
    arith(a, b, |x, y| x + y, |x, y| x + y)
}

pub fn soustraire(a: Nombre, b: Nombre, _: &Limites) -> Result<Nombre, EvalError> {
    arith(a, b, |x, y| x - y, |x, y| x - y)
}

pub fn multiplier(a: Nombre, b: Nombre, _: &Limites) -> Result<Nombre, EvalError> {
    arith(a, b, |x, y| x * y, |x, y| x * y)
}

/// Division vraie : toujours un flottant.
/// Entier / entier : quotient exact arrondi une seule fois.
pub fn diviser(a: Nombre, b: Nombre, _: &Limites) -> Result<Nombre, EvalError> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => {
            if y.is_zero() {
                return Err(EvalError::domaine("division by zero"));
            }
            BigRational::new(x, y)
                .to_f64()
                .filter(|v| v.is_finite())
                .map(Nombre::Flottant)
                .ok_or_else(|| EvalError::domaine("integer division result too large for a float"))
        }
        (a, b) => {
            let (x, y) = (a.en_f64()?, b.en_f64()?);
            if y == 0.0 {
                return Err(EvalError::domaine("float division by zero"));
            }
            Ok(Nombre::Flottant(x / y))
        }
    }
}

pub fn diviser_plancher(a: Nombre, b: Nombre, _: &Limites) -> Result<Nombre, EvalError> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => {
            if y.is_zero() {
                return Err(EvalError::domaine("integer division or modulo by zero"));
            }
            Ok(Nombre::Entier(x.div_floor(&y)))
        }
        (a, b) => {
            let (x, y) = (a.en_f64()?, b.en_f64()?);
            if y == 0.0 {
                return Err(EvalError::domaine("float floor division by zero"));
            }
            Ok(Nombre::Flottant(divmod_flottant(x, y).0))
        }
    }
}

/// Modulo au signe du diviseur (cohérent avec `//`).
pub fn modulo(a: Nombre, b: Nombre, _: &Limites) -> Result<Nombre, EvalError> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => {
            if y.is_zero() {
                return Err(EvalError::domaine("integer division or modulo by zero"));
            }
            Ok(Nombre::Entier(x.mod_floor(&y)))
        }
        (a, b) => {
            let (x, y) = (a.en_f64()?, b.en_f64()?);
            if y == 0.0 {
                return Err(EvalError::domaine("float modulo by zero"));
            }
            Ok(Nombre::Flottant(divmod_flottant(x, y).1))
        }
    }
}

/// (x // y, x % y) pour des flottants, y != 0.
/// Le reste prend le signe du diviseur ; le quotient est un entier exact
/// tel que quotient * y + reste ≈ x.
fn divmod_flottant(x: f64, y: f64) -> (f64, f64) {
    let mut reste = x % y;
    let mut div = (x - reste) / y;

    if reste != 0.0 {
        if (y < 0.0) != (reste < 0.0) {
            reste += y;
            div -= 1.0;
        }
    } else {
        reste = 0.0f64.copysign(y);
    }

    let quotient = if div != 0.0 {
        let mut q = div.floor();
        if div - q > 0.5 {
            q += 1.0;
        }
        q
    } else {
        0.0f64.copysign(x / y)
    };

    (quotient, reste)
}

pub fn puissance(a: Nombre, b: Nombre, limites: &Limites) -> Result<Nombre, EvalError> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(n)) if !n.is_negative() => {
            puissance_entiere(&x, &n, limites).map(Nombre::Entier)
        }
        (a, b) => puissance_flottante(a.en_f64()?, b.en_f64()?).map(Nombre::Flottant),
    }
}

/// x ** n exact (n >= 0), borné en taille.
fn puissance_entiere(x: &BigInt, n: &BigInt, limites: &Limites) -> Result<BigInt, EvalError> {
    // bases triviales : pas de borne sur l’exposant
    if x.is_zero() {
        return Ok(if n.is_zero() {
            BigInt::one()
        } else {
            BigInt::zero()
        });
    }
    if x.is_one() {
        return Ok(BigInt::one());
    }
    if *x == BigInt::from(-1) {
        return Ok(if n.is_even() {
            BigInt::one()
        } else {
            BigInt::from(-1)
        });
    }

    let trop_grand = || {
        tracing::warn!(
            bits_max = limites.bits_entier_max,
            "puissance entière refusée (résultat trop grand)"
        );
        EvalError::domaine("result too large")
    };

    // |x| >= 2 : le résultat a entre (bits(x) - 1) * n + 1 et bits(x) * n bits.
    // Refus anticipé sur le minorant, taille exacte vérifiée après coup.
    let e = n.to_u64().ok_or_else(trop_grand)?;
    let minorant = (x.bits() - 1).saturating_mul(e).saturating_add(1);
    if minorant > limites.bits_entier_max {
        return Err(trop_grand());
    }
    let e = u32::try_from(e).map_err(|_| trop_grand())?;
    let r = x.pow(e);
    if r.bits() > limites.bits_entier_max {
        return Err(trop_grand());
    }
    Ok(r)
}

/// Puissance flottante avec erreurs explicites (jamais de complexe, jamais
/// de dépassement silencieux).
pub fn puissance_flottante(x: f64, y: f64) -> Result<f64, EvalError> {
    if y == 0.0 {
        return Ok(1.0);
    }
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    if y.is_nan() {
        return Ok(if x == 1.0 { 1.0 } else { f64::NAN });
    }
    if x == 0.0 && y < 0.0 {
        return Err(EvalError::domaine(
            "0.0 cannot be raised to a negative power",
        ));
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(EvalError::domaine(
            "negative number cannot be raised to a fractional power",
        ));
    }

    let r = x.powf(y);
    if r.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(EvalError::domaine("numerical result out of range"));
    }
    Ok(r)
}
