//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - proptest (nombre de cas réduit)
//! - profondeur bornée
//! - budget temps pour les tests “gros”
//! - invariant clé : aucune panique, toute erreur sort de la taxonomie,
//!   deux appels identiques donnent le même verdict

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::{evaluate, EvalError, Evaluateur, Limites};

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers ------------------------ */

/// Messages : une phrase, non vide, terminée par un point.
fn check_message(e: &EvalError) {
    let msg = e.to_string();
    assert!(msg.len() > 1 && msg.ends_with('.'), "message mal formé: {msg:?}");
}

fn check_verdict(expr: &str) -> Result<f64, EvalError> {
    let premier = evaluate(expr);
    match &premier {
        Ok(v) => assert!(!v.is_nan(), "NaN accepté pour {expr:?}"),
        Err(e) => check_message(e),
    }
    // déterminisme (NaN exclu ci-dessus, donc == suffit)
    assert_eq!(premier, evaluate(expr), "verdict instable pour {expr:?}");
    premier
}

fn proche(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * b.abs().max(1.0)
}

/* ------------------------ Stratégies ------------------------ */

/// Arithmétique entière + valeur de référence (i128 : pas de dépassement
/// à profondeur 4 avec des feuilles dans [-50, 50]).
fn arb_arith() -> impl Strategy<Value = (String, i128)> {
    let feuille = (-50i64..=50).prop_map(|n| {
        let texte = if n < 0 {
            format!("({n})")
        } else {
            n.to_string()
        };
        (texte, i128::from(n))
    });

    feuille.prop_recursive(4, 32, 2, |interne| {
        (
            interne.clone(),
            prop_oneof![Just("+"), Just("-"), Just("*")],
            interne,
        )
            .prop_map(|((a, va), op, (b, vb))| {
                let v = match op {
                    "+" => va + vb,
                    "-" => va - vb,
                    _ => va * vb,
                };
                (format!("({a} {op} {b})"), v)
            })
    })
}

/// Jetons mélangés au hasard : majoritairement invalide, parfois valide.
const JETONS: &[&str] = &[
    "1",
    "2.5",
    "0",
    "1e400",
    "10**400",
    "pi",
    "e",
    "x",
    "(",
    ")",
    "+",
    "-",
    "*",
    "/",
    "//",
    "%",
    "**",
    "^",
    ",",
    ".",
    "[",
    "]",
    "{",
    "}",
    "=",
    ":",
    "sqrt",
    "log",
    "factorial",
    "round",
    "ndigits",
    "__import__",
    "'os'",
    "lambda",
    "not",
    "and",
    "~",
    "&",
    "<<",
    "@",
    "True",
];

fn arb_soupe() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(JETONS), 0..24).prop_map(|v| v.join(" "))
}

/// Constructions à refuser, quel que soit le contexte.
const CHARGES: &[&str] = &[
    "__import__('os')",
    "os.system('x')",
    "open('/etc/passwd')",
    "eval('1')",
    "exec('1')",
    "getattr(1, 'real')",
    "(1).__class__",
    "[1, 2, 3]",
    "{1: 2}",
    "{1, 2}",
    "(1, 2)",
    "lambda: 1",
    "1 if 1 else 2",
    "pi.real",
    "sqrt.__name__",
    "(sqrt)(4)",
    "x",
    "'abc'",
    "None",
    "1 < 2",
    "~1",
    "1 & 1",
    "1 << 2",
    "1 and 2",
    "not 1",
];

const PREFIXES: &[&str] = &["", "1 + ", "-", "2 * ", "sqrt(4) - "];

fn arb_hostile() -> impl Strategy<Value = String> {
    (prop::sample::select(PREFIXES), prop::sample::select(CHARGES))
        .prop_map(|(p, c)| format!("{p}{c}"))
}

/* ------------------------ Propriétés ------------------------ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Aucune entrée ne fait paniquer l’évaluateur
    #[test]
    fn fuzz_safe_texte_libre(input in "\\PC{0,60}") {
        let _ = check_verdict(&input);
    }

    #[test]
    fn fuzz_safe_soupe_de_jetons(input in arb_soupe()) {
        let _ = check_verdict(&input);
    }

    /// Arithmétique générée == calcul de référence
    #[test]
    fn fuzz_safe_arithmetique_reference((expr, attendu) in arb_arith()) {
        let v = check_verdict(&expr)
            .map_err(|e| TestCaseError::fail(format!("{expr:?} -> {e}")))?;
        prop_assert!(proche(v, attendu as f64), "{} -> {} (attendu {})", expr, v, attendu);

        // sans espaces : même valeur
        let sans_espaces: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(evaluate(&sans_espaces), Ok(v));
    }

    #[test]
    fn fuzz_safe_hostiles_toujours_refuses(input in arb_hostile()) {
        prop_assert!(check_verdict(&input).is_err(), "accepté: {:?}", input);
    }

    /// Puissance : alias `^` strictement équivalent à `**`
    #[test]
    fn fuzz_safe_alias_puissance(a in -20i64..=20, b in 0u32..=12) {
        let alias = evaluate(&format!("({a})^{b}"));
        let etoiles = evaluate(&format!("({a})**{b}"));
        prop_assert_eq!(&alias, &etoiles);
        prop_assert_eq!(alias, Ok(a.pow(b) as f64));
    }
}

/* ------------------------ Gros volumes (budget) ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let v = evaluate(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v, 400.0);
}

#[test]
fn fuzz_safe_imbrication_profonde_refusee() {
    let profond = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    assert_eq!(evaluate(&profond), Err(EvalError::InvalidSyntax));

    let unaires = format!("{}1", "-".repeat(5_000));
    assert_eq!(evaluate(&unaires), Err(EvalError::InvalidSyntax));

    let puissances = vec!["1"; 5_000].join("**");
    assert_eq!(evaluate(&puissances), Err(EvalError::InvalidSyntax));

    // limite relevée : la pile grandit au lieu de déborder
    let large = Evaluateur::new(Limites::default().avec_profondeur(2_000));
    let moyen = format!("{}1{}", "(".repeat(1_500), ")".repeat(1_500));
    assert_eq!(large.evaluer(&moyen), Ok(1.0));
}

#[test]
fn fuzz_safe_longue_entree_plate() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    // 1 000 000 termes à plat : chaîne gauche d’un million de nœuds,
    // parcourue puis libérée sans débordement de pile
    let expr = vec!["1"; 1_000_000].join("+");
    assert_eq!(evaluate(&expr), Ok(1_000_000.0));
    budget(t0, max);

    let refuse = format!("{expr}+'a'");
    assert_eq!(evaluate(&refuse), Err(EvalError::NonNumericConstant));
    budget(t0, max);
}

#[test]
fn fuzz_safe_appels_en_chaine() {
    // f(1)(1)(1)… : chaîne postfixe non bornée par la profondeur
    let expr = format!("sqrt{}", "(1)".repeat(200_000));
    assert_eq!(evaluate(&expr), Err(EvalError::OnlyLiteralCallsAllowed));

    let attributs = format!("pi{}", ".real".repeat(200_000));
    assert_eq!(
        evaluate(&attributs),
        Err(EvalError::UnsupportedExpression(
            "attribute access '.real'".to_string()
        ))
    );
}
