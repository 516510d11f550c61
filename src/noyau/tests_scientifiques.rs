//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : vérifier les identités mathématiques sur des grilles de valeurs,
//! sans faire chauffer la machine.
//! - budget temps global par campagne
//! - tailles bornées (profondeur, longueur)
//! - tolérance relative pour les flottants, égalité stricte pour les entiers exacts

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use super::{evaluate, formater_resultat, EvalError, Evaluateur, Limites};

fn eval_ok(expr: &str) -> f64 {
    evaluate(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_proche(expr: &str, attendu: f64, tol: f64) {
    let v = eval_ok(expr);
    assert!(
        (v - attendu).abs() <= tol * attendu.abs().max(1.0),
        "expr={expr:?} -> {v}, attendu {attendu}"
    );
}

fn assert_affiche(expr: &str, attendu: &str) {
    assert_eq!(formater_resultat(eval_ok(expr)), attendu, "expr={expr:?}");
}

fn assert_domaine(expr: &str) {
    match evaluate(expr) {
        Err(EvalError::MathDomainError(_)) => {}
        autre => panic!("expr={expr:?} : MathDomainError attendu, obtenu {autre:?}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Grille de réels (positifs, négatifs, petits, grands).
const GRILLE: [&str; 12] = [
    "0", "1", "-1", "0.5", "-0.25", "2", "3.75", "-7.125", "10", "1e-3", "123.456", "-98.6",
];

/* ------------------------ Exemples de référence ------------------------ */

#[test]
fn sci_exemples_de_reference() {
    assert_affiche("2^10", "1024");
    assert_affiche("2**10", "1024");
    assert_affiche("sqrt(16)", "4");
    assert_affiche("log(8, 2)", "3");
    assert_affiche("(2 + 3) * 4^2", "80");
    assert_affiche("-2**2", "-4");
    assert_affiche("2+3*4", "14");
    assert_affiche("(2+3)*4", "20");
    assert_affiche("5/2", "2.5");
    assert_affiche("1e20", "100000000000000000000");
    assert_affiche("10**-5", "1e-05");
}

/* ------------------------ Identités trig ------------------------ */

#[test]
fn sci_trig_pythagore_et_parite() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    for x in GRILLE {
        assert_proche(&format!("sin({x})^2 + cos({x})^2"), 1.0, 1e-12);
        assert_proche(&format!("sin(-({x})) + sin({x})"), 0.0, 1e-12);
        assert_proche(&format!("cos(-({x})) - cos({x})"), 0.0, 1e-12);
        budget(t0, max);
    }
}

#[test]
fn sci_trig_reciproques() {
    for x in ["0", "0.5", "-0.5", "1", "-1", "0.999"] {
        assert_proche(&format!("sin(asin({x}))"), eval_ok(x), 1e-12);
        assert_proche(&format!("cos(acos({x}))"), eval_ok(x), 1e-12);
    }
    for x in GRILLE {
        assert_proche(&format!("tan(atan({x}))"), eval_ok(x), 1e-12);
        assert_proche(&format!("degrees(radians({x}))"), eval_ok(x), 1e-12);
    }
    assert_proche("degrees(pi)", 180.0, 1e-15);
    assert_proche("radians(180) - pi", 0.0, 1e-15);
    assert_domaine("asin(1.0000001)");
    assert_domaine("acos(-2)");
}

/* ------------------------ Exp / log / racines ------------------------ */

#[test]
fn sci_exp_log_inverses() {
    for x in GRILLE {
        assert_proche(&format!("ln(exp({x}))"), eval_ok(x), 1e-12);
    }
    for x in ["1", "2", "10", "0.001", "123.456", "1e100"] {
        assert_proche(&format!("exp(ln({x})) / ({x})"), 1.0, 1e-9);
        assert_proche(&format!("log({x}, 10) - log10({x})"), 0.0, 1e-9);
    }
    // entier géant (hors f64) : log exact via décalage
    assert_proche("log10(10**400)", 400.0, 1e-12);
    assert_proche("log(2**5000, 2)", 5000.0, 1e-12);
    assert_domaine("log(0)");
    assert_domaine("log(-1)");
    assert_domaine("exp(1000)");
}

#[test]
fn sci_racines() {
    for x in ["0", "1", "2", "0.25", "1e10", "123.456"] {
        assert_proche(&format!("sqrt({x})^2"), eval_ok(x), 1e-12);
        assert_proche(&format!("({x})**0.5"), eval_ok(&format!("sqrt({x})")), 1e-12);
    }
    assert_domaine("sqrt(-1)");
    // puissance fractionnaire d’un négatif : résultat complexe refusé
    assert_domaine("(-8) ** (1/3)");
}

/* ------------------------ Division entière / modulo ------------------------ */

#[test]
fn sci_division_euclidienne_plancher() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    for a in -12i64..=12 {
        for b in [-7i64, -3, -1, 1, 2, 5] {
            // a == (a // b) * b + a % b, et a % b a le signe de b
            let q = eval_ok(&format!("({a}) // ({b})"));
            let r = eval_ok(&format!("({a}) % ({b})"));
            assert_eq!(q * b as f64 + r, a as f64, "a={a} b={b}");
            assert!(r == 0.0 || (r > 0.0) == (b > 0), "a={a} b={b} r={r}");
            assert_eq!(q, (a as f64 / b as f64).floor(), "a={a} b={b}");
        }
        budget(t0, max);
    }

    // même relation en flottants
    for (a, b) in [(7.5, 2.0), (-7.5, 2.0), (7.5, -2.0), (0.3, 0.1)] {
        let q = eval_ok(&format!("({a}) // ({b})"));
        let r = eval_ok(&format!("({a}) % ({b})"));
        assert!((q * b + r - a).abs() < 1e-12, "a={a} b={b}");
    }
}

/* ------------------------ Entiers exacts ------------------------ */

#[test]
fn sci_entiers_exacts_avant_conversion() {
    // en flottant, ces expressions perdraient l’unité
    assert_affiche("2**64 - 2**64 + 1", "1");
    assert_affiche("(10**20 + 1) - 10**20", "1");
    assert_affiche("10**20 // 10**10", "10000000000");
    assert_affiche("(2**100 + 1) % 2", "1");
    assert_affiche("factorial(25) // factorial(24)", "25");
    // division vraie entre entiers géants : rapport exact puis arrondi
    assert_affiche("(10**400 + 1) / 10**399", "10");
    assert_affiche("1 / 3 * 3", "1");
}

#[test]
fn sci_factorielle_recurrence() {
    for n in 1..=30 {
        assert_affiche(&format!("factorial({n}) // factorial({})", n - 1), &n.to_string());
    }
    assert_affiche("factorial(0)", "1");
    assert_affiche("factorial(5.0)", "120");
    assert_domaine("factorial(-1)");
    assert_domaine("factorial(2.5)");
}

/* ------------------------ Arrondis ------------------------ */

#[test]
fn sci_round_demi_pair() {
    assert_affiche("round(0.5)", "0");
    assert_affiche("round(1.5)", "2");
    assert_affiche("round(2.5)", "2");
    assert_affiche("round(-0.5)", "0");
    assert_affiche("round(-1.5)", "-2");
    assert_affiche("round(1234, -2)", "1200");
    assert_affiche("round(1250, -2)", "1200");
    assert_affiche("round(1350, -2)", "1400");
    assert_affiche("round(2.675, 2)", "2.67");
    assert_affiche("floor(-0.5)", "-1");
    assert_affiche("ceil(-0.5)", "0");
}

/* ------------------------ Précédence / alias ------------------------ */

#[test]
fn sci_alias_et_precedence() {
    for (a, b) in [(2i64, 10), (3, 4), (-2, 3), (5, 0), (7, 2)] {
        let avec_alias = eval_ok(&format!("({a})^{b}"));
        let avec_etoiles = eval_ok(&format!("({a})**{b}"));
        assert_eq!(avec_alias, avec_etoiles, "a={a} b={b}");
        // unaire moins sous la puissance
        assert_eq!(
            eval_ok(&format!("-{}**{b}", a.abs())),
            -eval_ok(&format!("{}**{b}", a.abs()))
        );
    }
    assert_affiche("2**3**2", "512");
    assert_affiche("2**-1", "0.5");
    assert_affiche("-2**-2", "-0.25");
    assert_affiche("2 * 3 % 4", "2");
    assert_affiche("100 // 7 * 7 + 100 % 7", "100");
}

/* ------------------------ Idempotence / tables ------------------------ */

#[test]
fn sci_idempotence_et_tables_intactes() {
    let exprs = ["2^10", "sqrt(2)", "sin(1)+cos(1)", "log(1000, 10)", "foo(1)", "1/0"];
    let premiers: Vec<_> = exprs.iter().map(|e| evaluate(e)).collect();

    // une erreur ne doit rien changer pour la suite
    for _ in 0..5 {
        let _ = evaluate("__import__('os')");
        let _ = evaluate("[1, 2, 3]");
    }

    let seconds: Vec<_> = exprs.iter().map(|e| evaluate(e)).collect();
    assert_eq!(premiers, seconds);
    assert_eq!(super::tables::noms().count(), 21);
}

/* ------------------------ Limites ------------------------ */

#[test]
fn sci_limites_protegent() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    assert_domaine("9**9**9**9");
    assert_domaine("2**(10**10)");
    assert_domaine("factorial(10**6)");
    // base triviale : pas de borne utile
    assert_affiche("1**(10**10)", "1");
    assert_affiche("(-1)**(10**10 + 1)", "-1");
    budget(t0, max);

    // la borne porte sur la taille réelle du résultat (65 536 bits)
    assert_affiche("2**40000 // 2**39990", "1024");
    assert_affiche("2**65535 // 2**65534", "2");
    assert_affiche("3**41000 % 10", "1");
    assert_domaine("2**65536");
    assert_domaine("3**41400");
    budget(t0, max);

    // bornes relevées : le même calcul passe
    let large = Evaluateur::new(Limites::default().avec_factorielle(6_000));
    assert!(large.evaluer("log10(factorial(5500))").is_ok());
    budget(t0, max);
}
