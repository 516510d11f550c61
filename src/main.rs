// src/main.rs
//
// Calculatrice sûre: point d’entrée NATIF + WEB (WASM)
// -----------------------------------------------------
// - NATIF (Linux/Windows/macOS) : options clap, logs tracing, puis
//   soit `--expr` (une évaluation, sortie texte), soit eframe::run_native
// - WEB  (wasm32)              : eframe::WebRunner + WebOptions + <canvas>
//
// Côté WEB (WASM) : index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

mod app;
mod noyau;

use app::AppCalc;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice sûre";

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
mod natif {
    use std::process::ExitCode;

    use clap::Parser;
    use eframe::egui;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    use super::{AppCalc, TITRE_APP};
    use crate::noyau::reglages::{BITS_ENTIER_DEFAUT, FACTORIELLE_DEFAUT, PROFONDEUR_DEFAUT};
    use crate::noyau::{formater_resultat, EvalError, Evaluateur, Limites};

    #[derive(Debug, Parser)]
    #[command(name = "calculatrice_sure")]
    #[command(about = "Safe arithmetic expression calculator", long_about = None)]
    #[command(version)]
    pub struct Options {
        /// Évalue une seule expression et affiche le résultat (sans fenêtre)
        #[arg(short, long, value_name = "EXPR")]
        pub expr: Option<String>,

        /// Filtre de logs (ex: "debug", "calculatrice_sure=trace"); RUST_LOG prime
        #[arg(long, value_name = "FILTER", default_value = "warn")]
        pub log_level: String,

        /// Taille max (bits) d’un entier produit par `**`
        #[arg(long, default_value_t = BITS_ENTIER_DEFAUT)]
        pub max_bits: u64,

        /// Argument max de factorial()
        #[arg(long, default_value_t = FACTORIELLE_DEFAUT)]
        pub max_factorial: u64,

        /// Profondeur max d’imbrication
        #[arg(long, default_value_t = PROFONDEUR_DEFAUT)]
        pub max_depth: usize,
    }

    impl Options {
        pub fn limites(&self) -> Limites {
            Limites::default()
                .avec_bits_entier(self.max_bits)
                .avec_factorielle(self.max_factorial)
                .avec_profondeur(self.max_depth)
        }
    }

    fn installer_logs(filtre: &str) {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filtre));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// `--expr` : une évaluation, déjà formatée pour l’affichage.
    fn evaluer_une_fois(expression: &str, limites: Limites) -> Result<String, EvalError> {
        Evaluateur::new(limites)
            .evaluer(expression)
            .map(formater_resultat)
    }

    pub fn lancer() -> ExitCode {
        let options = Options::parse();
        installer_logs(&options.log_level);

        let limites = options.limites();
        tracing::debug!(?limites, "limites actives");

        if let Some(expression) = &options.expr {
            return match evaluer_une_fois(expression, limites) {
                Ok(affiche) => {
                    println!("{affiche}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            };
        }

        let native = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(TITRE_APP)
                .with_inner_size([560.0, 760.0])
                .with_min_inner_size([420.0, 620.0]),
            ..Default::default()
        };

        let resultat = eframe::run_native(
            TITRE_APP,
            native,
            Box::new(move |_cc| Ok(Box::new(AppCalc::avec_limites(limites)))),
        );

        match resultat {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(erreur = %e, "fenêtre impossible à ouvrir");
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    natif::lancer()
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// Pas d’abonné tracing côté web : les macros restent muettes.
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|_cc| Ok(Box::<AppCalc>::default())),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
