// src/app.rs
//
// Calculatrice sûre: module App (racine)
// ---------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + clavier.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Enter est géré dans vue.rs (seulement quand le champ a le focus).

pub mod clavier;
pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = bouton "C"
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.tout_effacer();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
