// src/app/vue.rs
//
// Vue (UI egui): natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue (quand le champ est focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
//
// La vue ne modifie l’état QUE via les actions de etat.rs / clavier.rs.

use eframe::egui;

use super::clavier::{Touche, COLONNES, PUCES, RANGEES};
use super::etat::AppCalc;
use crate::noyau::tables::noms;

/// Puces par ligne.
const PUCES_PAR_LIGNE: usize = 6;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculator");
                let autorises = noms().collect::<Vec<_>>().join(", ");
                ui.label(
                    "Supports: + - * / // % **, parentheses, and functions like \
                     sqrt(), sin(), log(). Use ^ for power.",
                )
                .on_hover_text(format!("Allowed names: {autorises}"));
                ui.add_space(6.0);

                self.ui_entree(ui);
                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();

                self.ui_puces(ui);

                ui.add_space(8.0);
                ui.separator();

                self.ui_pave(ui);

                ui.add_space(8.0);
                ui.separator();

                self.ui_historique(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Expression");

        ui.horizontal(|ui| {
            let largeur = (ui.available_width() - 96.0).max(120.0);

            // IMPORTANT : id stable + focus contrôlé
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.entree)
                    .desired_width(largeur)
                    .hint_text("e.g., (2 + 3) * 4^2, sqrt(16), log(8, 2)")
                    .id_source("entree_edit")
                    .code_editor(),
            );

            if resp.changed() {
                self.synchroniser_entree();
            }

            // Si on a cliqué un bouton, on redonne le focus
            if self.focus_entree {
                resp.request_focus();
                self.focus_entree = false;
            }

            // Enter en singleline rend le focus dans la même frame
            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if enter && (resp.has_focus() || resp.lost_focus()) {
                self.evaluer();
            }

            let bouton = ui.add_sized([88.0, 28.0], egui::Button::new("Evaluate"));
            if bouton.clicked() {
                self.evaluer();
            }
        });
    }

    fn ui_resultat(&self, ui: &mut egui::Ui) {
        if let Some(r) = &self.resultat {
            ui.add_space(6.0);
            egui::Frame::group(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new(format!("Result: {r}")).strong().monospace());
                });
        }

        if let Some(e) = &self.erreur {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, e);
        }
    }

    fn ui_puces(&mut self, ui: &mut egui::Ui) {
        ui.strong("Quick functions");

        egui::Grid::new("puces_fonctions")
            .num_columns(PUCES_PAR_LIGNE)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for (i, puce) in PUCES.iter().enumerate() {
                    let resp = ui.add_sized([72.0, 28.0], egui::Button::new(*puce));
                    if resp.clicked() {
                        self.ajouter_jeton(puce);
                    }
                    if (i + 1) % PUCES_PAR_LIGNE == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        ui.strong("Keypad");

        egui::Grid::new("pave_numerique")
            .num_columns(COLONNES)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in RANGEES.iter() {
                    for touche in rangee {
                        self.bouton_touche(ui, touche);
                    }
                    ui.end_row();
                }
            });
    }

    fn bouton_touche(&mut self, ui: &mut egui::Ui, touche: &Touche) {
        let mut resp = ui.add_sized([56.0, 34.0], egui::Button::new(touche.etiquette));
        if !touche.aide.is_empty() {
            resp = resp.on_hover_text(touche.aide);
        }
        if resp.clicked() {
            self.appliquer(touche.action);
        }
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("History")
            .default_open(false)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.label("No history yet.");
                    return;
                }

                // On ne modifie pas l’état pendant qu’on parcourt l’historique
                let mut choisie: Option<String> = None;

                egui::Grid::new("historique")
                    .num_columns(3)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        for (i, ligne) in self.historique.iter().enumerate() {
                            ui.monospace(format!("{}. {}", i + 1, ligne.expression));
                            ui.strong(format!("= {}", ligne.resultat));
                            if ui.push_id(i, |ui| ui.button("Use")).inner.clicked() {
                                choisie = Some(ligne.expression.clone());
                            }
                            ui.end_row();
                        }
                    });

                if let Some(expression) = choisie {
                    self.utiliser_historique(&expression);
                }

                ui.separator();
                if ui.button("Clear history").clicked() {
                    self.vider_historique();
                }
            });
    }
}
