// src/app/vue.rs
//
// Vue (UI egui): natif
// ---------------------
// Objectifs :
// - Deux lignes de lecture : formule (petite) puis affichage (grand, aligné à droite)
// - Pavé 4 colonnes, une touche = un appel au noyau
// - Couleur d’erreur quand l’éditeur est en état Erreur

use eframe::egui;

use calculette_exacte::Operateur;

use super::etat::{AppCalc, Touche};

/// Disposition du pavé : (étiquette, touche), ligne par ligne.
const PAVE: [[(&str, Touche); 4]; 5] = [
    [
        ("C", Touche::Clear),
        ("CE", Touche::ClearEntree),
        ("⌫", Touche::Retour),
        ("÷", Touche::Op(Operateur::Divise)),
    ],
    [
        ("7", Touche::Chiffre('7')),
        ("8", Touche::Chiffre('8')),
        ("9", Touche::Chiffre('9')),
        ("×", Touche::Op(Operateur::Fois)),
    ],
    [
        ("4", Touche::Chiffre('4')),
        ("5", Touche::Chiffre('5')),
        ("6", Touche::Chiffre('6')),
        ("-", Touche::Op(Operateur::Moins)),
    ],
    [
        ("1", Touche::Chiffre('1')),
        ("2", Touche::Chiffre('2')),
        ("3", Touche::Chiffre('3')),
        ("+", Touche::Op(Operateur::Plus)),
    ],
    [
        ("±", Touche::Signe),
        ("0", Touche::Chiffre('0')),
        (".", Touche::Point),
        ("=", Touche::Egal),
    ],
];

const FONCTIONS: [(&str, Touche); 2] = [("%", Touche::Pourcent), ("√", Touche::Racine)];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        self.ui_lectures(ui);

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            for (label, touche) in FONCTIONS {
                self.bouton(ui, label, touche);
            }
        });

        ui.add_space(6.0);

        egui::Grid::new("pave_calculette")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for (label, touche) in ligne {
                        self.bouton(ui, label, touche);
                    }
                    ui.end_row();
                }
            });
    }

    fn ui_lectures(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    ui.monospace(self.formule());

                    let texte = egui::RichText::new(self.affichage()).monospace().size(32.0);
                    if self.en_erreur() {
                        ui.label(texte.color(ui.visuals().error_fg_color));
                    } else {
                        ui.label(texte);
                    }
                });
            });
    }

    fn bouton(&mut self, ui: &mut egui::Ui, label: &str, touche: Touche) {
        let resp = ui.add_sized([64.0, 44.0], egui::Button::new(label));
        if resp.clicked() {
            self.appuyer(touche);
        }
    }
}
