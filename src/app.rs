// src/app.rs
//
// Coquille clavier: racine de l’interface
// ----------------------------------------
// - etat.rs : AppCalc + Touche (traduction touche -> press_*)
// - vue.rs  : lectures + pavé egui
// - ici     : boucle eframe et clavier physique (Échap = C, Entrée = "=", ⌫)

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

use calculette_exacte::Operateur;

use etat::Touche;

/// Caractère tapé au clavier physique -> touche du pavé.
fn touche_texte(c: char) -> Option<Touche> {
    match c {
        '0'..='9' => Some(Touche::Chiffre(c)),
        '.' => Some(Touche::Point),
        '%' => Some(Touche::Pourcent),
        '=' => Some(Touche::Egal),
        _ => Operateur::from_char(c).map(Touche::Op),
    }
}

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let touches: Vec<Touche> = ctx.input(|i| {
            i.events
                .iter()
                .flat_map(|ev| match ev {
                    egui::Event::Text(t) => t.chars().filter_map(touche_texte).collect(),
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => match key {
                        egui::Key::Escape => vec![Touche::Clear],
                        egui::Key::Delete => vec![Touche::ClearEntree],
                        egui::Key::Backspace => vec![Touche::Retour],
                        egui::Key::Enter => vec![Touche::Egal],
                        _ => vec![],
                    },
                    _ => vec![],
                })
                .collect()
        });
        for t in touches {
            self.appuyer(t);
        }

        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
    }
}
