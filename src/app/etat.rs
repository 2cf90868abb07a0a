//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : tenir l’éditeur du noyau et traduire une touche de l’écran en appel `press_*`.
//!
//! Contrats :
//! - Aucune arithmétique ici : tout passe par `noyau::Editeur`.
//! - Lecture seule pour la vue : affichage, formule, erreur.

use calculette_exacte::{Editeur, Operateur, Reglages};

/// Touches du pavé (une par bouton).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touche {
    Chiffre(char),
    Point,
    Op(Operateur),
    Pourcent,
    Racine,
    Signe,
    Clear,
    ClearEntree,
    Retour,
    Egal,
}

#[derive(Clone, Debug, Default)]
pub struct AppCalc {
    pub editeur: Editeur,
}

impl AppCalc {
    pub fn avec_reglages(reglages: Reglages) -> Self {
        Self {
            editeur: Editeur::avec_reglages(reglages),
        }
    }

    pub fn appuyer(&mut self, touche: Touche) {
        let ed = &mut self.editeur;
        match touche {
            Touche::Chiffre(d) => ed.press_digit(d),
            Touche::Point => ed.press_decimal_point(),
            Touche::Op(op) => ed.press_operator(op),
            Touche::Pourcent => ed.press_percent(),
            Touche::Racine => ed.press_square_root(),
            Touche::Signe => ed.press_sign_toggle(),
            Touche::Clear => ed.press_clear(),
            Touche::ClearEntree => ed.press_clear_entry(),
            Touche::Retour => ed.press_backspace(),
            Touche::Egal => ed.press_equals(),
        }
    }

    pub fn affichage(&self) -> &str {
        self.editeur.display()
    }

    pub fn formule(&self) -> &str {
        self.editeur.formula()
    }

    pub fn en_erreur(&self) -> bool {
        self.editeur.is_error()
    }
}
