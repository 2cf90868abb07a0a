// src/noyau/erreur.rs
//
// Erreurs du noyau.
// Toutes les étapes (lecture, jetons, éval, format) renvoient Result<_, ErreurCalcul>.
// L’éditeur traduit ensuite en UN des deux messages visibles.

use thiserror::Error;

use super::reglages::Reglages;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalcul {
    /// Littéral décimal mal formé (attendu: -?\d+(\.\d+)?).
    #[error("littéral invalide: {0:?}")]
    Parse(String),

    #[error("racine carrée d’un nombre négatif")]
    RacineNegative,

    #[error("division par zéro")]
    DivisionParZero,

    /// Partie entière du résultat au-delà du budget d’affichage.
    #[error("résultat trop grand pour l’affichage")]
    DepassementChiffres,

    /// Opérateur pendant, opérande vide, caractère inattendu.
    #[error("expression malformée: {0}")]
    ExpressionMalformee(String),
}

impl ErreurCalcul {
    /// Message utilisateur : dépassement => message dédié, tout le reste => "calcul invalide".
    pub fn message<'a>(&self, reglages: &'a Reglages) -> &'a str {
        match self {
            ErreurCalcul::DepassementChiffres => &reglages.message_depassement,
            _ => &reglages.message_invalide,
        }
    }
}
