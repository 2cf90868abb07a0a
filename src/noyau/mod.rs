//! Noyau exact de la calculette
//!
//! Organisation interne :
//! - erreur.rs   : ErreurCalcul (5 genres, 2 messages visibles)
//! - reglages.rs : budgets de chiffres, précision, séparateur, messages
//! - exact.rs    : NombreExact (rationnel BigRational, un seul arrondi final)
//! - jetons.rs   : tampon brut -> éléments (termes/opérateurs) -> jetons numériques,
//!                 valeurs exactes cachées derrière les résultats arrondis
//! - eval.rs     : × ÷ d’abord, puis + - de gauche à droite ; pipeline complet
//! - format.rs   : milliers, fraction bornée à 8 chiffres + "...", dépassement
//! - editeur.rs  : machine à états des touches (C, CE, ⌫, ±, %, √, =, “=” répété)

pub mod editeur;
pub mod erreur;
pub mod eval;
pub mod exact;
pub mod format;
pub mod jetons;
pub mod reglages;

#[cfg(test)]
mod tests_sequences;


// API publique minimale
pub use editeur::{Editeur, Etat};
pub use erreur::ErreurCalcul;
pub use eval::{eval_expression, Evaluation, OperationEnAttente};
pub use exact::NombreExact;
pub use jetons::{Operateur, ValeursExactes};
pub use reglages::Reglages;
