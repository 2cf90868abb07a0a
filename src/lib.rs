//! Calculette exacte : saisie touche par touche + arithmétique décimale exacte.
//!
//! Le noyau ne dépend d’aucune interface : une couche de présentation appelle
//! les `press_*` de [`Editeur`] puis lit `display()`, `formula()` et `is_error()`.

pub mod noyau;

pub use noyau::{Editeur, ErreurCalcul, Etat, NombreExact, Operateur, Reglages};
