//! Noyau: évaluation (pipeline réel)
//!
//! brut -> éléments -> jetons (% et √ résolus) -> évaluation exacte -> format
//!
//! Règle d’évaluation : × et ÷ sont appliqués tout de suite contre l’opérande voisin,
//! + et - sont mis en file puis repliés de gauche à droite à la fin.
//! Donc 2+3×4 = 14 et 8÷2×2 = 8, sans arbre ni pile d’opérateurs.

use tracing::trace;

use super::erreur::ErreurCalcul;
use super::exact::NombreExact;
use super::format::{format_formule, format_resultat};
use super::jetons::{
    decouper, format_tokens, tokenize_elements, Element, Jeton, Operateur, ValeursExactes,
};
use super::reglages::Reglages;

/// Dernière opération appliquée (pour le “=” répété) : opérateur + opérande brut non formaté.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationEnAttente {
    pub operateur: Operateur,
    pub operande: String,
}

/// Résultat complet d’une évaluation réussie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Valeur exacte, avant l’arrondi de `brut`.
    pub valeur: NombreExact,
    /// Littéral exact arrondi à la précision interne (devient le nouveau tampon).
    pub brut: String,
    pub affichage: String,
    pub formule: String,
    pub derniere_operation: Option<OperationEnAttente>,
}

/// Évalue une suite de jetons déjà résolus (nombres et + - × ÷ alternés).
pub fn evaluate(jetons: &[Jeton]) -> Result<NombreExact, ErreurCalcul> {
    let mut it = jetons.iter();

    let premier = match it.next() {
        Some(Jeton::Nombre(n)) => n.clone(),
        Some(Jeton::Op(op)) => {
            return Err(ErreurCalcul::ExpressionMalformee(format!(
                "opérateur '{}' en tête",
                op.glyphe()
            )))
        }
        None => return Err(ErreurCalcul::ExpressionMalformee("expression vide".into())),
    };

    // termes[k] est l’opérande de additifs[k-1]
    let mut termes: Vec<NombreExact> = vec![premier];
    let mut additifs: Vec<Operateur> = Vec::new();

    while let Some(j) = it.next() {
        let (op, n) = match (j, it.next()) {
            (Jeton::Op(op), Some(Jeton::Nombre(n))) => (*op, n),
            (Jeton::Op(op), _) => {
                return Err(ErreurCalcul::ExpressionMalformee(format!(
                    "opérateur '{}' sans opérande",
                    op.glyphe()
                )))
            }
            (Jeton::Nombre(_), _) => {
                return Err(ErreurCalcul::ExpressionMalformee(
                    "deux nombres sans opérateur".into(),
                ))
            }
        };

        match op {
            Operateur::Fois | Operateur::Divise => {
                let dernier = termes.last_mut().ok_or_else(|| {
                    ErreurCalcul::ExpressionMalformee("opérande gauche manquant".into())
                })?;
                *dernier = if op == Operateur::Fois {
                    &*dernier * n
                } else {
                    dernier.checked_div(n)?
                };
            }
            Operateur::Plus | Operateur::Moins => {
                additifs.push(op);
                termes.push(n.clone());
            }
        }
    }

    let mut termes = termes.into_iter();
    let mut acc = termes.next().unwrap_or_else(NombreExact::zero);
    for (op, t) in additifs.into_iter().zip(termes) {
        acc = match op {
            Operateur::Plus => &acc + &t,
            _ => &acc - &t,
        };
    }
    Ok(acc)
}

/// Dernier opérateur de l’expression et le terme brut qui le suit.
pub fn derniere_operation(elements: &[Element]) -> Option<OperationEnAttente> {
    match elements {
        [.., Element::Op(op), Element::Terme(t)] => Some(OperationEnAttente {
            operateur: *op,
            operande: t.to_string(),
        }),
        _ => None,
    }
}

/// API publique : évalue une expression brute de bout en bout.
/// Échoue si l’expression est malformée, si un calcul est impossible,
/// ou si la partie entière du résultat dépasse le budget (DepassementChiffres).
/// Les littéraux connus de `exactes` sont lus à leur valeur exacte.
pub fn eval_expression(
    brut: &str,
    reglages: &Reglages,
    exactes: &ValeursExactes,
) -> Result<Evaluation, ErreurCalcul> {
    let elements = decouper(brut)?;
    let jetons = tokenize_elements(&elements, reglages.precision_racine(), exactes)?;
    trace!(jetons = %format_tokens(&jetons), "évaluation");
    let valeur = evaluate(&jetons)?;

    let affichage = format_resultat(&valeur, reglages)?;

    Ok(Evaluation {
        brut: valeur.to_decimal_string(reglages.precision_interne),
        affichage,
        formule: format!("{} =", format_formule(&elements, reglages)),
        derniere_operation: derniere_operation(&elements),
        valeur,
    })
}
