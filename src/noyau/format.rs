// src/noyau/format.rs
//
// Affichage “calculatrice” :
// - partie entière groupée par milliers (séparateur des réglages), signe à gauche
// - fraction : au plus 8 chiffres ; au-delà on TRONQUE et on ajoute "..." (valeur non exacte)
// - jamais de troncature de la partie entière : au-delà du budget => DepassementChiffres

use super::erreur::ErreurCalcul;
use super::exact::NombreExact;
use super::jetons::{Element, Terme, ValeursExactes};
use super::reglages::Reglages;

const MARQUE_INEXACT: &str = "...";

/// "1234567" -> "1,234,567" (chiffres ASCII seulement, sans signe).
pub fn grouper_milliers(entier: &str, separateur: char) -> String {
    let n = entier.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(separateur);
        }
        out.push(c);
    }
    out
}

/// Littéral décimal signé -> texte affiché.
/// La fraction tapée est gardée telle quelle ("0.", "1.50") tant qu’elle tient dans le budget ;
/// une fraction plus longue (résultat) est coupée au budget, zéros finaux retirés, puis "...".
pub fn format_litteral(litteral: &str, reglages: &Reglages) -> String {
    let (signe, corps) = match litteral.strip_prefix('-') {
        Some(reste) => ("-", reste),
        None => ("", litteral),
    };
    let (entier, fraction) = match corps.split_once('.') {
        Some((e, f)) => (e, Some(f)),
        None => (corps, None),
    };

    let mut out = String::from(signe);
    out.push_str(&grouper_milliers(entier, reglages.separateur_milliers));

    let max = reglages.chiffres_decimaux_max;
    match fraction {
        None => {}
        Some(f) if f.len() <= max => {
            out.push('.');
            out.push_str(f);
        }
        Some(f) => {
            // 0.000000001 -> "0..." : non nul, mais rien à montrer dans le budget
            let gardee = f[..max].trim_end_matches('0');
            if !gardee.is_empty() {
                out.push('.');
                out.push_str(gardee);
            }
            out.push_str(MARQUE_INEXACT);
        }
    }
    out
}

/// Nombre de chiffres de la partie entière d’un littéral ("-1234.5" -> 4).
pub fn chiffres_entiers(litteral: &str) -> usize {
    let corps = litteral.strip_prefix('-').unwrap_or(litteral);
    corps.split('.').next().map_or(0, str::len)
}

/// Résultat exact -> texte affiché, ou DepassementChiffres si la partie entière déborde.
pub fn format_resultat(n: &NombreExact, reglages: &Reglages) -> Result<String, ErreurCalcul> {
    let brut = n.to_decimal_string(reglages.precision_interne);
    if chiffres_entiers(&brut) > reglages.chiffres_entiers_max {
        return Err(ErreurCalcul::DepassementChiffres);
    }
    Ok(format_litteral(&brut, reglages))
}

/// Terme courant tel qu’il apparaît sur l’écran principal :
/// un bloc √ montre sa racine arrondie, un bloc % garde son suffixe.
pub fn format_terme(
    terme: &Terme,
    reglages: &Reglages,
    exactes: &ValeursExactes,
) -> Result<String, ErreurCalcul> {
    if terme.racine {
        let v = terme.valeur(reglages.precision_racine(), exactes)?;
        return format_resultat(&v, reglages);
    }

    let mut out = String::new();
    if terme.negatif {
        out.push('-');
    }
    out.push_str(&format_litteral(&terme.chiffres, reglages));
    if terme.pourcent {
        out.push('%');
    }
    Ok(out)
}

/// Trace de l’expression (ligne “formule”) : glyphes × ÷, milliers groupés, marqueurs √ et % gardés.
pub fn format_formule(elements: &[Element], reglages: &Reglages) -> String {
    let morceaux: Vec<String> = elements
        .iter()
        .map(|e| match e {
            Element::Op(op) => op.glyphe().to_string(),
            Element::Terme(t) => {
                let mut s = String::new();
                if t.negatif {
                    s.push('-');
                }
                if t.racine {
                    s.push('√');
                }
                s.push_str(&format_litteral(&t.chiffres, reglages));
                if t.pourcent {
                    s.push('%');
                }
                s
            }
        })
        .collect();
    morceaux.join(" ")
}
