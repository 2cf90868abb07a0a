// src/noyau/jetons.rs
//
// Découpage du tampon brut en éléments typés, puis en jetons numériques.
//
// Grammaire du tampon (tel que l’éditeur le construit) :
//   brut  := terme (op terme)* op?
//   terme := '-'? '√'? chiffres ('.' chiffres?)? '%'?
//   op    := + - × ÷   (* et / acceptés comme alias)
//
// Un '-' est un SIGNE en tête de tampon ou juste après un opérateur, sinon c’est la soustraction.
// `decouper` tolère un opérateur final et un '.' final (saisie en cours) ;
// `tokenize` les refuse (l’éditeur nettoie avant d’évaluer).

use std::collections::HashMap;
use std::fmt;

use super::erreur::ErreurCalcul;
use super::exact::NombreExact;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
}

impl Operateur {
    pub fn from_char(c: char) -> Option<Operateur> {
        match c {
            '+' => Some(Operateur::Plus),
            '-' => Some(Operateur::Moins),
            '×' | '*' => Some(Operateur::Fois),
            '÷' | '/' => Some(Operateur::Divise),
            _ => None,
        }
    }

    pub fn glyphe(self) -> char {
        match self {
            Operateur::Plus => '+',
            Operateur::Moins => '-',
            Operateur::Fois => '×',
            Operateur::Divise => '÷',
        }
    }

    /// × et ÷ se résolvent avant + et -.
    pub fn est_multiplicatif(self) -> bool {
        matches!(self, Operateur::Fois | Operateur::Divise)
    }
}

/// Un opérande tel que tapé : signe extérieur, marqueur √, chiffres, marqueur %.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Terme {
    pub negatif: bool,
    pub racine: bool,
    /// Chiffres avec au plus un '.', éventuellement final pendant la saisie.
    /// Sous √ seulement, peut commencer par '-' (lu, jamais produit par l’éditeur).
    pub chiffres: String,
    pub pourcent: bool,
}

impl Terme {
    pub fn nombre(chiffres: impl Into<String>) -> Terme {
        Terme {
            chiffres: chiffres.into(),
            ..Terme::default()
        }
    }

    /// Terme depuis un littéral décimal signé ("-0.81" -> signe + "0.81").
    pub fn depuis_litteral(litteral: &str) -> Terme {
        match litteral.strip_prefix('-') {
            Some(reste) => Terme {
                negatif: true,
                ..Terme::nombre(reste)
            },
            None => Terme::nombre(litteral),
        }
    }

    /// Chiffres seulement : "0", "0.", "0.000" (le ± n’a rien à retourner).
    pub fn est_zero_litteral(&self) -> bool {
        self.chiffres.chars().all(|c| c == '0' || c == '.')
    }

    pub fn a_un_point(&self) -> bool {
        self.chiffres.contains('.')
    }

    /// Un terme marqué (√ ou %) n’accepte plus de chiffres.
    pub fn est_marque(&self) -> bool {
        self.racine || self.pourcent
    }

    /// Valeur exacte : % d’abord (÷100), puis √, puis le signe extérieur.
    /// Des chiffres issus d’un calcul reprennent leur valeur exacte dans `exactes`.
    pub fn valeur(
        &self,
        precision_racine: usize,
        exactes: &ValeursExactes,
    ) -> Result<NombreExact, ErreurCalcul> {
        let mut v = exactes.lire(&self.chiffres)?;
        if self.pourcent {
            v = v.pourcent();
        }
        if self.racine {
            v = v.sqrt(precision_racine)?;
        }
        if self.negatif {
            v = -v;
        }
        Ok(v)
    }
}

impl fmt::Display for Terme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negatif {
            f.write_str("-")?;
        }
        if self.racine {
            f.write_str("√")?;
        }
        f.write_str(&self.chiffres)?;
        if self.pourcent {
            f.write_str("%")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    Terme(Terme),
    Op(Operateur),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Terme(t) => fmt::Display::fmt(t, f),
            Element::Op(op) => write!(f, "{}", op.glyphe()),
        }
    }
}

/// Valeurs exactes derrière les littéraux arrondis que l’éditeur écrit dans le tampon.
///
/// Clé : les chiffres sans signe, tels qu’écrits ; valeur : la magnitude exacte.
/// Seuls les littéraux dont la fraction dépasse ce qu’on peut taper y entrent,
/// un nombre saisi ne prend donc jamais la valeur d’un résultat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValeursExactes(HashMap<String, NombreExact>);

impl ValeursExactes {
    pub fn retenir(&mut self, litteral: &str, valeur: &NombreExact, decimales_tapables: usize) {
        let chiffres = litteral.strip_prefix('-').unwrap_or(litteral);
        let decimales = chiffres.split_once('.').map_or(0, |(_, f)| f.len());
        if decimales > decimales_tapables {
            self.0.insert(chiffres.to_string(), valeur.abs());
        }
    }

    pub fn lire(&self, chiffres: &str) -> Result<NombreExact, ErreurCalcul> {
        match self.0.get(chiffres) {
            Some(v) => Ok(v.clone()),
            None => NombreExact::from_decimal_str(chiffres),
        }
    }

    /// Ne garde que les littéraux encore présents quelque part.
    pub fn garder(&mut self, vivant: impl Fn(&str) -> bool) {
        self.0.retain(|k, _| vivant(k));
    }

    pub fn oublier(&mut self) {
        self.0.clear();
    }
}

/// Recompose le tampon brut (forme canonique : glyphes × ÷).
pub fn recomposer(elements: &[Element]) -> String {
    elements.iter().map(|e| e.to_string()).collect()
}

/// Tampon brut -> éléments. Tolère '.' final et opérateur final.
pub fn decouper(brut: &str) -> Result<Vec<Element>, ErreurCalcul> {
    let chars: Vec<char> = brut.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        // --- un terme ---
        let mut terme = Terme::default();

        if chars[i] == '-' {
            terme.negatif = true;
            i += 1;
        }
        if i < chars.len() && chars[i] == '√' {
            terme.racine = true;
            i += 1;
            if i < chars.len() && chars[i] == '-' {
                terme.chiffres.push('-');
                i += 1;
            }
        }
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            if chars[i] == '.' && terme.a_un_point() {
                return Err(ErreurCalcul::Parse(format!("{}.", terme.chiffres)));
            }
            terme.chiffres.push(chars[i]);
            i += 1;
        }
        if !terme.chiffres.bytes().any(|b| b.is_ascii_digit()) {
            return Err(ErreurCalcul::ExpressionMalformee(match chars.get(i) {
                Some(c) => format!("opérande vide avant '{c}'"),
                None => "opérande vide en fin d’expression".to_string(),
            }));
        }
        if i < chars.len() && chars[i] == '%' {
            terme.pourcent = true;
            i += 1;
        }
        out.push(Element::Terme(terme));

        // --- puis un opérateur (ou la fin) ---
        if i >= chars.len() {
            break;
        }
        let c = chars[i];
        let op = Operateur::from_char(c).ok_or_else(|| {
            ErreurCalcul::ExpressionMalformee(format!("caractère inattendu: '{c}'"))
        })?;
        out.push(Element::Op(op));
        i += 1;
    }

    Ok(out)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Jeton {
    Nombre(NombreExact),
    Op(Operateur),
}

/// Tampon brut -> jetons : % et √ sont résolus en nombres exacts,
/// il ne reste que des nombres séparés par + - × ÷.
pub fn tokenize(brut: &str, precision_racine: usize) -> Result<Vec<Jeton>, ErreurCalcul> {
    let elements = decouper(brut)?;
    tokenize_elements(&elements, precision_racine, &ValeursExactes::default())
}

pub fn tokenize_elements(
    elements: &[Element],
    precision_racine: usize,
    exactes: &ValeursExactes,
) -> Result<Vec<Jeton>, ErreurCalcul> {
    if elements.is_empty() {
        return Err(ErreurCalcul::ExpressionMalformee("expression vide".into()));
    }
    if let Some(Element::Op(op)) = elements.last() {
        return Err(ErreurCalcul::ExpressionMalformee(format!(
            "opérateur '{}' sans opérande",
            op.glyphe()
        )));
    }

    elements
        .iter()
        .map(|e| match e {
            Element::Terme(t) => t.valeur(precision_racine, exactes).map(Jeton::Nombre),
            Element::Op(op) => Ok(Jeton::Op(*op)),
        })
        .collect()
}

/// Format utilitaire (journal) : jetons en texte, nombres en fraction réduite.
pub fn format_tokens(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| match j {
            Jeton::Nombre(n) => n.to_string(),
            Jeton::Op(op) => op.glyphe().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
