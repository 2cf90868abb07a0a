//! Éditeur : machine à états de la saisie (touche par touche).
//!
//! Rôle : posséder le tampon brut, le drapeau “résultat affiché” et l’opération en attente,
//! appliquer les règles d’admission (budget de chiffres, point, opérateurs, %, √, ±, C, CE, ⌫, =),
//! et exposer trois lectures : `display()`, `formula()`, `is_error()`.
//!
//! Contrats :
//! - `brut` fait foi ; l’affichage est une fonction pure de `brut` (sauf en erreur).
//! - Une évaluation réussit entièrement (brut/affichage/formule/opération) ou échoue entièrement
//!   (tampon vidé, drapeau d’erreur).
//! - Aucune touche ne panique ; une touche refusée laisse l’état intact.

use tracing::{debug, trace, warn};

use super::erreur::ErreurCalcul;
use super::eval::{eval_expression, evaluate, Evaluation, OperationEnAttente};
use super::format::{format_resultat, format_terme};
use super::jetons::{
    decouper, recomposer, tokenize_elements, Element, Operateur, Terme, ValeursExactes,
};
use super::reglages::Reglages;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Etat {
    /// Construction d’un littéral ou d’une chaîne d’opérations.
    Saisie,
    /// Un résultat est affiché : un chiffre repart de zéro, un opérateur continue la chaîne.
    Resultat,
    /// Message affiché : chiffre/point repartent, C/CE/⌫ effacent, le reste est ignoré.
    Erreur,
}

#[derive(Clone, Debug)]
pub struct Editeur {
    reglages: Reglages,

    brut: String,
    affichage: String,
    formule: String,

    etat: Etat,
    operation_en_attente: Option<OperationEnAttente>,

    // Le terme courant est déjà un “x % de la gauche” calculé : plus de chiffres ni de %.
    pourcent_applique: bool,

    // Valeurs exactes des résultats écrits arrondis dans `brut` (ou dans l’opérande en attente).
    exactes: ValeursExactes,
}

impl Default for Editeur {
    fn default() -> Self {
        Self::avec_reglages(Reglages::default())
    }
}

impl Editeur {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn avec_reglages(reglages: Reglages) -> Self {
        Self {
            reglages,
            brut: String::new(),
            affichage: "0".to_string(),
            formule: String::new(),
            etat: Etat::Saisie,
            operation_en_attente: None,
            pourcent_applique: false,
            exactes: ValeursExactes::default(),
        }
    }

    /* ------------------------ Lectures ------------------------ */

    pub fn display(&self) -> &str {
        &self.affichage
    }

    pub fn formula(&self) -> &str {
        &self.formule
    }

    pub fn is_error(&self) -> bool {
        self.etat == Etat::Erreur
    }

    pub fn raw(&self) -> &str {
        &self.brut
    }

    pub fn etat(&self) -> Etat {
        self.etat
    }

    pub fn operation_en_attente(&self) -> Option<&OperationEnAttente> {
        self.operation_en_attente.as_ref()
    }

    /* ------------------------ Touches ------------------------ */

    pub fn press_digit(&mut self, d: char) {
        if !d.is_ascii_digit() {
            trace!(touche = %d, "pas un chiffre, ignoré");
            return;
        }
        self.appliquer("chiffre", |ed| ed.saisir_chiffre(d));
    }

    pub fn press_decimal_point(&mut self) {
        self.appliquer("point", Self::saisir_point);
    }

    pub fn press_operator(&mut self, op: Operateur) {
        self.appliquer("opérateur", |ed| ed.saisir_operateur(op));
    }

    pub fn press_percent(&mut self) {
        self.appliquer("pourcent", Self::saisir_pourcent);
    }

    pub fn press_square_root(&mut self) {
        self.appliquer("racine", Self::saisir_racine);
    }

    pub fn press_sign_toggle(&mut self) {
        self.appliquer("signe", Self::saisir_signe);
    }

    /// C : retour à l’état initial, quel que soit l’état précédent.
    pub fn press_clear(&mut self) {
        self.brut.clear();
        self.formule.clear();
        self.operation_en_attente = None;
        self.pourcent_applique = false;
        self.exactes.oublier();
        self.etat = Etat::Saisie;
        self.affichage = "0".to_string();
    }

    pub fn press_clear_entry(&mut self) {
        if self.etat != Etat::Saisie {
            self.press_clear();
            return;
        }
        self.appliquer("CE", Self::effacer_entree);
    }

    pub fn press_backspace(&mut self) {
        if self.etat != Etat::Saisie {
            self.press_clear();
            return;
        }
        self.appliquer("retour", Self::effacer_caractere);
    }

    pub fn press_equals(&mut self) {
        self.appliquer("égal", Self::egal);
    }

    /* ------------------------ Mécanique commune ------------------------ */

    /// Exécute une touche ; toute erreur bascule en état Erreur, sinon l’affichage est recalculé.
    fn appliquer<F>(&mut self, touche: &str, f: F)
    where
        F: FnOnce(&mut Self) -> Result<(), ErreurCalcul>,
    {
        if let Err(e) = f(self) {
            self.echouer(touche, e);
            return;
        }
        if self.etat == Etat::Erreur {
            return;
        }
        match self.calculer_affichage() {
            Ok(a) => {
                self.affichage = a;
                self.elaguer();
            }
            Err(e) => self.echouer(touche, e),
        }
    }

    fn echouer(&mut self, touche: &str, e: ErreurCalcul) {
        warn!(touche, brut = %self.brut, erreur = %e, "calcul impossible");
        self.affichage = e.message(&self.reglages).to_string();
        self.brut.clear();
        self.operation_en_attente = None;
        self.pourcent_applique = false;
        self.exactes.oublier();
        self.etat = Etat::Erreur;
    }

    fn calculer_affichage(&self) -> Result<String, ErreurCalcul> {
        let elements = decouper(&self.brut)?;
        let terme = match elements.as_slice() {
            [] => return Ok("0".to_string()),
            [.., Element::Terme(t)] | [.., Element::Terme(t), Element::Op(_)] => t,
            _ => return Err(ErreurCalcul::ExpressionMalformee(self.brut.clone())),
        };
        format_terme(terme, &self.reglages, &self.exactes)
    }

    /// Oublie les valeurs exactes dont le littéral n’apparaît plus nulle part.
    fn elaguer(&mut self) {
        let mut vivants = chiffres_des_termes(&self.brut);
        if let Some(op) = &self.operation_en_attente {
            vivants.extend(chiffres_des_termes(&op.operande));
        }
        self.exactes.garder(|k| vivants.iter().any(|v| v == k));
    }

    fn elements(&self) -> Result<Vec<Element>, ErreurCalcul> {
        decouper(&self.brut)
    }

    fn ecrire(&mut self, elements: &[Element]) {
        self.brut = recomposer(elements);
    }

    /// Nouvelle saisie après un résultat ou une erreur (l’opération en attente survit au résultat).
    fn repartir(&mut self) {
        self.brut.clear();
        self.pourcent_applique = false;
        self.etat = Etat::Saisie;
    }

    /// Le candidat tient-il dans le budget (entiers, décimales, total) ?
    fn admet(&self, chiffres: &str) -> bool {
        let (entier, fraction) = chiffres.split_once('.').unwrap_or((chiffres, ""));
        let r = &self.reglages;
        entier.len() <= r.chiffres_entiers_max
            && fraction.len() <= r.chiffres_decimaux_max
            && entier.len() + fraction.len() <= r.chiffres_total_max
    }

    fn depose_evaluation(&mut self, ev: Evaluation) {
        debug!(
            formule = %ev.formule,
            resultat = %ev.brut,
            exact = %ev.valeur,
            "évaluation"
        );
        self.exactes
            .retenir(&ev.brut, &ev.valeur, self.reglages.chiffres_decimaux_max);
        self.formule = ev.formule;
        if ev.derniere_operation.is_some() {
            self.operation_en_attente = ev.derniere_operation;
        }
        self.brut = ev.brut;
        self.pourcent_applique = false;
    }

    /* ------------------------ Règles par touche ------------------------ */

    fn saisir_chiffre(&mut self, d: char) -> Result<(), ErreurCalcul> {
        if self.etat != Etat::Saisie {
            self.repartir();
        }

        let mut elements = self.elements()?;
        match elements.last_mut() {
            None | Some(Element::Op(_)) => elements.push(Element::Terme(Terme::nombre(d))),
            Some(Element::Terme(t)) => {
                if t.est_marque() || self.pourcent_applique {
                    trace!(terme = %t, "terme terminé, chiffre refusé");
                    return Ok(());
                }
                if t.chiffres == "0" {
                    // "0" puis "7" => "7" (jamais "07"), "0" puis "0" => "0"
                    t.chiffres = d.to_string();
                } else {
                    let candidat = format!("{}{d}", t.chiffres);
                    if !self.admet(&candidat) {
                        trace!(candidat = %candidat, "budget de chiffres atteint");
                        return Ok(());
                    }
                    t.chiffres = candidat;
                }
            }
        }
        self.ecrire(&elements);
        Ok(())
    }

    fn saisir_point(&mut self) -> Result<(), ErreurCalcul> {
        if self.etat != Etat::Saisie {
            self.repartir();
        }

        let mut elements = self.elements()?;
        match elements.last_mut() {
            None | Some(Element::Op(_)) => elements.push(Element::Terme(Terme::nombre("0."))),
            Some(Element::Terme(t)) => {
                if t.est_marque() || self.pourcent_applique || t.a_un_point() {
                    trace!(terme = %t, "point refusé");
                    return Ok(());
                }
                t.chiffres.push('.');
            }
        }
        self.ecrire(&elements);
        Ok(())
    }

    fn saisir_operateur(&mut self, op: Operateur) -> Result<(), ErreurCalcul> {
        match self.etat {
            Etat::Erreur => {
                trace!("opérateur ignoré en erreur");
                return Ok(());
            }
            Etat::Resultat => {
                // le résultat devient l’opérande gauche
                self.etat = Etat::Saisie;
            }
            Etat::Saisie => {}
        }

        let mut elements = self.elements()?;
        match elements.last_mut() {
            None => elements.push(Element::Terme(Terme::nombre("0"))),
            Some(Element::Op(dernier)) => {
                // pas d’empilement : le dernier opérateur gagne
                *dernier = op;
                self.ecrire(&elements);
                return Ok(());
            }
            Some(Element::Terme(t)) => {
                if t.chiffres.ends_with('.') {
                    t.chiffres.pop();
                }
            }
        }

        let mut elements = self.replier(elements, op)?;
        elements.push(Element::Op(op));
        self.ecrire(&elements);
        self.pourcent_applique = false;
        Ok(())
    }

    /// Évaluation implicite avant d’ajouter `op` (valeur et priorité préservées) :
    /// - `+`/`-` replient tout le tampon : 8+9 puis + => 17+
    /// - `×`/`÷` replient seulement la série multiplicative finale : 2+3×4 puis × => 2+12×
    fn replier(
        &mut self,
        elements: Vec<Element>,
        op: Operateur,
    ) -> Result<Vec<Element>, ErreurCalcul> {
        let debut = if op.est_multiplicatif() {
            elements
                .iter()
                .rposition(|e| matches!(e, Element::Op(o) if !o.est_multiplicatif()))
                .map_or(0, |i| i + 1)
        } else {
            0
        };

        let serie = &elements[debut..];
        if !serie.iter().any(|e| matches!(e, Element::Op(_))) {
            return Ok(elements);
        }

        let texte = recomposer(serie);
        let ev = eval_expression(&texte, &self.reglages, &self.exactes)?;
        let affiche = ev.affichage.clone();
        let litteral = ev.brut.clone();
        self.depose_evaluation(ev);
        trace!(serie = %texte, affiche = %affiche, "repli implicite");

        let mut out: Vec<Element> = elements[..debut].to_vec();
        out.push(Element::Terme(Terme::depuis_litteral(&litteral)));
        Ok(out)
    }

    fn saisir_pourcent(&mut self) -> Result<(), ErreurCalcul> {
        if self.etat == Etat::Erreur {
            return Ok(());
        }

        let mut elements = self.elements()?;
        let n = elements.len();
        let contexte = match elements.as_slice() {
            [.., Element::Op(op), Element::Terme(_)] => Some(*op),
            _ => None,
        };
        let Some(Element::Terme(t)) = elements.last_mut() else {
            trace!("pourcent refusé : pas de terme final");
            return Ok(());
        };
        if t.pourcent || self.pourcent_applique || t.chiffres.ends_with('.') {
            trace!(terme = %t, "pourcent refusé");
            return Ok(());
        }

        match contexte {
            Some(op) if !op.est_multiplicatif() => {
                // “x % de la gauche” : gauche × x / 100
                let gauche_elements = &elements[..n - 2];
                let precision = self.reglages.precision_racine();
                let gauche =
                    evaluate(&tokenize_elements(gauche_elements, precision, &self.exactes)?)?;
                let Some(Element::Terme(t)) = elements.last() else {
                    return Ok(());
                };
                let droite = t.valeur(precision, &self.exactes)?;
                let part = (&gauche * &droite).pourcent();

                format_resultat(&part, &self.reglages)?;
                let litteral = part.to_decimal_string(self.reglages.precision_interne);
                self.exactes
                    .retenir(&litteral, &part, self.reglages.chiffres_decimaux_max);
                elements[n - 1] = Element::Terme(Terme::depuis_litteral(&litteral));
                self.pourcent_applique = true;
            }
            _ => {
                // terme seul, ou après × / ÷ : simple division par 100
                if t.racine {
                    trace!(terme = %t, "pourcent refusé sur √");
                    return Ok(());
                }
                t.pourcent = true;
            }
        }

        self.ecrire(&elements);
        Ok(())
    }

    fn saisir_racine(&mut self) -> Result<(), ErreurCalcul> {
        if self.etat == Etat::Erreur {
            return Ok(());
        }

        let mut elements = self.elements()?;
        let Some(Element::Terme(t)) = elements.last_mut() else {
            trace!("racine refusée : pas de terme final");
            return Ok(());
        };
        if t.pourcent {
            trace!(terme = %t, "racine refusée sur %");
            return Ok(());
        }

        if t.racine {
            // bascule : √9 redevient 9 (le signe extérieur reste)
            t.racine = false;
        } else {
            if t.negatif {
                return Err(ErreurCalcul::RacineNegative);
            }
            if t.chiffres.ends_with('.') {
                t.chiffres.pop();
            }
            t.racine = true;
            // validation immédiate : l’affichage montrera la racine arrondie
            t.valeur(self.reglages.precision_racine(), &self.exactes)?;
        }
        // le bloc change de forme : il n’est plus un “% de la gauche” figé
        self.pourcent_applique = false;

        self.ecrire(&elements);
        Ok(())
    }

    fn saisir_signe(&mut self) -> Result<(), ErreurCalcul> {
        if self.etat == Etat::Erreur {
            return Ok(());
        }

        let mut elements = self.elements()?;
        let Some(Element::Terme(t)) = elements.last_mut() else {
            trace!("signe ignoré : pas de terme final");
            return Ok(());
        };
        if t.est_zero_litteral() {
            return Ok(());
        }
        // √9 <-> -√9 : le signe reste hors du radical
        t.negatif = !t.negatif;

        self.ecrire(&elements);
        Ok(())
    }

    fn effacer_entree(&mut self) -> Result<(), ErreurCalcul> {
        let mut elements = self.elements()?;
        match elements.last() {
            None => {}
            Some(Element::Op(_)) => elements.push(Element::Terme(Terme::nombre("0"))),
            Some(Element::Terme(_)) => {
                elements.pop();
                if !elements.is_empty() {
                    elements.push(Element::Terme(Terme::nombre("0")));
                }
            }
        }
        self.pourcent_applique = false;
        self.operation_en_attente = None;
        self.ecrire(&elements);
        Ok(())
    }

    fn effacer_caractere(&mut self) -> Result<(), ErreurCalcul> {
        let mut elements = self.elements()?;
        let Some(Element::Terme(t)) = elements.last_mut() else {
            trace!("retour ignoré : tampon vide ou opérateur final");
            return Ok(());
        };

        if t.pourcent {
            t.pourcent = false;
        } else {
            t.chiffres.pop();
            if !t.chiffres.bytes().any(|b| b.is_ascii_digit()) {
                // dernier chiffre (ou "-8") => le bloc redevient 0
                *t = Terme::nombre("0");
            }
        }
        self.pourcent_applique = false;

        self.ecrire(&elements);
        Ok(())
    }

    fn egal(&mut self) -> Result<(), ErreurCalcul> {
        if self.etat == Etat::Erreur || self.brut.is_empty() {
            return Ok(());
        }

        let expression = match (self.etat, &self.operation_en_attente) {
            (Etat::Resultat, Some(op)) => {
                // “=” répété : résultat courant, même opérateur, même opérande
                format!("{}{}{}", self.brut, op.operateur.glyphe(), op.operande)
            }
            _ => {
                let mut elements = self.elements()?;
                // 5+ = => 5+5
                let repete = match elements.as_slice() {
                    [.., Element::Terme(t), Element::Op(_)] => Some(t.clone()),
                    _ => None,
                };
                if let Some(t) = repete {
                    elements.push(Element::Terme(t));
                }
                if let Some(Element::Terme(t)) = elements.last_mut() {
                    if t.chiffres.ends_with('.') {
                        t.chiffres.pop();
                    }
                }
                recomposer(&elements)
            }
        };

        let ev = eval_expression(&expression, &self.reglages, &self.exactes)?;
        self.depose_evaluation(ev);
        self.etat = Etat::Resultat;
        Ok(())
    }
}

/// Chiffres (sans signe) de chaque terme d’un tampon brut.
fn chiffres_des_termes(brut: &str) -> Vec<String> {
    decouper(brut)
        .map(|elements| {
            elements
                .into_iter()
                .filter_map(|e| match e {
                    Element::Terme(t) => Some(t.chiffres),
                    Element::Op(_) => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
