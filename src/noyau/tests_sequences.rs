//! Tests de séquences : touches enchaînées sur l’éditeur, comme un utilisateur.
//!
//! Notation des touches (helper `taper`) :
//!   0-9 . + - × ÷   chiffres, point, opérateurs
//!   % √ ±           pourcent, racine, signe
//!   =               égal
//!   C E <           effacer tout, effacer l’entrée, retour arrière
//!
//! Dernière campagne : fuzz de touches (RNG déterministe, budget temps) + invariants d’état.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use super::editeur::{Editeur, Etat};
use super::jetons::{decouper, Operateur};
use super::reglages::Reglages;

const INVALIDE: &str = "invalid calculation";
const DEPASSEMENT: &str = "11-digit-or-more result";

fn taper(ed: &mut Editeur, touches: &str) {
    for c in touches.chars() {
        match c {
            '0'..='9' => ed.press_digit(c),
            '.' => ed.press_decimal_point(),
            '%' => ed.press_percent(),
            '√' => ed.press_square_root(),
            '±' => ed.press_sign_toggle(),
            '=' => ed.press_equals(),
            'C' => ed.press_clear(),
            'E' => ed.press_clear_entry(),
            '<' => ed.press_backspace(),
            ' ' => {}
            _ => match Operateur::from_char(c) {
                Some(op) => ed.press_operator(op),
                None => panic!("touche inconnue {c:?}"),
            },
        }
    }
}

fn apres(touches: &str) -> Editeur {
    let mut ed = Editeur::new();
    taper(&mut ed, touches);
    ed
}

fn affiche(touches: &str) -> String {
    apres(touches).display().to_string()
}

/* ------------------------ Exactitude et priorité ------------------------ */

#[test]
fn sommes_decimales_exactes() {
    assert_eq!(affiche("0.1+0.2="), "0.3");
    assert_eq!(affiche("1.99999999+0.00000001="), "2");
    assert_eq!(affiche("0.3-0.1="), "0.2");
}

#[test]
fn priorite_multiplicative() {
    assert_eq!(affiche("2+3×4="), "14");
    assert_eq!(affiche("8÷2×2="), "8");
    assert_eq!(affiche("2+3×4×2="), "26");
}

#[test]
fn repli_implicite_garde_la_valeur_exacte() {
    let mut ed = apres("1÷3×");
    assert_eq!(ed.display(), "0.33333333...");
    taper(&mut ed, "3=");
    assert_eq!(ed.display(), "1");
    assert_eq!(ed.raw(), "1");

    assert_eq!(affiche("1÷3+1÷3+1÷3="), "1");
    assert_eq!(affiche("2÷3+1÷3+"), "1");
}

#[test]
fn resultat_repris_sans_derive() {
    assert_eq!(affiche("2÷3=×3="), "2");
    assert_eq!(affiche("2÷3=±×3="), "-2");
    assert_eq!(affiche("1÷3==×9="), "1");
    // 1/3 + 10 % de 1/3 = 11/30
    assert_eq!(affiche("1÷3+10%=×30="), "11");
}

/* ------------------------ Budget de chiffres ------------------------ */

#[test]
fn dix_chiffres_entiers_au_plus() {
    let ed = apres("1234567890");
    assert_eq!(ed.raw(), "1234567890");
    assert_eq!(ed.display(), "1,234,567,890");

    let ed = apres("12345678901");
    assert_eq!(ed.raw(), "1234567890");
}

#[test]
fn huit_decimales_au_plus() {
    let ed = apres("0.123456789");
    assert_eq!(ed.raw(), "0.12345678");
    assert_eq!(ed.display(), "0.12345678");

    let ed = apres("1234567890.123456789");
    assert_eq!(ed.raw(), "1234567890.12345678");
}

#[test]
fn budget_total_configurable() {
    let reglages = Reglages {
        chiffres_total_max: 12,
        ..Reglages::default()
    };
    assert!(reglages.valider().is_ok());
    let mut ed = Editeur::avec_reglages(reglages);
    taper(&mut ed, "1234567890.123");
    assert_eq!(ed.raw(), "1234567890.12");
}

#[test]
fn saisie_affichee_telle_quelle() {
    assert_eq!(affiche("0."), "0.");
    assert_eq!(affiche("1234.50"), "1,234.50");
    assert_eq!(affiche("7+"), "7");
}

/* ------------------------ “=” répété ------------------------ */

#[test]
fn egal_repete_sur_operateur_pendant() {
    let mut ed = apres("8+=");
    assert_eq!(ed.display(), "16");
    assert_eq!(ed.formula(), "8 + 8 =");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "24");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "32");
    assert_eq!(ed.formula(), "24 + 8 =");
}

#[test]
fn egal_repete_garde_l_operande_brut() {
    let mut ed = apres("1234+1000=");
    assert_eq!(ed.display(), "2,234");
    let op = ed.operation_en_attente().cloned().unwrap();
    assert_eq!(op.operateur, Operateur::Plus);
    assert_eq!(op.operande, "1000");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "3,234");
    assert_eq!(ed.formula(), "2,234 + 1,000 =");
}

#[test]
fn clear_entry_annule_l_operation_en_attente() {
    let mut ed = apres("8+=5E");
    assert_eq!(ed.display(), "0");
    assert!(ed.operation_en_attente().is_none());
    taper(&mut ed, "3=");
    assert_eq!(ed.display(), "3");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "3");

    assert!(apres("12+34=5+6E").operation_en_attente().is_none());
}

#[test]
fn nouveau_nombre_apres_resultat() {
    let mut ed = apres("2+3=7");
    assert_eq!(ed.raw(), "7");
    assert_eq!(ed.etat(), Etat::Saisie);
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "7");
    // l’opération en attente (+3) a survécu à la nouvelle saisie
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "10");

    assert_eq!(apres("2+3=.").raw(), "0.");
}

#[test]
fn operateur_apres_resultat_continue() {
    assert_eq!(affiche("2+3=×4="), "20");
}

/* ------------------------ Évaluation implicite ------------------------ */

#[test]
fn chaine_additive_repliee() {
    let mut ed = apres("8+9+");
    assert_eq!(ed.raw(), "17+");
    assert_eq!(ed.display(), "17");
    assert_eq!(ed.formula(), "8 + 9 =");
    taper(&mut ed, "3=");
    assert_eq!(ed.display(), "20");
}

#[test]
fn serie_multiplicative_repliee_sans_casser_la_priorite() {
    let mut ed = apres("2+3×4×");
    assert_eq!(ed.raw(), "2+12×");
    assert_eq!(ed.display(), "12");
    taper(&mut ed, "2=");
    assert_eq!(ed.display(), "26");

    assert_eq!(apres("2+3×").raw(), "2+3×");
    assert_eq!(apres("2×3+").raw(), "6+");
}

/* ------------------------ Pourcent ------------------------ */

#[test]
fn pourcent_de_la_base_sous_moins() {
    let mut ed = apres("9-9%");
    assert_eq!(ed.raw(), "9-0.81");
    assert_eq!(ed.display(), "0.81");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "8.19");
}

#[test]
fn pourcent_fraction_sous_fois() {
    let mut ed = apres("50×10%");
    assert_eq!(ed.display(), "10%");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "5");
}

#[test]
fn pourcent_refuse() {
    assert_eq!(apres("%").raw(), "");
    assert_eq!(apres("5+%").raw(), "5+");
    assert_eq!(apres("50×10%%").raw(), "50×10%");
    assert_eq!(apres("50+10%%").raw(), "50+5");
    assert_eq!(apres("50×10%5").raw(), "50×10%");
    assert_eq!(apres("5.%").raw(), "5.");
}

#[test]
fn pourcent_terme_seul() {
    let mut ed = apres("50%");
    assert_eq!(ed.display(), "50%");
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "0.5");
}

#[test]
fn pourcent_qui_deborde() {
    let ed = apres("9999999999+9999999999%");
    assert!(ed.is_error());
    assert_eq!(ed.display(), DEPASSEMENT);
}

/* ------------------------ Racine ------------------------ */

#[test]
fn racine_du_bloc_final() {
    let ed = apres("9√");
    assert_eq!(ed.display(), "3");
    assert_eq!(ed.raw(), "√9");

    let ed = apres("7+16√");
    assert_eq!(ed.raw(), "7+√16");
    assert_eq!(ed.display(), "4");
}

#[test]
fn racine_negative_refusee() {
    let ed = apres("9±√");
    assert!(ed.is_error());
    assert_eq!(ed.display(), INVALIDE);
    assert_eq!(ed.raw(), "");
}

#[test]
fn racine_sans_derive() {
    let ed = apres("2√×2√=");
    assert_eq!(ed.display(), "2");
    assert_eq!(ed.formula(), "√2 × √2 =");
}

#[test]
fn racine_bascule() {
    let ed = apres("9√√");
    assert_eq!(ed.raw(), "9");
    assert_eq!(ed.display(), "9");

    let mut ed = apres("9√±");
    assert_eq!(ed.raw(), "-√9");
    assert_eq!(ed.display(), "-3");
    taper(&mut ed, "√");
    assert_eq!(ed.raw(), "-9");
}

#[test]
fn racine_sur_resultat() {
    let mut ed = apres("8×2=√");
    assert_eq!(ed.display(), "4");
    assert_eq!(ed.etat(), Etat::Resultat);
    taper(&mut ed, "+1=");
    assert_eq!(ed.display(), "5");
}

#[test]
fn racine_bloque_les_chiffres() {
    assert_eq!(apres("9√5").raw(), "√9");
    assert_eq!(affiche("2√"), "1.41421356...");
}

/* ------------------------ Signe ------------------------ */

#[test]
fn signe_du_bloc_final() {
    assert_eq!(apres("5±").raw(), "-5");
    assert_eq!(apres("5±±").raw(), "5");
    assert_eq!(apres("0±").raw(), "0");
    assert_eq!(apres("0.00±").raw(), "0.00");
    assert_eq!(apres("3-5±").raw(), "3--5");
    assert_eq!(affiche("3-5±="), "8");
    assert_eq!(apres("3+±").raw(), "3+");
}

#[test]
fn signe_sur_resultat() {
    let mut ed = apres("2+3=±");
    assert_eq!(ed.display(), "-5");
    assert_eq!(ed.etat(), Etat::Resultat);
    taper(&mut ed, "=");
    assert_eq!(ed.display(), "-2");
}

/* ------------------------ C / CE / retour ------------------------ */

#[test]
fn clear_toujours_identique() {
    for touches in ["", "123", "8+=", "9±√", "9999999999×10=", "50×10%", "2√×", "1+2+"] {
        let mut ed = apres(touches);
        ed.press_clear();
        assert_eq!(ed.display(), "0", "après {touches:?}");
        assert_eq!(ed.formula(), "", "après {touches:?}");
        assert!(!ed.is_error(), "après {touches:?}");
        assert_eq!(ed.raw(), "", "après {touches:?}");
        assert!(ed.operation_en_attente().is_none(), "après {touches:?}");
    }
}

#[test]
fn clear_entry() {
    let mut ed = apres("12+34E");
    assert_eq!(ed.raw(), "12+0");
    assert_eq!(ed.display(), "0");
    taper(&mut ed, "5=");
    assert_eq!(ed.display(), "17");

    assert_eq!(apres("12+E").raw(), "12+0");
    assert_eq!(apres("12E").raw(), "");

    let ed = apres("2+3=E");
    assert_eq!(ed.display(), "0");
    assert_eq!(ed.formula(), "");
}

#[test]
fn retour_arriere() {
    assert_eq!(apres("123<").raw(), "12");
    assert_eq!(apres("8±<").raw(), "0");
    assert_eq!(apres("5+<").raw(), "5+");
    assert_eq!(apres("0.5<").raw(), "0.");
    assert_eq!(apres("0.5<<").raw(), "0");
    assert_eq!(apres("50×10%<").raw(), "50×10");
    assert_eq!(apres("25√<").raw(), "√2");
    assert_eq!(apres("<").raw(), "");

    let ed = apres("2+3=<");
    assert_eq!(ed.display(), "0");
    assert_eq!(ed.formula(), "");
}

/* ------------------------ Erreurs ------------------------ */

#[test]
fn division_par_zero() {
    let ed = apres("5÷0=");
    assert!(ed.is_error());
    assert_eq!(ed.display(), INVALIDE);
}

#[test]
fn depassement_quelle_que_soit_l_operation() {
    for touches in ["9999999999×10=", "9999999999+1=", "9999999999+1+", "999999×99999×"] {
        let ed = apres(touches);
        assert!(ed.is_error(), "{touches:?}");
        assert_eq!(ed.display(), DEPASSEMENT, "{touches:?}");
        assert_eq!(ed.raw(), "", "{touches:?}");
    }
}

#[test]
fn erreur_ignore_les_autres_touches() {
    let mut ed = apres("5÷0=");
    taper(&mut ed, "+=±√%");
    assert!(ed.is_error());
    assert_eq!(ed.display(), INVALIDE);

    taper(&mut ed, "7");
    assert!(!ed.is_error());
    assert_eq!(ed.raw(), "7");

    let mut ed = apres("5÷0=");
    taper(&mut ed, ".");
    assert_eq!(ed.raw(), "0.");

    let mut ed = apres("5÷0=");
    taper(&mut ed, "E");
    assert_eq!(ed.display(), "0");
    assert!(!ed.is_error());
}

#[test]
fn sortie_d_erreur_sans_operation_en_attente() {
    for sortie in ["E", "<", "C"] {
        let mut ed = apres("8+=5÷0=");
        assert!(ed.is_error());
        taper(&mut ed, sortie);
        assert_eq!(ed.etat(), Etat::Saisie, "{sortie:?}");
        assert_eq!(ed.display(), "0", "{sortie:?}");
        assert_eq!(ed.raw(), "", "{sortie:?}");
        assert!(ed.operation_en_attente().is_none(), "{sortie:?}");

        taper(&mut ed, "=");
        assert_eq!(ed.display(), "0", "{sortie:?}");
        assert_eq!(ed.formula(), "", "{sortie:?}");
    }
}

#[test]
fn racine_libere_le_pourcent_fige() {
    let mut ed = apres("9-9%");
    assert_eq!(ed.raw(), "9-0.81");
    taper(&mut ed, "5");
    assert_eq!(ed.raw(), "9-0.81");

    taper(&mut ed, "√");
    assert_eq!(ed.display(), "0.9");
    taper(&mut ed, "√5");
    assert_eq!(ed.raw(), "9-0.815");
}

/* ------------------------ Affichage ------------------------ */

#[test]
fn milliers_et_marque_inexacte() {
    let ed = apres("1234567+1=");
    assert_eq!(ed.display(), "1,234,568");
    assert_eq!(ed.formula(), "1,234,567 + 1 =");

    let ed = apres("2÷3=");
    assert_eq!(ed.display(), "0.66666666...");
    assert_eq!(ed.raw(), "0.66666666666666666667");
}

#[test]
fn separateur_configurable() {
    let mut ed = Editeur::avec_reglages(Reglages {
        separateur_milliers: ' ',
        ..Reglages::default()
    });
    taper(&mut ed, "1234567×2=");
    assert_eq!(ed.display(), "2 469 134");
}

/* ------------------------ Fuzz de touches ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick<'a>(&mut self, choix: &'a [char]) -> &'a char {
        &choix[self.next_u32() as usize % choix.len()]
    }
}

fn check_invariants(ed: &Editeur, historique: &str) {
    assert!(!ed.display().is_empty(), "affichage vide après {historique:?}");
    if ed.is_error() || historique.ends_with(['C', 'E']) {
        assert!(
            ed.operation_en_attente().is_none(),
            "opération en attente survivante après {historique:?}"
        );
    }
    if ed.is_error() {
        assert_eq!(ed.raw(), "", "erreur => tampon vide, après {historique:?}");
        assert!(
            ed.display() == INVALIDE || ed.display() == DEPASSEMENT,
            "message inattendu {:?} après {historique:?}",
            ed.display()
        );
    } else {
        assert!(
            decouper(ed.raw()).is_ok(),
            "tampon illisible {:?} après {historique:?}",
            ed.raw()
        );
    }
}

#[test]
fn fuzz_touches_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let touches: Vec<char> = "0123456789.+-×÷%√±=CE<".chars().collect();
    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..200 {
        if t0.elapsed() > max {
            panic!("budget temps dépassé: {max:?}");
        }

        let mut ed = Editeur::new();
        let mut historique = String::new();
        for _ in 0..40 {
            let c = *rng.pick(&touches);
            historique.push(c);
            taper(&mut ed, &c.to_string());
            check_invariants(&ed, &historique);
        }
    }
}
