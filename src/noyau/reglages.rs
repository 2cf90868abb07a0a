//! Réglages du noyau : budgets de chiffres, précision interne, séparateur, messages.
//!
//! Contrats :
//! - `Default` donne la calculatrice de poche standard (10 + 8 chiffres, 18 au total).
//! - Désérialisable (serde) avec valeurs par défaut champ par champ.
//! - `valider()` refuse les combinaisons incohérentes avant qu’un éditeur ne les utilise.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reglages {
    pub chiffres_entiers_max: usize,
    pub chiffres_decimaux_max: usize,
    pub chiffres_total_max: usize,

    /// Chiffres après la virgule conservés dans `raw` après une évaluation.
    pub precision_interne: usize,

    pub separateur_milliers: char,

    pub message_invalide: String,
    pub message_depassement: String,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            chiffres_entiers_max: 10,
            chiffres_decimaux_max: 8,
            chiffres_total_max: 18,
            precision_interne: 20,
            separateur_milliers: ',',
            message_invalide: "invalid calculation".to_string(),
            message_depassement: "11-digit-or-more result".to_string(),
        }
    }
}

impl Reglages {
    /// Précision de l’expansion √ : le double de la précision interne,
    /// pour que √a × √a retombe sur a après l’arrondi final.
    pub fn precision_racine(&self) -> usize {
        self.precision_interne * 2
    }

    pub fn valider(&self) -> Result<(), String> {
        if self.chiffres_entiers_max == 0 {
            return Err("budget de chiffres entiers nul".into());
        }
        if self.chiffres_total_max < self.chiffres_entiers_max
            || self.chiffres_total_max < self.chiffres_decimaux_max
        {
            return Err("budget total plus petit qu’un budget partiel".into());
        }
        if self.precision_interne < self.chiffres_decimaux_max {
            return Err("précision interne plus petite que la précision affichée".into());
        }
        if self.separateur_milliers.is_ascii_digit() || self.separateur_milliers == '.' {
            return Err(format!(
                "séparateur de milliers ambigu: {:?}",
                self.separateur_milliers
            ));
        }
        Ok(())
    }
}
