// src/noyau/exact.rs
//
// Nombre exact (rationnel) pour TOUTE étape arithmétique.
// - construit depuis un littéral décimal : chiffres / 10^longueur_fraction
// - + - × ÷ restent exacts (BigRational réduit après chaque opération)
// - UN seul arrondi, explicite : to_decimal_string(precision), demi vers le haut
//
// Pas de flottants ici : 0.1 + 0.2 doit donner 0.3, point.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::erreur::ErreurCalcul;

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Entier “scalé” (×10^digits, positif) -> texte décimal, zéros finaux retirés.
fn scaled_to_decimal(scaled: &BigInt, digits: usize, neg: bool) -> String {
    let scale = pow10(digits);
    let int_part = scaled / &scale;
    let frac_part = scaled % &scale;

    let mut out = String::new();
    if neg && !scaled.is_zero() {
        out.push('-');
    }
    out.push_str(&int_part.to_str_radix(10));

    if digits > 0 && !frac_part.is_zero() {
        let mut frac = frac_part.to_str_radix(10);
        while frac.len() < digits {
            frac.insert(0, '0');
        }
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

/// Vérifie la forme -?\d+(\.\d+)? sans regex.
fn forme_decimale_valide(s: &str) -> bool {
    let corps = s.strip_prefix('-').unwrap_or(s);
    let (entier, fraction) = match corps.split_once('.') {
        Some((e, f)) => (e, Some(f)),
        None => (corps, None),
    };
    let chiffres = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
    chiffres(entier) && fraction.map_or(true, chiffres)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NombreExact(BigRational);

impl NombreExact {
    pub fn zero() -> Self {
        NombreExact(BigRational::zero())
    }

    pub fn from_integer(n: i64) -> Self {
        NombreExact(BigRational::from_integer(BigInt::from(n)))
    }

    /// Lit un littéral décimal : "-12.5" -> -125/10 -> -25/2.
    pub fn from_decimal_str(s: &str) -> Result<Self, ErreurCalcul> {
        if !forme_decimale_valide(s) {
            return Err(ErreurCalcul::Parse(s.to_string()));
        }

        let (neg, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };
        let (entier, fraction) = corps.split_once('.').unwrap_or((corps, ""));

        let chiffres = format!("{entier}{fraction}");
        let mut n = BigInt::parse_bytes(chiffres.as_bytes(), 10)
            .ok_or_else(|| ErreurCalcul::Parse(s.to_string()))?;
        if neg {
            n = -n;
        }

        Ok(NombreExact(BigRational::new(n, pow10(fraction.len()))))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> NombreExact {
        NombreExact(self.0.abs())
    }

    pub fn is_integer(&self) -> bool {
        self.0.denom().is_one()
    }

    pub fn checked_div(&self, autre: &NombreExact) -> Result<NombreExact, ErreurCalcul> {
        if autre.is_zero() {
            return Err(ErreurCalcul::DivisionParZero);
        }
        Ok(NombreExact(&self.0 / &autre.0))
    }

    /// Division par 100 (pourcentage), toujours exacte.
    pub fn pourcent(&self) -> NombreExact {
        NombreExact(&self.0 / BigRational::from_integer(BigInt::from(100)))
    }

    /// Décimal arrondi au plus proche (demi vers le haut, en valeur absolue)
    /// sur `precision` chiffres, zéros finaux retirés. Zéro s’écrit "0", jamais "-0".
    pub fn to_decimal_string(&self, precision: usize) -> String {
        let neg = self.0.is_negative();
        let n = self.0.numer().abs();
        let d = self.0.denom();

        let scaled = n * pow10(precision);
        let mut q = &scaled / d;
        let r = &scaled % d;
        if r * 2 >= *d {
            q += 1u32;
        }

        scaled_to_decimal(&q, precision, neg)
    }

    /// √ arrondie (demi vers le haut) à `precision` chiffres.
    /// Exacte quand l’argument est un carré décimal (9 -> 3, 2.25 -> 1.5).
    pub fn sqrt(&self, precision: usize) -> Result<NombreExact, ErreurCalcul> {
        if self.is_negative() {
            return Err(ErreurCalcul::RacineNegative);
        }
        if self.is_zero() {
            return Ok(NombreExact::zero());
        }

        // y = floor( sqrt(n/d) * 10^(precision+1) ) : un chiffre de garde pour l’arrondi
        // floor(√floor(x)) == floor(√x), donc tronquer n·10^k/d d’abord ne coûte rien.
        let cible = self.numer() * pow10(2 * (precision + 1)) / self.denom();
        let y = cible.sqrt();

        let garde = &y % 10u32;
        let mut arrondi = y / 10u32;
        if garde >= BigInt::from(5) {
            arrondi += 1u32;
        }

        Ok(NombreExact(BigRational::new(arrondi, pow10(precision))))
    }
}

impl FromStr for NombreExact {
    type Err = ErreurCalcul;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NombreExact::from_decimal_str(s)
    }
}

/// Affichage debug/démarche : fraction réduite "n/d" (ou "n").
impl fmt::Display for NombreExact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

impl Add for &NombreExact {
    type Output = NombreExact;

    fn add(self, autre: &NombreExact) -> NombreExact {
        NombreExact(&self.0 + &autre.0)
    }
}

impl Sub for &NombreExact {
    type Output = NombreExact;

    fn sub(self, autre: &NombreExact) -> NombreExact {
        NombreExact(&self.0 - &autre.0)
    }
}

impl Mul for &NombreExact {
    type Output = NombreExact;

    fn mul(self, autre: &NombreExact) -> NombreExact {
        NombreExact(&self.0 * &autre.0)
    }
}

impl Neg for NombreExact {
    type Output = NombreExact;

    fn neg(self) -> NombreExact {
        NombreExact(-self.0)
    }
}
