//! Chart palettes.
//!
//! Colors serialize the way the web charts consumed them (`#rrggbb` and
//! `rgba(r, g, b, a)`), so `--json` output stays readable.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// A color with opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub fn css(&self) -> String {
        if self.alpha >= 1.0 {
            return self.rgb.hex();
        }
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.0, self.rgb.1, self.rgb.2, self.alpha
        )
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

pub const MALE: Rgb = Rgb(77, 140, 199);
pub const FEMALE: Rgb = Rgb(226, 103, 139);
pub const URBAN: Rgb = Rgb(146, 118, 186);
pub const RURAL: Rgb = Rgb(122, 175, 98);
pub const STUNTED: Rgb = Rgb(235, 151, 78);
pub const WASTED: Rgb = Rgb(209, 86, 74);
pub const UNDERWEIGHT: Rgb = Rgb(237, 197, 86);
pub const PPP1: Rgb = Rgb(196, 84, 60);
pub const PPP2: Rgb = Rgb(236, 143, 104);
pub const RAINFALL: Rgb = Rgb(84, 150, 196);
pub const NEUTRAL: Rgb = Rgb(170, 170, 170);

const CATEGORICAL: [Rgb; 8] = [
    Rgb(102, 194, 165),
    Rgb(252, 141, 98),
    Rgb(141, 160, 203),
    Rgb(231, 138, 195),
    Rgb(166, 216, 84),
    Rgb(255, 217, 47),
    Rgb(229, 196, 148),
    Rgb(179, 179, 179),
];

pub fn gender(key: &str) -> Rgb {
    match key {
        "male" => MALE,
        "female" => FEMALE,
        _ => NEUTRAL,
    }
}

pub fn residence(key: &str) -> Rgb {
    match key {
        "urban" => URBAN,
        "rural" => RURAL,
        _ => NEUTRAL,
    }
}

pub fn condition(key: &str) -> Rgb {
    match key {
        "stunted" => STUNTED,
        "wasted" => WASTED,
        "underweight" => UNDERWEIGHT,
        _ => NEUTRAL,
    }
}

pub fn poverty(key: &str) -> Rgb {
    match key {
        "ppp1" => PPP1,
        "ppp2" => PPP2,
        _ => NEUTRAL,
    }
}

/// Stable color for an arbitrary category (crops and the like)
pub fn categorical(key: &str) -> Rgb {
    let hash = key
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    CATEGORICAL[hash % CATEGORICAL.len()]
}
