use crate::types::LandCoverClass;
use serde::Serialize;

/// One legend row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub code: u8,
    pub name: &'static str,
    pub color: &'static str,
}

const fn entry(class: LandCoverClass) -> LegendEntry {
    LegendEntry {
        code: class.code(),
        name: class.name(),
        color: class.color(),
    }
}

static LEGEND: [LegendEntry; 8] = [
    entry(LandCoverClass::DeepWater),
    entry(LandCoverClass::ShallowWater),
    entry(LandCoverClass::DenseForest),
    entry(LandCoverClass::MixedForest),
    entry(LandCoverClass::Grassland),
    entry(LandCoverClass::Buildings),
    entry(LandCoverClass::Roads),
    entry(LandCoverClass::BareSoil),
];

/// Class legend ordered by code
pub fn legend() -> &'static [LegendEntry] {
    &LEGEND
}

pub fn legend_entry(code: u8) -> Option<&'static LegendEntry> {
    LEGEND.get(code as usize)
}

/// Legend colours as RGB triples, indexed by class code
pub fn palette_rgb() -> [[u8; 3]; 8] {
    let mut palette = [[0u8; 3]; 8];
    for (slot, entry) in palette.iter_mut().zip(LEGEND.iter()) {
        *slot = hex_to_rgb(entry.color);
    }
    palette
}

fn hex_to_rgb(color: &str) -> [u8; 3] {
    let hex = color.trim_start_matches('#');
    let channel = |k: usize| {
        hex.get(2 * k..2 * k + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    [channel(0), channel(1), channel(2)]
}
