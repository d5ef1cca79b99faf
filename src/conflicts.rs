//! Perceptual conflict detection over a color catalog
//!
//! Two catalog colors conflict when their CIEDE2000 difference is strictly below the
//! threshold. Rough scale: below 1 is invisible, 1 to 3 shows only to trained eyes, 3 to 6
//! is visible to most people, above 6 is obviously different. The default threshold of 3
//! flags colors that are likely to be confused for one another.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::color::{self, LabColor, delta_e_2000, lightness_weight};

/// Default ΔE00 below which two colors count as a conflict
pub const DEFAULT_CONFLICT_THRESHOLD: f64 = 3.0;

/// Relative slack added to the pruning reach so rounding can never drop a pair
const PRUNING_SLACK: f64 = 1e-9;

/// A color as stored in the catalog
///
/// Field aliases accept documents exported from the catalog database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogColor {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "codigoHex", skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    /// Colorimeter reading, already compensated when it was captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<LabColor>,
}

impl CatalogColor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hex: None,
            lab: None,
        }
    }

    #[must_use]
    pub fn with_hex(mut self, hex: impl Into<String>) -> Self {
        self.hex = Some(hex.into());
        self
    }

    #[must_use]
    pub fn with_lab(mut self, lab: LabColor) -> Self {
        self.lab = Some(lab);
        self
    }

    /// LAB value to compare with, preferring the stored reading over the hex code
    pub fn resolve_lab(&self) -> Option<LabColor> {
        self.lab.or_else(|| self.hex.as_deref().and_then(hex_to_lab))
    }
}

/// Closest catalog color to a candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub id: String,
    pub name: String,
    pub hex: String,
    pub lab: LabColor,
    pub delta_e: f64,
}

/// One side of a conflicting pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictSide {
    pub id: String,
    pub name: String,
    /// Empty when the color has no hex code
    pub hex: String,
    pub lab: LabColor,
}

/// Two catalog colors within the threshold of each other
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictPair {
    /// The color listed first in the catalog
    pub first: ConflictSide,
    pub second: ConflictSide,
    pub delta_e: f64,
}

/// Entry of the per-color conflict index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictEntry {
    pub id: String,
    pub name: String,
    pub delta_e: f64,
}

/// Parse `#RRGGBB` straight into LAB
pub fn hex_to_lab(hex: &str) -> Option<LabColor> {
    color::hex_to_rgb(hex).map(color::rgb_to_lab)
}

/// Settings for a conflict search, owned by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictDetector {
    pub threshold: f64,
    /// Skip pairs whose lightness alone rules out a conflict
    pub lightness_pruning: bool,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CONFLICT_THRESHOLD)
    }
}

/// A catalog color with its resolved LAB value
struct Resolved<'a> {
    color: &'a CatalogColor,
    lab: LabColor,
}

/// Positions of a conflicting pair in the resolved list, with its difference
type Hit = (usize, usize, f64);

impl ConflictDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            lightness_pruning: false,
        }
    }

    #[must_use]
    pub fn with_lightness_pruning(mut self, enabled: bool) -> Self {
        self.lightness_pruning = enabled;
        self
    }

    /// Find the existing color closest to the candidate, if it is below the threshold
    ///
    /// Only colors with a parseable hex code take part. On equal differences the earlier
    /// color wins.
    pub fn find_conflict(
        &self,
        candidate: LabColor,
        existing: &[CatalogColor],
    ) -> Option<Conflict> {
        let mut closest: Option<Conflict> = None;
        for color in existing {
            let Some(hex) = color.hex.as_deref() else {
                continue;
            };
            let Some(lab) = hex_to_lab(hex) else {
                continue;
            };
            let delta_e = delta_e_2000(candidate, lab);
            let is_closer = closest.as_ref().is_none_or(|found| delta_e < found.delta_e);
            if delta_e < self.threshold && is_closer {
                closest = Some(Conflict {
                    id: color.id.clone(),
                    name: color.name.clone(),
                    hex: hex.to_owned(),
                    lab,
                    delta_e,
                });
            }
        }
        closest
    }

    /// Check whether the candidate conflicts with any existing color
    pub fn has_conflict(&self, candidate: LabColor, existing: &[CatalogColor]) -> bool {
        self.find_conflict(candidate, existing).is_some()
    }

    /// Find every pair of catalog colors below the threshold, most similar first
    ///
    /// Colors with a stored LAB value use it; the others fall back to their hex code; colors
    /// with neither are skipped. This compares all N(N-1)/2 pairs. Lightness pruning only
    /// skips pairs that cannot conflict, so both modes return the same list.
    pub fn find_all_conflicts(&self, colors: &[CatalogColor]) -> Vec<ConflictPair> {
        let entries: Vec<Resolved> = colors
            .iter()
            .filter_map(|color| color.resolve_lab().map(|lab| Resolved { color, lab }))
            .collect();

        let mut hits = if self.lightness_pruning {
            self.scan_by_lightness(&entries)
        } else {
            self.scan_all_pairs(&entries)
        };
        hits.sort_by(|x, y| {
            x.2.total_cmp(&y.2)
                .then(x.0.cmp(&y.0))
                .then(x.1.cmp(&y.1))
        });

        hits.into_iter()
            .map(|(i, j, delta_e)| ConflictPair {
                first: side(&entries[i]),
                second: side(&entries[j]),
                delta_e,
            })
            .collect()
    }

    fn scan_all_pairs(&self, entries: &[Resolved]) -> Vec<Hit> {
        (0..entries.len())
            .tuple_combinations()
            .filter_map(|(i, j)| self.compare(entries, i, j))
            .collect()
    }

    /// Walk the entries in lightness order and stop each inner scan once the lightness gap
    /// alone exceeds the threshold
    ///
    /// ΔE00 >= |ΔL| / S_L and S_L only grows away from L = 50, so S_L at the extreme
    /// lightness of the catalog bounds every pair.
    fn scan_by_lightness(&self, entries: &[Resolved]) -> Vec<Hit> {
        let Some((darkest, lightest)) = entries
            .iter()
            .map(|entry| entry.lab.l)
            .minmax_by(f64::total_cmp)
            .into_option()
        else {
            return Vec::new();
        };
        let max_weight = lightness_weight(darkest).max(lightness_weight(lightest));
        let reach = self.threshold * max_weight * (1.0 + PRUNING_SLACK);

        let order: Vec<usize> = (0..entries.len())
            .sorted_by(|&x, &y| entries[x].lab.l.total_cmp(&entries[y].lab.l))
            .collect();

        let mut hits = Vec::new();
        for (position, &x) in order.iter().enumerate() {
            for &y in &order[position + 1..] {
                if entries[y].lab.l - entries[x].lab.l >= reach {
                    break;
                }
                hits.extend(self.compare(entries, x.min(y), x.max(y)));
            }
        }
        hits
    }

    fn compare(&self, entries: &[Resolved], i: usize, j: usize) -> Option<Hit> {
        let delta_e = delta_e_2000(entries[i].lab, entries[j].lab);
        (delta_e < self.threshold).then_some((i, j, delta_e))
    }
}

fn side(entry: &Resolved) -> ConflictSide {
    ConflictSide {
        id: entry.color.id.clone(),
        name: entry.color.name.clone(),
        hex: entry.color.hex.clone().unwrap_or_default(),
        lab: entry.lab,
    }
}

/// Index conflicting pairs by color id
///
/// Every pair shows up under both of its colors.
pub fn conflict_map(pairs: &[ConflictPair]) -> HashMap<String, Vec<ConflictEntry>> {
    let mut map: HashMap<String, Vec<ConflictEntry>> = HashMap::new();
    for pair in pairs {
        map.entry(pair.first.id.clone())
            .or_default()
            .push(ConflictEntry {
                id: pair.second.id.clone(),
                name: pair.second.name.clone(),
                delta_e: pair.delta_e,
            });
        map.entry(pair.second.id.clone())
            .or_default()
            .push(ConflictEntry {
                id: pair.first.id.clone(),
                name: pair.first.name.clone(),
                delta_e: pair.delta_e,
            });
    }
    map
}
