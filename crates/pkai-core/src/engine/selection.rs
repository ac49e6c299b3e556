use crate::core::models::ids::ResidueKey;
use crate::core::models::protein::Protein;
use crate::core::models::residue::Residue;
use crate::core::utils::geometry::min_squared_distance;
use nalgebra::Point3;
use tracing::warn;

/// One atom of a site's chemical environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentAtom<'a> {
    pub atom_name: &'a str,
    /// Residue type of the residue owning the atom.
    pub residue_type: &'a str,
    /// Distance in Angstroms to the nearest reference atom of the site.
    pub distance: f64,
}

/// The atoms surrounding a titratable site, in protein iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment<'a> {
    pub site: ResidueKey,
    pub entries: Vec<EnvironmentAtom<'a>>,
}

impl<'a> Environment<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentAtom<'a>> {
        self.entries.iter()
    }
}

/// Collects every atom of `protein` lying within `cutoff_radius` of a reference
/// atom of `site`.
///
/// Atoms of the site itself are excluded. An atom is kept when its minimum
/// squared distance to the reference atoms is strictly below the squared
/// radius; the stored distance is the square root of that minimum.
///
/// This scans all atoms against all reference atoms of the site, which makes
/// the full pipeline quadratic in protein size.
pub fn select_environment<'a>(
    protein: &'a Protein,
    site: &Residue,
    cutoff_radius: f64,
) -> Environment<'a> {
    let references: Vec<Point3<f64>> = site
        .reference_atoms()
        .into_iter()
        .map(|atom| atom.position)
        .collect();

    if references.is_empty() {
        warn!(
            site = %site.key,
            residue_type = %site.name,
            "Titratable residue has none of its reference atoms; its environment is empty."
        );
        return Environment {
            site: site.key,
            entries: Vec::new(),
        };
    }

    let cutoff_sq = cutoff_radius * cutoff_radius;
    let mut entries = Vec::new();

    for (_, residue) in protein.residues() {
        if residue.key == site.key {
            continue;
        }
        for atom in residue.atoms() {
            let Some(min_sq) = min_squared_distance(&atom.position, &references) else {
                continue;
            };
            if min_sq < cutoff_sq {
                entries.push(EnvironmentAtom {
                    atom_name: &atom.name,
                    residue_type: &residue.name,
                    distance: min_sq.sqrt(),
                });
            }
        }
    }

    Environment {
        site: site.key,
        entries,
    }
}
