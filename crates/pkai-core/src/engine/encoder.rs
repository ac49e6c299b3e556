use super::catalog::FeatureCatalog;
use super::classify::classify;
use super::config::UnmappedPolicy;
use super::selection::Environment;
use crate::core::chemistry::titratable::TitratableType;
use crate::core::models::ids::ResidueKey;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Debug, Error, PartialEq)]
pub enum EncodingError {
    #[error(
        "Environment atom '{atom_name}' of a {residue_type} residue near site {site} ({site_type}) maps to class '{label}', which is not in the feature catalog"
    )]
    UnmappedClass {
        site: ResidueKey,
        site_type: TitratableType,
        atom_name: String,
        residue_type: String,
        label: String,
    },
    #[error("Residue type {site_type} of site {site} is not in feature catalog '{catalog}'")]
    UnknownResidueType {
        site: ResidueKey,
        site_type: TitratableType,
        catalog: String,
    },
    #[error(
        "Environment atom '{atom_name}' of a {residue_type} residue coincides with a reference atom of site {site}"
    )]
    CoincidentAtom {
        site: ResidueKey,
        atom_name: String,
        residue_type: String,
    },
}

/// The fixed-length numeric input of a predictor.
///
/// Layout: `capacity` environment rows of `classes` columns each, row-major,
/// followed by a one-hot block over the catalog's residue types.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedInput {
    values: Vec<f32>,
    capacity: usize,
    classes: usize,
}

impl EncodedInput {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// The `row`-th environment row. Panics if `row >= capacity`.
    pub fn environment_row(&self, row: usize) -> &[f32] {
        assert!(row < self.capacity, "row {row} out of {} rows", self.capacity);
        &self.values[row * self.classes..(row + 1) * self.classes]
    }

    pub fn rows(&self) -> usize {
        self.capacity
    }

    pub fn residue_type_block(&self) -> &[f32] {
        &self.values[self.capacity * self.classes..]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ClassifiedEntry {
    class: usize,
    label: String,
    distance: f64,
}

/// Encodes the environment of a site of type `site_type` using `catalog`.
///
/// Every entry is classified first; an entry whose label is not in the catalog,
/// or that lies at distance zero, either fails the whole site or is dropped,
/// depending on `policy`. The
/// surviving entries are ordered by distance, then label, and the nearest
/// `capacity` become rows holding `1 / distance²` in their class column. Rows
/// past the environment size stay zero, and entries past the capacity are
/// discarded.
///
/// # Errors
///
/// Returns [`EncodingError`] for a site type missing from the catalog and,
/// under [`UnmappedPolicy::Fail`], for an unmapped class or an entry at
/// distance zero.
pub fn encode(
    environment: &Environment<'_>,
    site_type: TitratableType,
    catalog: &FeatureCatalog,
    policy: UnmappedPolicy,
) -> Result<EncodedInput, EncodingError> {
    let site = environment.site;
    let type_index =
        catalog
            .residue_type_index(site_type)
            .ok_or_else(|| EncodingError::UnknownResidueType {
                site,
                site_type,
                catalog: catalog.id(),
            })?;

    let mut entries = Vec::with_capacity(environment.len());
    for atom in environment.iter() {
        let label = classify(atom.atom_name, atom.residue_type, catalog);
        let Some(class) = catalog.class_index(&label) else {
            match policy {
                UnmappedPolicy::Fail => {
                    return Err(EncodingError::UnmappedClass {
                        site,
                        site_type,
                        atom_name: atom.atom_name.to_string(),
                        residue_type: atom.residue_type.to_string(),
                        label,
                    });
                }
                UnmappedPolicy::Skip => {
                    warn!(
                        site = %site,
                        atom = atom.atom_name,
                        residue_type = atom.residue_type,
                        label = %label,
                        "Skipping environment atom with no catalog class."
                    );
                    continue;
                }
            }
        };
        if atom.distance == 0.0 {
            match policy {
                UnmappedPolicy::Fail => {
                    return Err(EncodingError::CoincidentAtom {
                        site,
                        atom_name: atom.atom_name.to_string(),
                        residue_type: atom.residue_type.to_string(),
                    });
                }
                UnmappedPolicy::Skip => {
                    warn!(
                        site = %site,
                        atom = atom.atom_name,
                        residue_type = atom.residue_type,
                        "Skipping environment atom that coincides with a reference atom."
                    );
                    continue;
                }
            }
        }
        entries.push(ClassifiedEntry {
            class,
            label,
            distance: atom.distance,
        });
    }

    entries.sort_by(|a, b| match a.distance.total_cmp(&b.distance) {
        Ordering::Equal => a.label.cmp(&b.label),
        other => other,
    });

    let capacity = catalog.capacity();
    let classes = catalog.class_count();
    if entries.len() > capacity {
        trace!(
            site = %site,
            dropped = entries.len() - capacity,
            "Environment exceeds catalog capacity; keeping the nearest entries."
        );
    }

    let mut values = vec![0.0f32; catalog.input_dim()];
    for (row, entry) in entries.iter().take(capacity).enumerate() {
        let r2 = entry.distance * entry.distance;
        values[row * classes + entry.class] = (1.0 / r2) as f32;
    }
    values[capacity * classes + type_index] = 1.0;

    Ok(EncodedInput {
        values,
        capacity,
        classes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::selection::EnvironmentAtom;

    fn env<'a>(entries: &[(&'a str, &'a str, f64)]) -> Environment<'a> {
        Environment {
            site: ResidueKey::new('A', 10),
            entries: entries
                .iter()
                .map(|&(atom_name, residue_type, distance)| EnvironmentAtom {
                    atom_name,
                    residue_type,
                    distance,
                })
                .collect(),
        }
    }

    fn catalog() -> FeatureCatalog {
        FeatureCatalog::pkai_v1()
    }

    #[test]
    fn single_carboxylate_neighbour_fills_first_row() {
        let catalog = catalog();
        let encoded = encode(
            &env(&[("OE1", "GLU", 3.0)]),
            TitratableType::AsparticAcid,
            &catalog,
            UnmappedPolicy::Fail,
        )
        .unwrap();

        assert_eq!(encoded.len(), catalog.input_dim());
        let cooh = catalog.class_index("O_COOH").unwrap();
        let first = encoded.environment_row(0);
        assert_eq!(first[cooh], (1.0f64 / 9.0) as f32);
        assert_eq!(first.iter().filter(|&&v| v != 0.0).count(), 1);
        for row in 1..encoded.rows() {
            assert!(encoded.environment_row(row).iter().all(|&v| v == 0.0));
        }

        let block = encoded.residue_type_block();
        let asp = catalog
            .residue_type_index(TitratableType::AsparticAcid)
            .unwrap();
        assert_eq!(block[asp], 1.0);
        assert_eq!(block.iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn entries_are_ordered_by_distance_then_label() {
        let catalog = catalog();
        let encoded = encode(
            &env(&[
                ("OG", "SER", 5.0),
                ("NZ", "LYS", 2.0),
                ("O", "ALA", 5.0),
                ("N", "GLY", 5.0),
            ]),
            TitratableType::Histidine,
            &catalog,
            UnmappedPolicy::Fail,
        )
        .unwrap();

        let expected = ["NZ_LYS", "N", "O", "OG_SER"];
        for (row, label) in expected.iter().enumerate() {
            let class = catalog.class_index(label).unwrap();
            assert!(encoded.environment_row(row)[class] > 0.0, "row {row} should be {label}");
        }
    }

    #[test]
    fn only_nearest_capacity_entries_are_kept() {
        let catalog = catalog();
        let entries: Vec<_> = (0..300)
            .map(|i| ("OG", "SER", 1.0 + i as f64 * 0.01))
            .rev()
            .collect();
        let encoded = encode(
            &env(&entries),
            TitratableType::Lysine,
            &catalog,
            UnmappedPolicy::Fail,
        )
        .unwrap();

        let og = catalog.class_index("OG_SER").unwrap();
        assert_eq!(encoded.environment_row(0)[og], 1.0);
        let last = encoded.environment_row(catalog.capacity() - 1)[og];
        let farthest_kept = 1.0 + 249.0 * 0.01;
        assert_eq!(last, (1.0 / (farthest_kept * farthest_kept)) as f32);
        assert!(encoded.as_slice()[..catalog.capacity() * catalog.class_count()]
            .chunks(catalog.class_count())
            .all(|row| row.iter().filter(|&&v| v != 0.0).count() == 1));
    }

    #[test]
    fn empty_environment_yields_only_residue_type() {
        let catalog = catalog();
        let encoded = encode(
            &env(&[]),
            TitratableType::Tyrosine,
            &catalog,
            UnmappedPolicy::Fail,
        )
        .unwrap();
        assert_eq!(encoded.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
        let tyr = catalog.residue_type_index(TitratableType::Tyrosine).unwrap();
        assert_eq!(encoded.residue_type_block()[tyr], 1.0);
    }

    #[test]
    fn unmapped_class_fails_with_site_and_pair() {
        let result = encode(
            &env(&[("OG", "SER", 4.0), ("SD", "MSE", 4.5)]),
            TitratableType::Cysteine,
            &catalog(),
            UnmappedPolicy::Fail,
        );
        assert_eq!(
            result,
            Err(EncodingError::UnmappedClass {
                site: ResidueKey::new('A', 10),
                site_type: TitratableType::Cysteine,
                atom_name: "SD".to_string(),
                residue_type: "MSE".to_string(),
                label: "SD_MSE".to_string(),
            })
        );
    }

    #[test]
    fn skip_policy_drops_unmapped_entries_without_using_a_row() {
        let catalog = catalog();
        let encoded = encode(
            &env(&[("SD", "MSE", 1.0), ("OG", "SER", 2.0)]),
            TitratableType::Cysteine,
            &catalog,
            UnmappedPolicy::Skip,
        )
        .unwrap();
        let og = catalog.class_index("OG_SER").unwrap();
        assert_eq!(encoded.environment_row(0)[og], 0.25);
        assert!(encoded.environment_row(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn coincident_atom_is_rejected() {
        let result = encode(
            &env(&[("OG", "SER", 0.0)]),
            TitratableType::Lysine,
            &catalog(),
            UnmappedPolicy::Fail,
        );
        assert!(matches!(result, Err(EncodingError::CoincidentAtom { .. })));
    }

    #[test]
    fn skip_policy_drops_coincident_atom() {
        let catalog = catalog();
        let encoded = encode(
            &env(&[("OG", "SER", 0.0), ("NZ", "LYS", 2.0)]),
            TitratableType::Lysine,
            &catalog,
            UnmappedPolicy::Skip,
        )
        .unwrap();
        let nz = catalog.class_index("NZ_LYS").unwrap();
        let og = catalog.class_index("OG_SER").unwrap();
        assert_eq!(encoded.environment_row(0)[nz], 0.25);
        assert_eq!(encoded.environment_row(0)[og], 0.0);
        assert!(encoded.environment_row(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn site_type_missing_from_catalog_is_rejected() {
        let catalog = FeatureCatalog::new(
            "lys-only",
            1,
            vec!["N".to_string()],
            vec![TitratableType::Lysine],
            2,
            vec![],
        )
        .unwrap();
        let result = encode(&env(&[]), TitratableType::Histidine, &catalog, UnmappedPolicy::Fail);
        assert!(matches!(result, Err(EncodingError::UnknownResidueType { .. })));
    }
}
