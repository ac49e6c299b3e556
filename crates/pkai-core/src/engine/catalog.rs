use crate::core::chemistry::titratable::TitratableType;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Number of environment rows in the encoded input of the built-in catalog.
pub const DEFAULT_CAPACITY: usize = 250;

/// Name of the catalog the published pKAI model was trained with.
pub const PKAI_V1: &str = "pkai-v1";

const PKAI_V1_CLASSES: [&str; 16] = [
    "N", "NZ_LYS", "NH_ARG", "O_AMIDE", "OH_TYR", "NE2_HIS", "SD_MET", "SG_CYS", "OG_SER", "O",
    "NE1_TRP", "OG1_THR", "O_COOH", "NE_ARG", "N_AMIDE", "ND1_HIS",
];

const PKAI_V1_RESIDUE_TYPES: [TitratableType; 8] = [
    TitratableType::CTerminus,
    TitratableType::Cysteine,
    TitratableType::Tyrosine,
    TitratableType::GlutamicAcid,
    TitratableType::Histidine,
    TitratableType::AsparticAcid,
    TitratableType::Lysine,
    TitratableType::NTerminus,
];

const PKAI_V1_CARBOXYLATE_ALIASES: [&str; 2] = ["OD1", "OXT"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown built-in catalog '{0}'")]
    UnknownBuiltin(String),
    #[error("Catalog '{catalog}' has no {what}")]
    Empty { catalog: String, what: &'static str },
    #[error("Catalog '{catalog}' lists environment class '{label}' more than once")]
    DuplicateClass { catalog: String, label: String },
    #[error("Catalog '{catalog}' lists residue type '{residue_type}' more than once")]
    DuplicateResidueType {
        catalog: String,
        residue_type: TitratableType,
    },
    #[error("Catalog '{catalog}' lists '{name}', which is not a titratable residue type")]
    UnknownResidueType { catalog: String, name: String },
    #[error("Catalog '{catalog}' must have a capacity greater than zero")]
    ZeroCapacity { catalog: String },
}

/// The closed vocabulary that fixes the layout of an encoded input.
///
/// A catalog is bound to the model that was trained on it: the environment
/// classes give the column order of every environment row, the residue types
/// give the order of the trailing one-hot block, and the capacity gives the
/// number of rows. Its identity is `name` plus `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCatalog {
    name: String,
    version: u32,
    environment_classes: Vec<String>,
    residue_types: Vec<TitratableType>,
    capacity: usize,
    carboxylate_aliases: Vec<String>,
    class_index: HashMap<String, usize>,
}

impl FeatureCatalog {
    /// Builds a catalog, rejecting empty or duplicated vocabularies.
    pub fn new(
        name: &str,
        version: u32,
        environment_classes: Vec<String>,
        residue_types: Vec<TitratableType>,
        capacity: usize,
        carboxylate_aliases: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let catalog = name.to_string();
        if environment_classes.is_empty() {
            return Err(CatalogError::Empty {
                catalog,
                what: "environment classes",
            });
        }
        if residue_types.is_empty() {
            return Err(CatalogError::Empty {
                catalog,
                what: "residue types",
            });
        }
        if capacity == 0 {
            return Err(CatalogError::ZeroCapacity { catalog });
        }

        let mut class_index = HashMap::with_capacity(environment_classes.len());
        for (i, label) in environment_classes.iter().enumerate() {
            if class_index.insert(label.clone(), i).is_some() {
                return Err(CatalogError::DuplicateClass {
                    catalog,
                    label: label.clone(),
                });
            }
        }
        for (i, residue_type) in residue_types.iter().enumerate() {
            if residue_types[..i].contains(residue_type) {
                return Err(CatalogError::DuplicateResidueType {
                    catalog,
                    residue_type: *residue_type,
                });
            }
        }

        Ok(Self {
            name: catalog,
            version,
            environment_classes,
            residue_types,
            capacity,
            carboxylate_aliases,
            class_index,
        })
    }

    /// The catalog of the published pKAI model: 16 environment classes,
    /// 8 residue types and 250 rows.
    pub fn pkai_v1() -> Self {
        let environment_classes: Vec<String> =
            PKAI_V1_CLASSES.iter().map(|s| s.to_string()).collect();
        let class_index = environment_classes
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self {
            name: "pkai".to_string(),
            version: 1,
            environment_classes,
            residue_types: PKAI_V1_RESIDUE_TYPES.to_vec(),
            capacity: DEFAULT_CAPACITY,
            carboxylate_aliases: PKAI_V1_CARBOXYLATE_ALIASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            class_index,
        }
    }

    /// Looks up a built-in catalog by its identifier.
    pub fn builtin(id: &str) -> Result<Self, CatalogError> {
        match id {
            PKAI_V1 => Ok(Self::pkai_v1()),
            _ => Err(CatalogError::UnknownBuiltin(id.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The `<name>-v<version>` identifier of this catalog.
    pub fn id(&self) -> String {
        format!("{}-v{}", self.name, self.version)
    }

    pub fn environment_classes(&self) -> &[String] {
        &self.environment_classes
    }

    pub fn residue_types(&self) -> &[TitratableType] {
        &self.residue_types
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Atom names whose owning residue is treated as a C-terminus when classified.
    pub fn carboxylate_aliases(&self) -> &[String] {
        &self.carboxylate_aliases
    }

    pub fn is_carboxylate_alias(&self, atom_name: &str) -> bool {
        self.carboxylate_aliases.iter().any(|a| a == atom_name)
    }

    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.class_index.get(label).copied()
    }

    pub fn residue_type_index(&self, residue_type: TitratableType) -> Option<usize> {
        self.residue_types.iter().position(|&t| t == residue_type)
    }

    pub fn class_count(&self) -> usize {
        self.environment_classes.len()
    }

    /// Length of every vector encoded with this catalog.
    pub fn input_dim(&self) -> usize {
        self.capacity * self.class_count() + self.residue_types.len()
    }
}

impl fmt::Display for FeatureCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} classes x {} rows + {} residue types)",
            self.id(),
            self.class_count(),
            self.capacity,
            self.residue_types.len()
        )
    }
}

/// Catalog declaration as it appears in a model manifest.
///
/// Either `builtin = "pkai-v1"` or a full inline vocabulary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CatalogSpec {
    Builtin { builtin: String },
    Inline(InlineCatalog),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InlineCatalog {
    pub name: String,
    pub version: u32,
    pub environment_classes: Vec<String>,
    pub residue_types: Vec<String>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub carboxylate_aliases: Vec<String>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl CatalogSpec {
    pub fn resolve(&self) -> Result<FeatureCatalog, CatalogError> {
        match self {
            CatalogSpec::Builtin { builtin } => FeatureCatalog::builtin(builtin),
            CatalogSpec::Inline(inline) => {
                let residue_types = inline
                    .residue_types
                    .iter()
                    .map(|name| {
                        name.parse::<TitratableType>()
                            .map_err(|_| CatalogError::UnknownResidueType {
                                catalog: inline.name.clone(),
                                name: name.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                FeatureCatalog::new(
                    &inline.name,
                    inline.version,
                    inline.environment_classes.clone(),
                    residue_types,
                    inline.capacity,
                    inline.carboxylate_aliases.clone(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pkai_v1_matches_published_layout() {
        let catalog = FeatureCatalog::pkai_v1();
        assert_eq!(catalog.id(), PKAI_V1);
        assert_eq!(catalog.class_count(), 16);
        assert_eq!(catalog.residue_types().len(), 8);
        assert_eq!(catalog.capacity(), 250);
        assert_eq!(catalog.input_dim(), 250 * 16 + 8);
        assert_eq!(catalog.class_index("N"), Some(0));
        assert_eq!(catalog.class_index("O_COOH"), Some(12));
        assert_eq!(catalog.class_index("ND1_HIS"), Some(15));
        assert_eq!(catalog.class_index("CD_GLU"), None);
        assert_eq!(catalog.residue_type_index(TitratableType::CTerminus), Some(0));
        assert_eq!(catalog.residue_type_index(TitratableType::AsparticAcid), Some(5));
        assert_eq!(catalog.residue_type_index(TitratableType::NTerminus), Some(7));
        assert!(catalog.is_carboxylate_alias("OXT"));
        assert!(!catalog.is_carboxylate_alias("OD2"));
    }

    #[test]
    fn pkai_v1_passes_validation() {
        let validated = FeatureCatalog::new(
            "pkai",
            1,
            strings(&PKAI_V1_CLASSES),
            PKAI_V1_RESIDUE_TYPES.to_vec(),
            DEFAULT_CAPACITY,
            strings(&PKAI_V1_CARBOXYLATE_ALIASES),
        );
        assert_eq!(validated, Ok(FeatureCatalog::pkai_v1()));
    }

    #[test]
    fn builtin_lookup_rejects_unknown_names() {
        assert_eq!(FeatureCatalog::builtin("pkai-v1"), Ok(FeatureCatalog::pkai_v1()));
        assert_eq!(
            FeatureCatalog::builtin("pkai-v9"),
            Err(CatalogError::UnknownBuiltin("pkai-v9".to_string()))
        );
    }

    #[test]
    fn new_rejects_duplicate_classes() {
        let result = FeatureCatalog::new(
            "dup",
            1,
            strings(&["N", "O", "N"]),
            vec![TitratableType::Lysine],
            10,
            vec![],
        );
        assert_eq!(
            result,
            Err(CatalogError::DuplicateClass {
                catalog: "dup".to_string(),
                label: "N".to_string()
            })
        );
    }

    #[test]
    fn new_rejects_duplicate_residue_types() {
        let result = FeatureCatalog::new(
            "dup",
            1,
            strings(&["N"]),
            vec![TitratableType::Lysine, TitratableType::Lysine],
            10,
            vec![],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateResidueType { .. })));
    }

    #[test]
    fn new_rejects_empty_vocabularies_and_zero_capacity() {
        let no_classes = FeatureCatalog::new("e", 1, vec![], vec![TitratableType::Lysine], 1, vec![]);
        assert!(matches!(
            no_classes,
            Err(CatalogError::Empty {
                what: "environment classes",
                ..
            })
        ));

        let no_types = FeatureCatalog::new("e", 1, strings(&["N"]), vec![], 1, vec![]);
        assert!(matches!(
            no_types,
            Err(CatalogError::Empty {
                what: "residue types",
                ..
            })
        ));

        let zero = FeatureCatalog::new("e", 1, strings(&["N"]), vec![TitratableType::Lysine], 0, vec![]);
        assert!(matches!(zero, Err(CatalogError::ZeroCapacity { .. })));
    }

    #[test]
    fn spec_resolves_builtin_and_inline_declarations() {
        let builtin: CatalogSpec = toml::from_str(r#"builtin = "pkai-v1""#).unwrap();
        assert_eq!(builtin.resolve().unwrap(), FeatureCatalog::pkai_v1());

        let inline: CatalogSpec = toml::from_str(
            r#"
            name = "tiny"
            version = 3
            environment-classes = ["N", "O", "O_COOH"]
            residue-types = ["ASP", "LYS"]
            capacity = 4
            "#,
        )
        .unwrap();
        let catalog = inline.resolve().unwrap();
        assert_eq!(catalog.id(), "tiny-v3");
        assert_eq!(catalog.input_dim(), 4 * 3 + 2);
        assert!(catalog.carboxylate_aliases().is_empty());
    }

    #[test]
    fn spec_rejects_non_titratable_residue_type() {
        let inline: CatalogSpec = toml::from_str(
            r#"
            name = "bad"
            version = 1
            environment-classes = ["N"]
            residue-types = ["ALA"]
            "#,
        )
        .unwrap();
        assert_eq!(
            inline.resolve(),
            Err(CatalogError::UnknownResidueType {
                catalog: "bad".to_string(),
                name: "ALA".to_string()
            })
        );
    }
}
