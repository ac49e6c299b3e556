use super::catalog::FeatureCatalog;
use crate::core::models::atom::element_symbol;
use phf::{Set, phf_set};

static CARBOXYLATE_RESIDUES: Set<&'static str> = phf_set! { "ASP", "GLU", "CTR" };
static AMIDE_RESIDUES: Set<&'static str> = phf_set! { "ASN", "GLN" };
static GUANIDINIUM_NH: Set<&'static str> = phf_set! { "NH1", "NH2" };

const C_TERMINUS: &str = "CTR";
const N_TERMINUS: &str = "NTR";
const AMINE_CLASS: &str = "NZ_LYS";
const CARBOXYLATE_CLASS: &str = "O_COOH";
const GUANIDINIUM_CLASS: &str = "NH_ARG";

/// Maps an environment atom to its environment-class label.
///
/// Rules are applied in order; the first that matches decides:
///
/// 1. An atom named like one of the catalog's carboxylate aliases is treated as
///    belonging to a C-terminus, whatever its residue.
/// 2. Backbone `N` and `O` keep their name, except on an N-terminus where they
///    become the lysine amine class.
/// 3. Any other atom of a carboxylate residue (ASP, GLU, CTR) is `O_COOH`.
/// 4. Atoms of ASN and GLN collapse to `<element>_AMIDE`.
/// 5. `NH1`/`NH2` of ARG are `NH_ARG`.
/// 6. Everything else is `<atom name>_<residue type>`.
///
/// The label is not checked against the catalog here.
pub fn classify(atom_name: &str, residue_type: &str, catalog: &FeatureCatalog) -> String {
    let residue_type = if catalog.is_carboxylate_alias(atom_name) {
        C_TERMINUS
    } else {
        residue_type
    };

    if atom_name == "N" || atom_name == "O" {
        if residue_type == N_TERMINUS {
            AMINE_CLASS.to_string()
        } else {
            atom_name.to_string()
        }
    } else if CARBOXYLATE_RESIDUES.contains(residue_type) {
        CARBOXYLATE_CLASS.to_string()
    } else if AMIDE_RESIDUES.contains(residue_type) {
        let element = element_symbol(atom_name).unwrap_or('X');
        format!("{element}_AMIDE")
    } else if residue_type == "ARG" && GUANIDINIUM_NH.contains(atom_name) {
        GUANIDINIUM_CLASS.to_string()
    } else {
        format!("{atom_name}_{residue_type}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(atom: &str, residue: &str) -> String {
        classify(atom, residue, &FeatureCatalog::pkai_v1())
    }

    #[test]
    fn backbone_atoms_pass_through() {
        assert_eq!(label("N", "ALA"), "N");
        assert_eq!(label("O", "GLY"), "O");
        assert_eq!(label("N", "ASP"), "N");
    }

    #[test]
    fn n_terminus_backbone_maps_to_amine_class() {
        assert_eq!(label("N", "NTR"), "NZ_LYS");
        assert_eq!(label("O", "NTR"), "NZ_LYS");
    }

    #[test]
    fn carboxylate_residues_map_to_carboxylate_class() {
        assert_eq!(label("OD2", "ASP"), "O_COOH");
        assert_eq!(label("OE1", "GLU"), "O_COOH");
        assert_eq!(label("OE2", "GLU"), "O_COOH");
        assert_eq!(label("OT2", "CTR"), "O_COOH");
    }

    #[test]
    fn carboxylate_aliases_override_residue_type() {
        assert_eq!(label("OXT", "LEU"), "O_COOH");
        // OD1 of ASN is read as a terminal carboxylate before the amide rule.
        assert_eq!(label("OD1", "ASN"), "O_COOH");
    }

    #[test]
    fn amide_atoms_collapse_by_element() {
        assert_eq!(label("ND2", "ASN"), "N_AMIDE");
        assert_eq!(label("OE1", "GLN"), "O_AMIDE");
        assert_eq!(label("NE2", "GLN"), "N_AMIDE");
    }

    #[test]
    fn arginine_guanidinium_nitrogens_merge() {
        assert_eq!(label("NH1", "ARG"), "NH_ARG");
        assert_eq!(label("NH2", "ARG"), "NH_ARG");
        assert_eq!(label("NE", "ARG"), "NE_ARG");
    }

    #[test]
    fn other_atoms_use_name_and_residue_type() {
        assert_eq!(label("OG", "SER"), "OG_SER");
        assert_eq!(label("NZ", "LYS"), "NZ_LYS");
        assert_eq!(label("SG", "CYS"), "SG_CYS");
        assert_eq!(label("OH", "TYR"), "OH_TYR");
        assert_eq!(label("ND1", "HIS"), "ND1_HIS");
        assert_eq!(label("CB", "ALA"), "CB_ALA");
    }

    #[test]
    fn catalog_without_aliases_keeps_residue_type() {
        let catalog = FeatureCatalog::new(
            "plain",
            1,
            vec!["N".to_string()],
            vec![crate::core::chemistry::titratable::TitratableType::Lysine],
            1,
            vec![],
        )
        .unwrap();
        assert_eq!(classify("OD1", "ASN", &catalog), "O_AMIDE");
        assert_eq!(classify("OXT", "LEU", &catalog), "OXT_LEU");
    }
}
