use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A titratable site type.
///
/// Besides the ionizable side chains, the chain termini are modelled as pseudo
/// residues: `NTR` (the N-terminal amine) and `CTR` (the C-terminal carboxylate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TitratableType {
    AsparticAcid, // ASP
    CTerminus,    // CTR
    Cysteine,     // CYS
    GlutamicAcid, // GLU
    Histidine,    // HIS
    Lysine,       // LYS
    NTerminus,    // NTR
    Tyrosine,     // TYR
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a titratable residue type")]
pub struct ParseTitratableTypeError(pub String);

impl TitratableType {
    /// Every titratable type, in alphabetical order of the three-letter code.
    pub const ALL: [TitratableType; 8] = [
        TitratableType::AsparticAcid,
        TitratableType::CTerminus,
        TitratableType::Cysteine,
        TitratableType::GlutamicAcid,
        TitratableType::Histidine,
        TitratableType::Lysine,
        TitratableType::NTerminus,
        TitratableType::Tyrosine,
    ];

    pub fn to_three_letter(&self) -> &'static str {
        match self {
            TitratableType::AsparticAcid => "ASP",
            TitratableType::CTerminus => "CTR",
            TitratableType::Cysteine => "CYS",
            TitratableType::GlutamicAcid => "GLU",
            TitratableType::Histidine => "HIS",
            TitratableType::Lysine => "LYS",
            TitratableType::NTerminus => "NTR",
            TitratableType::Tyrosine => "TYR",
        }
    }

    /// Names of the functional atoms whose positions define the titratable site.
    pub fn reference_atom_names(&self) -> &'static [&'static str] {
        match self {
            TitratableType::AsparticAcid => &["OD1", "OD2"],
            TitratableType::CTerminus => &["OD1", "OXT"],
            TitratableType::Cysteine => &["SG"],
            TitratableType::GlutamicAcid => &["OE1", "OE2"],
            TitratableType::Histidine => &["ND1", "NE2"],
            TitratableType::Lysine => &["NZ"],
            TitratableType::NTerminus => &["N"],
            TitratableType::Tyrosine => &["OH"],
        }
    }

    /// Intrinsic pKa of the site in water, to which predicted shifts are added.
    pub fn reference_pka(&self) -> f64 {
        match self {
            TitratableType::AsparticAcid => 3.79,
            TitratableType::CTerminus => 2.90,
            TitratableType::Cysteine => 8.67,
            TitratableType::GlutamicAcid => 4.20,
            TitratableType::Histidine => 6.74,
            TitratableType::Lysine => 10.46,
            TitratableType::NTerminus => 7.99,
            TitratableType::Tyrosine => 9.59,
        }
    }
}

impl FromStr for TitratableType {
    type Err = ParseTitratableTypeError;

    /// Parses a three-letter residue code. Matching is exact (PDB residue names
    /// are upper case); surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ASP" => Ok(TitratableType::AsparticAcid),
            "CTR" => Ok(TitratableType::CTerminus),
            "CYS" => Ok(TitratableType::Cysteine),
            "GLU" => Ok(TitratableType::GlutamicAcid),
            "HIS" => Ok(TitratableType::Histidine),
            "LYS" => Ok(TitratableType::Lysine),
            "NTR" => Ok(TitratableType::NTerminus),
            "TYR" => Ok(TitratableType::Tyrosine),
            other => Err(ParseTitratableTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for TitratableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_three_letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_letter_codes_round_trip_through_from_str() {
        for site in TitratableType::ALL {
            assert_eq!(site.to_three_letter().parse::<TitratableType>(), Ok(site));
        }
    }

    #[test]
    fn from_str_rejects_non_titratable_names() {
        assert_eq!(
            "SER".parse::<TitratableType>(),
            Err(ParseTitratableTypeError("SER".to_string()))
        );
        assert!("asp".parse::<TitratableType>().is_err());
        assert!("".parse::<TitratableType>().is_err());
    }

    #[test]
    fn reference_constants_match_published_values() {
        assert_eq!(TitratableType::AsparticAcid.reference_pka(), 3.79);
        assert_eq!(TitratableType::CTerminus.reference_pka(), 2.90);
        assert_eq!(TitratableType::Cysteine.reference_pka(), 8.67);
        assert_eq!(TitratableType::GlutamicAcid.reference_pka(), 4.20);
        assert_eq!(TitratableType::Histidine.reference_pka(), 6.74);
        assert_eq!(TitratableType::Lysine.reference_pka(), 10.46);
        assert_eq!(TitratableType::NTerminus.reference_pka(), 7.99);
        assert_eq!(TitratableType::Tyrosine.reference_pka(), 9.59);
    }

    #[test]
    fn terminal_sites_use_terminal_atoms() {
        assert_eq!(TitratableType::NTerminus.reference_atom_names(), &["N"]);
        assert_eq!(TitratableType::CTerminus.reference_atom_names(), &["OD1", "OXT"]);
        assert_eq!(TitratableType::Histidine.to_string(), "HIS");
    }
}
