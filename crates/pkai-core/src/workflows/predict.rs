use crate::core::chemistry::titratable::TitratableType;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::ids::ResidueKey;
use crate::core::models::protein::Protein;
use crate::core::models::residue::Residue;
use crate::engine::catalog::FeatureCatalog;
use crate::engine::config::PredictionConfig;
use crate::engine::encoder::{EncodedInput, EncodingError, encode};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::selection::select_environment;
use crate::model::predictor::LoadedModel;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Predicted pKa of one titratable site.
#[derive(Debug, Clone, PartialEq)]
pub struct PkaPrediction {
    pub chain: char,
    pub residue_number: isize,
    pub residue_type: TitratableType,
    /// Absolute pKa, rounded to two decimals.
    pub pka: f64,
}

impl fmt::Display for PkaPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:>6} {:<4} {:>5.2}",
            self.chain,
            self.residue_number,
            self.residue_type.to_three_letter(),
            self.pka
        )
    }
}

/// The encoded input of one site, before it reaches a predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFeatures {
    pub site: ResidueKey,
    pub site_type: TitratableType,
    /// Number of environment atoms found within the cutoff, before truncation.
    pub environment_size: usize,
    pub input: EncodedInput,
}

#[derive(Debug)]
struct WorkUnit<'a> {
    residue: &'a Residue,
    site_type: TitratableType,
}

/// Selects and encodes the environment of a single titratable residue.
pub fn extract_site(
    protein: &Protein,
    residue: &Residue,
    site_type: TitratableType,
    catalog: &FeatureCatalog,
    config: &PredictionConfig,
) -> Result<SiteFeatures, EncodingError> {
    let environment = select_environment(protein, residue, config.cutoff_radius);
    let input = encode(&environment, site_type, catalog, config.unmapped_policy)?;
    Ok(SiteFeatures {
        site: residue.key,
        site_type,
        environment_size: environment.len(),
        input,
    })
}

/// Encodes every titratable site of `protein`, in canonical order.
pub fn extract_features(
    protein: &Protein,
    catalog: &FeatureCatalog,
    config: &PredictionConfig,
) -> Result<Vec<SiteFeatures>, EngineError> {
    check_size(protein, config)?;
    let work_list = build_work_list(protein);

    #[cfg(not(feature = "parallel"))]
    let iterator = work_list.iter();

    #[cfg(feature = "parallel")]
    let iterator = work_list.par_iter();

    let results: Vec<Result<SiteFeatures, EncodingError>> = iterator
        .map(|unit| extract_site(protein, unit.residue, unit.site_type, catalog, config))
        .collect();

    results
        .into_iter()
        .map(|r| r.map_err(EngineError::from))
        .collect()
}

/// Predicts the pKa of every titratable site of `protein`.
///
/// Sites are processed independently (in parallel with the `parallel`
/// feature) and returned ordered by chain, then residue number. The first
/// failing site in that order aborts the run.
#[instrument(skip_all, name = "predict_workflow")]
pub fn run(
    protein: &Protein,
    model: &LoadedModel,
    config: &PredictionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<PkaPrediction>, EngineError> {
    check_size(protein, config)?;
    let work_list = build_work_list(protein);

    info!(
        model = %model.info(),
        catalog = %model.catalog().id(),
        sites = work_list.len(),
        cutoff = config.cutoff_radius,
        "Predicting pKa values."
    );
    reporter.report(Progress::PhaseStart {
        name: "Predicting pKa values",
    });

    if work_list.is_empty() {
        warn!("Structure contains no titratable residues.");
        reporter.report(Progress::PhaseFinish);
        return Ok(Vec::new());
    }

    reporter.report(Progress::TaskStart {
        total_steps: work_list.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = work_list.iter();

    #[cfg(feature = "parallel")]
    let iterator = work_list.par_iter();

    let results: Vec<Result<PkaPrediction, EngineError>> = iterator
        .map(|unit| {
            let result = predict_site(protein, unit, model, config);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let predictions = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    info!(predictions = predictions.len(), "Prediction complete.");
    reporter.report(Progress::PhaseFinish);
    Ok(predictions)
}

/// Reads a PDB file and predicts the pKa of every titratable site in it.
pub fn predict_file(
    path: &Path,
    model: &LoadedModel,
    config: &PredictionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<PkaPrediction>, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Reading structure",
    });
    let protein = PdbFile::read_from_path(path)?;
    info!(
        path = %path.display(),
        residues = protein.residue_count(),
        titratable = protein.titratable_count(),
        atoms = protein.atom_count(),
        "Structure loaded."
    );
    reporter.report(Progress::PhaseFinish);

    run(&protein, model, config, reporter)
}

fn predict_site(
    protein: &Protein,
    unit: &WorkUnit,
    model: &LoadedModel,
    config: &PredictionConfig,
) -> Result<PkaPrediction, EngineError> {
    let features = extract_site(protein, unit.residue, unit.site_type, model.catalog(), config)?;
    let pka = model
        .predict_pka(&features.input, unit.site_type)
        .map_err(|source| EngineError::Prediction {
            site: features.site,
            source,
        })?;

    debug!(
        site = %features.site,
        residue_type = %unit.site_type,
        environment = features.environment_size,
        pka,
        "Site predicted."
    );

    Ok(PkaPrediction {
        chain: features.site.chain,
        residue_number: features.site.number,
        residue_type: unit.site_type,
        pka,
    })
}

fn check_size(protein: &Protein, config: &PredictionConfig) -> Result<(), EngineError> {
    if let Some(limit) = config.max_atoms {
        let atoms = protein.atom_count();
        if atoms > limit {
            return Err(EngineError::InputTooLarge { atoms, limit });
        }
    }
    Ok(())
}

fn build_work_list(protein: &Protein) -> Vec<WorkUnit<'_>> {
    protein
        .titratable_residues()
        .filter_map(|(_, residue)| {
            residue.titratable_type().map(|site_type| WorkUnit {
                residue,
                site_type,
            })
        })
        .collect()
}
