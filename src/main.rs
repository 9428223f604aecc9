//! Reports the glycosylation-site occupancy of every protein, condition, and replicate in a batch of glycoproteomics
//! search results

use std::{fs, path::PathBuf};

use clap::Parser;
use consolidation::{BatchSettings, FastaNames, NameTable, ProteinAnnotator, analyze_batch};
use glycochem::MonosaccharideDatabase;
use glycosite::{AnalysisSettings, MassCollisionPolicy};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// A .csv, .tsv, or .txt table with `filename`, `area_filename`, `condition_id`, and `replicate_id` columns
    #[arg(short, long)]
    batch: PathBuf,
    /// A directory for the Glycoforms, Occupancy, Occupancy_With_U, and Occupancy_Without_Proportion_U tables
    #[arg(short, long)]
    output_dir: PathBuf,
    /// Spectra scoring below this are ignored
    #[arg(long, default_value_t = 0.0)]
    minimum_score: f64,
    /// Report glycans on the residues the search engine placed them on, rather than per peptide
    #[arg(long)]
    trust_localization: bool,
    /// Only analyse the protein whose name contains this string
    #[arg(long)]
    protein: Option<String>,
    /// Report each isoform of a protein separately
    #[arg(long)]
    no_combine_isoforms: bool,
    /// Name proteins using a tab-separated UniProt export with `Entry` and `Protein names` columns
    #[arg(long, conflicts_with = "fasta")]
    protein_names: Option<PathBuf>,
    /// Name proteins using the headers of a FASTA file
    #[arg(long)]
    fasta: Option<PathBuf>,
    /// A KDL file of monosaccharide masses to use instead of the built-in one
    #[arg(long)]
    monosaccharides: Option<PathBuf>,
    /// How to resolve two glycans of one spectrum that share a mass: last-wins, first-wins, or reject
    #[arg(long, default_value_t = MassCollisionPolicy::LastWins)]
    mass_collision: MassCollisionPolicy,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let db = monosaccharide_database(args.monosaccharides.as_ref())?;
    let annotator = protein_annotator(&args)?;

    let settings = BatchSettings {
        analysis: AnalysisSettings {
            minimum_score: args.minimum_score,
            trust_localization: args.trust_localization,
            mass_collision: args.mass_collision,
        },
        protein: args.protein.clone(),
        combine_isoforms: !args.no_combine_isoforms,
    };
    let reports = analyze_batch(&args.batch, &settings, &db, annotator.as_deref())?;

    fs::create_dir_all(&args.output_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {:?}", args.output_dir))?;
    for (name, table) in reports.tables() {
        let path = args.output_dir.join(format!("{name}.csv"));
        fs::write(&path, table.to_csv()?)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {path:?}"))?;
        info!(table = name, rows = table.len(), path = %path.display(), "wrote report");
    }

    Ok(())
}

fn monosaccharide_database(path: Option<&PathBuf>) -> Result<MonosaccharideDatabase> {
    let Some(path) = path else {
        return Ok(MonosaccharideDatabase::default());
    };

    let kdl = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {path:?}"))?;
    MonosaccharideDatabase::from_kdl(path.to_string_lossy(), kdl)
}

fn protein_annotator(args: &Args) -> Result<Option<Box<dyn ProteinAnnotator>>> {
    Ok(match (&args.protein_names, &args.fasta) {
        (Some(table), _) => Some(Box::new(NameTable::load(table)?)),
        (None, Some(fasta)) => Some(Box::new(FastaNames::load(fasta)?)),
        (None, None) => None,
    })
}
