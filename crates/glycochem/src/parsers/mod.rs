mod peptide;

// Re-exports
pub use peptide::{mass_delta, modification, peptide_token, residue, residues};
