// Standard Library Imports
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

// Local Crate Imports
use crate::{ConsolidationError, Result};

// Public API ==========================================================================================================

/// Maps each FASTA header (without its leading `>`) to its sequence, joining wrapped sequence lines
///
/// When `selected` is given, only records whose header, once prefixed with `prefix`, is in `selected` are kept. Lines
/// before the first header are ignored.
#[must_use]
pub fn parse_fasta(text: &str, selected: Option<&BTreeSet<String>>, prefix: &str) -> BTreeMap<String, String> {
    let mut records = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if let Some(header) = line.strip_prefix('>') {
            let wanted = selected.is_none_or(|s| s.contains(&format!("{prefix}{header}")));
            current = wanted.then(|| header.to_owned());
            if let Some(header) = &current {
                records.insert(header.clone(), String::new());
            }
        } else if let Some(sequence) = current.as_ref().and_then(|h| records.get_mut(h)) {
            sequence.push_str(line);
        }
    }

    records
}

/// Reads a FASTA file with [`parse_fasta()`]
pub fn load_fasta(
    path: impl AsRef<Path>,
    selected: Option<&BTreeSet<String>>,
    prefix: &str,
) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ConsolidationError::io(path, e))?;
    Ok(parse_fasta(&text, selected, prefix))
}

// Module Tests ========================================================================================================
