use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::core::contig::Contig;
use crate::error::Error;
use crate::parsing::fai::{parse_fai_file, parse_fai_text};

/// Default assembly label for the bundled index
pub const DEFAULT_ASSEMBLY: &str = "GRCh38.d1.vd1";

/// Default reference FASTA name written to `##reference`
pub const DEFAULT_REFERENCE: &str = "GRCh38.d1.vd1.fa";

/// The set of contigs records are filtered against.
///
/// Keeps both the index order (for the `##contig` block) and a name set (for
/// O(1) membership tests on every record).
#[derive(Debug, Clone)]
pub struct ContigDictionary {
    contigs: Vec<Contig>,
    names: HashSet<String>,
    header_lines: Vec<String>,
}

impl ContigDictionary {
    /// Build a dictionary from contigs in output order
    ///
    /// # Errors
    ///
    /// Returns `Error::Format` if two contigs share a name.
    pub fn from_contigs(contigs: Vec<Contig>) -> Result<Self, Error> {
        let mut names = HashSet::with_capacity(contigs.len());
        for contig in &contigs {
            if !names.insert(contig.name.clone()) {
                return Err(Error::format(format!(
                    "Contig '{}' is listed more than once in the contig index",
                    contig.name
                )));
            }
        }

        let header_lines = contigs.iter().map(Contig::to_header_line).collect();

        Ok(Self {
            contigs,
            names,
            header_lines,
        })
    }

    /// Load from an index file, or the bundled default when `path` is `None`
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the file cannot be read and
    /// `Error::Format` for malformed or duplicate rows.
    pub fn load(path: Option<&Path>, assembly: &str) -> Result<Self, Error> {
        let dictionary = match path {
            Some(path) => Self::from_contigs(parse_fai_file(path, assembly)?)?,
            None => Self::load_embedded(assembly)?,
        };

        debug!(
            contigs = dictionary.len(),
            assembly, "Loaded contig dictionary"
        );
        Ok(dictionary)
    }

    /// Load the bundled GRCh38.d1.vd1 index
    ///
    /// # Errors
    ///
    /// Returns `Error::Format` only if the bundled data is corrupt, which the
    /// build script rules out.
    pub fn load_embedded(assembly: &str) -> Result<Self, Error> {
        // Validated at compile time by build.rs
        const EMBEDDED_INDEX: &str =
            include_str!("../../data/GRCh38.d1.vd1.contig_filtered.fai");
        Self::from_fai_text(EMBEDDED_INDEX, assembly)
    }

    /// Parse index text directly
    ///
    /// # Errors
    ///
    /// Returns `Error::Format` for malformed or duplicate rows.
    pub fn from_fai_text(text: &str, assembly: &str) -> Result<Self, Error> {
        Self::from_contigs(parse_fai_text(text, assembly)?)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// `##contig` lines, one per contig, in index order
    #[must_use]
    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    #[must_use]
    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    #[must_use]
    pub fn names(&self) -> &HashSet<String> {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines_preserve_index_order() {
        let dict =
            ContigDictionary::from_fai_text("chr2\t242193529\nchr1\t248956422\n", "GRCh38.d1.vd1")
                .unwrap();

        assert_eq!(
            dict.header_lines(),
            [
                "##contig=<ID=chr2,length=242193529,assembly=GRCh38.d1.vd1>",
                "##contig=<ID=chr1,length=248956422,assembly=GRCh38.d1.vd1>",
            ]
        );
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.names().len(), 2);
    }

    #[test]
    fn test_membership() {
        let dict = ContigDictionary::from_fai_text("chr1\t100\nchrM\t16569\n", "a").unwrap();
        assert!(dict.contains("chr1"));
        assert!(dict.contains("chrM"));
        assert!(!dict.contains("chr1_KI270706v1_random"));
        assert!(!dict.contains(""));
        assert!(!dict.contains("CHR1"));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = ContigDictionary::from_fai_text("chr1\t100\nchr2\t200\nchr1\t100\n", "a");
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.to_string().contains("chr1"));
    }

    #[test]
    fn test_load_embedded() {
        let dict = ContigDictionary::load_embedded(DEFAULT_ASSEMBLY).unwrap();
        assert_eq!(dict.len(), 25);
        assert!(dict.contains("chr1"));
        assert!(dict.contains("chrX"));
        assert!(dict.contains("chrM"));
        assert!(!dict.contains("chrEBV"));
        assert_eq!(
            dict.header_lines()[0],
            "##contig=<ID=chr1,length=248956422,assembly=GRCh38.d1.vd1>"
        );
        assert_eq!(dict.contigs()[24].name, "chrM");
    }

    #[test]
    fn test_load_uses_assembly_label() {
        let dict = ContigDictionary::load(None, "hg38").unwrap();
        assert!(dict.header_lines().iter().all(|l| l.ends_with("assembly=hg38>")));
    }

    #[test]
    fn test_load_missing_path() {
        let result = ContigDictionary::load(Some(Path::new("/does/not/exist.fai")), "a");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_large_scaffold_index() {
        let rows = 150_000;
        let fai: String = (0..rows)
            .map(|i| format!("scaffold_{i}\t1000\n"))
            .collect();

        let dict = ContigDictionary::from_fai_text(&fai, "draft").unwrap();
        assert_eq!(dict.header_lines().len(), rows);
        assert!(dict.contains("scaffold_149999"));
    }
}
