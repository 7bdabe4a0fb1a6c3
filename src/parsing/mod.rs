//! Parsers for the text formats the transformer consumes.
//!
//! - **FASTA index (.fai) files**: contig names and lengths, in file order
//! - **VCF lines**: total, prefix-based classification of header and record lines

pub mod fai;
pub mod vcf;
