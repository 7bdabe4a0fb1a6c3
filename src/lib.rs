//! # vcf-reheader
//!
//! A library for rewriting VCF metadata headers and filtering records to an
//! approved set of contigs.
//!
//! Variant callers emit VCFs whose headers describe whatever reference the caller
//! was run against, often with decoy, HLA and viral contigs the downstream archive
//! does not accept. `vcf-reheader` streams a VCF once, front to back, and:
//!
//! - replaces every `##contig` and `##reference` line with ones generated from a
//!   FASTA index (`.fai`), in index order
//! - injects run metadata (file date, center, caller or workflow provenance,
//!   individual and sample identifiers) right after `##fileformat`
//! - keeps only an allow-list of other meta lines
//! - drops every record whose contig is not in the index
//!
//! Memory use does not grow with the input: only the current line and the two
//! generated header blocks are held.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use vcf_reheader::{ContigDictionary, HeaderMode, RunMetadata, Sample, VcfSource, VcfStreamTransformer};
//!
//! let dictionary = ContigDictionary::from_fai_text("chr1\t248956422\n", "GRCh38.d1.vd1").unwrap();
//! let metadata = RunMetadata {
//!     patient_barcode: "TCGA-AB-1234".to_string(),
//!     case_id: "case".to_string(),
//!     normal: Sample::new("normal", "normal-aliquot", "normal-bam"),
//!     tumor: Sample::new("tumor", "tumor-aliquot", "tumor-bam"),
//!     reference: "GRCh38.d1.vd1.fa".to_string(),
//!     source: Some(VcfSource::MuTect2),
//!     workflows: Vec::new(),
//! };
//! let date = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap();
//!
//! let mut transformer =
//!     VcfStreamTransformer::new(HeaderMode::AugmentAndFilter, &metadata, dictionary, date).unwrap();
//!
//! let input = "##fileformat=VCFv4.2\n#CHROM\tPOS\nchr1\t100\nchrUn\t5\n";
//! let mut output = Vec::new();
//! let counts = transformer.run(input.as_bytes(), &mut output).unwrap();
//!
//! assert_eq!((counts.total, counts.kept), (2, 1));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contig dictionary, metadata, header composition and the stream transformer
//! - [`parsing`]: Parsers for FASTA index files and VCF line classification
//! - [`stream`]: Gzip-aware input and atomically committed output
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod error;
pub mod parsing;
pub mod stream;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::contig::Contig;
pub use crate::core::dictionary::ContigDictionary;
pub use crate::core::metadata::{HeaderMode, RunMetadata, Sample, VcfSource, Workflow};
pub use crate::core::transform::{Counts, VcfStreamTransformer};
pub use error::Error;
