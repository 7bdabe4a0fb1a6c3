//! Core types and the stream transformer.
//!
//! - [`Contig`](contig::Contig): A name, length and assembly label loaded from the index
//! - [`ContigDictionary`](dictionary::ContigDictionary): Ordered contigs plus a name set
//! - [`RunMetadata`](metadata::RunMetadata): Identifiers injected into the header
//! - [`compose`](header::compose): The metadata block written after `##fileformat`
//! - [`VcfStreamTransformer`](transform::VcfStreamTransformer): The single-pass rewrite
//!
//! ## Header modes
//!
//! | Mode | Meta lines kept | Injected before `#CHROM` |
//! |------|-----------------|--------------------------|
//! | `AugmentAndFilter` | `FILTER`, `FORMAT`, `INFO` | `##contig` block |
//! | `ReheaderOnly` | `FILTER`, `FORMAT`, `INFO`, `ALT`, `VEP` | `##reference`, then `##contig` block |
//!
//! Input `##contig` and `##reference` lines are always dropped, and records are
//! filtered the same way in both modes.

pub mod contig;
pub mod dictionary;
pub mod header;
pub mod metadata;
pub mod transform;
