//! Prefix-based classification of VCF text lines.
//!
//! A VCF file is a block of `##` meta lines, one `#CHROM` column header, then
//! tab-delimited records whose first column is the contig name:
//!
//! ```text
//! ##fileformat=VCFv4.2
//! ##contig=<ID=chr1,length=248956422>
//! ##INFO=<ID=DP,Number=1,Type=Integer,Description="Depth">
//! #CHROM	POS	ID	REF	ALT	QUAL	FILTER	INFO
//! chr1	10177	.	A	AC	.	PASS	DP=12
//! ```
//!
//! Classification never fails. Prefixes are tested most specific first, so every
//! line maps to exactly one [`LineKind`]. Lines are classified as raw bytes: only
//! prefixes and the first tab are inspected, so text in other encodings passes
//! through untouched.

/// Meta line keys that may be copied to the output, depending on the header mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Filter,
    Format,
    Info,
    Alt,
    Vep,
}

impl MetaKey {
    const PREFIXES: [(&'static [u8], MetaKey); 5] = [
        (b"##FILTER", MetaKey::Filter),
        (b"##FORMAT", MetaKey::Format),
        (b"##INFO", MetaKey::Info),
        (b"##ALT", MetaKey::Alt),
        (b"##VEP", MetaKey::Vep),
    ];

    fn from_line(line: &[u8]) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, key)| *key)
    }
}

/// The category of a single VCF line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `##fileformat=...`, the anchor for the composed metadata block
    FileFormat,
    /// `##contig=...`, always regenerated from the dictionary
    Contig,
    /// `##reference=...`, always regenerated
    Reference,
    /// A known meta line (`##INFO`, `##FORMAT`, ...)
    Meta(MetaKey),
    /// Any other `##` line
    OtherMeta,
    /// The `#CHROM` column header
    ColumnHeader,
    /// A `#` line that is neither meta nor the column header
    OtherHeader,
    /// A data record; `contig` is the first tab-delimited field (possibly empty)
    Record { contig: &'a [u8] },
}

/// Classify a line with its line terminator already removed
#[must_use]
pub fn classify(line: &[u8]) -> LineKind<'_> {
    if line.starts_with(b"##") {
        if line.starts_with(b"##fileformat") {
            LineKind::FileFormat
        } else if line.starts_with(b"##contig") {
            LineKind::Contig
        } else if line.starts_with(b"##reference") {
            LineKind::Reference
        } else if let Some(key) = MetaKey::from_line(line) {
            LineKind::Meta(key)
        } else {
            LineKind::OtherMeta
        }
    } else if line.starts_with(b"#CHROM") {
        LineKind::ColumnHeader
    } else if line.starts_with(b"#") {
        LineKind::OtherHeader
    } else {
        LineKind::Record {
            contig: record_contig(line),
        }
    }
}

/// First tab-delimited field of a record line
#[must_use]
pub fn record_contig(line: &[u8]) -> &[u8] {
    line.iter()
        .position(|&b| b == b'\t')
        .map_or(line, |tab| &line[..tab])
}
