/// A single contig/sequence kept by the dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    /// Sequence name (column 1 of the FASTA index)
    pub name: String,

    /// Sequence length in base pairs (column 2 of the FASTA index)
    pub length: u64,

    /// Assembly label written into the `##contig` line
    pub assembly: String,
}

impl Contig {
    pub fn new(name: impl Into<String>, length: u64, assembly: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length,
            assembly: assembly.into(),
        }
    }

    /// Render the VCF `##contig` meta line for this contig
    #[must_use]
    pub fn to_header_line(&self) -> String {
        format!(
            "##contig=<ID={},length={},assembly={}>",
            self.name, self.length, self.assembly
        )
    }
}
