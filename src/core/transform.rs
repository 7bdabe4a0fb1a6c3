//! The single-pass header rewrite and contig filter.
//!
//! The transformer is a forward-only state machine:
//!
//! ```text
//! AwaitingFileFormat -> InHeader -> AtChromTransition -> InRecords -> Done
//! ```
//!
//! Each input line is classified once and produces an [`Action`]. Two blocks are
//! computed up front and injected at most once each: the composed metadata block
//! right after `##fileformat`, and the contig block right before `#CHROM`. Memory
//! use is bounded by those two blocks plus the current line.
//!
//! Lines are handled as bytes and written back unchanged, so records carrying
//! non-UTF-8 text are filtered like any other.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::dictionary::ContigDictionary;
use crate::core::header::{compose, reference_line};
use crate::core::metadata::{HeaderMode, RunMetadata};
use crate::error::Error;
use crate::parsing::vcf::{classify, LineKind};

/// Position of the transformer in the VCF layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// No `##fileformat` line seen yet
    AwaitingFileFormat,
    /// Metadata block injected, reading meta lines
    InHeader,
    /// `#CHROM` emitted, no record seen yet
    AtChromTransition,
    /// Reading data records
    InRecords,
    /// Input exhausted
    Done,
}

/// Record counters, final once the input is drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Data records read
    pub total: u64,
    /// Data records written
    pub kept: u64,
}

/// What to do with the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'t> {
    /// Suppress the line
    Drop,
    /// Write the line unchanged
    Emit,
    /// Write the line, then the block
    EmitThenInsert(&'t [String]),
    /// Write the block, then the line
    InsertThenEmit(&'t [String]),
}

/// Streaming VCF header rewriter and contig filter
#[derive(Debug)]
pub struct VcfStreamTransformer {
    mode: HeaderMode,
    dictionary: ContigDictionary,
    /// Injected after `##fileformat`
    metadata_block: Vec<String>,
    /// Injected before `#CHROM`
    contig_block: Vec<String>,
    state: State,
    counts: Counts,
}

impl VcfStreamTransformer {
    /// Prepare a transformer, composing both header blocks up front
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `metadata` lacks a field required by
    /// `mode`. Nothing has been read or written at that point.
    pub fn new(
        mode: HeaderMode,
        metadata: &RunMetadata,
        dictionary: ContigDictionary,
        date: NaiveDate,
    ) -> Result<Self, Error> {
        let metadata_block = compose(metadata, mode, date)?;

        let mut contig_block = Vec::with_capacity(dictionary.len() + 1);
        if mode == HeaderMode::ReheaderOnly {
            contig_block.push(reference_line(&metadata.reference));
        }
        contig_block.extend(dictionary.header_lines().iter().cloned());

        debug!(
            ?mode,
            metadata_lines = metadata_block.len(),
            contig_lines = contig_block.len(),
            "Prepared VCF transformer"
        );

        Ok(Self {
            mode,
            dictionary,
            metadata_block,
            contig_block,
            state: State::AwaitingFileFormat,
            counts: Counts::default(),
        })
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// Decide the fate of one line (without its line terminator)
    pub fn step(&mut self, line: &[u8]) -> Action<'_> {
        let kind = classify(line);

        if self.state == State::Done {
            warn!("Ignoring input received after the transform finished");
            return Action::Drop;
        }

        match kind {
            LineKind::Record { contig } => {
                self.state = State::InRecords;
                self.counts.total += 1;
                // Index names are UTF-8, so other bytes can never match
                let known = std::str::from_utf8(contig)
                    .is_ok_and(|name| self.dictionary.contains(name));
                if known {
                    self.counts.kept += 1;
                    Action::Emit
                } else {
                    Action::Drop
                }
            }
            // Header lines after #CHROM (or after the first record) are never valid
            _ if self.state >= State::AtChromTransition => {
                warn!(
                    line = %String::from_utf8_lossy(line),
                    "Dropping header line found after the column header"
                );
                Action::Drop
            }
            LineKind::FileFormat => {
                if self.state == State::AwaitingFileFormat {
                    self.state = State::InHeader;
                    Action::EmitThenInsert(&self.metadata_block)
                } else {
                    warn!(
                        line = %String::from_utf8_lossy(line),
                        "Dropping repeated ##fileformat line"
                    );
                    Action::Drop
                }
            }
            LineKind::ColumnHeader => {
                self.state = State::AtChromTransition;
                Action::InsertThenEmit(&self.contig_block)
            }
            LineKind::Meta(key) if self.mode.keeps(key) => Action::Emit,
            LineKind::Meta(_)
            | LineKind::Contig
            | LineKind::Reference
            | LineKind::OtherMeta
            | LineKind::OtherHeader => Action::Drop,
        }
    }

    /// Mark the input as exhausted and return the final counters
    pub fn finish(&mut self) -> Counts {
        self.state = State::Done;
        self.counts
    }

    /// Transform a whole stream, one line at a time
    ///
    /// Lines may end in `\n` or `\r\n`; every written line ends in `\n`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` on any read or write failure. Output written before the
    /// failure is left to the caller to discard.
    pub fn run<R, W>(&mut self, mut reader: R, writer: &mut W) -> Result<Counts, Error>
    where
        R: BufRead,
        W: Write,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let line = trim_line_terminator(&buf);
            match self.step(line) {
                Action::Drop => {}
                Action::Emit => write_line(writer, line)?,
                Action::EmitThenInsert(block) => {
                    write_line(writer, line)?;
                    write_block(writer, block)?;
                }
                Action::InsertThenEmit(block) => {
                    write_block(writer, block)?;
                    write_line(writer, line)?;
                }
            }
        }

        writer.flush()?;
        Ok(self.finish())
    }

    /// Adapt the transformer to a lazy iterator of lines
    ///
    /// Counters are available through [`TransformedLines::counts`] once the
    /// iterator is drained.
    pub fn transform_lines<I>(self, lines: I) -> TransformedLines<I>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        TransformedLines {
            transformer: self,
            lines,
            pending: VecDeque::new(),
        }
    }
}

fn trim_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn write_line<W: Write>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    writer.write_all(line)?;
    writer.write_all(b"\n")
}

fn write_block<W: Write>(writer: &mut W, block: &[String]) -> io::Result<()> {
    block
        .iter()
        .try_for_each(|line| write_line(writer, line.as_bytes()))
}

/// Lazy output of a [`VcfStreamTransformer`]
#[derive(Debug)]
pub struct TransformedLines<I> {
    transformer: VcfStreamTransformer,
    lines: I,
    pending: VecDeque<String>,
}

impl<I> TransformedLines<I> {
    #[must_use]
    pub fn counts(&self) -> Counts {
        self.transformer.counts()
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.transformer.state()
    }
}

impl<I> Iterator for TransformedLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }

            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.transformer.finish();
                    return None;
                }
            };

            match self.transformer.step(line.as_bytes()) {
                Action::Drop => {}
                Action::Emit => return Some(Ok(line)),
                Action::EmitThenInsert(block) => {
                    self.pending.extend(block.iter().cloned());
                    return Some(Ok(line));
                }
                Action::InsertThenEmit(block) => {
                    self.pending.extend(block.iter().cloned());
                    self.pending.push_back(line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::tests::sample_metadata;

    const FAI: &str = "chr1\t248956422\t112\t70\t71\nchr2\t242193529\t253404903\t70\t71\n";

    fn transformer(mode: HeaderMode) -> VcfStreamTransformer {
        let dictionary = ContigDictionary::from_fai_text(FAI, "GRCh38.d1.vd1").unwrap();
        let date = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap();
        VcfStreamTransformer::new(mode, &sample_metadata(), dictionary, date).unwrap()
    }

    fn run_text(mode: HeaderMode, input: &str) -> (Vec<String>, Counts) {
        let mut t = transformer(mode);
        let mut out = Vec::new();
        let counts = t.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        (text.lines().map(str::to_string).collect(), counts)
    }

    #[test]
    fn test_state_transitions() {
        let mut t = transformer(HeaderMode::AugmentAndFilter);
        assert_eq!(t.state(), State::AwaitingFileFormat);

        assert!(matches!(
            t.step(b"##fileformat=VCFv4.2"),
            Action::EmitThenInsert(_)
        ));
        assert_eq!(t.state(), State::InHeader);

        assert_eq!(t.step(b"##INFO=<ID=DP>"), Action::Emit);
        assert_eq!(t.state(), State::InHeader);

        assert!(matches!(t.step(b"#CHROM\tPOS"), Action::InsertThenEmit(_)));
        assert_eq!(t.state(), State::AtChromTransition);

        assert_eq!(t.step(b"chr1\t100"), Action::Emit);
        assert_eq!(t.state(), State::InRecords);

        t.finish();
        assert_eq!(t.state(), State::Done);
        assert_eq!(t.step(b"chr1\t200"), Action::Drop);
        assert_eq!(t.counts(), Counts { total: 1, kept: 1 });
    }

    #[test]
    fn test_augment_meta_policy() {
        let mut t = transformer(HeaderMode::AugmentAndFilter);
        assert_eq!(t.step(b"##FILTER=<ID=PASS>"), Action::Emit);
        assert_eq!(t.step(b"##FORMAT=<ID=GT>"), Action::Emit);
        assert_eq!(t.step(b"##INFO=<ID=DP>"), Action::Emit);
        assert_eq!(t.step(b"##ALT=<ID=DEL>"), Action::Drop);
        assert_eq!(t.step(b"##VEP=v84"), Action::Drop);
        assert_eq!(t.step(b"##contig=<ID=chr1>"), Action::Drop);
        assert_eq!(t.step(b"##reference=file:///old.fa"), Action::Drop);
        assert_eq!(t.step(b"##source=strelka"), Action::Drop);
        assert_eq!(t.step(b"#random comment"), Action::Drop);
    }

    #[test]
    fn test_reheader_meta_policy() {
        let mut t = transformer(HeaderMode::ReheaderOnly);
        assert_eq!(t.step(b"##FILTER=<ID=PASS>"), Action::Emit);
        assert_eq!(t.step(b"##ALT=<ID=DEL>"), Action::Emit);
        assert_eq!(t.step(b"##VEP=v84"), Action::Emit);
        assert_eq!(t.step(b"##contig=<ID=chr1>"), Action::Drop);
        assert_eq!(t.step(b"##reference=file:///old.fa"), Action::Drop);
        assert_eq!(t.step(b"##GATKCommandLine=<ID=MuTect2>"), Action::Drop);
    }

    #[test]
    fn test_augment_scenario() {
        let input = "##fileformat=VCFv4.2\n\
                     ##contig=<ID=chr1,length=1>\n\
                     #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
                     chr1\t100\t.\tA\tT\t.\tPASS\t.\n\
                     chrUn_random\t5\t.\tG\tC\t.\tPASS\t.\n\
                     chr2\t200\t.\tC\tG\t.\tPASS\t.\n";

        let (lines, counts) = run_text(HeaderMode::AugmentAndFilter, input);

        assert_eq!(counts, Counts { total: 3, kept: 2 });
        assert_eq!(lines[0], "##fileformat=VCFv4.2");
        assert_eq!(lines[1], "##fileDate=20160307");
        assert_eq!(
            &lines[8..],
            [
                "##contig=<ID=chr1,length=248956422,assembly=GRCh38.d1.vd1>",
                "##contig=<ID=chr2,length=242193529,assembly=GRCh38.d1.vd1>",
                "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO",
                "chr1\t100\t.\tA\tT\t.\tPASS\t.",
                "chr2\t200\t.\tC\tG\t.\tPASS\t.",
            ]
        );
    }

    #[test]
    fn test_reheader_injects_reference_before_contigs() {
        let input = "##fileformat=VCFv4.2\n\
                     ##reference=file:///old.fa\n\
                     ##VEP=v84\n\
                     #CHROM\tPOS\n\
                     chr2\t1\n";

        let (lines, counts) = run_text(HeaderMode::ReheaderOnly, input);
        let chrom = lines.iter().position(|l| l.starts_with("#CHROM")).unwrap();

        assert_eq!(lines[chrom - 3], "##reference=GRCh38.d1.vd1.fa");
        assert!(lines[chrom - 2].starts_with("##contig=<ID=chr1,"));
        assert!(lines[chrom - 1].starts_with("##contig=<ID=chr2,"));
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("##reference")).count(),
            1
        );
        assert!(lines.contains(&"##VEP=v84".to_string()));
        assert_eq!(counts, Counts { total: 1, kept: 1 });
    }

    #[test]
    fn test_empty_input() {
        let (lines, counts) = run_text(HeaderMode::AugmentAndFilter, "");
        assert!(lines.is_empty());
        assert_eq!(counts, Counts::default());
    }

    #[test]
    fn test_missing_fileformat_is_not_fixed_up() {
        let (lines, _) = run_text(HeaderMode::AugmentAndFilter, "#CHROM\tPOS\nchr1\t1\n");
        assert!(!lines.iter().any(|l| l.starts_with("##fileDate")));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_records_without_column_header() {
        let (lines, counts) = run_text(HeaderMode::ReheaderOnly, "chr1\t1\nchr9\t1\n");
        assert_eq!(lines, ["chr1\t1"]);
        assert_eq!(counts, Counts { total: 2, kept: 1 });
    }

    #[test]
    fn test_repeated_structural_lines_are_dropped() {
        let input = "##fileformat=VCFv4.2\n##fileformat=VCFv4.1\n#CHROM\n#CHROM\nchr1\t1\n##INFO=<ID=X>\n";
        let (lines, _) = run_text(HeaderMode::AugmentAndFilter, input);

        assert_eq!(
            lines.iter().filter(|l| l.starts_with("##fileformat")).count(),
            1
        );
        assert_eq!(lines.iter().filter(|l| l.starts_with("#CHROM")).count(), 1);
        assert!(!lines.contains(&"##INFO=<ID=X>".to_string()));
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let input = "#CHROM\n\n\tchr1\nchr1\n";
        let (lines, counts) = run_text(HeaderMode::AugmentAndFilter, input);
        assert_eq!(counts, Counts { total: 3, kept: 1 });
        assert_eq!(lines.last().map(String::as_str), Some("chr1"));
    }

    #[test]
    fn test_crlf_input() {
        let (lines, counts) = run_text(HeaderMode::AugmentAndFilter, "#CHROM\r\nchr1\t1\r\n");
        assert_eq!(lines.last().map(String::as_str), Some("chr1\t1"));
        assert_eq!(counts.kept, 1);
    }

    #[test]
    fn test_transform_lines_matches_run() {
        let input = "##fileformat=VCFv4.2\n##INFO=<ID=DP>\n#CHROM\tPOS\nchr1\t1\nchr3\t1\nchr2\t1\n";
        let (expected, expected_counts) = run_text(HeaderMode::ReheaderOnly, input);

        let mut lazy = transformer(HeaderMode::ReheaderOnly)
            .transform_lines(input.lines().map(|l| Ok(l.to_string())));
        let lines = lazy.by_ref().collect::<io::Result<Vec<_>>>().unwrap();

        assert_eq!(lines, expected);
        assert_eq!(lazy.counts(), expected_counts);
        assert_eq!(lazy.state(), State::Done);
    }

    #[test]
    fn test_transform_lines_propagates_errors() {
        let input = vec![
            Ok("##fileformat=VCFv4.2".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad gzip")),
        ];
        let result: io::Result<Vec<String>> = transformer(HeaderMode::AugmentAndFilter)
            .transform_lines(input.into_iter())
            .collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_new_fails_on_missing_metadata() {
        let mut metadata = sample_metadata();
        metadata.normal.barcode.clear();
        let dictionary = ContigDictionary::from_fai_text(FAI, "a").unwrap();
        let date = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap();

        let result =
            VcfStreamTransformer::new(HeaderMode::AugmentAndFilter, &metadata, dictionary, date);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    fn run_bytes(mode: HeaderMode, input: &[u8]) -> (Vec<u8>, Counts) {
        let mut t = transformer(mode);
        let mut out = Vec::new();
        let counts = t.run(input, &mut out).unwrap();
        (out, counts)
    }

    #[test]
    fn test_non_utf8_records_pass_through() {
        let input = b"#CHROM\tPOS\n\
                      chr1\t1\t.\tA\tT\t.\tPASS\tNOTE=caf\xe9\n\
                      chrUn\t1\t.\tA\tT\t.\tPASS\tNOTE=na\xefve\n\
                      chr2\t2\t.\tC\tG\t.\tPASS\t.\n";

        let (out, counts) = run_bytes(HeaderMode::AugmentAndFilter, input);

        assert_eq!(counts, Counts { total: 3, kept: 2 });
        assert!(out.ends_with(
            b"chr1\t1\t.\tA\tT\t.\tPASS\tNOTE=caf\xe9\nchr2\t2\t.\tC\tG\t.\tPASS\t.\n"
        ));
    }

    #[test]
    fn test_non_utf8_contig_is_dropped() {
        let (out, counts) = run_bytes(HeaderMode::ReheaderOnly, b"chr\xb91\t1\nchr1\t1\n");
        assert_eq!(out, b"chr1\t1\n");
        assert_eq!(counts, Counts { total: 2, kept: 1 });
    }

    #[test]
    fn test_non_utf8_meta_line_is_kept() {
        let input = b"##fileformat=VCFv4.2\n##INFO=<ID=N,Description=\"Nom \xe9\">\n#CHROM\n";
        let (out, _) = run_bytes(HeaderMode::AugmentAndFilter, input);
        assert!(out
            .windows(6)
            .any(|w| w == b"Nom \xe9\"".as_slice()));
    }
}
