use std::collections::HashSet;
use std::path::Path;

fn main() {
    let index_path = Path::new("data/GRCh38.d1.vd1.contig_filtered.fai");
    validate_index_file(index_path);
    set_build_dependencies();
}

fn validate_index_file(index_path: &Path) {
    // Ensure the bundled index exists at build time
    assert!(
        index_path.exists(),
        "\n\nCONTIG INDEX BUILD ERROR: File not found\n\
         Path: {}\n\
         The default contig dictionary must be shipped with the crate.\n",
        index_path.display()
    );

    let contents = std::fs::read_to_string(index_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCONTIG INDEX BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            index_path.display()
        );
    });

    let total_contigs = validate_rows(&contents);

    assert!(
        total_contigs > 0,
        "\n\nCONTIG INDEX BUILD ERROR: No contigs found in {}\n",
        index_path.display()
    );

    println!("cargo:warning=Validated bundled contig index: {total_contigs} contigs");
}

fn validate_rows(contents: &str) -> usize {
    let mut seen = HashSet::new();

    for (i, line) in contents.lines().enumerate() {
        let line_num = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        assert!(
            fields.len() >= 2,
            "\n\nCONTIG INDEX BUILD ERROR: Line {line_num} has fewer than 2 tab-separated fields\n"
        );

        let name = fields[0];
        let length: u64 = fields[1].parse().unwrap_or_else(|_| {
            panic!(
                "\n\nCONTIG INDEX BUILD ERROR: Contig '{name}' (line {line_num}) has non-numeric length '{}'\n",
                fields[1]
            )
        });

        // Validate length is positive
        assert!(
            length > 0,
            "\n\nCONTIG INDEX BUILD ERROR: Contig '{name}' has zero length\n\
             Contigs must have length > 0.\n"
        );

        assert!(
            seen.insert(name.to_string()),
            "\n\nCONTIG INDEX BUILD ERROR: Contig '{name}' is listed more than once (line {line_num})\n"
        );
    }

    seen.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the bundled index changes
    println!("cargo:rerun-if-changed=data/GRCh38.d1.vd1.contig_filtered.fai");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
