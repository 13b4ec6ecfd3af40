use clap::{Parser, Subcommand};
use gridtree::cli::{self, OutputFormat};
use gridtree::config::{TranscodeConfig, DEFAULT_DOCUMENT_TYPE};
use gridtree::error::TranscodeResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridtree")]
#[command(about = "Spreadsheet grids with dotted path headers ⇄ nested JSON documents.")]
#[command(long_about = "gridtree - bidirectional spreadsheet ⇄ JSON transcoder

Header cells are dotted paths into a nested document. A '[]' marker after a
segment makes it a repeating group: each further row continues that array.

  identifier | addr.city | items[].sku
  A          | X         | x
             |           | y

  ⇄  {\"identifier\": \"A\", \"addr\": {\"city\": \"X\"}, \"items\": [{\"sku\": \"x\"}, {\"sku\": \"y\"}]}

COMMANDS:
  decode   - Excel workbook to request document (JSON or YAML)
  encode   - Document of sheets to Excel workbook
  headers  - Show the header row derived for each sheet of a document

EXAMPLES:
  gridtree decode upload.xlsx -o request.json
  gridtree decode upload.xlsx --format yaml --all-sheets
  gridtree encode sheets.json download.xlsx
  gridtree headers sheets.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Decode an Excel workbook into a request document.

The first sheet holds request metadata: one header row and one value row,
copied into 'request'. Every later sheet is decoded into an array of records.
Fields named '<sheet>_identifier' join a record into the matching record of
<sheet>. The second sheet becomes the 'data' array.

Malformed headers and conflicting cells are skipped and reported; the rest of
the sheet still decodes.")]
    /// Decode an Excel workbook into a JSON or YAML document
    Decode {
        /// Input Excel file (.xlsx)
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Also include every data sheet under its own name
        #[arg(long)]
        all_sheets: bool,

        /// Value of the top-level document_type field
        #[arg(long, default_value = DEFAULT_DOCUMENT_TYPE, env = "GRIDTREE_DOCUMENT_TYPE")]
        document_type: String,

        /// List every skipped cell and unresolved reference
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Encode a document of sheets into an Excel workbook.

The document maps sheet names to entries:

  order:
    data: [ ...records... ]          # required
    headers: [id, items[].sku]       # optional, derived when absent
    header_rename_map: {id: ID}      # optional, applied to the header row
    cell_style_map: {\"items[]\": LIGHT_GREEN, default_cell_style: WHITE}

Array elements after the first continue on the following rows.")]
    /// Encode a JSON or YAML document into an Excel workbook
    Encode {
        /// Input document (.json, .yaml or .yml)
        input: PathBuf,

        /// Output Excel file (.xlsx)
        output: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the header row derived for each sheet of a document
    Headers {
        /// Input document (.json, .yaml or .yml)
        input: PathBuf,
    },
}

fn main() -> TranscodeResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridtree=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            input,
            output,
            format,
            all_sheets,
            document_type,
            verbose,
        } => cli::decode(
            input,
            output,
            format,
            all_sheets,
            TranscodeConfig::default().with_document_type(document_type),
            verbose,
        ),

        Commands::Encode {
            input,
            output,
            verbose,
        } => cli::encode(input, output, TranscodeConfig::default(), verbose),

        Commands::Headers { input } => cli::headers(input, TranscodeConfig::default()),
    }
}
