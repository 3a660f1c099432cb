//! Clap CLI definitions for the `formlab` command.
//!
//! This module defines the complete CLI structure using clap 4 derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

use formlab_core::enums::{AnalysisTopic, MatchMode};

/// formlab -- beverage formulation workbench.
///
/// Check, normalize, compare and cost formulation tables, and work through
/// process, labeling and market reference material.
#[derive(Parser, Debug)]
#[command(
    name = "formlab",
    about = "Beverage formulation workbench",
    long_about = "Check, normalize, compare and cost beverage formulation tables, and review process, labeling and market reference data.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project directory or its .formlab folder (default: auto-discover).
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Name recorded on saved formulations (default: config, git user.name, $USER).
    #[arg(long, global = true, env = "FORMLAB_AUTHOR")]
    pub author: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // ===== Setup =====
    /// Create a .formlab directory with default configuration.
    Init(InitArgs),

    // ===== Formulations =====
    /// Validate a formulation (ratio sum, negatives, targets).
    #[command(alias = "validate")]
    Check(CheckArgs),

    /// Show a formulation with gram amounts for a unit volume.
    Show(ShowArgs),

    /// Rescale ratios so they sum to 100% and write CSV.
    Normalize(NormalizeArgs),

    /// Compare a formulation against a standard or another file.
    #[command(alias = "diff")]
    Compare(CompareArgs),

    /// Cost a formulation per unit and per batch.
    Cost(CostArgs),

    /// Save a formulation to the project store.
    Save(SaveArgs),

    /// Browse saved formulations.
    Saved(SavedArgs),

    // ===== Reference data =====
    /// Ingredient price list and project overrides.
    Price(PriceArgs),

    /// Reference formulations to compare against.
    Standard(StandardArgs),

    /// Practice CSV files.
    Sample(SampleArgs),

    /// Manufacturing process steps and critical control points.
    Process(ProcessArgs),

    /// Labeling checklist.
    Label(LabelArgs),

    /// Beverage category sales trends.
    Sales(SalesArgs),

    /// Market product cards and drafted formulations.
    Card(CardArgs),

    // ===== Assistant =====
    /// Analyze the process with the assistant (falls back to a built-in review).
    Analyze(AnalyzeArgs),

    /// Search reference documents.
    Docs(DocsArgs),

    // ===== Utilities =====
    /// Print version information.
    Version,

    /// Generate shell completions.
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `formlab init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Check / Show / Normalize
// ---------------------------------------------------------------------------

/// Arguments for `formlab check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Formulation file (CSV, JSON or TOML) or saved name.
    pub file: String,

    /// Measured Brix, overriding the file's value.
    #[arg(long)]
    pub brix: Option<f64>,

    /// Measured pH, overriding the file's value.
    #[arg(long)]
    pub ph: Option<f64>,

    /// Target Brix to cross-check against.
    #[arg(long)]
    pub target_brix: Option<f64>,

    /// Target pH to cross-check against.
    #[arg(long)]
    pub target_ph: Option<f64>,

    /// Exit with an error when the formulation does not pass.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `formlab show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Formulation file or saved name.
    pub file: String,

    /// Unit volume in mL (default: config basis-volume-ml).
    #[arg(long)]
    pub volume: Option<f64>,
}

/// Arguments for `formlab normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Formulation file or saved name.
    pub file: String,

    /// Write the CSV here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use Korean column headers.
    #[arg(long)]
    pub korean: bool,
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

/// Arguments for `formlab compare`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("reference").required(true).args(["standard", "against"])))]
pub struct CompareArgs {
    /// My formulation (file or saved name).
    pub file: String,

    /// Bundled standard id or name (see `formlab standard list`).
    #[arg(long)]
    pub standard: Option<String>,

    /// Another formulation file to compare against.
    #[arg(long)]
    pub against: Option<String>,
}

// ---------------------------------------------------------------------------
// Cost
// ---------------------------------------------------------------------------

/// Arguments for `formlab cost`.
#[derive(Args, Debug)]
pub struct CostArgs {
    /// Formulation file or saved name.
    pub file: String,

    /// Unit volume in mL (default: config basis-volume-ml).
    #[arg(long)]
    pub volume: Option<f64>,

    /// Units per batch (default: config batch-size).
    #[arg(long)]
    pub batch: Option<u64>,

    /// How ingredient names are matched to prices (exact, contains).
    #[arg(long)]
    pub match_mode: Option<MatchMode>,

    /// Write the cost lines to a CSV file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

/// Arguments for `formlab price`.
#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(subcommand)]
    pub command: PriceCommands,
}

/// Price subcommands.
#[derive(Subcommand, Debug)]
pub enum PriceCommands {
    /// List ingredient prices (base list plus project overrides).
    List(PriceListArgs),
    /// Set a project price override.
    Set(PriceSetArgs),
    /// Remove a project price override.
    Remove(PriceRemoveArgs),
}

/// Arguments for `formlab price list`.
#[derive(Args, Debug)]
pub struct PriceListArgs {
    /// Only ingredients whose name contains this text.
    #[arg(long, short)]
    pub search: Option<String>,
}

/// Arguments for `formlab price set`.
#[derive(Args, Debug)]
pub struct PriceSetArgs {
    /// Ingredient name.
    pub name: String,

    /// Price in KRW per kg.
    pub price: f64,

    /// Supplier name.
    #[arg(long)]
    pub supplier: Option<String>,

    /// Minimum order quantity, e.g. `25kg`.
    #[arg(long)]
    pub moq: Option<String>,
}

/// Arguments for `formlab price remove`.
#[derive(Args, Debug)]
pub struct PriceRemoveArgs {
    /// Ingredient name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Standard / Sample
// ---------------------------------------------------------------------------

/// Arguments for `formlab standard`.
#[derive(Args, Debug)]
pub struct StandardArgs {
    #[command(subcommand)]
    pub command: StandardCommands,
}

/// Standard subcommands.
#[derive(Subcommand, Debug)]
pub enum StandardCommands {
    /// List bundled standards.
    List,
    /// Show one standard.
    Show(StandardShowArgs),
}

/// Arguments for `formlab standard show`.
#[derive(Args, Debug)]
pub struct StandardShowArgs {
    /// Standard id or name.
    pub name: String,

    /// Print as CSV instead of a table.
    #[arg(long)]
    pub csv: bool,
}

/// Arguments for `formlab sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    #[command(subcommand)]
    pub command: SampleCommands,
}

/// Sample subcommands.
#[derive(Subcommand, Debug)]
pub enum SampleCommands {
    /// List practice CSV files.
    List,
    /// Print a practice CSV file.
    Show(SampleShowArgs),
}

/// Arguments for `formlab sample show`.
#[derive(Args, Debug)]
pub struct SampleShowArgs {
    /// Sample id or name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Process / Label / Sales
// ---------------------------------------------------------------------------

/// Arguments for `formlab process`.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Only critical control points.
    #[arg(long)]
    pub ccp: bool,

    /// Text documents to count step mentions in.
    #[arg(long = "doc")]
    pub docs: Vec<PathBuf>,
}

/// Arguments for `formlab label`.
#[derive(Args, Debug)]
pub struct LabelArgs {
    #[command(subcommand)]
    pub command: LabelCommands,
}

/// Label subcommands.
#[derive(Subcommand, Debug)]
pub enum LabelCommands {
    /// Print a blank label sheet to fill in.
    Template,
    /// Check a label sheet against the labeling standard.
    Check(LabelCheckArgs),
}

/// Arguments for `formlab label check`.
#[derive(Args, Debug)]
pub struct LabelCheckArgs {
    /// Label sheet (YAML map of field to text).
    pub file: PathBuf,

    /// Reference regulation text to look each item up in.
    #[arg(long)]
    pub doc: Option<PathBuf>,

    /// Also ask the assistant for a written review.
    #[arg(long)]
    pub review: bool,

    /// Do not contact the assistant; use the built-in review.
    #[arg(long, requires = "review")]
    pub offline: bool,
}

/// Arguments for `formlab sales`.
#[derive(Args, Debug)]
pub struct SalesArgs {
    /// Only the top N categories by latest sales.
    #[arg(long)]
    pub top: Option<usize>,
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// Arguments for `formlab card`.
#[derive(Args, Debug)]
pub struct CardArgs {
    #[command(subcommand)]
    pub command: CardCommands,
}

/// Card subcommands.
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// List market product cards.
    List,
    /// Draft a formulation modeled on a product.
    Generate(CardGenerateArgs),
}

/// Arguments for `formlab card generate`.
#[derive(Args, Debug)]
pub struct CardGenerateArgs {
    /// Product card id or name.
    pub product: String,

    /// Print the drafted formulation as CSV.
    #[arg(long)]
    pub csv: bool,

    /// Do not contact the assistant; use the bundled formulation.
    #[arg(long)]
    pub offline: bool,
}

// ---------------------------------------------------------------------------
// Analyze / Docs
// ---------------------------------------------------------------------------

/// Arguments for `formlab analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Topic: overall, ccp, sterilization, raw-materials, hygiene, custom.
    #[arg(default_value = "overall")]
    pub topic: AnalysisTopic,

    /// Free-form question (required for `custom`).
    #[arg(long)]
    pub question: Option<String>,

    /// Formulation to include in the analysis.
    #[arg(long)]
    pub formula: Option<String>,

    /// Reference documents to include.
    #[arg(long = "doc")]
    pub docs: Vec<PathBuf>,

    /// Do not contact the assistant; use the built-in review.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for `formlab docs`.
#[derive(Args, Debug)]
pub struct DocsArgs {
    #[command(subcommand)]
    pub command: DocsCommands,
}

/// Docs subcommands.
#[derive(Subcommand, Debug)]
pub enum DocsCommands {
    /// Find lines containing a keyword.
    Search(DocsSearchArgs),
}

/// Arguments for `formlab docs search`.
#[derive(Args, Debug)]
pub struct DocsSearchArgs {
    /// Text document.
    pub file: PathBuf,

    /// Keyword (case-insensitive).
    pub keyword: String,

    /// Print the surrounding lines of each hit.
    #[arg(long, short = 'C')]
    pub context: bool,
}

// ---------------------------------------------------------------------------
// Save / Saved
// ---------------------------------------------------------------------------

/// Arguments for `formlab save`.
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Formulation file.
    pub file: String,

    /// Name to save under (default: the formulation's own name).
    #[arg(long)]
    pub name: Option<String>,

    /// Measured Brix.
    #[arg(long)]
    pub brix: Option<f64>,

    /// Measured pH.
    #[arg(long)]
    pub ph: Option<f64>,

    /// Package volume, e.g. `500ml`.
    #[arg(long)]
    pub volume: Option<String>,

    /// Shelf life, e.g. `12개월`.
    #[arg(long)]
    pub shelf_life: Option<String>,
}

/// Arguments for `formlab saved`.
#[derive(Args, Debug)]
pub struct SavedArgs {
    #[command(subcommand)]
    pub command: SavedCommands,
}

/// Saved subcommands.
#[derive(Subcommand, Debug)]
pub enum SavedCommands {
    /// List saved formulations, newest first.
    List,
    /// Show the latest save of a formulation.
    Show(SavedShowArgs),
}

/// Arguments for `formlab saved show`.
#[derive(Args, Debug)]
pub struct SavedShowArgs {
    /// Saved formulation name.
    pub name: String,

    /// Print as CSV instead of a table.
    #[arg(long)]
    pub csv: bool,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `formlab completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Target shell: bash, zsh, fish, powershell, elvish.
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_requires_a_reference() {
        assert!(Cli::try_parse_from(["formlab", "compare", "mine.csv"]).is_err());
        assert!(
            Cli::try_parse_from(["formlab", "compare", "a.csv", "--standard", "cola", "--against", "b.csv"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["formlab", "compare", "a.csv", "--standard", "cola"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Compare(_))));
    }

    #[test]
    fn enum_arguments_parse_from_strings() {
        let cli = Cli::try_parse_from(["formlab", "cost", "a.csv", "--match-mode", "contains"]).unwrap();
        match cli.command {
            Some(Commands::Cost(args)) => assert_eq!(args.match_mode, Some(MatchMode::Contains)),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["formlab", "analyze", "raw-materials"]).unwrap();
        match cli.command {
            Some(Commands::Analyze(args)) => assert_eq!(args.topic, AnalysisTopic::RawMaterials),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["formlab", "analyze", "weather"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["formlab", "sales", "--json", "-q"]).unwrap();
        assert!(cli.global.json);
        assert!(cli.global.quiet);
    }
}
