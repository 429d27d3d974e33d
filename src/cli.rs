use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "workbridge", version, about = "Workbridge talent marketplace CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "API base URL (overrides config.toml, defaults to the hosted API)"
    )]
    pub api: Option<String>,
    #[arg(long, global = true, help = "Acting user id")]
    pub user: Option<String>,
    #[arg(long, global = true, help = "Bearer token for authenticated calls")]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lead intake wizard: validate, preview, draft, and submit.
    Intake {
        #[command(subcommand)]
        command: IntakeCommands,
    },
    /// Talent profile onboarding wizard.
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Proposal builder over a problem description and budget.
    Builder {
        #[command(subcommand)]
        command: BuilderCommands,
    },
    /// Outsourcing ROI estimates.
    Roi {
        #[command(subcommand)]
        command: RoiCommands,
    },
    /// Job search and personalized matches.
    Jobs {
        #[command(subcommand)]
        command: JobsCommands,
    },
    /// Certification records on a talent profile.
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// Uploaded document metadata.
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Onboarding modal bookkeeping for the acting user.
    Onboarding {
        #[command(subcommand)]
        command: OnboardingCommands,
    },
    /// OAuth redirect initiation.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Admin chatbot training surface.
    Train {
        #[command(subcommand)]
        command: TrainCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum IntakeCommands {
    /// Validate one step (1-based) or the whole form.
    Validate {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        step: Option<usize>,
    },
    /// Derived proposal preview for the current answers.
    Preview {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Save {
        #[arg(long)]
        file: PathBuf,
    },
    Resume,
    /// Advance the saved draft's cursor if its current step validates.
    Next,
    /// Move the saved draft's cursor back one step; never validated.
    Back,
    Discard,
    Submit {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    Validate {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        step: Option<usize>,
    },
    /// Completion percentage over required fields.
    Progress {
        #[arg(long)]
        file: PathBuf,
    },
    Submit {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Save {
        #[arg(long)]
        file: PathBuf,
    },
    Resume,
}

#[derive(Subcommand, Debug)]
pub enum BuilderCommands {
    Propose {
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        budget: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoiCommands {
    Calc {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobsCommands {
    Search {
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = false)]
        remote: bool,
    },
    Matches {
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CertCommands {
    List {
        #[arg(long, help = "Talent id (defaults to the acting user)")]
        talent: Option<String>,
    },
    Add {
        name: String,
        #[arg(long)]
        issuer: String,
        #[arg(long)]
        year: Option<u32>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        year: Option<u32>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    Register {
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "resume")]
        kind: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum OnboardingCommands {
    Status,
    Skip,
    Complete,
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    Login {
        #[arg(long, value_enum)]
        provider: Provider,
    },
}

#[derive(Subcommand, Debug)]
pub enum TrainCommands {
    /// Stream a chat reply from the training endpoint.
    Chat { message: String },
    /// Thumbs up/down on a logged reply.
    Feedback {
        log_id: String,
        #[arg(long, value_enum)]
        verdict: Verdict,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Submit a corrected response for a logged reply.
    Correct {
        log_id: String,
        #[arg(long)]
        response: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Linkedin,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Linkedin => "linkedin",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Up,
    Down,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Up => "up",
            Verdict::Down => "down",
        }
    }
}
