use clap::{Args, Subcommand};

use crate::config::DEFAULT_DATABASE_URL;
use crate::query::ListLeadsParams;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Create the database and schema
    Init {
        /// SQLite database location
        #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },

    /// Delete every lead
    Reset {
        /// SQLite database location
        #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LeadCommands {
    /// List leads with filters, sorting, and pagination
    List {
        #[command(flatten)]
        filters: ListArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single lead
    Show {
        /// Lead id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show lead statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Leads per page
    #[arg(long)]
    pub limit: Option<u32>,

    /// Case-insensitive text matched against name and email
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by status (New, Contacted, Qualified, Lost, Converted)
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by stage (Lead, Prospect, Customer)
    #[arg(long)]
    pub stage: Option<String>,

    /// Filter by source (Website, Ads, Referral, Cold Call, Other)
    #[arg(long)]
    pub source: Option<String>,

    /// Sort field (createdAt, updatedAt, name, email, status, stage, source)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order (asc or desc)
    #[arg(long)]
    pub order: Option<String>,
}

impl From<ListArgs> for ListLeadsParams {
    fn from(args: ListArgs) -> Self {
        Self {
            page: args.page.map(|p| p.to_string()),
            limit: args.limit.map(|l| l.to_string()),
            search: args.search,
            status: args.status,
            stage: args.stage,
            source: args.source,
            sort: args.sort,
            order: args.order,
        }
    }
}
