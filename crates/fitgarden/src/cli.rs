//! Clap derive structures for the `fitgarden` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use fitgarden_core::{DeliveryKind, FeeChannel, PaymentMethod, Zone};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fitgarden -- back-office CLI for the FitGarden delivery kitchen
#[derive(Debug, Parser)]
#[command(
    name = "fitgarden",
    version,
    about = "Manage FitGarden bookings, customers, and the menu from the command line",
    long_about = "Back-office tooling for the FitGarden prepared-meal delivery service.\n\n\
        Lists and composes scheduled deliveries (agendamentos), derives the\n\
        kitchen production and route tallies, and prints WhatsApp\n\
        confirmation links for the day's orders.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "FITGARDEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "FITGARDEN_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Access token
    #[arg(long, env = "FITGARDEN_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FITGARDEN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FITGARDEN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FITGARDEN_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Flag-level domain enums ──────────────────────────────────────────

/// Payment selection as a CLI flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaymentArg {
    Dinheiro,
    Cartao,
    Pix,
    Voucher,
    Plano,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Dinheiro => Self::Dinheiro,
            PaymentArg::Cartao => Self::Cartao,
            PaymentArg::Pix => Self::Pix,
            PaymentArg::Voucher => Self::Voucher,
            PaymentArg::Plano => Self::Plano,
        }
    }
}

/// Voucher fee channel as a CLI flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FeeChannelArg {
    Dinheiro,
    Cartao,
    Pix,
}

impl From<FeeChannelArg> for FeeChannel {
    fn from(arg: FeeChannelArg) -> Self {
        match arg {
            FeeChannelArg::Dinheiro => Self::Dinheiro,
            FeeChannelArg::Cartao => Self::Cartao,
            FeeChannelArg::Pix => Self::Pix,
        }
    }
}

/// Delivery zone as a CLI flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ZoneArg {
    Centro,
    Norte,
    Sul,
    Leste,
    Oeste,
    Outra,
}

impl From<ZoneArg> for Zone {
    fn from(arg: ZoneArg) -> Self {
        match arg {
            ZoneArg::Centro => Self::Centro,
            ZoneArg::Norte => Self::Norte,
            ZoneArg::Sul => Self::Sul,
            ZoneArg::Leste => Self::Leste,
            ZoneArg::Oeste => Self::Oeste,
            ZoneArg::Outra => Self::Outra,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the day's scheduled deliveries
    #[command(alias = "ag", alias = "a")]
    Agenda(AgendaArgs),

    /// Browse customer reference data
    #[command(alias = "cust")]
    Customers(CustomersArgs),

    /// Browse the menu catalog with size/price tiers
    Menu(MenuArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AGENDA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AgendaArgs {
    #[command(subcommand)]
    pub command: AgendaCommand,
}

#[derive(Debug, Subcommand)]
pub enum AgendaCommand {
    /// List bookings for a date (defaults to today)
    #[command(alias = "ls")]
    List {
        /// Delivery date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,
    },

    /// Show one booking with its line items
    Get {
        /// Booking id
        id: i64,
    },

    /// Compose and submit a new booking
    Create(CreateArgs),

    /// Edit an existing booking
    Edit(EditArgs),

    /// Delete a booking
    #[command(alias = "rm")]
    Delete {
        /// Booking id
        id: i64,
    },

    /// Mark a pending booking's payment as resolved
    Finalize {
        /// Booking id
        id: i64,

        /// Payment method actually used
        #[arg(long, value_enum)]
        payment: PaymentArg,

        /// Fee channel when payment is voucher
        #[arg(long, value_enum, default_value = "cartao")]
        fee_channel: FeeChannelArg,
    },

    /// Kitchen production tally for a date (item + size totals)
    Production {
        /// Delivery date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,
    },

    /// Delivery-route tally for a date (per zone, deliveries only)
    Route {
        /// Delivery date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,
    },

    /// Print the WhatsApp confirmation link for a booking
    Whatsapp {
        /// Booking id
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Customer id
    #[arg(long, short = 'c')]
    pub customer: i64,

    /// Delivery date (YYYY-MM-DD, defaults to today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Time window ("13:00-15:00" or "13-15")
    #[arg(long, short = 'w')]
    pub window: Option<String>,

    /// Pickup at the kitchen instead of delivery
    #[arg(long)]
    pub pickup: bool,

    /// Delivery address (required for deliveries unless the customer has one)
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// Delivery zone
    #[arg(long, value_enum)]
    pub zone: Option<ZoneArg>,

    /// Free-text notes for the kitchen/driver
    #[arg(long, short = 'n')]
    pub notes: Option<String>,

    /// Payment method
    #[arg(long, value_enum, default_value = "dinheiro")]
    pub payment: PaymentArg,

    /// Fee channel when payment is voucher
    #[arg(long, value_enum, default_value = "cartao")]
    pub fee_channel: FeeChannelArg,

    /// Voucher code (required when payment is voucher)
    #[arg(long)]
    pub voucher: Option<String>,

    /// Line item as "optionId:sizeId:quantity" (repeatable)
    #[arg(long = "item", short = 'i', value_name = "OPT:SIZE:QTY")]
    pub items: Vec<String>,

    /// Print the WhatsApp confirmation link after creating
    #[arg(long)]
    pub whatsapp: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Booking id
    pub id: i64,

    /// New delivery date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// New time window ("13:00-15:00" or "13-15")
    #[arg(long, short = 'w')]
    pub window: Option<String>,

    /// Switch to pickup
    #[arg(long, conflicts_with = "delivery")]
    pub pickup: bool,

    /// Switch to delivery
    #[arg(long)]
    pub delivery: bool,

    /// New delivery address
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// New delivery zone
    #[arg(long, value_enum)]
    pub zone: Option<ZoneArg>,

    /// New notes
    #[arg(long, short = 'n')]
    pub notes: Option<String>,

    /// New payment method (voucher/plano are refused by the backend)
    #[arg(long, value_enum)]
    pub payment: Option<PaymentArg>,

    /// Replace the line items with "optionId:sizeId:quantity" (repeatable)
    #[arg(long = "item", short = 'i', value_name = "OPT:SIZE:QTY")]
    pub items: Vec<String>,
}

impl EditArgs {
    /// The delivery kind override, if either flag was passed.
    pub fn kind(&self) -> Option<DeliveryKind> {
        if self.pickup {
            Some(DeliveryKind::Retirada)
        } else if self.delivery {
            Some(DeliveryKind::Entrega)
        } else {
            None
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REFERENCE DATA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List {
        /// Filter by name substring (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct MenuArgs {
    #[command(subcommand)]
    pub command: MenuCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenuCommand {
    /// List menu options and their size/price tiers
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update a profile
    Init,

    /// Show the resolved configuration
    Show,

    /// Store an access token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
