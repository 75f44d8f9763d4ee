//! Hemoctl - blood bank inventory CLI
//!
//! Thin dispatch layer over the shared library: parse arguments, open the
//! store, hand off to the matching command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use hemobank_common::{display, BankConfig, BloodBankDb};
use hemoctl::commands;

#[derive(Parser)]
#[command(name = "hemoctl")]
#[command(about = "Blood bank inventory and donor registry", long_about = None)]
#[command(version)]
struct Cli {
    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stock, donor and order overview
    Dashboard,

    /// Donor registry
    Donor {
        #[command(subcommand)]
        action: DonorCmd,
    },

    /// Employee roster
    Employee {
        #[command(subcommand)]
        action: EmployeeCmd,
    },

    /// Hospitals served by the bank
    Hospital {
        #[command(subcommand)]
        action: HospitalCmd,
    },

    /// Storage lots and manual corrections
    Inventory {
        #[command(subcommand)]
        action: InventoryCmd,
    },

    /// Hospital orders
    Order {
        #[command(subcommand)]
        action: OrderCmd,
    },

    /// Supply deliveries
    Supply {
        #[command(subcommand)]
        action: SupplyCmd,
    },

    /// Ask the database a question in plain words
    Search {
        /// e.g. "available blood" or "donors with A+"
        question: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DonorCmd {
    /// List registered donors
    List,
    /// Register a new donor
    Add {
        /// Donor id, e.g. DON100
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Blood group, e.g. A+ or ab-
        #[arg(long)]
        group: String,
        /// 10-digit contact number
        #[arg(long)]
        contact: String,
    },
}

#[derive(Subcommand)]
enum EmployeeCmd {
    /// List employees
    List,
    /// Add a new employee
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        salary: i64,
        /// Manager, Lab Technician, Nurse, Receptionist or Other
        #[arg(long)]
        designation: String,
        /// Joining date, YYYY-MM-DD
        #[arg(long)]
        joined: String,
        /// 10-digit contact number
        #[arg(long)]
        contact: String,
        #[arg(long)]
        bank_id: i64,
        #[arg(long)]
        address: String,
    },
}

#[derive(Subcommand)]
enum HospitalCmd {
    /// List hospitals
    List,
    /// Add a new hospital
    Add {
        /// Hospital id, e.g. HOSP100
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
    },
}

#[derive(Subcommand)]
enum InventoryCmd {
    /// List storage lots
    List,
    /// Per-group availability totals
    Summary,
    /// Manually add or remove stock on a lot
    Adjust {
        /// Storage id, e.g. STO100
        #[arg(long)]
        storage_id: String,
        #[arg(long)]
        group: String,
        /// add or remove
        #[arg(long)]
        action: String,
        #[arg(long)]
        quantity: i64,
    },
}

#[derive(Subcommand)]
enum OrderCmd {
    /// List all orders
    List,
    /// List pending orders
    Pending,
    /// Place a new order
    Place {
        /// Order id, e.g. ORD100
        #[arg(long)]
        id: String,
        /// Hospital id the order is for
        #[arg(long)]
        hospital: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        quantity: i64,
    },
    /// Cancel a pending order and return its stock
    Cancel {
        #[arg(long)]
        id: String,
    },
    /// Mark a pending order fulfilled
    Fulfill {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum SupplyCmd {
    /// List supply deliveries
    List,
    /// Record a delivery and credit stock
    Record {
        /// Supply id, e.g. SUP100
        #[arg(long)]
        id: String,
        /// Hospital id the delivery came from
        #[arg(long)]
        hospital: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        quantity: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = BankConfig::load()?;
    display::init(config.output.color);

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    let db = BloodBankDb::open_at(&db_path)?;

    match cli.command {
        Commands::Dashboard => commands::dashboard::show(&db),
        Commands::Donor { action } => match action {
            DonorCmd::List => commands::donors::list(&db),
            DonorCmd::Add {
                id,
                name,
                group,
                contact,
            } => commands::donors::add(&db, &id, &name, &group, &contact),
        },
        Commands::Employee { action } => match action {
            EmployeeCmd::List => commands::employees::list(&db),
            EmployeeCmd::Add {
                name,
                email,
                salary,
                designation,
                joined,
                contact,
                bank_id,
                address,
            } => commands::employees::add(
                &db,
                &name,
                &email,
                salary,
                &designation,
                &joined,
                &contact,
                bank_id,
                &address,
            ),
        },
        Commands::Hospital { action } => match action {
            HospitalCmd::List => commands::hospitals::list(&db),
            HospitalCmd::Add { id, name, location } => {
                commands::hospitals::add(&db, &id, &name, &location)
            }
        },
        Commands::Inventory { action } => match action {
            InventoryCmd::List => commands::inventory::list(&db),
            InventoryCmd::Summary => commands::inventory::summary(&db),
            InventoryCmd::Adjust {
                storage_id,
                group,
                action,
                quantity,
            } => commands::inventory::adjust(&db, &storage_id, &group, &action, quantity),
        },
        Commands::Order { action } => match action {
            OrderCmd::List => commands::orders::list(&db),
            OrderCmd::Pending => commands::orders::pending(&db),
            OrderCmd::Place {
                id,
                hospital,
                group,
                quantity,
            } => commands::orders::place(&db, &id, &hospital, &group, quantity),
            OrderCmd::Cancel { id } => commands::orders::cancel(&db, &id),
            OrderCmd::Fulfill { id } => commands::orders::fulfill(&db, &id),
        },
        Commands::Supply { action } => match action {
            SupplyCmd::List => commands::supply::list(&db),
            SupplyCmd::Record {
                id,
                hospital,
                group,
                quantity,
            } => commands::supply::record(&db, &id, &hospital, &group, quantity),
        },
        Commands::Search { question } => commands::search::run(&db, &question.join(" ")),
    }
}
