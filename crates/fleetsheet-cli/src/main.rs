//! fleetsheet CLI - read and update the fleet dashboard's sheets

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fleetsheet::prelude::*;
use fleetsheet::{ColumnRecord, RowRecord};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetsheet")]
#[command(
    author,
    version,
    about = "Read and update the sheets behind the fleet location dashboard"
)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Fail on the first transient error instead of backing off and retrying
    #[arg(long, global = true)]
    no_retry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Directory holding one CSV file per sheet
    #[arg(long, global = true, env = "FLEETSHEET_CSV_DIR", conflicts_with = "spreadsheet_id")]
    csv_dir: Option<PathBuf>,

    /// Google spreadsheet id
    #[arg(long, global = true, env = "FLEETSHEET_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// OAuth access token for the Sheets API
    #[arg(long, global = true, env = "FLEETSHEET_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// API key for read-only access to a public spreadsheet
    #[arg(long, global = true, env = "FLEETSHEET_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Sheets API base URL
    #[arg(long, global = true, env = "FLEETSHEET_API_BASE")]
    api_base: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a sheet's records, one row per line
    Records {
        sheet: String,
        #[arg(default_value = "A")]
        start_col: String,
        #[arg(default_value = "N")]
        end_col: String,
        /// Columns whose last non-empty row bounds the read (default: all)
        #[arg(short, long = "key", value_delimiter = ',')]
        keys: Vec<String>,
    },

    /// Print the header and row 2 of a single-row sheet
    Row {
        sheet: String,
        start_col: String,
        end_col: String,
    },

    /// Print the first row below the last filled cell of a marker column
    PendingRow {
        sheet: String,
        start_col: String,
        end_col: String,
        marker_col: String,
    },

    /// Print one cell, by A1 address
    Get { sheet: String, address: String },

    /// Write one cell
    Set {
        sheet: String,
        address: String,
        value: String,
    },

    /// Append a row below the last filled cell of the start column
    Append {
        sheet: String,
        values: Vec<String>,
        #[arg(short, long, default_value = "A")]
        start_col: String,
    },

    /// Overwrite the row whose key column holds `key`
    LookupUpdate {
        sheet: String,
        key: String,
        values: Vec<String>,
        #[arg(short, long, default_value = "A")]
        key_col: String,
        /// First column written (default: the key column)
        #[arg(short, long)]
        start_col: Option<String>,
        /// Fail when the key appears in more than one row
        #[arg(long)]
        strict: bool,
    },

    /// Clear columns from a start cell down to the sheet's last row
    Clear {
        sheet: String,
        start_cell: String,
        end_col: String,
    },

    /// Delete one row (1-based, header included)
    DeleteRow { sheet: String, row: u32 },

    /// List tracked devices with their latest position
    Devices {
        #[arg(long, default_value = "오토바이DB")]
        sheet: String,
    },

    /// Make one login attempt against the credential sheet
    Login { username: String, password: String },

    /// List the sheets in the store
    Sheets,
}

/// The concrete store picked on the command line
enum Store {
    Csv(CsvBackend),
    Google(GoogleSheetsBackend),
}

impl Store {
    fn open(args: StoreArgs) -> Result<Self> {
        if let Some(dir) = args.csv_dir {
            let backend = CsvBackend::open(&dir)
                .with_context(|| format!("Failed to open '{}'", dir.display()))?;
            return Ok(Store::Csv(backend));
        }

        let Some(id) = args.spreadsheet_id else {
            bail!("No store selected: pass --csv-dir or --spreadsheet-id");
        };
        let mut config = GoogleSheetsConfig::new(id);
        config.access_token = args.access_token;
        config.api_key = args.api_key;
        if let Some(base) = args.api_base {
            config.base_url = base;
        }
        let backend = GoogleSheetsBackend::new(config).context("Failed to set up the Sheets API client")?;
        Ok(Store::Google(backend))
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(match self {
            Store::Csv(b) => b.sheet_names()?,
            Store::Google(b) => b.sheet_titles()?,
        })
    }

    fn into_client(self) -> SheetClient<Box<dyn TabularBackend>> {
        let backend: Box<dyn TabularBackend> = match self {
            Store::Csv(b) => Box::new(b),
            Store::Google(b) => Box::new(b),
        };
        SheetClient::new(backend)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = Store::open(cli.store)?;

    if let Commands::Sheets = cli.command {
        for name in store.sheet_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let mut client = store.into_client();
    if cli.no_retry {
        client = client.with_retry(RetryPolicy::none());
    }
    if let Commands::LookupUpdate { strict: true, .. } = cli.command {
        client = client.with_duplicate_key_policy(DuplicateKeyPolicy::Reject);
    }
    run(&mut client, cli.command)
}

fn run(client: &mut SheetClient<Box<dyn TabularBackend>>, command: Commands) -> Result<()> {
    match command {
        Commands::Records {
            sheet,
            start_col,
            end_col,
            keys,
        } => {
            let record = client
                .fetch_records(&sheet, &start_col, &end_col, &keys)
                .with_context(|| format!("Failed to read '{sheet}'"))?;
            print_columns(&record)
        }
        Commands::Row {
            sheet,
            start_col,
            end_col,
        } => {
            let record = client
                .fetch_single_row(&sheet, &start_col, &end_col)
                .with_context(|| format!("Failed to read '{sheet}'"))?;
            print_row(&record)
        }
        Commands::PendingRow {
            sheet,
            start_col,
            end_col,
            marker_col,
        } => {
            let record = client
                .fetch_next_pending_row(&sheet, &start_col, &end_col, &marker_col)
                .with_context(|| format!("No pending row in '{sheet}'"))?;
            print_row(&record)
        }
        Commands::Get { sheet, address } => {
            let value = client
                .get_cell_by_address(&sheet, &address)
                .with_context(|| format!("Failed to read {sheet}!{address}"))?;
            println!("{value}");
            Ok(())
        }
        Commands::Set {
            sheet,
            address,
            value,
        } => {
            client
                .set_cell(&sheet, &address, value)
                .with_context(|| format!("Failed to write {sheet}!{address}"))?;
            log::info!("wrote {sheet}!{address}");
            Ok(())
        }
        Commands::Append {
            sheet,
            values,
            start_col,
        } => {
            let row = client
                .append_row(&sheet, values, &start_col)
                .with_context(|| format!("Failed to append to '{sheet}'"))?;
            println!("{row}");
            Ok(())
        }
        Commands::LookupUpdate {
            sheet,
            key,
            values,
            key_col,
            start_col,
            ..
        } => {
            let start_col = start_col.unwrap_or_else(|| key_col.clone());
            let row = client
                .key_lookup_update(&sheet, &key, &key_col, &start_col, [values])
                .with_context(|| format!("Failed to update {key:?} in '{sheet}'"))?;
            println!("{row}");
            Ok(())
        }
        Commands::Clear {
            sheet,
            start_cell,
            end_col,
        } => {
            client
                .clear_to_bottom(&sheet, &start_cell, &end_col)
                .with_context(|| format!("Failed to clear '{sheet}'"))?;
            Ok(())
        }
        Commands::DeleteRow { sheet, row } => {
            let deleted = client
                .delete_row(&sheet, row)
                .with_context(|| format!("Failed to delete row {row} of '{sheet}'"))?;
            if !deleted {
                log::warn!("'{sheet}' has no row {row}");
            }
            Ok(())
        }
        Commands::Devices { sheet } => {
            let config = TelemetryConfig {
                sheet,
                ..TelemetryConfig::default()
            };
            let devices = client
                .fetch_devices(&config)
                .context("Failed to load devices")?;
            show_devices(&devices)
        }
        Commands::Login { username, password } => {
            let mut auth = Authenticator::load(client, AuthConfig::default())
                .context("Failed to load the login account")?;
            let mut session = SessionContext::new(None);
            let outcome = auth
                .attempt(client, &mut session, &username, &password)
                .context("Failed to record the login attempt")?;
            match outcome {
                LoginOutcome::Success => println!("logged in as {username}"),
                LoginOutcome::Failed { remaining } => {
                    println!("login failed ({remaining} attempts left)")
                }
                LoginOutcome::Locked => println!("account locked"),
            }
            Ok(())
        }
        Commands::Sheets => bail!("sheet listing needs the store, not a client"),
    }
}

fn print_columns(record: &ColumnRecord) -> Result<()> {
    let mut out = io::stdout().lock();
    let headers: Vec<&str> = record.keys().map(String::as_str).collect();
    writeln!(out, "{}", headers.join("\t"))?;

    let height = record.values().map(Vec::len).max().unwrap_or(0);
    for i in 0..height {
        let row: Vec<&str> = record
            .values()
            .map(|col| col.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(())
}

fn print_row(record: &RowRecord) -> Result<()> {
    let mut out = io::stdout().lock();
    for (header, value) in record {
        writeln!(out, "{}\t{value}", header.replace('\n', " "))?;
    }
    Ok(())
}

fn show_devices(devices: &[DeviceRecord]) -> Result<()> {
    let mut out = io::stdout().lock();
    for device in devices {
        let marker = device.marker();
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            device.device_id, device.car_number, device.time, device.status, marker.link
        )?;
    }
    eprintln!("{} devices", devices.len());
    Ok(())
}
