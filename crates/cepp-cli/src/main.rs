// crates/cepp-cli/src/main.rs
// ============================================================================
// Module: CEPP CLI Entry Point
// Description: Command dispatcher for signing, verifying, and inspecting CEPP
//              certificates.
// Purpose: Provide a shell front end over the CEPP certification service.
// Dependencies: clap, cepp-config, cepp-core, rand, thiserror, time.
// ============================================================================

//! ## Overview
//! `cepp` signs new certificates with a CA keystore, verifies the CEPP headers
//! of incoming messages against a trust store, parses data headers, and
//! validates key files. Verification exits with success only for a `valid`
//! outcome. Security posture: message files and header values are untrusted;
//! reads are size-bounded and verification never panics.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cepp_config::load_ca_keystore;
use cepp_config::load_trust_store;
use cepp_core::CeppAuditSink;
use cepp_core::CeppHeaders;
use cepp_core::CeppTimestamp;
use cepp_core::CertificateRecord;
use cepp_core::CertificateRequest;
use cepp_core::CertificationService;
use cepp_core::FileAuditSink;
use cepp_core::IssuerId;
use cepp_core::NoopAuditSink;
use cepp_core::StderrAuditSink;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use rand::Rng;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Maximum size of a raw message file.
const MAX_MESSAGE_BYTES: usize = 10 * 1024 * 1024;
/// Exclusive upper bound for generated serial numbers.
const SERIAL_UPPER_BOUND: u64 = 10_000_000_000_000_000;
/// Days the default window starts before now.
const DEFAULT_BACKDATE_DAYS: i64 = 1;
/// Default window length in days.
const DEFAULT_WINDOW_DAYS: i64 = 8;
/// Default classification level.
const DEFAULT_LEVEL: &str = "2";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "cepp", version, about = "CEPP email certificate tool")]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign a new certificate and print its headers.
    Sign(SignCommand),
    /// Verify the CEPP headers of an incoming message.
    Verify(VerifyCommand),
    /// Parse a `CEPP-Data` value and print its fields.
    Parse(ParseCommand),
    /// Key file utilities.
    Keys {
        /// Selected keys subcommand.
        #[command(subcommand)]
        command: KeysCommand,
    },
}

/// Arguments for `cepp sign`.
#[derive(Args, Debug)]
struct SignCommand {
    /// Issuer id in the CA keystore.
    #[arg(long, value_name = "ID")]
    issuer: String,
    /// Subject domain.
    #[arg(long, value_name = "DOMAIN")]
    domain: String,
    /// Serial number (random when omitted).
    #[arg(long, value_name = "N")]
    serial: Option<String>,
    /// Not-before timestamp (`YYMMDDHHMMSSZ`).
    #[arg(long, value_name = "TS")]
    not_before: Option<String>,
    /// Not-after timestamp (`YYMMDDHHMMSSZ`).
    #[arg(long, value_name = "TS")]
    not_after: Option<String>,
    /// Classification level.
    #[arg(long, value_name = "LEVEL", default_value = DEFAULT_LEVEL)]
    level: String,
    /// CA keystore path.
    #[arg(long, value_name = "PATH")]
    keystore: Option<PathBuf>,
}

/// Arguments for `cepp verify`.
#[derive(Args, Debug)]
struct VerifyCommand {
    /// Raw message file to read headers from.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["data", "signature"])]
    message: Option<PathBuf>,
    /// `CEPP-Data` header value.
    #[arg(long, value_name = "VALUE", required_unless_present = "message", requires = "signature")]
    data: Option<String>,
    /// `CEPP-Signature` header value.
    #[arg(long, value_name = "VALUE", required_unless_present = "message", requires = "data")]
    signature: Option<String>,
    /// Sender address (defaults to the message `From` header).
    #[arg(long, value_name = "ADDRESS", required_unless_present = "message")]
    sender: Option<String>,
    /// Trust store path.
    #[arg(long, value_name = "PATH")]
    trust_store: Option<PathBuf>,
    /// Verification time (`YYMMDDHHMMSSZ`, defaults to now).
    #[arg(long, value_name = "TS")]
    now: Option<String>,
    /// Append JSON-line audit events to this file.
    #[arg(long, value_name = "PATH", conflicts_with = "audit_stderr")]
    audit_log: Option<PathBuf>,
    /// Write JSON-line audit events to stderr.
    #[arg(long)]
    audit_stderr: bool,
}

/// Arguments for `cepp parse`.
#[derive(Args, Debug)]
struct ParseCommand {
    /// `CEPP-Data` header value.
    #[arg(long, value_name = "VALUE")]
    data: String,
}

/// Keys subcommands.
#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Validate the trust store and, when given, a CA keystore.
    Validate(KeysValidateCommand),
}

/// Arguments for `cepp keys validate`.
#[derive(Args, Debug)]
struct KeysValidateCommand {
    /// Trust store path.
    #[arg(long, value_name = "PATH")]
    trust_store: Option<PathBuf>,
    /// CA keystore path.
    #[arg(long, value_name = "PATH")]
    keystore: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Sign(command) => command_sign(command),
        Commands::Verify(command) => command_verify(command),
        Commands::Parse(command) => command_parse(&command),
        Commands::Keys {
            command: KeysCommand::Validate(command),
        } => command_keys_validate(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Signs a certificate and prints the two header lines.
fn command_sign(command: SignCommand) -> CliResult<ExitCode> {
    let keystore = load_ca_keystore(command.keystore.as_deref())
        .map_err(|err| CliError::new(format!("failed to load keystore: {err}")))?;
    let (default_before, default_after) = default_window(OffsetDateTime::now_utc());
    let not_before = match command.not_before {
        Some(value) => parse_timestamp("--not-before", &value)?,
        None => default_before,
    };
    let not_after = match command.not_after {
        Some(value) => parse_timestamp("--not-after", &value)?,
        None => default_after,
    };
    let request = CertificateRequest {
        serial: command.serial.unwrap_or_else(|| random_serial(&mut rand::thread_rng())),
        not_before,
        not_after,
        domain: command.domain,
        level: command.level,
    };
    let signed = CertificationService::default()
        .sign_new_certificate(&request, &IssuerId::new(command.issuer), &keystore)
        .map_err(|err| CliError::new(format!("failed to sign certificate: {err}")))?;
    write_line(&format!("{}: {}", cepp_core::DATA_HEADER, signed.data_header))?;
    write_line(&format!("{}: {}", cepp_core::SIGNATURE_HEADER, signed.signature))?;
    Ok(ExitCode::SUCCESS)
}

/// Verifies headers and prints the result label.
fn command_verify(command: VerifyCommand) -> CliResult<ExitCode> {
    let trust_store = load_trust_store(command.trust_store.as_deref())
        .map_err(|err| CliError::new(format!("failed to load trust store: {err}")))?;
    let now = match command.now {
        Some(value) => parse_timestamp("--now", &value)?,
        None => CeppTimestamp::from_datetime(OffsetDateTime::now_utc()),
    };
    let (headers, sender) = match command.message {
        Some(path) => {
            let headers = read_message_headers(&path)?;
            let sender = match command.sender {
                Some(sender) => sender,
                None => headers
                    .from()
                    .map(ToString::to_string)
                    .ok_or_else(|| CliError::new("message has no From header".to_string()))?,
            };
            (headers, sender)
        }
        None => {
            let (Some(data), Some(signature), Some(sender)) =
                (command.data, command.signature, command.sender)
            else {
                return Err(CliError::new(
                    "--data, --signature, and --sender are required without --message".to_string(),
                ));
            };
            (CeppHeaders::new(Some(data), Some(signature)), sender)
        }
    };
    let audit: Arc<dyn CeppAuditSink> = match command.audit_log {
        Some(path) => Arc::new(FileAuditSink::new(&path).map_err(|err| {
            CliError::new(format!("failed to open audit log {}: {err}", path.display()))
        })?),
        None if command.audit_stderr => Arc::new(StderrAuditSink),
        None => Arc::new(NoopAuditSink),
    };
    let service = CertificationService::default().with_audit_sink(audit);
    match service.authenticate_incoming(&headers, &sender, &trust_store, &now) {
        Ok(verified) => {
            write_line("valid")?;
            if let Some(spam) = verified.spam_contact {
                write_line(&format!("spam-contact: {spam}"))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(result) => {
            write_line(result.as_str())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parses a data header and prints one field per line.
fn command_parse(command: &ParseCommand) -> CliResult<ExitCode> {
    let record = CertificateRecord::parse(&command.data)
        .map_err(|err| CliError::new(format!("malformed certificate data: {err}")))?;
    for (key, value) in record.fields() {
        write_line(&format!("{key}: {value}"))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Validates key files and prints a summary.
fn command_keys_validate(command: &KeysValidateCommand) -> CliResult<ExitCode> {
    let trust_store = load_trust_store(command.trust_store.as_deref())
        .map_err(|err| CliError::new(format!("failed to load trust store: {err}")))?;
    write_line(&format!("trust store valid: {} issuers", trust_store.len()))?;
    if let Some(path) = &command.keystore {
        let keystore = load_ca_keystore(Some(path))
            .map_err(|err| CliError::new(format!("failed to load keystore: {err}")))?;
        write_line(&format!("keystore valid: {} issuers", keystore.len()))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Computes the default validity window: one day back, eight days long.
fn default_window(now: OffsetDateTime) -> (CeppTimestamp, CeppTimestamp) {
    let not_before = now - Duration::days(DEFAULT_BACKDATE_DAYS);
    let not_after = not_before + Duration::days(DEFAULT_WINDOW_DAYS);
    (CeppTimestamp::from_datetime(not_before), CeppTimestamp::from_datetime(not_after))
}

/// Generates a random serial number below 10^16.
fn random_serial<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(0 .. SERIAL_UPPER_BOUND).to_string()
}

/// Parses a timestamp argument.
fn parse_timestamp(flag: &str, value: &str) -> CliResult<CeppTimestamp> {
    CeppTimestamp::parse(value).map_err(|err| CliError::new(format!("invalid {flag}: {err}")))
}

/// Reads CEPP headers from a raw message file.
fn read_message_headers(path: &Path) -> CliResult<CeppHeaders> {
    let bytes = read_bytes_with_limit(path, MAX_MESSAGE_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read message {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "message {} exceeds size limit ({size} > {limit})",
            path.display()
        )),
    })?;
    let raw = String::from_utf8_lossy(&bytes);
    Ok(CeppHeaders::from_message(&raw))
}

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout, mapping failures to [`CliError`].
fn write_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
