use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use protocol::{ByteOrder, Dump, DumpCmd, StreamOptions, SynthCmd, Synthesize};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(
    name = "d4wire",
    version,
    about = "Dump and synthesize DAP4 chunked serialization streams"
)]
struct Cli {
    /// Log each chunk's CRC32 at debug level while processing.
    #[arg(long, global = true)]
    trace_checksums: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a serialized stream against a JSON command script.
    Dump {
        /// JSON file holding the ordered list of decode commands.
        script: PathBuf,
        /// Serialized stream to decode.
        input: PathBuf,
        /// Byte order the stream was encoded with.
        #[arg(long, default_value_t = ByteOrder::Little)]
        byte_order: ByteOrder,
        /// The stream carries no per-chunk checksum trailers.
        #[arg(long)]
        no_checksums: bool,
    },
    /// Encode the typed values of a JSON command script into a stream file.
    Synth {
        /// JSON file holding the ordered list of encode commands.
        script: PathBuf,
        /// Path the serialized stream is written to.
        output: PathBuf,
        /// Byte order to encode with.
        #[arg(long, default_value_t = ByteOrder::Little)]
        byte_order: ByteOrder,
        /// Do not append per-chunk checksum trailers.
        #[arg(long)]
        no_checksums: bool,
    },
}

/// Failures surfaced to the user as a single diagnostic line.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: invalid script: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Wire(#[from] protocol::WireError),
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_script<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CliError> {
    let raw = read_bytes(path)?;
    serde_json::from_slice(&raw).map_err(|source| CliError::Script {
        path: path.to_path_buf(),
        source,
    })
}

fn stream_options(byte_order: ByteOrder, no_checksums: bool, trace: bool) -> StreamOptions {
    let mut options = StreamOptions::new(byte_order);
    if no_checksums {
        options = options.without_checksums();
    }
    if trace {
        options = options.with_checksum_tracing();
    }
    options
}

fn init_tracing(trace_checksums: bool) {
    let default = if trace_checksums { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli, stdout: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Dump {
            script,
            input,
            byte_order,
            no_checksums,
        } => {
            let commands: Vec<DumpCmd> = read_script(&script)?;
            let data = read_bytes(&input)?;

            let mut dump = Dump::new(
                &data,
                stream_options(byte_order, no_checksums, cli.trace_checksums),
            );
            dump.run(&commands)?;

            stdout
                .write_all(dump.text().as_bytes())
                .map_err(|source| CliError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
        Command::Synth {
            script,
            output,
            byte_order,
            no_checksums,
        } => {
            let commands: Vec<SynthCmd> = read_script(&script)?;

            let mut synth = Synthesize::new(stream_options(
                byte_order,
                no_checksums,
                cli.trace_checksums,
            ));
            synth.run(&commands)?;

            fs::write(&output, synth.into_bytes()).map_err(|source| CliError::Io {
                path: output,
                source,
            })
        }
    }
}

fn run_to_code<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = write!(stderr, "{err}");
            return 2;
        }
    };

    init_tracing(cli.trace_checksums);

    match run(cli, stdout) {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(stderr, "d4wire: {err}");
            1
        }
    }
}

/// Parses `args` and executes the selected subcommand, writing results to
/// `stdout` and diagnostics to `stderr`.
///
/// Returns the process exit code: 0 on success, 1 for codec or I/O failures,
/// 2 for usage errors.
pub fn run_with<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    ExitCode::from(run_to_code(args, stdout, stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("test file must be writable");
        path
    }

    fn run_cli(args: &[&str]) -> (u8, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_to_code(
            std::iter::once("d4wire").chain(args.iter().copied()),
            &mut stdout,
            &mut stderr,
        );
        (
            code,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn synth_then_dump_round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let synth_script = write_file(
            &dir,
            "synth.json",
            br#"[
                {"op":"start_chunk"},
                {"op":"value","type":"signed","width":4,"value":42},
                {"op":"value","type":"text","value":"say \"hi\""},
                {"op":"checksum"}
            ]"#,
        );
        let dump_script = write_file(
            &dir,
            "dump.json",
            br#"[
                {"op":"start_chunk"},
                {"op":"field","tag":"S","width":4},
                {"op":"field","tag":"T","width":0},
                {"op":"checksum"}
            ]"#,
        );
        let stream = dir.path().join("stream.bin");

        let (code, _, stderr) = run_cli(&[
            "synth",
            synth_script.to_str().unwrap(),
            stream.to_str().unwrap(),
            "--byte-order",
            "big",
        ]);
        assert_eq!(code, 0, "synth failed: {stderr}");

        let (code, stdout, stderr) = run_cli(&[
            "dump",
            dump_script.to_str().unwrap(),
            stream.to_str().unwrap(),
            "--byte-order",
            "big",
        ]);
        assert_eq!(code, 0, "dump failed: {stderr}");
        assert_eq!(stdout, "42\n\"say \\\"hi\\\"\"\n\n");
    }

    #[test]
    fn corrupted_stream_yields_failure_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let synth_script = write_file(
            &dir,
            "synth.json",
            br#"[
                {"op":"start_chunk"},
                {"op":"value","type":"unsigned","width":8,"value":18446744073709551615},
                {"op":"checksum"}
            ]"#,
        );
        let dump_script = write_file(
            &dir,
            "dump.json",
            br#"[
                {"op":"start_chunk"},
                {"op":"field","tag":"U","width":8},
                {"op":"checksum"}
            ]"#,
        );
        let stream = dir.path().join("stream.bin");

        let (code, _, _) = run_cli(&[
            "synth",
            synth_script.to_str().unwrap(),
            stream.to_str().unwrap(),
        ]);
        assert_eq!(code, 0);

        let mut bytes = fs::read(&stream).unwrap();
        bytes[3] ^= 0x01;
        fs::write(&stream, &bytes).unwrap();

        let (code, stdout, stderr) = run_cli(&[
            "dump",
            dump_script.to_str().unwrap(),
            stream.to_str().unwrap(),
        ]);
        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(stderr.contains("checksum mismatch"), "stderr: {stderr}");
    }

    #[test]
    fn invalid_script_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_file(&dir, "bad.json", b"[{\"op\":\"field\",\"tag\":\"F\",\"width\":1}]");
        let stream = write_file(&dir, "stream.bin", &[]);

        let (code, _, stderr) = run_cli(&[
            "dump",
            script.to_str().unwrap(),
            stream.to_str().unwrap(),
        ]);
        assert_eq!(code, 1);
        assert!(stderr.contains("invalid script"), "stderr: {stderr}");
        assert!(stderr.contains("bad.json"), "stderr: {stderr}");
    }

    #[test]
    fn usage_errors_exit_with_code_two() {
        let (code, _, stderr) = run_cli(&["frobnicate"]);
        assert_eq!(code, 2);
        assert!(!stderr.is_empty());
    }
}
