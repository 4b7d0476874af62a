use std::io::BufRead;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cnfrw::cnf::{
    clean_all, read_header, read_header_path, Canonical, CnfDocument, CnfReader, CnfWriter,
    HeaderMode, ReaderOptions, Summary,
};
use cnfrw::literal::Literal;
use cnfrw::parallel::{Printer, Scheduler};

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    None,
}

impl LogLevel {
    fn to_trace(&self) -> Option<tracing::Level> {
        Some(match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::None => return None,
        })
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level. See `tracing::Level` for more information.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    verbosity: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the size and annotations of a CNF file.
    Info {
        /// CNF file, or '-' for stdin
        #[arg(value_name = "FILE.cnf")]
        path: String,

        /// Only read up to the problem line.
        #[arg(long)]
        header_only: bool,
    },

    /// Rewrite a CNF file with its clauses in canonical form, keeping
    /// projection, forget, and weight declarations.
    Clean {
        /// CNF file, or '-' for stdin
        #[arg(value_name = "IN.cnf")]
        input: String,

        /// Where to write the canonical CNF
        #[arg(short, long, value_name = "OUT.cnf")]
        output: PathBuf,

        /// Drop tautologous clauses instead of failing on them.
        #[arg(long)]
        drop_tautologies: bool,

        /// Kind of problem line to write.
        #[arg(long, value_enum, default_value_t = HeaderMode::Fixed)]
        header: HeaderMode,
    },

    /// Read and validate many CNF files concurrently.
    Check {
        #[arg(value_name = "FILE.cnf", required = true)]
        paths: Vec<PathBuf>,

        /// Number of files checked at the same time.
        #[arg(short = 'N', long, default_value_t = NonZeroUsize::MIN)]
        threads: NonZeroUsize,

        /// Accept empty clauses and repeated or opposite literals.
        #[arg(long)]
        no_check: bool,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(level) = args.verbosity.to_trace() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Command::Info { path, header_only } => info(&path, header_only),
        Command::Clean {
            input,
            output,
            drop_tautologies,
            header,
        } => clean(&input, &output, drop_tautologies, header),
        Command::Check {
            paths,
            threads,
            no_check,
        } => check(paths, threads, !no_check),
    }
}

fn read_document(path: &str, reader: &CnfReader) -> Result<CnfDocument> {
    if path == "-" {
        reader
            .read(&mut std::io::stdin().lock())
            .context("could not read CNF from stdin")
    } else {
        reader
            .read_path(path)
            .with_context(|| format!("could not read CNF from '{path}'"))
    }
}

fn info(path: &str, header_only: bool) -> Result<()> {
    if header_only {
        let header = if path == "-" {
            let mut stdin = std::io::stdin().lock();
            read_header(&mut stdin as &mut dyn BufRead)
        } else {
            read_header_path(path)
        }
        .with_context(|| format!("could not read header of '{path}'"))?;
        println!("{} {}", header.nvar, header.nclause);
        return Ok(());
    }

    let doc = read_document(path, &CnfReader::default())?;
    println!("{}", Summary::new(path, &doc));
    Ok(())
}

/// Archived comments that are not directives the writer regenerates.
fn plain_comments(doc: &CnfDocument) -> impl Iterator<Item = &str> {
    doc.comments().iter().filter_map(|line| {
        let mut fields = line.split_whitespace();
        let marker = fields.next()?;
        if matches!(fields.next(), Some("t" | "p")) {
            return None;
        }
        Some(line[marker.len()..].trim_start())
    })
}

fn clean(input: &str, output: &Path, drop_tautologies: bool, header: HeaderMode) -> Result<()> {
    let options = ReaderOptions::builder().verbosity(2).check(false).build();
    let doc = read_document(input, &CnfReader::new(options))?;
    let cleaned = clean_all(doc.clauses(), !drop_tautologies)
        .with_context(|| format!("could not canonicalize '{input}'"))?;

    // The output may be the input, so nothing is written before the whole
    // document has been rebuilt.
    let mut writer = CnfWriter::new(doc.nvar(), Vec::new());
    for line in plain_comments(&doc) {
        writer.do_header_comment(line);
    }
    if let Some(show) = doc.declared_show() {
        writer.add_show(show.iter().copied())?;
    }
    if let Some(forget) = doc.forget_variables() {
        writer.add_forget(forget.iter().copied())?;
    }
    if let Some(weights) = doc.weights() {
        let mut weights: Vec<(Literal, &String)> =
            weights.iter().map(|(lit, weight)| (*lit, weight)).collect();
        weights.sort_by_key(|(lit, _)| (lit.variable(), lit.polarity()));
        writer.add_weights(weights)?;
    }

    let mut dropped = 0;
    for clause in &cleaned {
        match clause {
            Canonical::Clause(literals) => {
                writer.do_clause(literals)?;
            }
            Canonical::Tautology => dropped += 1,
        }
    }
    let clauses = writer.clause_count();
    let bytes = writer.finish_with(header)?;
    std::fs::write(output, bytes)
        .with_context(|| format!("could not write '{}'", output.display()))?;

    tracing::info!(clauses, dropped, output = %output.display(), "wrote canonical cnf");
    Ok(())
}

fn check(paths: Vec<PathBuf>, threads: NonZeroUsize, check: bool) -> Result<()> {
    let total = paths.len();
    let printer = Arc::new(Printer::default());
    if threads.get() > 1 {
        printer.activate();
    }
    let failures = Arc::new(AtomicUsize::new(0));
    let reader = CnfReader::new(ReaderOptions::builder().check(check).build());
    let scheduler = Scheduler::new(threads);

    for path in paths {
        let printer = Arc::clone(&printer);
        let failures = Arc::clone(&failures);
        let reader = reader.clone();
        scheduler.schedule(move || match reader.read_path(&path) {
            Ok(doc) => printer.print(&format!(
                "{}: ok, {} variables, {} clauses, {}",
                path.display(),
                doc.nvar(),
                doc.clause_count(),
                doc.track_class()
            )),
            Err(err) => {
                failures.fetch_add(1, Ordering::SeqCst);
                printer.print(&format!("{}: ERROR {err}", path.display()));
            }
        });
    }
    scheduler.wait();

    let failures = failures.load(Ordering::SeqCst);
    if failures > 0 {
        bail!("{failures} of {total} files failed");
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::clean;
    use cnfrw::cnf::HeaderMode;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cnfrwc-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn failed_clean_keeps_file_in_place() {
        let contents = "c keep me\np cnf 2 2\n1 2 0\n3 0\n";
        let path = scratch("out-of-range.cnf", contents);
        let input = path.to_str().unwrap();

        assert!(clean(input, &path, false, HeaderMode::Fixed).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);

        let tautology = "p cnf 2 1\n1 -1 0\n";
        std::fs::write(&path, tautology).unwrap();
        assert!(clean(input, &path, false, HeaderMode::Fixed).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), tautology);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn clean_in_place() {
        let path = scratch("in-place.cnf", "c keep me\np cnf 3 3\n1 3 1 0\n2 -2 0\n-3 0\n");
        let input = path.to_str().unwrap();

        clean(input, &path, true, HeaderMode::Fixed).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "c t mc\nc keep me\np cnf 3 2\n3 1 0\n-3 0\n"
        );
        std::fs::remove_file(&path).unwrap();
    }
}
