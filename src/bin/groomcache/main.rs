//! groomcache CLI - inspect and convert spline-cache blobs dumped to disk.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use groomcache::cache::SplineCache;
use groomcache::export::{ExportItem, Exporter};
use groomcache::geom::{reassemble, KnotStyle, ReassembleOptions};
use groomcache::sink::{CurveSetMeta, GeometrySink, JsonSink};
use groomcache::source::FileSplineData;
use groomcache::Result;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    // Global verbosity flags feed the tracing filter.
    let mut filter = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => filter = "debug",
            "-q" | "--quiet" => filter = "error",
            _ => filtered_args.push(arg),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if filtered_args.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match filtered_args[0] {
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: groomcache-cli info <file>");
                return ExitCode::FAILURE;
            }
            cmd_info(filtered_args[1])
        }
        "dump" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: groomcache-cli dump <file>");
                return ExitCode::FAILURE;
            }
            cmd_dump(filtered_args[1])
        }
        "export" | "e" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!(
                    "Usage: groomcache-cli export <file> <out.json> [--name N] [--group G] [--guide] [--legacy-knots]"
                );
                return ExitCode::FAILURE;
            }
            cmd_export(filtered_args[1], filtered_args[2], &filtered_args[3..])
        }
        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Error: unknown command '{other}'");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("groomcache - spline-cache blob inspector and converter");
    println!();
    println!("Usage: groomcache-cli [flags] <command> [args]");
    println!();
    println!("Commands:");
    println!("  info, i    <file>             Show manifest flags and page layout");
    println!("  dump, d    <file>             Reassemble and print curve buffers as JSON");
    println!("  export, e  <file> <out.json>  Run the export pipeline into a JSON file");
    println!("  help                          Show this help");
    println!();
    println!("Flags:");
    println!("  -v, --verbose   Debug logging");
    println!("  -q, --quiet     Errors only");
    println!();
    println!("Export options:");
    println!("  --name N        Object name (default: file stem)");
    println!("  --group G       Groom group name (default: object name)");
    println!("  --guide         Mark the set as guide curves");
    println!("  --legacy-knots  Use the degree-1 end-repeat knot form");
}

fn cmd_info(path: &str) -> Result<()> {
    let blob = FileSplineData::open(path)?;
    let cache = SplineCache::decode(blob.bytes())?;
    let header = cache.manifest().header;

    println!("File: {path} ({} bytes)", blob.len());
    println!("  GroupDeflate: {}", header.group_deflate);
    println!("  GroupBase64:  {}", header.group_base64);
    println!("  Pages: {}", cache.pages().len());
    for (i, page) in cache.pages().iter().enumerate() {
        let degenerate = page.infos.iter().filter(|p| p.is_degenerate()).count();
        println!(
            "    [{i}] {} primitives ({degenerate} degenerate), {} vertices, widths: {}",
            page.infos.len(),
            page.positions.len() / 3,
            page.widths.is_some(),
        );
    }
    println!("  Total primitives: {}", cache.num_primitives());
    Ok(())
}

fn cmd_dump(path: &str) -> Result<()> {
    let blob = FileSplineData::open(path)?;
    let cache = SplineCache::decode(blob.bytes())?;
    let opts = ReassembleOptions {
        with_widths: cache.pages().iter().all(|p| p.widths.is_some()),
        ..ReassembleOptions::default()
    };
    let batch = reassemble(cache.pages(), &opts)?;
    batch.validate()?;

    let stem = file_stem(path);
    let meta = CurveSetMeta {
        group_name: stem.clone(),
        ..Default::default()
    };
    let mut sink = JsonSink::pretty(std::io::stdout().lock());
    sink.write_curves(&stem, &batch, &meta)
}

fn cmd_export(path: &str, out_path: &str, options: &[&str]) -> Result<()> {
    let mut name = file_stem(path);
    let mut group = None;
    let mut guide = false;
    let mut knot_style = KnotStyle::Clamped;

    let mut iter = options.iter();
    while let Some(opt) = iter.next() {
        match *opt {
            "--name" => match iter.next() {
                Some(v) => name = v.to_string(),
                None => return Err(groomcache::Error::other("--name needs a value")),
            },
            "--group" => match iter.next() {
                Some(v) => group = Some(v.to_string()),
                None => return Err(groomcache::Error::other("--group needs a value")),
            },
            "--guide" => guide = true,
            "--legacy-knots" => knot_style = KnotStyle::LegacyTrimmed,
            other => {
                return Err(groomcache::Error::other(format!(
                    "unknown export option '{other}'"
                )))
            }
        }
    }

    let blob = FileSplineData::open(path)?;
    let mut item = ExportItem::spline_cache(name, blob).with_guide(guide);
    if let Some(group) = group {
        item = item.with_group_name(group);
    }

    let mut exporter = Exporter::new();
    exporter.set_knot_style(knot_style);
    exporter.add_item(item);

    let out = File::create(out_path)?;
    let mut sink = JsonSink::pretty(BufWriter::new(out));
    let stats = exporter.export(&mut sink);
    if let Some((item, error)) = stats.failures.first() {
        return Err(groomcache::Error::other(format!("{item}: {error}")));
    }
    sink.into_inner().flush()?;
    println!(
        "Wrote {} curve set(s), {} curves, {} vertices to {out_path}",
        stats.curve_sets, stats.curves, stats.vertices
    );
    Ok(())
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
