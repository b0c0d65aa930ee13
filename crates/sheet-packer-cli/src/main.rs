use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use sheet_packer_core::image_source::load_sprite;
use sheet_packer_core::{
    Constraints, GrowthPolicy, Layout, Sheet, SheetNode, pack_sheet, pack_sheets, to_json_array,
    to_json_hash,
};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sheet-packer",
    about = "Pack sprites onto a growable sheet",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack the images under a directory onto one sheet and write its layout
    Pack(PackArgs),
    /// Pack synthetic sprites with every growth policy and print size, occupancy and time
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Sheet base name (the layout is written to name.json)
    #[arg(short, long, default_value = "sheet", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides the sheet options below)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Sheet
    /// Max width (1..=8192)
    #[arg(long, default_value_t = 8192, help_heading = "Sheet")]
    max_width: u32,
    /// Max height (1..=8192)
    #[arg(long, default_value_t = 8192, help_heading = "Sheet")]
    max_height: u32,
    /// Grow the sheet in powers of two (max dimensions must be powers of two)
    #[arg(long, default_value_t = false, help_heading = "Sheet")]
    pow2: bool,
    /// Keep the max_width:max_height aspect ratio while growing
    #[arg(long, default_value_t = false, help_heading = "Sheet")]
    keep_aspect: bool,

    // Export
    /// Metadata format: json-array | json (alias) | json-hash
    #[arg(long, default_value = "json-array", value_parser = ["json-array", "json", "json-hash"], help_heading = "Export")]
    metadata: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of synthetic sprites
    #[arg(long, default_value_t = 200)]
    count: usize,
    /// Smallest sprite side
    #[arg(long, default_value_t = 8)]
    min_size: u32,
    /// Largest sprite side
    #[arg(long, default_value_t = 64)]
    max_size: u32,
    /// RNG seed for the sprite sizes
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Sheets packed per policy (as one batch)
    #[arg(long, default_value_t = 8)]
    iterations: usize,
    /// Max width used for every policy
    #[arg(long, default_value_t = 4096)]
    max_width: u32,
    /// Max height used for every policy
    #[arg(long, default_value_t = 4096)]
    max_height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let constraints = resolve_constraints(cli)?;
    let policy = GrowthPolicy::for_constraints(&constraints);

    if cli.print_config {
        let value = serde_json::json!({
            "constraints": &constraints,
            "policy": policy.name(),
        });
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&value)?),
            _ => println!("{}", serde_json::to_string_pretty(&value)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    if paths.is_empty() {
        warn!(input = %cli.input.display(), "no images found");
    }
    let mut sheet = load_sheet_with_progress(&cli.input, &paths, constraints, show_progress)?;
    info!(count = sheet.sprites().len(), %policy, "loaded sprites");

    let start = Instant::now();
    pack_sheet(&mut sheet).context("pack sheet")?;
    let elapsed = start.elapsed();
    let layout = sheet.to_layout();
    info!(
        width = layout.width,
        height = layout.height,
        time = %fmt_dur(elapsed),
        "sheet packed"
    );

    let metadata = render_metadata(&layout, &cli.metadata)?;
    if cli.dry_run {
        println!("{}", layout.stats().summary());
    } else {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
        let json_path = cli.out_dir.join(format!("{}.json", cli.name));
        fs::write(&json_path, serde_json::to_string_pretty(&metadata)?)
            .with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, sprites = layout.sprites.len(), "layout written");
    }

    if let Some(stats_path) = &cli.export_stats {
        let stats = layout.stats();
        if !cli.dry_run {
            let value = serde_json::json!({
                "policy": policy.name(),
                "stats": stats,
                "wasted_area": stats.wasted_area(),
                "waste_percentage": stats.waste_percentage(),
                "time_ms": elapsed.as_secs_f64() * 1000.0,
            });
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!(
                "policy={} used_area={} total_area={} occupancy={:.2}%",
                policy,
                stats.used_area,
                stats.canvas_area,
                stats.occupancy * 100.0
            );
        }
    }
    Ok(())
}

fn render_metadata(layout: &Layout<String>, format: &str) -> anyhow::Result<serde_json::Value> {
    Ok(match format {
        "json-array" | "json" => to_json_array(layout),
        "json-hash" => to_json_hash(layout),
        other => anyhow::bail!("unknown metadata format: {}", other),
    })
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    if b.min_size == 0 || b.min_size > b.max_size {
        anyhow::bail!("invalid sprite size range {}..={}", b.min_size, b.max_size);
    }
    let mut rng = rand::rngs::StdRng::seed_from_u64(b.seed);
    let sizes: Vec<(u32, u32)> = (0..b.count)
        .map(|_| {
            (
                rng.gen_range(b.min_size..=b.max_size),
                rng.gen_range(b.min_size..=b.max_size),
            )
        })
        .collect();
    let iterations = b.iterations.max(1);

    for (pow2, keep_aspect) in [(false, false), (false, true), (true, false), (true, true)] {
        let constraints = match Constraints::new(b.max_width, b.max_height, pow2, keep_aspect) {
            Ok(c) => c,
            Err(err) => {
                warn!(%err, pow2, keep_aspect, "skipping policy");
                continue;
            }
        };
        let policy = GrowthPolicy::for_constraints(&constraints);
        let mut template: Sheet<String> = Sheet::new(constraints);
        for (i, (w, h)) in sizes.iter().enumerate() {
            template.push_sprite(format!("sprite_{}", i), *w, *h);
        }
        let mut sheets = vec![template; iterations];

        let start = Instant::now();
        let results = pack_sheets(&mut sheets);
        let per_sheet = start.elapsed().div_f64(iterations as f64);

        if let Some(Err(err)) = results.first() {
            println!("{:<26} failed: {}", policy.name(), err);
            continue;
        }
        let stats = sheets[0].to_layout().stats();
        println!(
            "{:<26} sheet={}x{} occupancy={:.2}% time={}",
            policy.name(),
            stats.width,
            stats.height,
            stats.occupancy * 100.0,
            fmt_dur(per_sheet)
        );
    }
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.0}µs", ms * 1000.0)
    }
}

fn resolve_constraints(cli: &PackArgs) -> anyhow::Result<Constraints> {
    let yaml = match &cli.config {
        Some(path) => {
            let file = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_yaml::from_str(&file).with_context(|| format!("parse config {}", path.display()))?
        }
        None => YamlConfig::default(),
    };
    yaml.into_constraints(cli)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("invalid glob {}", pat))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

/// Key of a sprite: its path relative to the input directory, with `/` separators.
fn sprite_key(root: &Path, p: &Path) -> String {
    let rel = if root.is_dir() {
        p.strip_prefix(root).unwrap_or(p)
    } else {
        p.file_name().map(Path::new).unwrap_or(p)
    };
    rel.to_string_lossy().replace('\\', "/")
}

fn load_sheet_with_progress(
    root: &Path,
    paths: &[PathBuf],
    constraints: Constraints,
    progress: bool,
) -> anyhow::Result<Sheet<String>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut sheet = Sheet::new(constraints);
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        let entry = load_sprite(sprite_key(root, p), p);
        if entry.size.is_some() {
            sheet.nodes.push(SheetNode::Sprite(entry));
        } else {
            error!(?p, "skip image");
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(sheet)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// Sheet options read from `--config`; set fields override the matching flags.
#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    max_width: Option<u32>,
    max_height: Option<u32>,
    power_of_two: Option<bool>,
    maintain_aspect_ratio: Option<bool>,
}

impl YamlConfig {
    fn into_constraints(self, cli: &PackArgs) -> anyhow::Result<Constraints> {
        Constraints::new(
            self.max_width.unwrap_or(cli.max_width),
            self.max_height.unwrap_or(cli.max_height),
            self.power_of_two.unwrap_or(cli.pow2),
            self.maintain_aspect_ratio.unwrap_or(cli.keep_aspect),
        )
        .context("invalid sheet options")
    }
}
