use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrubline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preload a sequence and write the scrubbed frame at a progress value as a PNG.
    Frame(FrameArgs),
    /// Preload a sequence and report loading progress until every frame settles.
    Preload(PreloadArgs),
    /// Look up a product in the catalog and print its details.
    Product(ProductArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input sequence JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Directory holding the frame files. Defaults to the sequence file's parent.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PreloadArgs {
    /// Input sequence JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory holding the frame files. Defaults to the sequence file's parent.
    #[arg(long)]
    assets_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProductArgs {
    /// Product identifier, e.g. headphone-01.
    #[arg(long)]
    id: String,

    /// Catalog JSON path. Defaults to the built-in demo catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Preload(args) => cmd_preload(args),
        Command::Product(args) => cmd_product(args),
    }
}

fn read_sequence_json(path: &Path) -> anyhow::Result<scrubline::SequenceSpec> {
    let f = File::open(path).with_context(|| format!("open sequence '{}'", path.display()))?;
    let r = BufReader::new(f);
    let spec: scrubline::SequenceSpec =
        serde_json::from_reader(r).with_context(|| "parse sequence JSON")?;
    spec.validate()?;
    Ok(spec)
}

fn assets_root_for(in_path: &Path, assets_root: Option<PathBuf>) -> PathBuf {
    assets_root.unwrap_or_else(|| {
        in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    })
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1]");
    }

    let spec = read_sequence_json(&args.in_path)?;
    let viewport = scrubline::Viewport::new(args.width, args.height)?;
    let root = assets_root_for(&args.in_path, args.assets_root);

    let tracker = scrubline::LoadTracker::new();
    let mut scrubber = scrubline::SequenceScrubber::new(spec, viewport)?;
    scrubber.attach(&tracker, Arc::new(scrubline::DirFetcher::new(root)));
    scrubber.wait_ready();
    scrubber.set_progress(args.progress);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let surface = scrubber.surface();
    image::save_buffer_with_format(
        &args.out,
        surface.data(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_preload(args: PreloadArgs) -> anyhow::Result<()> {
    let spec = read_sequence_json(&args.in_path)?;
    let frame_count = spec.frame_count;
    let root = assets_root_for(&args.in_path, args.assets_root);

    let tracker = scrubline::LoadTracker::new();
    let mut loader = scrubline::SequenceLoader::new(spec)?;
    loader.start(&tracker, Arc::new(scrubline::DirFetcher::new(root)));

    let mut last = None;
    while !loader.is_ready() {
        loader.pump();
        let pct = tracker.percentage();
        if last != Some(pct) {
            eprintln!("loaded {pct}%");
            last = Some(pct);
        }
        std::thread::sleep(Duration::from_millis(25));
    }

    let failed = loader
        .slots()
        .iter()
        .filter(|slot| slot.frame().is_none())
        .count();
    eprintln!("{} frames settled, {failed} failed", frame_count);
    Ok(())
}

fn cmd_product(args: ProductArgs) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read catalog '{}'", path.display()))?;
            scrubline::ProductCatalog::from_json(&json)?
        }
        None => scrubline::ProductCatalog::demo(),
    };

    let product = catalog.require(&args.id)?;

    println!("{} ({})", product.name, product.id);
    println!("  {}", product.description);
    println!("  category: {}", product.category);
    println!("  price:    ${}", product.price);
    println!("  stock:    {}", product.stock);
    for image in &product.images {
        println!("  image:    {image}");
    }
    for (key, value) in &product.specs {
        println!("  {key}: {value}");
    }
    Ok(())
}
