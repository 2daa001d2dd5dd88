use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};

use fib_trie::io::{AddressReader, FibReader, LookupReporter, OutputReporter, Summary};
use fib_trie::{graph, Error, FibTrie, Growth, PoolConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Routing table, one `a.b.c.d/len interface` per line
    fib: PathBuf,

    /// Destination addresses to look up, one per line
    input_packet_file: PathBuf,

    /// Where to write the lookup results [default: INPUT_PACKET_FILE.out]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of nodes per allocator block
    #[arg(long, default_value_t = 1024)]
    block_capacity: usize,

    /// Maximum number of allocator blocks [default: unbounded]
    #[arg(long)]
    max_blocks: Option<usize>,

    /// Double the capacity of every new allocator block
    #[arg(long, default_value_t = false)]
    doubling: bool,

    /// Write `uncompressed.dot` and `compressed.dot` into this directory
    #[arg(long)]
    graph_dir: Option<PathBuf>,
}

impl Cli {
    fn pool_config(&self) -> PoolConfig {
        let mut config = PoolConfig::default().block_capacity(self.block_capacity);
        if let Some(max_blocks) = self.max_blocks {
            config = config.max_blocks(max_blocks);
        }
        if self.doubling {
            config = config.growth(Growth::Doubling);
        }
        config
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut path = self.input_packet_file.clone().into_os_string();
            path.push(".out");
            path.into()
        })
    }
}

/// Export failures never abort the lookups.
fn export_graph<T: graph::Visit + ?Sized>(trie: &T, dir: Option<&Path>, name: &str) {
    let Some(dir) = dir else { return };
    if let Err(e) = graph::export(trie, dir.join(name)) {
        warn!("cannot export {name}: {e}");
    }
}

fn run(args: &Cli) -> Result<(), Error> {
    let t0 = Instant::now();
    let fib = FibReader::new(BufReader::new(File::open(&args.fib)?));
    let trie = FibTrie::build(args.pool_config(), fib)?;
    info!(
        "loaded {} routes from {} in {}ms",
        trie.num_routes(),
        args.fib.display(),
        t0.elapsed().as_millis()
    );
    export_graph(&trie, args.graph_dir.as_deref(), "uncompressed.dot");

    let fib = trie.compress();
    info!(
        "compressed trie has {} nodes ({} removed)",
        fib.len(),
        fib.removed()
    );

    let output = args.output_path();
    let mut reporter = OutputReporter::new(BufWriter::new(File::create(&output)?));
    let mut summary = Summary::new(fib.len());
    for addr in AddressReader::new(BufReader::new(File::open(&args.input_packet_file)?)) {
        let addr = addr?;
        let t = Instant::now();
        let lookup = fib.lookup(addr);
        let elapsed = t.elapsed();
        summary.record(&lookup, elapsed);
        reporter.record(addr, &lookup, elapsed)?;
    }
    reporter.finish(&summary)?;
    reporter.into_inner().flush()?;
    info!(
        "processed {} packets into {}",
        summary.packets,
        output.display()
    );

    export_graph(&fib, args.graph_dir.as_deref(), "compressed.dot");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
