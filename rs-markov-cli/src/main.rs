use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rs_markov_core::io::{read_file, read_text};
use rs_markov_core::model::{Generator, MarkovModel, seed_of};

/// Generates pseudo-random text mimicking the character statistics of a training text.
#[derive(Parser, Debug)]
#[command(name = "rs-markov", version)]
struct Args {
	/// Order of the model (length of the k-grams)
	order: usize,

	/// Length of the generated text, seed included
	length: usize,

	/// Training text file. Reads stdin if omitted.
	#[arg(short, long)]
	input: Option<PathBuf>,

	/// Seed of the random generator, for reproducible output
	#[arg(short, long)]
	seed: Option<u64>,

	/// Print the frequency table to stderr before generating
	#[arg(long)]
	dump: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
	let text = match &args.input {
		Some(path) => read_file(path)?,
		None => read_text(io::stdin().lock())?,
	};
	info!("training order-{} model on {} characters", args.order, text.len());

	let model = MarkovModel::new(&text, args.order)?;
	if args.dump {
		eprint!("{model}");
	}

	// MarkovModel::new already checked order <= len
	let start = seed_of(&text, args.order).ok_or("text shorter than the order")?;
	let rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	let generator = Generator::new(&model, start, rng)?;
	write_generated(generator, args.length, BufWriter::new(io::stdout().lock()))
}

/// Writes the generator's window verbatim, then `length - k` sampled
/// characters as they are drawn, then a newline.
fn write_generated<R: Rng, W: Write>(
	generator: Generator<'_, R>,
	length: usize,
	mut out: W,
) -> Result<(), Box<dyn std::error::Error>> {
	let order = generator.window().chars().count();
	out.write_all(generator.window().as_bytes())?;
	for next in generator.take(length.saturating_sub(order)) {
		write!(out, "{}", next?)?;
	}
	writeln!(out)?;
	out.flush()?;
	Ok(())
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	if let Err(e) = run(&args) {
		error!("{e}");
		std::process::exit(1);
	}
}
