use std::path::PathBuf;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use rs_markov_core::io::read_file;
use rs_markov_core::model::{Generator, MarkovModel, seed_of};
use rs_markov_core::{ErrorKind, ModelError};

/// Serves a Markov model trained once at startup.
#[derive(Parser, Debug)]
#[command(name = "rs-markov-server", version)]
struct Args {
	/// Training text file
	#[arg(short, long)]
	input: PathBuf,

	/// Order of the model (length of the k-grams)
	#[arg(short, long)]
	order: usize,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,
}

/// Largest text `/v1/generate` will produce in one response.
const MAX_GENERATE_LENGTH: usize = 1_000_000;

/// Query parameters for the `/v1/frequency` endpoint
#[derive(Deserialize)]
struct FrequencyParams {
	kgram: String,
	next: Option<char>,
}

/// Query parameters for the `/v1/sample` endpoint
#[derive(Deserialize)]
struct SampleParams {
	kgram: String,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	length: Option<usize>,
	seed: Option<u64>,
}

/// Read-only state shared by every worker.
///
/// No lock: the model is never mutated after construction.
struct SharedData {
	model: MarkovModel,
	/// First `k` characters of the training text
	start: String,
}

impl GenerateParams {
	fn rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

/// Maps a model error to its HTTP response.
fn error_response(e: ModelError) -> HttpResponse {
	match e.kind() {
		ErrorKind::InvalidArgument => HttpResponse::BadRequest().body(e.to_string()),
		ErrorKind::NotFound => HttpResponse::NotFound().body(e.to_string()),
	}
}

#[get("/v1/order")]
async fn get_order(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.model.order().to_string())
}

/// Diagnostic dump of the frequency table.
#[get("/v1/model")]
async fn get_model(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.model.to_string())
}

/// Returns `frequency(kgram)`, or `frequency(kgram, next)` when `next` is given.
#[get("/v1/frequency")]
async fn get_frequency(data: web::Data<SharedData>, query: web::Query<FrequencyParams>) -> impl Responder {
	let result = match query.next {
		Some(next) => data.model.follow_frequency(&query.kgram, next),
		None => data.model.frequency(&query.kgram),
	};
	match result {
		Ok(count) => HttpResponse::Ok().body(count.to_string()),
		Err(e) => error_response(e),
	}
}

#[get("/v1/sample")]
async fn get_sample(data: web::Data<SharedData>, query: web::Query<SampleParams>) -> impl Responder {
	match data.model.predict(&query.kgram) {
		Ok(next) => HttpResponse::Ok().body(next.to_string()),
		Err(e) => error_response(e),
	}
}

/// Generates a text seeded with the first `k` characters of the training text.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length.unwrap_or(100);
	if length > MAX_GENERATE_LENGTH {
		return HttpResponse::BadRequest()
			.body(format!("length must be at most {MAX_GENERATE_LENGTH}, got {length}"));
	}

	let generated = Generator::new(&data.model, &data.start, query.rng())
		.and_then(|mut generator| generator.generate(length));
	match generated {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(e) => error_response(e),
	}
}

/// Main entry point for the server.
///
/// Trains the model from `--input`, then serves it on `--host:--port`.
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let text = read_file(&args.input)?;
	let model = MarkovModel::new(&text, args.order)?;
	let start = seed_of(&text, args.order).ok_or("text shorter than the order")?.to_owned();
	info!(
		"trained order-{} model on {} ({} characters)",
		args.order,
		args.input.display(),
		text.len()
	);

	let shared_data = web::Data::new(SharedData { model, start });

	info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.app_data(shared_data.clone())
			.service(get_order)
			.service(get_model)
			.service(get_frequency)
			.service(get_sample)
			.service(get_generated)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	Ok(())
}
