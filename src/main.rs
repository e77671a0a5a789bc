use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use pretrained_tokenizer::{EncodeReport, HubOptions, PretrainedTokenizer, Tokenizer};

const DEFAULT_MODEL_ID: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

const DEFAULT_TEXT: &str = "I congratulate you all--not merely on your electoral victory but on your selected role in history. For you and I are privileged to serve the great Republic in what could be the most decisive decade in its long history. The choices we make, for good or ill, may well shape the state of the Union for generations yet to come.";

/// Encode text with a pretrained tokenizer and print the token count and ids.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hub repository id, or a directory containing tokenizer.json
    #[arg(default_value = DEFAULT_MODEL_ID)]
    model: String,

    /// Text to encode
    #[arg(short, long, default_value = DEFAULT_TEXT)]
    text: String,

    /// Access token for gated repositories
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "PRETRAINED_TOKENIZER_CACHE")]
    cache_dir: Option<PathBuf>,

    #[arg(long)]
    revision: Option<String>,

    /// Encode without BOS/EOS and other special tokens
    #[arg(long)]
    no_special_tokens: bool,

    /// Also print the decoded text
    #[arg(long)]
    decode: bool,

    /// Keep special tokens in the decoded text
    #[arg(long, requires = "decode")]
    keep_special_tokens: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn hub_options(&self) -> HubOptions {
        HubOptions {
            token: self.token.clone(),
            cache_dir: self.cache_dir.clone(),
            revision: self.revision.clone(),
            progress: self.verbose > 0,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let tokenizer = PretrainedTokenizer::from_pretrained(&args.model, &args.hub_options())
        .with_context(|| format!("loading tokenizer for '{}'", args.model))?;

    let ids = if args.no_special_tokens {
        tokenizer.encode_with(&args.text, false)?
    } else {
        tokenizer.encode(&args.text)?
    };

    let decoded = if args.decode {
        Some(tokenizer.decode_with(&ids, !args.keep_special_tokens)?)
    } else {
        None
    };

    println!("{}", EncodeReport::new(ids, decoded));
    Ok(())
}
