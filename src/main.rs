use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use rolling_signature::config::DEFAULT_BLOCK_LEN;
use rolling_signature::rolling_checksum::rolling_adler32::RollingAdler32;
use rolling_signature::rolling_checksum::rollsum::Rollsum;
use rolling_signature::{generate_signature, read_signature_file, SignatureAlgorithm, SignatureParams};

#[derive(Parser, Debug)]
#[clap(version, about)]
/// Computes and inspects rdiff compatible block signatures
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Algorithm {
    Blake2,
    Md4,
}

impl From<Algorithm> for SignatureAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Blake2 => SignatureAlgorithm::Blake2,
            Algorithm::Md4 => SignatureAlgorithm::Md4,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Weak {
    /// rdiff's rolling checksum
    Rollsum,
    Adler32,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generates a signature of --basis-file=<BASIS_FILE> into --signature-file=<SIGNATURE_FILE>
    Signature {
        #[clap(long)]
        /// The file to fingerprint
        basis_file: PathBuf,
        #[clap(long)]
        /// The resulting signature file
        signature_file: PathBuf,
        #[clap(long, value_enum, default_value = "blake2")]
        /// Strong checksum algorithm
        algorithm: Algorithm,
        #[clap(long, value_enum, default_value = "rollsum")]
        /// Weak checksum; the delta side has to roll the same one
        weak: Weak,
        #[clap(long, default_value_t = DEFAULT_BLOCK_LEN)]
        /// Block size in bytes
        block_len: u32,
        #[clap(long)]
        /// Bytes of the strong checksum to keep, defaults to the full digest
        strong_len: Option<u32>,
    },
    /// Prints a summary of --signature-file=<SIGNATURE_FILE>
    Inspect {
        #[clap(long)]
        /// The signature file to decode
        signature_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli: Cli = Cli::parse();

    match cli.command {
        Commands::Signature {
            basis_file,
            signature_file,
            algorithm,
            weak,
            block_len,
            strong_len,
        } => {
            info!(
                "Generating signature of {} into {}",
                basis_file.display(),
                signature_file.display()
            );

            let mut params = SignatureParams::new(algorithm.into()).with_block_len(block_len);
            if let Some(strong_len) = strong_len {
                params = params.with_strong_len(strong_len);
            }
            // fail on bad flags before the signature file is created
            params.validate()?;

            let basis = File::open(&basis_file)?;
            let progress = ProgressBar::new(basis.metadata()?.len());
            progress.set_style(ProgressStyle::with_template(
                "{bar:40} {bytes}/{total_bytes} ({eta})",
            )?);

            let mut output = BufWriter::new(File::create(&signature_file)?);
            let input = progress.wrap_read(BufReader::new(basis));
            let index = match weak {
                Weak::Rollsum => generate_signature::<Rollsum, _, _>(input, &mut output, &params)?,
                Weak::Adler32 => {
                    generate_signature::<RollingAdler32, _, _>(input, &mut output, &params)?
                }
            };
            output.flush()?;
            progress.finish_and_clear();

            info!("Wrote {} block signatures", index.block_count());
            Ok(())
        }
        Commands::Inspect { signature_file } => {
            let index = read_signature_file(&signature_file)?;
            let shadowed = index.block_count() - index.reachable_blocks().count_ones();

            println!("algorithm:     {:?}", index.algorithm());
            println!("block length:  {}", index.block_len());
            println!("strong length: {}", index.strong_len());
            println!("blocks:        {}", index.block_count());
            println!("distinct weak: {}", index.weak_index().len());
            println!("shadowed:      {}", shadowed);
            Ok(())
        }
    }
}
