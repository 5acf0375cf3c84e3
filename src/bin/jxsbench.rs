//! jxsbench - kernel benchmark and backend self-check.
//!
//! Times individual kernels on synthetic lines and verifies that every
//! vectorized backend matches the scalar reference bit for bit.

use std::hint::black_box;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use jpegxs_rs::{Backend, Kernels, QuantType, VerticalPosition};
use tracing::{debug, info};

/// Benchmark and verify the JPEG XS transform and quantization kernels
#[derive(Parser)]
#[command(name = "jxsbench")]
#[command(author = "jpegxs-rs contributors")]
#[command(version)]
#[command(about = "Benchmark and verify JPEG XS DWT and quantization kernels", long_about = None)]
#[command(after_help = "EXAMPLES:
    jxsbench bench -k idwt-lf16 -l 1920 -n 100000
    jxsbench bench -k quant-deadzone -b scalar
    jxsbench verify -b portable --max-len 300
    jxsbench backends

Set RUST_LOG=debug to see backend selection.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time one kernel on a synthetic line
    #[command(visible_alias = "b")]
    Bench {
        /// Kernel to run
        #[arg(short, long, value_enum, default_value = "dwt")]
        kernel: Kernel,

        /// Line length in samples
        #[arg(short, long, default_value = "1920")]
        len: usize,

        /// Number of calls to time
        #[arg(short = 'n', long, default_value = "10000")]
        iterations: u32,

        /// Backend: auto, scalar, portable or sse2
        #[arg(short, long, default_value = "auto")]
        backend: Backend,
    },

    /// Compare a backend against the scalar kernels over a range of lengths
    #[command(visible_alias = "v")]
    Verify {
        /// Backend: auto, scalar, portable or sse2
        #[arg(short, long, default_value = "auto")]
        backend: Backend,

        /// Longest line checked (every length from 2 up to this one is run)
        #[arg(long, default_value = "257")]
        max_len: usize,

        /// Seed of the synthetic input pattern
        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// List the backends usable on this machine
    #[command(visible_alias = "l")]
    Backends,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kernel {
    /// Forward horizontal DWT
    Dwt,
    /// Inverse horizontal DWT, 16-bit LF
    IdwtLf16,
    /// Inverse horizontal DWT, 32-bit LF
    IdwtLf32,
    /// Inverse vertical DWT, interior row
    IdwtVertical,
    /// Vertical boundary row recalculation
    IdwtRecalc,
    QuantDeadzone,
    QuantUniform,
    DequantDeadzone,
    DequantUniform,
}

impl Kernel {
    const ALL: [Kernel; 9] = [
        Kernel::Dwt,
        Kernel::IdwtLf16,
        Kernel::IdwtLf32,
        Kernel::IdwtVertical,
        Kernel::IdwtRecalc,
        Kernel::QuantDeadzone,
        Kernel::QuantUniform,
        Kernel::DequantDeadzone,
        Kernel::DequantUniform,
    ];
}

const GROUP_SIZE: usize = 4;
const GTLI: u8 = 3;
const SHIFT: u8 = 2;

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bench {
            kernel,
            len,
            iterations,
            backend,
        } => bench(kernel, len, iterations, backend),
        Commands::Verify {
            backend,
            max_len,
            seed,
        } => verify(backend, max_len, seed),
        Commands::Backends => list_backends(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn bench(
    kernel: Kernel,
    len: usize,
    iterations: u32,
    backend: Backend,
) -> Result<(), Box<dyn std::error::Error>> {
    jpegxs_rs::validate_line_len(len)?;
    let kernels = Kernels::with_backend(backend)?;
    info!(%backend, ?kernel, len, iterations, "starting benchmark");

    let mut workload = Workload::new(len, 0x5EED);
    let start = Instant::now();
    for _ in 0..iterations {
        workload.run(&kernels, kernel);
        black_box(&workload);
    }
    let elapsed = start.elapsed();

    let samples = len as f64 * f64::from(iterations);
    println!(
        "{:?} on {} ({} samples x {} calls): {:?} total, {:.3} ns/sample",
        kernel,
        backend,
        len,
        iterations,
        elapsed,
        elapsed.as_nanos() as f64 / samples.max(1.0)
    );
    Ok(())
}

fn verify(backend: Backend, max_len: usize, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let reference = Kernels::scalar();
    let kernels = Kernels::with_backend(backend)?;
    info!(%backend, max_len, seed, "verifying against scalar");

    let mut checked = 0usize;
    let mut mismatches = Vec::new();
    for len in 2..=max_len.max(2) {
        for kernel in Kernel::ALL {
            let mut expected = Workload::new(len, seed.wrapping_add(len as u64));
            let mut actual = Workload::new(len, seed.wrapping_add(len as u64));
            expected.run(&reference, kernel);
            actual.run(&kernels, kernel);
            checked += 1;
            if expected.output(kernel) != actual.output(kernel) {
                debug!(?kernel, len, "mismatch");
                mismatches.push(format!("{:?} len {}", kernel, len));
            }
        }
    }

    if !mismatches.is_empty() {
        return Err(format!(
            "{} of {} runs differ from scalar: {}",
            mismatches.len(),
            checked,
            mismatches.join(", ")
        )
        .into());
    }
    println!("✓ {} matches scalar on {} kernel runs", backend, checked);
    Ok(())
}

fn list_backends() -> Result<(), Box<dyn std::error::Error>> {
    let detected = Backend::detect();
    println!("Kernel backends:");
    println!();
    for backend in Backend::available() {
        let marker = if backend == detected { " (detected)" } else { "" };
        println!("  {}{}", backend, marker);
    }
    println!();
    Ok(())
}

/// Deterministic input generator (64-bit LCG).
struct Pattern(u64);

impl Pattern {
    fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_u32() % (hi - lo) as u32) as i32
    }
}

/// Input and output buffers for one line length.
struct Workload {
    line: Vec<i32>,
    lf: Vec<i32>,
    hf0: Vec<i32>,
    hf1: Vec<i32>,
    lf16: Vec<i16>,
    hf16: Vec<i16>,
    out: Vec<i32>,
    rows: [Vec<i32>; 4],
    words: Vec<u16>,
    coeffs: Vec<u16>,
    gclis: Vec<u8>,
}

impl Workload {
    fn new(len: usize, seed: u64) -> Self {
        let mut p = Pattern(seed);
        let mut i32s = |n: usize, lim: i32| -> Vec<i32> { (0..n).map(|_| p.range(-lim, lim)).collect() };
        let line = i32s(len, 4096);
        let lf = i32s(len, 8192);
        let hf0 = i32s(len, 2048);
        let hf1 = i32s(len, 2048);
        let row0 = i32s(len, 4096);
        let lf16 = i32s(len.div_ceil(2), 2048).into_iter().map(|v| v as i16).collect();
        let hf16 = i32s(len / 2, 1024).into_iter().map(|v| v as i16).collect();
        let words: Vec<u16> = i32s(len, 0x8000).into_iter().map(|v| v as u16).collect();
        let gclis = i32s(len.div_ceil(GROUP_SIZE), 8)
            .into_iter()
            .map(|v| (v + 8) as u8)
            .collect();

        Self {
            line,
            lf,
            hf0,
            hf1,
            lf16,
            hf16,
            out: vec![0; len],
            rows: [row0, vec![0; len], vec![0; len], vec![0; len]],
            coeffs: words.clone(),
            words,
            gclis,
        }
    }

    fn run(&mut self, kernels: &Kernels, kernel: Kernel) {
        match kernel {
            Kernel::Dwt => {
                let (lf, hf) = self.out.split_at_mut(self.line.len().div_ceil(2));
                kernels.dwt_horizontal_line(&self.line, lf, hf);
            }
            Kernel::IdwtLf16 => {
                kernels.idwt_horizontal_line_lf16(&self.lf16, &self.hf16, &mut self.out, SHIFT)
            }
            Kernel::IdwtLf32 => {
                kernels.idwt_horizontal_line_lf32(&self.lf, &self.hf16, &mut self.out, SHIFT)
            }
            Kernel::IdwtVertical => {
                let [r0, r1, r2, r3] = &mut self.rows;
                let mut out = [&mut r0[..], &mut r1[..], &mut r2[..], &mut r3[..]];
                kernels.idwt_vertical_line(
                    &self.lf,
                    &self.hf0,
                    &self.hf1,
                    &mut out,
                    VerticalPosition::Interior,
                );
            }
            Kernel::IdwtRecalc => {
                kernels.idwt_vertical_line_recalc(&self.lf, &self.hf0, &self.hf1, &mut self.out, 2)
            }
            Kernel::QuantDeadzone | Kernel::QuantUniform => {
                self.coeffs.copy_from_slice(&self.words);
                let quant_type = quant_type(kernel);
                kernels.quantize(&mut self.coeffs, &self.gclis, GROUP_SIZE, GTLI, quant_type);
            }
            Kernel::DequantDeadzone | Kernel::DequantUniform => {
                self.coeffs.copy_from_slice(&self.words);
                let quant_type = quant_type(kernel);
                kernels.dequantize(&mut self.coeffs, &self.gclis, GROUP_SIZE, GTLI, quant_type);
            }
        }
    }

    fn output(&self, kernel: Kernel) -> Vec<i32> {
        match kernel {
            Kernel::IdwtVertical => self.rows[1].iter().chain(&self.rows[2]).copied().collect(),
            Kernel::QuantDeadzone
            | Kernel::QuantUniform
            | Kernel::DequantDeadzone
            | Kernel::DequantUniform => self.coeffs.iter().map(|&w| i32::from(w)).collect(),
            _ => self.out.clone(),
        }
    }
}

fn quant_type(kernel: Kernel) -> QuantType {
    match kernel {
        Kernel::QuantUniform | Kernel::DequantUniform => QuantType::Uniform,
        _ => QuantType::Deadzone,
    }
}
