//! Miss-count runner for the registered transpose functions.

use std::process;

use cachetrans::cache::{CacheConfig, TraceLayout};
use cachetrans::registry::{Evaluation, MissBudget, Registry};
use cachetrans::{Error, Shape, Strategy};
use clap::Parser;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(
    name = "cachetrans",
    about = "Count cache misses of transpose strategies on a direct-mapped cache"
)]
struct Args {
    /// Source shape as <rows>x<cols>; repeat for several shapes
    #[arg(long = "shape", value_name = "ROWSxCOLS", default_values = ["32x32", "64x64", "67x61"])]
    shapes: Vec<Shape>,

    /// Run the submission with a fixed strategy instead of shape dispatch:
    /// row-wise, blocked:<n>, specialized64, fallback:<n>
    #[arg(long, value_name = "STRATEGY")]
    strategy: Option<Strategy>,

    /// log2 of the number of cache sets
    #[arg(short = 's', long, default_value_t = CacheConfig::GRADER.set_bits)]
    set_bits: u32,

    /// log2 of the line size in bytes
    #[arg(short = 'b', long, default_value_t = CacheConfig::GRADER.block_bits)]
    block_bits: u32,

    /// Seed for the random source matrices
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let outcome = run(&args, &build_registry(&args));
    if let Err(err) = &outcome {
        eprintln!("error: {}", err);
    }
    process::exit(exit_code(&outcome));
}

/// 0 when every function was correct, 1 when one was not, 2 on bad input.
fn exit_code(outcome: &cachetrans::Result<bool>) -> i32 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn build_registry(args: &Args) -> Registry {
    match args.strategy {
        Some(strategy) => {
            debug!("submission fixed to {}", strategy);
            Registry::graded_with(strategy)
        }
        None => Registry::graded(),
    }
}

/// Returns whether every registered function transposed correctly.
fn run(args: &Args, registry: &Registry) -> cachetrans::Result<bool> {
    let config = CacheConfig::new(args.set_bits, args.block_bits)?;
    let layout = TraceLayout::GRADER;
    debug!("layout: {:?}", layout);

    if let Some(strategy) = args.strategy {
        if let Some(&shape) = args.shapes.iter().find(|&&shape| !strategy.supports(shape)) {
            return Err(Error::UnsupportedShape { strategy, shape });
        }
    }

    println!("=== Transpose Cache Miss Evaluation ===\n");
    println!(
        "Cache: s={} b={} ({} sets × {} B = {} B, direct-mapped)\n",
        config.set_bits,
        config.block_bits,
        config.sets(),
        config.line_bytes(),
        config.capacity()
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut all_correct = true;

    for &shape in &args.shapes {
        let src: Vec<i32> = (0..shape.len())
            .map(|_| rng.gen_range(i32::MIN..=i32::MAX))
            .collect();

        let strategy = args.strategy.unwrap_or_else(|| Strategy::select(shape));
        println!("Matrix: {} (strategy: {})", shape, strategy);
        println!("{}", "-".repeat(90));

        let results = registry.evaluate(shape, &src, config, layout)?;
        print_results(&results, shape, config);
        all_correct &= results.iter().all(|r| r.correct);
        println!();
    }

    Ok(all_correct)
}

fn print_results(results: &[Evaluation], shape: Shape, config: CacheConfig) {
    println!(
        "   {:<42} {:>8} {:>8} {:>10} {:>8}",
        "Function", "Hits", "Misses", "Evictions", "Correct"
    );

    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. {:<42} {:>8} {:>8} {:>10} {:>8}",
            i + 1,
            result.description,
            result.stats.hits,
            result.stats.misses,
            result.stats.evictions,
            if result.correct { "yes" } else { "NO" }
        );
    }

    // Budgets are calibrated for the graded cache only
    if config == CacheConfig::GRADER {
        if let (Some(budget), Some(submission)) = (MissBudget::for_shape(shape), results.first()) {
            let verdict = if submission.correct && submission.stats.misses <= budget {
                "within"
            } else {
                "OVER"
            };
            println!(
                "\nSubmission: {} misses, {} budget of {}",
                submission.stats.misses, verdict, budget
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachetrans::matrix::{MatrixRead, MatrixWrite};
    use cachetrans::registry::{ROW_WISE_DESC, SUBMISSION_DESC};

    fn broken(_src: &dyn MatrixRead, dst: &mut dyn MatrixWrite) {
        dst.set(0, 0, 1);
    }

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("cachetrans").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_graded_run_exits_zero() {
        let args = args(&["--shape", "8x8", "--shape", "3x5"]);
        let outcome = run(&args, &build_registry(&args));
        assert_eq!(outcome, Ok(true));
        assert_eq!(exit_code(&outcome), 0);
    }

    #[test]
    fn test_incorrect_function_exits_one() {
        let args = args(&["--shape", "4x4"]);
        let mut registry = Registry::new();
        registry.register("broken", broken);

        let outcome = run(&args, &registry);
        assert_eq!(outcome, Ok(false));
        assert_eq!(exit_code(&outcome), 1);
    }

    #[test]
    fn test_bad_cache_exits_two() {
        for argv in [["-b", "1"], ["-s", "30"]] {
            let args = args(&argv);
            let outcome = run(&args, &build_registry(&args));
            assert!(matches!(outcome, Err(Error::InvalidCacheConfig { .. })));
            assert_eq!(exit_code(&outcome), 2);
        }
    }

    #[test]
    fn test_strategy_flag_overrides_submission() {
        let args = args(&["--strategy", "blocked:4"]);
        assert_eq!(args.strategy, Some(Strategy::Blocked(4)));

        let registry = build_registry(&args);
        let descriptions: Vec<_> = registry.descriptions().collect();
        assert_eq!(descriptions, vec![SUBMISSION_DESC, ROW_WISE_DESC]);
        assert_eq!(build_registry(&self::args(&[])).len(), 2);
    }

    #[test]
    fn test_specialized_override_on_wrong_shape_exits_two() {
        let args = args(&["--shape", "64x64", "--shape", "67x61", "--strategy", "specialized64"]);
        let outcome = run(&args, &build_registry(&args));
        assert_eq!(
            outcome,
            Err(Error::UnsupportedShape {
                strategy: Strategy::Specialized64,
                shape: Shape::new(67, 61),
            })
        );
        assert_eq!(exit_code(&outcome), 2);
    }

    #[test]
    fn test_bad_strategy_is_a_parse_error() {
        let argv = ["cachetrans", "--strategy", "blocked:0"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
