//! Walk through the classic "is the compiled version faster, and is it
//! still right?" comparisons.
//!
//! ```bash
//! cargo run --release --example notebook
//! RUST_LOG=warmtime=debug cargo run --release --example notebook
//! ```

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use warmtime::output::{format_report, format_speedup};
use warmtime::workloads::{moving_average, moving_average_naive, square, square_all, sum_of_squares};
use warmtime::{approx_equal, first_mismatch, CostProfile, Harness, Profiled, Timer, Tolerance};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let timer = Timer::new();
    let harness = Harness::new().timer(timer).from_env();
    let xs: Vec<f64> = (0..100_000).map(|i| i as f64 * 1e-3).collect();

    // 1. Scalar squaring: element loop vs. the vectorized kernel.
    let looped = harness.measure_infallible(|| {
        let mut out = Vec::with_capacity(xs.len());
        for &x in &xs {
            out.push(square(x));
        }
        out
    })?;
    let vectorized = harness.measure_infallible(|| square_all(&xs))?;
    print!("{}", format_report("square, element loop", &looped));
    print!("{}", format_report("square, square_all", &vectorized));
    print!("{}", format_speedup("square_all", &vectorized, &looped));

    // 2. Simple moving average, checked against the naive definition.
    let window = 50;
    let naive = harness.measure(|| moving_average_naive(&xs, window))?;
    let running = harness.measure(|| moving_average(&xs, window))?;
    print!("{}", format_report("moving average, naive", &naive));
    print!("{}", format_report("moving average, running sum", &running));
    print!("{}", format_speedup("running sum", &running, &naive));

    let expected = moving_average_naive(&xs, window)?;
    let actual = moving_average(&xs, window)?;
    let tol = Tolerance::default();
    if approx_equal(&actual, &expected, &tol)? {
        println!("moving averages agree within rel={:e} abs={:e}\n", tol.rel, tol.abs);
    } else if let Some(m) = first_mismatch(&actual, &expected, &tol)? {
        println!(
            "moving averages diverge at {}: {} vs {}\n",
            m.index, m.actual, m.expected
        );
    }

    // 3. Sequential vs. parallel reduction.
    let seq = harness.measure_infallible(|| sum_of_squares(&xs))?;
    print!("{}", format_report("sum of squares, sequential", &seq));
    #[cfg(feature = "parallel")]
    {
        let par = harness.measure_infallible(|| warmtime::workloads::par_sum_of_squares(&xs))?;
        print!("{}", format_report("sum of squares, parallel", &par));
        print!("{}", format_speedup("parallel", &par, &seq));
    }

    // 4. Why warm up: a unit that "compiles" on first use.
    let profile = CostProfile::compile_once(Duration::from_millis(20));
    let mut cold = Profiled::new(profile, || sum_of_squares(&xs[..1_000]));
    let unwarmed = harness.clone().warmup(0).repetitions(10).measure_infallible(cold.as_unit())?;
    let mut warm = Profiled::new(profile, || sum_of_squares(&xs[..1_000]));
    let warmed = harness.clone().warmup(1).repetitions(10).measure_infallible(warm.as_unit())?;
    print!("{}", format_report("first call timed", &unwarmed));
    print!("{}", format_report("first call discarded", &warmed));
    print!("{}", format_speedup("warm-up", &warmed, &unwarmed));

    Ok(())
}
