use pascal_memo::{EvalError, EvaluatorConfig};
use std::env;

fn main() -> Result<(), EvalError> {
    env_logger::init();

    // Optional first argument: number of rows to show.
    let size: i64 = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(8);
    let evaluator = EvaluatorConfig::new().build();

    println!("Pascal's Triangle, {} rows", size);
    let triangle = evaluator.triangle(size)?;
    let width = triangle
        .last()
        .map(|row| row.iter().map(|v| v.to_string().len()).max().unwrap_or(1))
        .unwrap_or(1);
    for (n, row) in triangle.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:^width$}", v)).collect();
        let indent = (size as usize - 1 - n) * (width + 1) / 2;
        println!("{}{}", " ".repeat(indent), cells.join(" "));
    }

    println!();
    println!("Odd entries (Sierpinski triangle), 32 rows");
    print!("{}", evaluator.render_parity(32)?);

    println!();
    println!("Street routes to each crossing of a 4 x 3 block grid");
    for row in evaluator.lattice_grid(4, 3)? {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>3}", v)).collect();
        println!("{}", cells.join(" "));
    }
    println!("Routes from home to office: {}", evaluator.lattice_paths(4, 3)?);

    println!();
    println!("Shallow diagonal sums");
    for d in 0..size {
        println!(
            "  diagonal {:>2}: {:>6} = F({})",
            d,
            evaluator.shallow_diagonal_sum(d)?,
            d + 1
        );
    }

    println!();
    println!("Binomial cache stats: {:?}", evaluator.binomial_stats());
    Ok(())
}
