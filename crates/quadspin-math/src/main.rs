//! Prints the results of a few vector and matrix operations.

mod report;

use report::ArithmeticReport;

fn main() {
    print!("{}", ArithmeticReport::compute());
}
