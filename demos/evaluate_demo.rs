use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    lexnorm::example_apps::run_evaluate_app(std::env::args().skip(1))
}
