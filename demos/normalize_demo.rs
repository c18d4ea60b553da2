use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    lexnorm::example_apps::run_normalize_app(std::env::args().skip(1))
}
