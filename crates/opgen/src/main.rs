//! opgen - ShaderGraph Swift binding generator
//!
//! Thin binary over `opgen-cli`; all commands live in the library crate.

fn main() {
    opgen_cli::init_tracing();
    let code = opgen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
