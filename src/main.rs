use lastic::context::Environment;
use lastic::status::ExitStatus;

/// Entry point - collects arguments and calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    let args: Vec<String> = std::env::args().collect();
    let env = Environment::init();

    lastic::core::run(args, env)
}
