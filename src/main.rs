use clap::Parser;
use skeletonize::{Cli, Output, SkeletonizeError};

fn main() {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose > 0, cli.quiet);

    if let Err(err) = cli.run(&output) {
        match err.downcast_ref::<SkeletonizeError>() {
            Some(inner) if inner.is_user_facing() => output.error(&format!("Error: {inner}")),
            _ => output.error(&format!("Error: {err:#}")),
        }
        std::process::exit(1);
    }
}
